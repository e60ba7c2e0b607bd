//! Shared PDDL fixtures for the integration tests: small instances of
//! the classic benchmark domains the end-to-end scenarios run on.

#![allow(dead_code)]

pub const GRIPPER_DOMAIN: &str = "
(define (domain gripper)
  (:requirements :strips :typing)
  (:types room ball gripper)
  (:predicates (at-robby ?r - room)
               (at ?b - ball ?r - room)
               (free ?g - gripper)
               (carry ?b - ball ?g - gripper))
  (:action move
    :parameters (?from ?to - room)
    :precondition (at-robby ?from)
    :effect (and (at-robby ?to) (not (at-robby ?from))))
  (:action pick
    :parameters (?b - ball ?r - room ?g - gripper)
    :precondition (and (at ?b ?r) (at-robby ?r) (free ?g))
    :effect (and (carry ?b ?g) (not (at ?b ?r)) (not (free ?g))))
  (:action drop
    :parameters (?b - ball ?r - room ?g - gripper)
    :precondition (and (carry ?b ?g) (at-robby ?r))
    :effect (and (at ?b ?r) (free ?g) (not (carry ?b ?g)))))
";

pub const GRIPPER_P_1_0: &str = "
(define (problem p-1-0)
  (:domain gripper)
  (:objects rooma roomb - room ball1 - ball left right - gripper)
  (:init (at-robby rooma) (free left) (free right) (at ball1 rooma))
  (:goal (at ball1 roomb)))
";

pub const BLOCKS_DOMAIN: &str = "
(define (domain blocksworld)
  (:requirements :strips)
  (:predicates (on ?x ?y) (ontable ?x) (clear ?x) (handempty) (holding ?x))
  (:action pick-up
    :parameters (?x)
    :precondition (and (clear ?x) (ontable ?x) (handempty))
    :effect (and (not (ontable ?x)) (not (clear ?x)) (not (handempty)) (holding ?x)))
  (:action put-down
    :parameters (?x)
    :precondition (holding ?x)
    :effect (and (not (holding ?x)) (clear ?x) (handempty) (ontable ?x)))
  (:action stack
    :parameters (?x ?y)
    :precondition (and (holding ?x) (clear ?y))
    :effect (and (not (holding ?x)) (not (clear ?y)) (clear ?x) (handempty) (on ?x ?y)))
  (:action unstack
    :parameters (?x ?y)
    :precondition (and (on ?x ?y) (clear ?x) (handempty))
    :effect (and (holding ?x) (clear ?y) (not (clear ?x)) (not (handempty)) (not (on ?x ?y)))))
";

pub const BLOCKS_4: &str = "
(define (problem blocks-4)
  (:domain blocksworld)
  (:objects a b c d)
  (:init (ontable a) (ontable b) (ontable c) (ontable d)
         (clear a) (clear b) (clear c) (clear d) (handempty))
  (:goal (on a b)))
";

pub const FERRY_DOMAIN: &str = "
(define (domain ferry)
  (:requirements :strips :typing)
  (:types location car)
  (:predicates (at-ferry ?l - location)
               (at ?c - car ?l - location)
               (on ?c - car)
               (empty-ferry))
  (:action sail
    :parameters (?from ?to - location)
    :precondition (and (at-ferry ?from) (not (at-ferry ?to)))
    :effect (and (at-ferry ?to) (not (at-ferry ?from))))
  (:action board
    :parameters (?car - car ?loc - location)
    :precondition (and (at ?car ?loc) (at-ferry ?loc) (empty-ferry))
    :effect (and (on ?car) (not (at ?car ?loc)) (not (empty-ferry))))
  (:action debark
    :parameters (?car - car ?loc - location)
    :precondition (and (on ?car) (at-ferry ?loc))
    :effect (and (at ?car ?loc) (not (on ?car)) (empty-ferry))))
";

pub const FERRY_TEST: &str = "
(define (problem ferry-test)
  (:domain ferry)
  (:objects l1 l2 - location c1 - car)
  (:init (at-ferry l1) (empty-ferry) (at c1 l1))
  (:goal (at c1 l2)))
";

pub const DELIVERY_DOMAIN: &str = "
(define (domain delivery)
  (:requirements :strips)
  (:predicates (cell ?c) (package ?p) (truck ?t) (adjacent ?c1 ?c2) (garage ?c)
               (at-package ?p ?c) (at-truck ?t ?c) (carrying ?t ?p))
  (:action drive
    :parameters (?t ?from ?to)
    :precondition (and (truck ?t) (cell ?from) (cell ?to)
                       (adjacent ?from ?to) (at-truck ?t ?from))
    :effect (and (at-truck ?t ?to) (not (at-truck ?t ?from))))
  (:action load
    :parameters (?t ?p ?c)
    :precondition (and (truck ?t) (package ?p) (cell ?c)
                       (at-truck ?t ?c) (at-package ?p ?c))
    :effect (and (carrying ?t ?p) (not (at-package ?p ?c))))
  (:action unload
    :parameters (?t ?p ?c)
    :precondition (and (truck ?t) (package ?p) (cell ?c)
                       (at-truck ?t ?c) (carrying ?t ?p))
    :effect (and (at-package ?p ?c) (not (carrying ?t ?p)))))
";

pub const DELIVERY_TEST: &str = "
(define (problem delivery-test)
  (:domain delivery)
  (:objects c1 c2 c3 c4 p1 t1)
  (:init (cell c1) (cell c2) (cell c3) (cell c4) (package p1) (truck t1)
         (adjacent c1 c2) (adjacent c2 c1) (adjacent c2 c3) (adjacent c3 c2)
         (adjacent c3 c4) (adjacent c4 c3) (garage c1)
         (at-package p1 c1) (at-truck t1 c1))
  (:goal (at-package p1 c4)))
";

pub const VISITALL_DOMAIN: &str = "
(define (domain visitall)
  (:requirements :strips)
  (:predicates (at-robot ?c) (visited ?c) (connected ?c1 ?c2))
  (:action move
    :parameters (?from ?to)
    :precondition (and (at-robot ?from) (connected ?from ?to))
    :effect (and (at-robot ?to) (not (at-robot ?from)) (visited ?to))))
";

/// A three-armed star: the robot starts at the hub and must revisit it
/// between arms, so width-one novelty starves after the first arm.
pub const VISITALL_STAR: &str = "
(define (problem visitall-star)
  (:domain visitall)
  (:objects hub a1 b1 d1)
  (:init (at-robot hub) (visited hub)
         (connected hub a1) (connected a1 hub)
         (connected hub b1) (connected b1 hub)
         (connected hub d1) (connected d1 hub))
  (:goal (and (visited hub) (visited a1) (visited b1) (visited d1))))
";

pub const SPANNER_DOMAIN: &str = "
(define (domain spanner)
  (:requirements :strips :typing)
  (:types man spanner nut location)
  (:predicates (at ?o ?l - location)
               (carrying ?m - man ?s - spanner)
               (usable ?s - spanner)
               (link ?l1 ?l2 - location)
               (tightened ?n - nut)
               (loose ?n - nut))
  (:action walk
    :parameters (?start ?end - location ?m - man)
    :precondition (and (at ?m ?start) (link ?start ?end))
    :effect (and (not (at ?m ?start)) (at ?m ?end)))
  (:action pickup-spanner
    :parameters (?l - location ?s - spanner ?m - man)
    :precondition (and (at ?m ?l) (at ?s ?l))
    :effect (and (not (at ?s ?l)) (carrying ?m ?s)))
  (:action tighten-nut
    :parameters (?l - location ?s - spanner ?m - man ?n - nut)
    :precondition (and (at ?m ?l) (at ?n ?l) (carrying ?m ?s) (usable ?s) (loose ?n))
    :effect (and (not (loose ?n)) (not (usable ?s)) (tightened ?n))))
";

/// Solvable: the spanner lies ahead of the man on the one-way walk.
pub const SPANNER_SOLVABLE: &str = "
(define (problem spanner-ok)
  (:domain spanner)
  (:objects bob - man wrench - spanner bolt - nut shed mid gate - location)
  (:init (at bob shed) (at wrench mid) (at bolt gate) (usable wrench) (loose bolt)
         (link shed mid) (link mid gate))
  (:goal (tightened bolt)))
";

/// Unsolvable: the man already walked past the only spanner and links
/// are one-way, so every reachable state is a dead end.
pub const SPANNER_DEAD_END: &str = "
(define (problem spanner-dead)
  (:domain spanner)
  (:objects bob - man wrench - spanner bolt - nut shed mid gate - location)
  (:init (at bob mid) (at wrench shed) (at bolt gate) (usable wrench) (loose bolt)
         (link shed mid) (link mid gate))
  (:goal (tightened bolt)))
";

/// Blocksworld-style tower domain with derived reachability (axioms).
pub const TOWER_AXIOM_DOMAIN: &str = "
(define (domain tower)
  (:predicates (on ?x ?y) (clear ?x) (above ?x ?y))
  (:derived (above ?x ?y) (on ?x ?y))
  (:derived (above ?x ?z) (and (on ?x ?y) (above ?y ?z)))
  (:action move-to
    :parameters (?x ?y ?z)
    :precondition (and (on ?x ?y) (clear ?x) (clear ?z))
    :effect (and (on ?x ?z) (clear ?y) (not (on ?x ?y)) (not (clear ?z)))))
";

pub const TOWER_AXIOM_TEST: &str = "
(define (problem tower-test)
  (:domain tower)
  (:objects a b c base other)
  (:init (on a b) (on b base) (on c other) (clear a) (clear c))
  (:goal (above a other)))
";
