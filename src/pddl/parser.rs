//! # PDDL Parser
//!
//! Lexes and parses PDDL domain and problem files into the surface AST.
//! Covers the STRIPS fragment plus typing, negative preconditions,
//! equality, derived predicates, conditional effects, universal effects,
//! and action costs. Everything else is reported as an unsupported
//! feature, never silently dropped.
//!
//! PDDL is case-insensitive; the lexer lowercases symbols so all later
//! stages compare names directly.

use crate::error::{PlannerError, PlannerResult};
use crate::pddl::ast::{
    ActionAst, AtomAst, AxiomAst, CompareOpAst, Condition, DomainAst, Effect, FunctionDecl,
    NumericExprAst, NumericOpAst, PredicateDecl, ProblemAst, TermAst, TypedName,
};

/// An s-expression: the concrete shape of every PDDL construct.
#[derive(Debug, Clone, PartialEq)]
enum Sexp {
    Symbol(String),
    Number(f64),
    List(Vec<Sexp>),
}

impl Sexp {
    fn as_symbol(&self) -> PlannerResult<&str> {
        match self {
            Sexp::Symbol(s) => Ok(s),
            other => Err(parse_error(format!("expected a symbol, found {other:?}"))),
        }
    }

    fn as_list(&self) -> PlannerResult<&[Sexp]> {
        match self {
            Sexp::List(items) => Ok(items),
            other => Err(parse_error(format!("expected a list, found {other:?}"))),
        }
    }

    /// The head symbol of a list, lowercased at lex time.
    fn head(&self) -> Option<&str> {
        match self {
            Sexp::List(items) => items.first().and_then(|s| match s {
                Sexp::Symbol(name) => Some(name.as_str()),
                _ => None,
            }),
            _ => None,
        }
    }
}

fn parse_error(message: impl Into<String>) -> PlannerError {
    PlannerError::Parse(message.into())
}

/// Indexing with a parse error instead of a panic.
fn arg<'a>(items: &'a [Sexp], index: usize, what: &str) -> PlannerResult<&'a Sexp> {
    items
        .get(index)
        .ok_or_else(|| parse_error(format!("missing {what}")))
}

/// Tokenize and parse one top-level s-expression from `source`,
/// ignoring `;` line comments.
fn read_sexp(source: &str) -> PlannerResult<Sexp> {
    let mut tokens = tokenize(source);
    let sexp = parse_sexp(&mut tokens)?;
    if tokens.pos < tokens.items.len() {
        return Err(parse_error("trailing input after top-level form"));
    }
    Ok(sexp)
}

struct Tokens {
    items: Vec<String>,
    pos: usize,
}

impl Tokens {
    fn next(&mut self) -> Option<&str> {
        let token = self.items.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    fn peek(&self) -> Option<&str> {
        self.items.get(self.pos).map(String::as_str)
    }
}

fn tokenize(source: &str) -> Tokens {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut in_comment = false;

    for c in source.chars() {
        if in_comment {
            if c == '\n' {
                in_comment = false;
            }
            continue;
        }
        match c {
            ';' => {
                flush(&mut current, &mut items);
                in_comment = true;
            }
            '(' | ')' => {
                flush(&mut current, &mut items);
                items.push(c.to_string());
            }
            c if c.is_whitespace() => flush(&mut current, &mut items),
            c => current.push(c.to_ascii_lowercase()),
        }
    }
    flush(&mut current, &mut items);

    Tokens { items, pos: 0 }
}

fn flush(current: &mut String, items: &mut Vec<String>) {
    if !current.is_empty() {
        items.push(std::mem::take(current));
    }
}

fn parse_sexp(tokens: &mut Tokens) -> PlannerResult<Sexp> {
    match tokens.next() {
        None => Err(parse_error("unexpected end of input")),
        Some(")") => Err(parse_error("unexpected ')'")),
        Some("(") => {
            let mut items = Vec::new();
            loop {
                match tokens.peek() {
                    None => return Err(parse_error("unclosed '('")),
                    Some(")") => {
                        tokens.next();
                        return Ok(Sexp::List(items));
                    }
                    Some(_) => items.push(parse_sexp(tokens)?),
                }
            }
        }
        Some(token) => {
            if let Ok(value) = token.parse::<f64>() {
                Ok(Sexp::Number(value))
            } else {
                Ok(Sexp::Symbol(token.to_string()))
            }
        }
    }
}

/// Parse a PDDL domain file.
pub fn parse_domain(source: &str) -> PlannerResult<DomainAst> {
    let sexp = read_sexp(source)?;
    let items = sexp.as_list()?;

    if items.first().map(Sexp::as_symbol).transpose()? != Some("define") {
        return Err(parse_error("domain file must start with (define ...)"));
    }

    let mut domain = DomainAst {
        name: String::new(),
        requirements: Vec::new(),
        types: Vec::new(),
        constants: Vec::new(),
        predicates: Vec::new(),
        functions: Vec::new(),
        actions: Vec::new(),
        axioms: Vec::new(),
    };

    for item in &items[1..] {
        let section = item.as_list()?;
        match item.head() {
            Some("domain") => {
                domain.name = arg(section, 1, "domain name")?.as_symbol()?.to_string();
            }
            Some(":requirements") => {
                for req in &section[1..] {
                    domain.requirements.push(req.as_symbol()?.to_string());
                }
            }
            Some(":types") => {
                domain.types = parse_typed_list(&section[1..])?
                    .into_iter()
                    .map(|tn| (tn.name, tn.ty))
                    .collect();
            }
            Some(":constants") => {
                domain.constants = parse_typed_list(&section[1..])?;
            }
            Some(":predicates") => {
                for decl in &section[1..] {
                    let parts = decl.as_list()?;
                    domain.predicates.push(PredicateDecl {
                        name: arg(parts, 0, "predicate name")?.as_symbol()?.to_string(),
                        params: parse_typed_list(&parts[1..])?,
                    });
                }
            }
            Some(":functions") => {
                domain.functions = parse_function_decls(&section[1..])?;
            }
            Some(":action") => {
                domain.actions.push(parse_action(section)?);
            }
            Some(":derived") => {
                domain.axioms.push(parse_axiom(section)?);
            }
            Some(other) => {
                return Err(PlannerError::Unsupported(format!(
                    "domain section '{other}'"
                )));
            }
            None => return Err(parse_error("malformed domain section")),
        }
    }

    if domain.name.is_empty() {
        return Err(parse_error("missing (domain <name>) section"));
    }
    Ok(domain)
}

/// Parse a PDDL problem file.
pub fn parse_problem(source: &str) -> PlannerResult<ProblemAst> {
    let sexp = read_sexp(source)?;
    let items = sexp.as_list()?;

    if items.first().map(Sexp::as_symbol).transpose()? != Some("define") {
        return Err(parse_error("problem file must start with (define ...)"));
    }

    let mut problem = ProblemAst {
        name: String::new(),
        domain: String::new(),
        objects: Vec::new(),
        init_atoms: Vec::new(),
        init_values: Vec::new(),
        goal: Condition::And(Vec::new()),
        metric_minimize_total_cost: false,
    };

    for item in &items[1..] {
        let section = item.as_list()?;
        match item.head() {
            Some("problem") => {
                problem.name = arg(section, 1, "problem name")?.as_symbol()?.to_string();
            }
            Some(":domain") => {
                problem.domain = arg(section, 1, "domain reference")?.as_symbol()?.to_string();
            }
            Some(":objects") => {
                problem.objects = parse_typed_list(&section[1..])?;
            }
            Some(":init") => {
                for entry in &section[1..] {
                    parse_init_entry(entry, &mut problem)?;
                }
            }
            Some(":goal") => {
                if section.len() != 2 {
                    return Err(parse_error("(:goal ...) takes exactly one condition"));
                }
                problem.goal = parse_condition(arg(section, 1, "goal condition")?)?;
            }
            Some(":metric") => {
                problem.metric_minimize_total_cost = parse_metric(&section[1..])?;
            }
            Some(other) => {
                return Err(PlannerError::Unsupported(format!(
                    "problem section '{other}'"
                )));
            }
            None => return Err(parse_error("malformed problem section")),
        }
    }

    Ok(problem)
}

/// Parse `name name - type name - type ...` into typed names; bare names
/// default to `object`.
fn parse_typed_list(items: &[Sexp]) -> PlannerResult<Vec<TypedName>> {
    let mut out = Vec::new();
    let mut pending: Vec<String> = Vec::new();
    let mut iter = items.iter();

    while let Some(item) = iter.next() {
        let symbol = item.as_symbol()?;
        if symbol == "-" {
            let ty = iter
                .next()
                .ok_or_else(|| parse_error("dangling '-' in typed list"))?
                .as_symbol()?
                .to_string();
            for name in pending.drain(..) {
                out.push(TypedName { name, ty: ty.clone() });
            }
        } else {
            pending.push(symbol.to_string());
        }
    }
    for name in pending {
        out.push(TypedName::untyped(name));
    }
    Ok(out)
}

fn parse_function_decls(items: &[Sexp]) -> PlannerResult<Vec<FunctionDecl>> {
    // Function declarations may carry `- number` annotations; strip them.
    let mut out = Vec::new();
    let mut iter = items.iter().peekable();
    while let Some(item) = iter.next() {
        if let Sexp::Symbol(s) = item {
            if s == "-" {
                iter.next(); // consume the result type
                continue;
            }
        }
        let parts = item.as_list()?;
        out.push(FunctionDecl {
            name: arg(parts, 0, "function name")?.as_symbol()?.to_string(),
            params: parse_typed_list(&parts[1..])?,
        });
    }
    Ok(out)
}

fn parse_action(section: &[Sexp]) -> PlannerResult<ActionAst> {
    let name = arg(section, 1, "action name")?.as_symbol()?.to_string();
    let mut parameters = Vec::new();
    let mut precondition = Condition::And(Vec::new());
    let mut effect = Effect::And(Vec::new());

    let mut i = 2;
    while i < section.len() {
        let keyword = section[i].as_symbol()?;
        let value = section
            .get(i + 1)
            .ok_or_else(|| parse_error(format!("missing value after '{keyword}'")))?;
        match keyword {
            ":parameters" => parameters = parse_typed_list(value.as_list()?)?,
            ":precondition" => precondition = parse_condition(value)?,
            ":effect" => effect = parse_effect(value)?,
            other => {
                return Err(PlannerError::Unsupported(format!(
                    "action keyword '{other}'"
                )));
            }
        }
        i += 2;
    }

    Ok(ActionAst {
        name,
        parameters,
        precondition,
        effect,
    })
}

fn parse_axiom(section: &[Sexp]) -> PlannerResult<AxiomAst> {
    if section.len() != 3 {
        return Err(parse_error("(:derived (head ...) body) takes two arguments"));
    }
    let head_parts = arg(section, 1, "axiom head")?.as_list()?;
    let predicate = arg(head_parts, 0, "axiom head predicate")?.as_symbol()?.to_string();
    let parameters = parse_typed_list(&head_parts[1..])?;
    let args = parameters
        .iter()
        .map(|p| TermAst::Variable(p.name.clone()))
        .collect();
    Ok(AxiomAst {
        head: AtomAst { predicate, args },
        parameters,
        body: parse_condition(&section[2])?,
    })
}

fn parse_term(item: &Sexp) -> PlannerResult<TermAst> {
    let symbol = item.as_symbol()?;
    if let Some(variable) = symbol.strip_prefix('?') {
        Ok(TermAst::Variable(variable.to_string()))
    } else {
        Ok(TermAst::Name(symbol.to_string()))
    }
}

fn parse_atom(items: &[Sexp]) -> PlannerResult<AtomAst> {
    Ok(AtomAst {
        predicate: arg(items, 0, "predicate name")?.as_symbol()?.to_string(),
        args: items[1..].iter().map(parse_term).collect::<PlannerResult<_>>()?,
    })
}

fn parse_numeric_expr(item: &Sexp) -> PlannerResult<NumericExprAst> {
    match item {
        Sexp::Number(value) => Ok(NumericExprAst::Number(*value)),
        Sexp::List(parts) => Ok(NumericExprAst::Apply(
            arg(parts, 0, "function name")?.as_symbol()?.to_string(),
            parts[1..]
                .iter()
                .map(parse_term)
                .collect::<PlannerResult<_>>()?,
        )),
        Sexp::Symbol(_) => Err(parse_error("expected a number or function application")),
    }
}

fn compare_op(symbol: &str) -> Option<CompareOpAst> {
    match symbol {
        "<" => Some(CompareOpAst::Lt),
        "<=" => Some(CompareOpAst::Le),
        ">=" => Some(CompareOpAst::Ge),
        ">" => Some(CompareOpAst::Gt),
        _ => None,
    }
}

fn parse_condition(item: &Sexp) -> PlannerResult<Condition> {
    let parts = item.as_list()?;
    if parts.is_empty() {
        return Ok(Condition::And(Vec::new()));
    }
    let head = parts[0].as_symbol()?;
    match head {
        "and" => Ok(Condition::And(
            parts[1..]
                .iter()
                .map(parse_condition)
                .collect::<PlannerResult<_>>()?,
        )),
        "not" => {
            if parts.len() != 2 {
                return Err(parse_error("(not ...) takes exactly one condition"));
            }
            Ok(Condition::Not(Box::new(parse_condition(&parts[1])?)))
        }
        "or" | "imply" | "exists" | "forall" => Err(PlannerError::Unsupported(format!(
            "'{head}' in conditions; the fragment expects conjunctions of literals"
        ))),
        "=" => {
            // Either object equality or a numeric comparison.
            if parts.len() == 3 && matches!(parts[1], Sexp::Symbol(_)) {
                Ok(Condition::Atom(parse_atom(parts)?))
            } else {
                Ok(Condition::Compare(
                    CompareOpAst::Eq,
                    parse_numeric_expr(arg(parts, 1, "comparison operand")?)?,
                    parse_numeric_expr(arg(parts, 2, "comparison operand")?)?,
                ))
            }
        }
        op if compare_op(op).is_some() => {
            let op = compare_op(op).ok_or_else(|| parse_error("comparison"))?;
            Ok(Condition::Compare(
                op,
                parse_numeric_expr(arg(parts, 1, "comparison operand")?)?,
                parse_numeric_expr(arg(parts, 2, "comparison operand")?)?,
            ))
        }
        _ => Ok(Condition::Atom(parse_atom(parts)?)),
    }
}

fn parse_effect(item: &Sexp) -> PlannerResult<Effect> {
    let parts = item.as_list()?;
    if parts.is_empty() {
        return Ok(Effect::And(Vec::new()));
    }
    let head = parts[0].as_symbol()?;
    match head {
        "and" => Ok(Effect::And(
            parts[1..]
                .iter()
                .map(parse_effect)
                .collect::<PlannerResult<_>>()?,
        )),
        "not" => {
            let atom_parts = parts
                .get(1)
                .ok_or_else(|| parse_error("(not ...) effect needs an atom"))?
                .as_list()?;
            Ok(Effect::Literal(parse_atom(atom_parts)?, true))
        }
        "when" => {
            if parts.len() != 3 {
                return Err(parse_error("(when condition effect) takes two arguments"));
            }
            Ok(Effect::When(
                parse_condition(arg(parts, 1, "when condition")?)?,
                Box::new(parse_effect(arg(parts, 2, "when effect")?)?),
            ))
        }
        "forall" => {
            if parts.len() != 3 {
                return Err(parse_error("(forall (vars) effect) takes two arguments"));
            }
            Ok(Effect::Forall(
                parse_typed_list(arg(parts, 1, "forall variables")?.as_list()?)?,
                Box::new(parse_effect(arg(parts, 2, "forall effect")?)?),
            ))
        }
        "increase" | "decrease" | "assign" => {
            let op = match head {
                "increase" => NumericOpAst::Increase,
                "decrease" => NumericOpAst::Decrease,
                _ => NumericOpAst::Assign,
            };
            let target = arg(parts, 1, "numeric effect target")?.as_list()?;
            Ok(Effect::Numeric(
                op,
                arg(target, 0, "function name")?.as_symbol()?.to_string(),
                target[1..]
                    .iter()
                    .map(parse_term)
                    .collect::<PlannerResult<_>>()?,
                parse_numeric_expr(arg(parts, 2, "numeric effect amount")?)?,
            ))
        }
        _ => Ok(Effect::Literal(parse_atom(parts)?, false)),
    }
}

fn parse_init_entry(entry: &Sexp, problem: &mut ProblemAst) -> PlannerResult<()> {
    let parts = entry.as_list()?;
    if parts.first().and_then(|s| s.as_symbol().ok()) == Some("=") {
        // (= (f args) number)
        let target = arg(parts, 1, "assignment target")?.as_list()?;
        let value = match arg(parts, 2, "assignment value")? {
            Sexp::Number(value) => *value,
            _ => return Err(parse_error("initial assignment value must be a number")),
        };
        let args = target[1..]
            .iter()
            .map(|a| Ok(a.as_symbol()?.to_string()))
            .collect::<PlannerResult<_>>()?;
        problem
            .init_values
            .push((arg(target, 0, "function name")?.as_symbol()?.to_string(), args, value));
        return Ok(());
    }
    problem.init_atoms.push(parse_atom(parts)?);
    Ok(())
}

fn parse_metric(items: &[Sexp]) -> PlannerResult<bool> {
    if items.len() == 2
        && items[0].as_symbol()? == "minimize"
        && items[1].head() == Some("total-cost")
    {
        return Ok(true);
    }
    Err(PlannerError::Unsupported(
        "only (:metric minimize (total-cost)) is supported".to_string(),
    ))
}
