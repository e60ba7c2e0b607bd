//! # Search Event Handlers
//!
//! Observer surface for the search algorithms. Handlers own the
//! counters and timers; the algorithms call them at expansion,
//! generation, pruning, layer, and termination points and never depend
//! on a concrete implementation. Three implementations: default (counts,
//! one log line per layer), debug (verbose tracing), and no-op.

use serde::Serialize;
use std::time::Instant;

/// Counter snapshot for one breadth-first run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchStatistics {
    pub num_expanded: u64,
    pub num_generated: u64,
    pub num_pruned: u64,
    /// Cumulative expanded/generated counts at the close of each
    /// g-layer.
    pub expanded_until_layer: Vec<u64>,
    pub generated_until_layer: Vec<u64>,
    pub search_millis: u64,
}

pub trait SearchEventHandler {
    fn on_start_search(&mut self);
    fn on_expand_state(&mut self, state_index: u32);
    fn on_generate_state(&mut self, action_index: u32, successor_index: u32);
    fn on_prune_state(&mut self, successor_index: u32);
    fn on_finish_layer(&mut self, g_value: u32);
    fn on_solved(&mut self, plan_length: usize);
    fn on_unsolvable(&mut self);
    fn on_exhausted(&mut self);
    fn on_end_search(&mut self);
    fn statistics(&self) -> &SearchStatistics;
}

/// Which handler implementation the search options select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventMode {
    #[default]
    Default,
    Debug,
    Noop,
}

pub fn make_search_handler(mode: EventMode) -> Box<dyn SearchEventHandler> {
    match mode {
        EventMode::Default => Box::new(DefaultSearchEventHandler::new()),
        EventMode::Debug => Box::new(DebugSearchEventHandler::new()),
        EventMode::Noop => Box::new(NoopSearchEventHandler::default()),
    }
}

pub struct DefaultSearchEventHandler {
    statistics: SearchStatistics,
    start: Option<Instant>,
}

impl DefaultSearchEventHandler {
    pub fn new() -> Self {
        DefaultSearchEventHandler {
            statistics: SearchStatistics::default(),
            start: None,
        }
    }
}

impl Default for DefaultSearchEventHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchEventHandler for DefaultSearchEventHandler {
    fn on_start_search(&mut self) {
        self.start = Some(Instant::now());
    }

    fn on_expand_state(&mut self, _state_index: u32) {
        self.statistics.num_expanded += 1;
    }

    fn on_generate_state(&mut self, _action_index: u32, _successor_index: u32) {
        self.statistics.num_generated += 1;
    }

    fn on_prune_state(&mut self, _successor_index: u32) {
        self.statistics.num_pruned += 1;
    }

    fn on_finish_layer(&mut self, g_value: u32) {
        self.statistics
            .expanded_until_layer
            .push(self.statistics.num_expanded);
        self.statistics
            .generated_until_layer
            .push(self.statistics.num_generated);
        tracing::info!(
            g = g_value,
            expanded = self.statistics.num_expanded,
            generated = self.statistics.num_generated,
            "closed layer"
        );
    }

    fn on_solved(&mut self, plan_length: usize) {
        tracing::info!(plan_length, "search solved");
    }

    fn on_unsolvable(&mut self) {
        tracing::info!("search proved the task unsolvable");
    }

    fn on_exhausted(&mut self) {
        tracing::info!("search exhausted");
    }

    fn on_end_search(&mut self) {
        if let Some(start) = self.start {
            self.statistics.search_millis = start.elapsed().as_millis() as u64;
        }
    }

    fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }
}

pub struct DebugSearchEventHandler {
    statistics: SearchStatistics,
    start: Option<Instant>,
}

impl DebugSearchEventHandler {
    pub fn new() -> Self {
        DebugSearchEventHandler {
            statistics: SearchStatistics::default(),
            start: None,
        }
    }
}

impl SearchEventHandler for DebugSearchEventHandler {
    fn on_start_search(&mut self) {
        self.start = Some(Instant::now());
        tracing::debug!("search started");
    }

    fn on_expand_state(&mut self, state_index: u32) {
        self.statistics.num_expanded += 1;
        tracing::trace!(state = state_index, "expanding");
    }

    fn on_generate_state(&mut self, action_index: u32, successor_index: u32) {
        self.statistics.num_generated += 1;
        tracing::trace!(action = action_index, successor = successor_index, "generated");
    }

    fn on_prune_state(&mut self, successor_index: u32) {
        self.statistics.num_pruned += 1;
        tracing::trace!(successor = successor_index, "pruned (not novel)");
    }

    fn on_finish_layer(&mut self, g_value: u32) {
        self.statistics
            .expanded_until_layer
            .push(self.statistics.num_expanded);
        self.statistics
            .generated_until_layer
            .push(self.statistics.num_generated);
        tracing::debug!(
            g = g_value,
            expanded = self.statistics.num_expanded,
            generated = self.statistics.num_generated,
            pruned = self.statistics.num_pruned,
            "closed layer"
        );
    }

    fn on_solved(&mut self, plan_length: usize) {
        tracing::debug!(plan_length, "solved");
    }

    fn on_unsolvable(&mut self) {
        tracing::debug!("unsolvable");
    }

    fn on_exhausted(&mut self) {
        tracing::debug!("exhausted");
    }

    fn on_end_search(&mut self) {
        if let Some(start) = self.start {
            self.statistics.search_millis = start.elapsed().as_millis() as u64;
        }
        tracing::debug!(millis = self.statistics.search_millis, "search ended");
    }

    fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }
}

#[derive(Default)]
pub struct NoopSearchEventHandler {
    statistics: SearchStatistics,
}

impl SearchEventHandler for NoopSearchEventHandler {
    fn on_start_search(&mut self) {}
    fn on_expand_state(&mut self, _state_index: u32) {}
    fn on_generate_state(&mut self, _action_index: u32, _successor_index: u32) {}
    fn on_prune_state(&mut self, _successor_index: u32) {}
    fn on_finish_layer(&mut self, _g_value: u32) {}
    fn on_solved(&mut self, _plan_length: usize) {}
    fn on_unsolvable(&mut self) {}
    fn on_exhausted(&mut self) {}
    fn on_end_search(&mut self) {}
    fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }
}
