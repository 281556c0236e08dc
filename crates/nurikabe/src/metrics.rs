//! Debug counters threaded through a solve, passed by reference rather than
//! kept as process-wide globals.

/// Counters a caller can inspect after a solve to understand how much work
/// it did; surfaced through `log::debug!` at the end of a run, never used to
/// make decisions.
#[derive(Debug, Default, Clone, Copy)]
pub struct SolveMetrics {
    pub loop_count: u64,
    pub grouped_count: u64,
    pub processed_count: u64,
    pub guessed_count: u64,
}

impl SolveMetrics {
    pub fn log_summary(&self) {
        log::debug!(
            "solve finished: {} loops, {} groups computed, {} cells processed, {} guesses",
            self.loop_count,
            self.grouped_count,
            self.processed_count,
            self.guessed_count
        );
    }
}
