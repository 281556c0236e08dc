//! Contracts for components that live outside this engine. The engine only
//! consumes these traits; puzzle file I/O, high-score persistence, and any
//! crawler that populates a puzzle archive are out of scope and have no
//! implementation here.

use crate::error::Result;

/// Supplies an initial board. `index <= 0` means "pick one at random"; an
/// implementation backed by an archive file is an external concern.
pub trait PuzzleSource {
    fn load_board(&self, rows: usize, cols: usize, index: i64) -> Result<(Vec<Vec<u16>>, i64)>;
}

/// Readable cancellation flag. A single atomic boolean satisfies this
/// directly; see the concurrency model.
pub trait CancellationSource {
    fn should_continue(&self) -> bool;
}

impl CancellationSource for std::sync::Arc<std::sync::atomic::AtomicBool> {
    fn should_continue(&self) -> bool {
        self.load(std::sync::atomic::Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    #[test]
    fn atomic_bool_is_a_cancellation_source() {
        let flag = Arc::new(AtomicBool::new(true));
        assert!(flag.should_continue());
        flag.store(false, Ordering::Relaxed);
        assert!(!flag.should_continue());
    }
}
