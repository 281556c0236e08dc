//! The engine's output surface: the change stream and the terminal verdict.

use serde::{Deserialize, Serialize};

use crate::cell::CellState;

/// One cell mutation, emitted in the exact order the solver applied it.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct CellChange {
    pub x: u16,
    pub y: u16,
    pub new_state: CellState,
}

/// Terminal status of a `check`/`process_all` pass.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Verdict {
    Solved,
    Okay { blanks_left: usize },
    Error { flagged: Vec<(u16, u16)> },
}

/// Consumes change events as `alter` produces them. The core never blocks on
/// a full sink — see the concurrency model's note that dropping events is not
/// allowed because they carry state, so an unbounded channel is the natural
/// fit; `std::sync::mpsc::Sender` already implements this trait's contract.
pub trait ChangeSink {
    fn emit(&self, change: CellChange);
}

/// A sink that discards every event, for callers that only care about the
/// final verdict (e.g. benchmarks, property tests).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ChangeSink for NullSink {
    fn emit(&self, _change: CellChange) {}
}

impl ChangeSink for std::sync::mpsc::Sender<CellChange> {
    fn emit(&self, change: CellChange) {
        // An unbounded channel never blocks; a disconnected receiver means
        // nobody is listening anymore, which is not the solver's problem.
        let _ = self.send(change);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn null_sink_accepts_without_panicking() {
        let sink = NullSink;
        sink.emit(CellChange {
            x: 0,
            y: 0,
            new_state: CellState::Water,
        });
    }

    #[test]
    fn mpsc_sink_delivers_in_order() {
        let (tx, rx) = mpsc::channel();
        tx.emit(CellChange {
            x: 0,
            y: 0,
            new_state: CellState::Water,
        });
        tx.emit(CellChange {
            x: 1,
            y: 0,
            new_state: CellState::Island,
        });
        let first = rx.recv().unwrap();
        let second = rx.recv().unwrap();
        assert_eq!(first.new_state, CellState::Water);
        assert_eq!(second.new_state, CellState::Island);
    }
}
