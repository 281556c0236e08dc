//! Error kinds surfaced by the engine. A contradictory grid is reported
//! through `Verdict::Error` (see `change.rs`) and cooperative cancellation
//! through `Verdict::Okay`, not through this type — both are expected,
//! recoverable outcomes of a solve, not failures of the call itself. This
//! enum is reserved for malformed calls from outside the engine.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("coordinate ({x}, {y}) is out of bounds for a {width}x{height} grid")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },
}

pub type Result<T> = std::result::Result<T, EngineError>;
