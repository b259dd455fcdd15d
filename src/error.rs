use thiserror::Error;

use crate::Cell;

/// Reasons a query is refused or abandoned. An unreachable goal is not an error:
/// it is reported as an empty path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("grid bounds must be positive, got {width}x{height}")]
    InvalidBounds { width: i32, height: i32 },

    #[error("{cell} lies outside the {width}x{height} grid")]
    OutOfBounds { cell: Cell, width: i32, height: i32 },

    #[error("{cell} is an obstacle")]
    Blocked { cell: Cell },

    /// The search was stopped at the top of the expansion loop.
    #[error("search cancelled after {expanded} expansions")]
    Cancelled { expanded: usize },
}
