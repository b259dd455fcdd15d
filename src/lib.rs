//! # grid_astar
//!
//! Shortest paths between two cells of a bounded grid with blocked cells, found with a
//! best-first [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) search. Movement is
//! 4-directional and every step costs its Euclidean length, which is also the heuristic.
//!
//! A query is a single synchronous call to [find_path] (or [Pathfinder::find_path]) that takes
//! the bounds and obstacles by reference and returns the cells from start to goal, or an empty
//! path if the goal is unreachable. Visualisations can follow the search through a
//! [SearchObserver]. [Scenario] bundles the inputs of a query together with the editing
//! operations of an interactive board.
//!
//! ```
//! use grid_astar::{find_path, Cell, FxHashSet};
//!
//! let mut obstacles = FxHashSet::default();
//! obstacles.insert(Cell::new(1, 1));
//! let path = find_path(Cell::new(0, 0), Cell::new(2, 2), 3, 3, &obstacles, None).unwrap();
//! assert_eq!(path.len(), 5);
//! ```
mod error;
pub mod grid;
pub mod observer;
pub mod scenario;
pub mod search;

use fxhash::FxBuildHasher;
use indexmap::{IndexMap, IndexSet};

/// A grid coordinate. Equality is structural.
pub type Cell = grid_util::point::Point;

pub type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;
pub type FxIndexSet<K> = IndexSet<K, FxBuildHasher>;
pub use fxhash::FxHashSet;

pub use error::PathError;
pub use grid::{euclidean_distance, neighbors, Obstacles};
pub use observer::{CostTable, EventLog, ExpansionBudget, SearchEvent, SearchObserver};
pub use scenario::Scenario;
pub use search::{find_path, Pathfinder, SearchConfig};
