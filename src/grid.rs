//! Geometry of a bounded 4-connected grid: bounds, adjacency and obstacle membership.
//! Nothing here holds state; every query passes the bounds and obstacles in.
use std::collections::HashSet;
use std::hash::BuildHasher;

use indexmap::IndexSet;
use itertools::Itertools;
use smallvec::SmallVec;

use crate::Cell;

/// Offsets in the order neighbours are produced: up, left, down, right.
/// The search inserts equal-cost nodes in this order, so it decides which of them wins a tie.
const NEUMANN_OFFSETS: [(i32, i32); 4] = [(0, -1), (-1, 0), (0, 1), (1, 0)];

/// A set of non-traversable cells.
pub trait Obstacles {
    fn is_blocked(&self, cell: &Cell) -> bool;
}

impl<S: BuildHasher> Obstacles for HashSet<Cell, S> {
    fn is_blocked(&self, cell: &Cell) -> bool {
        self.contains(cell)
    }
}

impl<S: BuildHasher> Obstacles for IndexSet<Cell, S> {
    fn is_blocked(&self, cell: &Cell) -> bool {
        self.contains(cell)
    }
}

impl Obstacles for [Cell] {
    fn is_blocked(&self, cell: &Cell) -> bool {
        self.contains(cell)
    }
}

impl Obstacles for Vec<Cell> {
    fn is_blocked(&self, cell: &Cell) -> bool {
        self.as_slice().contains(cell)
    }
}

/// Checks `0 <= x < width` and `0 <= y < height`.
pub fn in_bounds(cell: &Cell, width: i32, height: i32) -> bool {
    cell.x >= 0 && cell.y >= 0 && cell.x < width && cell.y < height
}

/// Cells a search may step to from `cell`: the in-bounds, unblocked members of its von Neumann
/// neighbourhood, in the fixed order up, left, down, right.
pub fn neighbors<O: Obstacles + ?Sized>(
    cell: &Cell,
    width: i32,
    height: i32,
    obstacles: &O,
) -> SmallVec<[Cell; 4]> {
    NEUMANN_OFFSETS
        .iter()
        .filter_map(|&(dx, dy)| Some(Cell::new(cell.x.checked_add(dx)?, cell.y.checked_add(dy)?)))
        .filter(|p| in_bounds(p, width, height) && !obstacles.is_blocked(p))
        .collect()
}

/// Straight-line distance between two cells. Both the step cost and the heuristic use it,
/// which makes every 4-connected step cost exactly 1.0.
pub fn euclidean_distance(a: &Cell, b: &Cell) -> f64 {
    let dx = a.x as f64 - b.x as f64;
    let dy = a.y as f64 - b.y as f64;
    (dx * dx + dy * dy).sqrt()
}

/// True if the cells share an edge.
pub fn is_adjacent(a: &Cell, b: &Cell) -> bool {
    (a.x as i64 - b.x as i64).abs() + (a.y as i64 - b.y as i64).abs() == 1
}

/// Sum of the step lengths along a path, i.e. the g cost of its last cell.
pub fn path_cost(path: &[Cell]) -> f64 {
    path.iter()
        .tuple_windows()
        .map(|(a, b)| euclidean_distance(a, b))
        .sum()
}

/// Checks that consecutive cells of a path are 4-adjacent and that none of them is blocked.
pub fn is_valid_path<O: Obstacles + ?Sized>(path: &[Cell], obstacles: &O) -> bool {
    path.iter().all(|p| !obstacles.is_blocked(p))
        && path.iter().tuple_windows().all(|(a, b)| is_adjacent(a, b))
}
