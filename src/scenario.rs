use core::fmt;

use log::info;
use petgraph::unionfind::UnionFind;

use crate::error::PathError;
use crate::grid::in_bounds;
use crate::observer::SearchObserver;
use crate::search::{find_path, Pathfinder};
use crate::{Cell, FxHashSet, FxIndexSet};

/// The inputs of a query as an interactive board holds them: bounds, endpoints and obstacles.
/// Edits happen between queries; a query only ever borrows the scenario immutably.
#[derive(Clone, Debug, PartialEq)]
pub struct Scenario {
    pub width: i32,
    pub height: i32,
    pub start: Cell,
    pub goal: Cell,
    obstacles: FxIndexSet<Cell>,
}

/// The 8x8 board with a wall along the right half of row 4.
impl Default for Scenario {
    fn default() -> Scenario {
        Scenario::new(8, 8, Cell::new(0, 0), Cell::new(7, 5))
            .with_obstacles((4..8).map(|x| Cell::new(x, 4)))
    }
}

impl Scenario {
    pub fn new(width: i32, height: i32, start: Cell, goal: Cell) -> Scenario {
        Scenario {
            width,
            height,
            start,
            goal,
            obstacles: FxIndexSet::default(),
        }
    }

    pub fn with_obstacles<I: IntoIterator<Item = Cell>>(mut self, obstacles: I) -> Scenario {
        self.obstacles.extend(obstacles);
        self
    }

    pub fn obstacles(&self) -> &FxIndexSet<Cell> {
        &self.obstacles
    }

    pub fn is_blocked(&self, cell: &Cell) -> bool {
        self.obstacles.contains(cell)
    }

    /// Blocks a free cell or frees a blocked one. Returns whether the cell is now blocked.
    pub fn toggle_obstacle(&mut self, cell: Cell) -> bool {
        if self.obstacles.shift_remove(&cell) {
            false
        } else {
            self.obstacles.insert(cell);
            true
        }
    }

    pub fn clear_obstacles(&mut self) {
        self.obstacles.clear();
    }

    pub fn set_start(&mut self, cell: Cell) {
        self.start = cell;
    }

    pub fn set_goal(&mut self, cell: Cell) {
        self.goal = cell;
    }

    /// Changes the bounds. Obstacles and endpoints are kept even if they fall outside; a query
    /// with an endpoint outside reports [PathError::OutOfBounds].
    pub fn resize(&mut self, width: i32, height: i32) {
        self.width = width;
        self.height = height;
    }

    pub fn find_path(&self) -> Result<Vec<Cell>, PathError> {
        find_path(
            self.start,
            self.goal,
            self.width,
            self.height,
            &self.obstacles,
            None,
        )
    }

    pub fn find_path_with(
        &self,
        pathfinder: &Pathfinder,
        observer: Option<&mut dyn SearchObserver>,
    ) -> Result<Vec<Cell>, PathError> {
        pathfinder.find_path(
            self.start,
            self.goal,
            self.width,
            self.height,
            &self.obstacles,
            observer,
        )
    }

    fn ix(&self, cell: &Cell) -> usize {
        cell.y as usize * self.width as usize + cell.x as usize
    }

    fn open_cell(&self, cell: &Cell) -> bool {
        in_bounds(cell, self.width, self.height) && !self.obstacles.contains(cell)
    }

    /// Links every free cell to its free right and lower neighbour.
    fn components(&self) -> UnionFind<usize> {
        let mut components = UnionFind::new(self.width.max(0) as usize * self.height.max(0) as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                let point = Cell::new(x, y);
                if !self.open_cell(&point) {
                    continue;
                }
                for n in [Cell::new(x + 1, y), Cell::new(x, y + 1)] {
                    if self.open_cell(&n) {
                        components.union(self.ix(&point), self.ix(&n));
                    }
                }
            }
        }
        components
    }

    /// Checks whether start and goal are free, in bounds and on the same connected component.
    /// Unlike a search this never floods the grid cell by cell.
    pub fn reachable(&self) -> bool {
        if !self.open_cell(&self.start) || !self.open_cell(&self.goal) {
            return false;
        }
        let equiv = self
            .components()
            .equiv(self.ix(&self.start), self.ix(&self.goal));
        if !equiv {
            info!("{} and {} are on different components", self.start, self.goal);
        }
        equiv
    }

    /// Draws the board one row per line: `S` start, `G` goal, `#` obstacle, `*` path, `.` free.
    pub fn render(&self, path: &[Cell]) -> String {
        let on_path: FxHashSet<Cell> = path.iter().copied().collect();
        let mut out = String::new();
        for y in 0..self.height {
            for x in 0..self.width {
                let p = Cell::new(x, y);
                out.push(if p == self.start {
                    'S'
                } else if p == self.goal {
                    'G'
                } else if self.obstacles.contains(&p) {
                    '#'
                } else if on_path.contains(&p) {
                    '*'
                } else {
                    '.'
                });
            }
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.render(&[]))
    }
}
