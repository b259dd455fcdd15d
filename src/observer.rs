//! Hooks through which a visualisation can follow a running search.
use crate::{Cell, FxIndexMap};

/// Receives notifications while a search runs. Every method defaults to doing nothing, so an
/// observer only implements what it displays.
pub trait SearchObserver {
    /// A node was taken from the open set, before its neighbours are looked at.
    fn on_expand(&mut self, _cell: Cell) {}
    /// All neighbours of an expanded node were processed.
    fn on_expand_done(&mut self, _cell: Cell) {}
    /// A neighbour is about to be checked against the goal and the existing records.
    fn on_neighbor_considered(&mut self, _cell: Cell) {}
    /// A neighbour was dropped because a cheaper record for it already exists.
    fn on_neighbor_rejected(&mut self, _cell: Cell) {}
    /// A neighbour was accepted with these costs, whether or not it was newly opened.
    fn on_cost(&mut self, _cell: Cell, _g_cost: f64, _h_cost: f64, _f_cost: f64) {}
    /// Polled before each node is selected. Returning false cancels the search.
    fn keep_searching(&mut self) -> bool {
        true
    }
}

pub(crate) struct NoopObserver;

impl SearchObserver for NoopObserver {}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SearchEvent {
    Expand(Cell),
    ExpandDone(Cell),
    NeighborConsidered(Cell),
    NeighborRejected(Cell),
    Cost {
        cell: Cell,
        g_cost: f64,
        h_cost: f64,
        f_cost: f64,
    },
}

/// Records every notification in the order it was sent.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    pub events: Vec<SearchEvent>,
}

impl EventLog {
    pub fn new() -> EventLog {
        EventLog::default()
    }

    /// Cells in the order they were expanded.
    pub fn expanded(&self) -> Vec<Cell> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SearchEvent::Expand(c) => Some(*c),
                _ => None,
            })
            .collect()
    }

    pub fn rejected(&self) -> Vec<Cell> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SearchEvent::NeighborRejected(c) => Some(*c),
                _ => None,
            })
            .collect()
    }
}

impl SearchObserver for EventLog {
    fn on_expand(&mut self, cell: Cell) {
        self.events.push(SearchEvent::Expand(cell));
    }
    fn on_expand_done(&mut self, cell: Cell) {
        self.events.push(SearchEvent::ExpandDone(cell));
    }
    fn on_neighbor_considered(&mut self, cell: Cell) {
        self.events.push(SearchEvent::NeighborConsidered(cell));
    }
    fn on_neighbor_rejected(&mut self, cell: Cell) {
        self.events.push(SearchEvent::NeighborRejected(cell));
    }
    fn on_cost(&mut self, cell: Cell, g_cost: f64, h_cost: f64, f_cost: f64) {
        self.events.push(SearchEvent::Cost {
            cell,
            g_cost,
            h_cost,
            f_cost,
        });
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellCosts {
    pub g_cost: f64,
    pub h_cost: f64,
    pub f_cost: f64,
}

/// Keeps the most recently accepted costs of each cell, for drawing cost labels on a board.
/// Cells are kept in the order they were first annotated.
#[derive(Clone, Debug, Default)]
pub struct CostTable {
    costs: FxIndexMap<Cell, CellCosts>,
}

impl CostTable {
    pub fn new() -> CostTable {
        CostTable::default()
    }
    pub fn get(&self, cell: &Cell) -> Option<&CellCosts> {
        self.costs.get(cell)
    }
    pub fn iter(&self) -> impl Iterator<Item = (&Cell, &CellCosts)> {
        self.costs.iter()
    }
    pub fn len(&self) -> usize {
        self.costs.len()
    }
    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }
}

impl SearchObserver for CostTable {
    fn on_cost(&mut self, cell: Cell, g_cost: f64, h_cost: f64, f_cost: f64) {
        self.costs.insert(
            cell,
            CellCosts {
                g_cost,
                h_cost,
                f_cost,
            },
        );
    }
}

/// Stops the search once the wrapped observer has seen `limit` expansions.
pub struct ExpansionBudget<'a> {
    inner: &'a mut dyn SearchObserver,
    remaining: usize,
}

impl<'a> ExpansionBudget<'a> {
    pub fn new(inner: &'a mut dyn SearchObserver, limit: usize) -> ExpansionBudget<'a> {
        ExpansionBudget {
            inner,
            remaining: limit,
        }
    }
}

impl SearchObserver for ExpansionBudget<'_> {
    fn on_expand(&mut self, cell: Cell) {
        self.remaining = self.remaining.saturating_sub(1);
        self.inner.on_expand(cell);
    }
    fn on_expand_done(&mut self, cell: Cell) {
        self.inner.on_expand_done(cell);
    }
    fn on_neighbor_considered(&mut self, cell: Cell) {
        self.inner.on_neighbor_considered(cell);
    }
    fn on_neighbor_rejected(&mut self, cell: Cell) {
        self.inner.on_neighbor_rejected(cell);
    }
    fn on_cost(&mut self, cell: Cell, g_cost: f64, h_cost: f64, f_cost: f64) {
        self.inner.on_cost(cell, g_cost, h_cost, f_cost);
    }
    fn keep_searching(&mut self) -> bool {
        self.remaining > 0 && self.inner.keep_searching()
    }
}
