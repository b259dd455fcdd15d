//! Best-first search with an f-cost priority queue and an index-addressed node arena.
//!
//! Every discovered cell gets exactly one arena entry. An entry's parent is the arena index of
//! the node it was discovered from, and only closed (already expanded) nodes ever become
//! parents, so a parent chain never changes once written.
use indexmap::map::Entry::{Occupied, Vacant};
use log::{debug, info, trace};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::PathError;
use crate::grid::{euclidean_distance, in_bounds, neighbors, Obstacles};
use crate::observer::{NoopObserver, SearchObserver};
use crate::{Cell, FxIndexMap};

/// Tunables of a [Pathfinder].
#[derive(Clone, Debug, PartialEq)]
pub struct SearchConfig {
    /// Scales the heuristic. Values above 1.0 give Weighted A*, trading path quality for fewer
    /// expansions.
    pub heuristic_factor: f64,
    /// When set, an open node is re-parented if a strictly cheaper way to it turns up before it
    /// is expanded. Off by default: a node keeps the costs it was first discovered with.
    pub relax_open_nodes: bool,
}

impl Default for SearchConfig {
    fn default() -> SearchConfig {
        SearchConfig {
            heuristic_factor: 1.0,
            relax_open_nodes: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum NodeState {
    Open,
    Closed,
}

#[derive(Clone, Copy, Debug)]
struct Node {
    g_cost: f64,
    h_cost: f64,
    f_cost: f64,
    parent: Option<usize>,
    state: NodeState,
    /// Insertion counter of the heap entry that currently represents this node.
    seq: usize,
}

struct SmallestCostHolder {
    f_cost: f64,
    h_cost: f64,
    seq: usize,
    index: usize,
}

impl Eq for SmallestCostHolder {}

impl PartialEq for SmallestCostHolder {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for SmallestCostHolder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SmallestCostHolder {
    fn cmp(&self, other: &Self) -> Ordering {
        // Lowest f first, then lowest h. Exact ties go to the latest insertion, which is
        // the order a list kept sorted by descending (f, h) and popped from the back produces.
        other
            .f_cost
            .total_cmp(&self.f_cost)
            .then_with(|| other.h_cost.total_cmp(&self.h_cost))
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Walks parent links from `terminal` back to the root and returns the cells root first.
fn retrace(arena: &FxIndexMap<Cell, Node>, terminal: usize) -> Vec<Cell> {
    let mut path: Vec<Cell> = std::iter::successors(Some(terminal), |&i| {
        arena.get_index(i).and_then(|(_, node)| node.parent)
    })
    .filter_map(|i| arena.get_index(i).map(|(cell, _)| *cell))
    .collect();
    path.reverse();
    path
}

fn validate<O: Obstacles + ?Sized>(
    start: &Cell,
    goal: &Cell,
    width: i32,
    height: i32,
    obstacles: &O,
) -> Result<(), PathError> {
    if width <= 0 || height <= 0 {
        return Err(PathError::InvalidBounds { width, height });
    }
    for cell in [start, goal] {
        if !in_bounds(cell, width, height) {
            return Err(PathError::OutOfBounds {
                cell: *cell,
                width,
                height,
            });
        }
        if obstacles.is_blocked(cell) {
            return Err(PathError::Blocked { cell: *cell });
        }
    }
    Ok(())
}

/// Runs shortest-path queries on 4-connected grids. Holds configuration only; each query
/// builds and drops its own open set and node arena, so one [Pathfinder] can serve many
/// threads at once.
#[derive(Clone, Debug, Default)]
pub struct Pathfinder {
    pub config: SearchConfig,
}

impl Pathfinder {
    pub fn new(config: SearchConfig) -> Pathfinder {
        Pathfinder { config }
    }

    /// Computes a path from `start` to `goal`, both included.
    ///
    /// Returns an empty path if the goal cannot be reached. Bounds that are not positive and
    /// endpoints that are out of bounds or blocked are rejected before searching. A query with
    /// `start == goal` yields `[start]` without emitting any observer events.
    pub fn find_path<O: Obstacles + ?Sized>(
        &self,
        start: Cell,
        goal: Cell,
        width: i32,
        height: i32,
        obstacles: &O,
        observer: Option<&mut dyn SearchObserver>,
    ) -> Result<Vec<Cell>, PathError> {
        validate(&start, &goal, width, height, obstacles)?;
        if start == goal {
            return Ok(vec![start]);
        }
        let mut noop = NoopObserver;
        let observer: &mut dyn SearchObserver = match observer {
            Some(o) => o,
            None => &mut noop,
        };
        let heuristic = |cell: &Cell| euclidean_distance(cell, &goal) * self.config.heuristic_factor;
        debug!("Searching {} -> {} on a {}x{} grid", start, goal, width, height);

        let mut arena: FxIndexMap<Cell, Node> = FxIndexMap::default();
        arena.insert(
            start,
            Node {
                g_cost: 0.0,
                h_cost: 0.0,
                f_cost: 0.0,
                parent: None,
                state: NodeState::Open,
                seq: 0,
            },
        );
        let mut open = BinaryHeap::new();
        open.push(SmallestCostHolder {
            f_cost: 0.0,
            h_cost: 0.0,
            seq: 0,
            index: 0,
        });
        let mut seq = 0;
        let mut expanded = 0;

        while !open.is_empty() {
            if !observer.keep_searching() {
                info!("Search {} -> {} cancelled after {} expansions", start, goal, expanded);
                return Err(PathError::Cancelled { expanded });
            }
            let Some(SmallestCostHolder {
                index,
                seq: entry_seq,
                ..
            }) = open.pop()
            else {
                break;
            };
            let (current_cell, current) = match arena.get_index_mut(index) {
                Some((cell, node)) => {
                    // Entries superseded by a relaxation are left in the heap and skipped here.
                    if node.state != NodeState::Open || node.seq != entry_seq {
                        continue;
                    }
                    node.state = NodeState::Closed;
                    (*cell, *node)
                }
                None => continue,
            };
            expanded += 1;
            trace!(
                "Expanding {} (g {:.3}, h {:.3}, f {:.3})",
                current_cell,
                current.g_cost,
                current.h_cost,
                current.f_cost
            );
            observer.on_expand(current_cell);

            for n in neighbors(&current_cell, width, height, obstacles) {
                observer.on_neighbor_considered(n);
                if n == goal {
                    let mut path = retrace(&arena, index);
                    path.push(goal);
                    debug!(
                        "Found path of {} cells after {} expansions",
                        path.len(),
                        expanded
                    );
                    return Ok(path);
                }
                let g_cost = current.g_cost + euclidean_distance(&n, &current_cell);
                let h_cost = heuristic(&n);
                let f_cost = g_cost + h_cost;
                match arena.entry(n) {
                    Occupied(mut e) => {
                        let n_index = e.index();
                        let existing = e.get_mut();
                        if existing.f_cost < f_cost {
                            observer.on_neighbor_rejected(n);
                            continue;
                        }
                        observer.on_cost(n, g_cost, h_cost, f_cost);
                        // Closed nodes are never reopened.
                        if self.config.relax_open_nodes
                            && existing.state == NodeState::Open
                            && f_cost < existing.f_cost
                        {
                            seq += 1;
                            *existing = Node {
                                g_cost,
                                h_cost,
                                f_cost,
                                parent: Some(index),
                                state: NodeState::Open,
                                seq,
                            };
                            open.push(SmallestCostHolder {
                                f_cost,
                                h_cost,
                                seq,
                                index: n_index,
                            });
                        }
                    }
                    Vacant(e) => {
                        observer.on_cost(n, g_cost, h_cost, f_cost);
                        seq += 1;
                        let n_index = e.index();
                        e.insert(Node {
                            g_cost,
                            h_cost,
                            f_cost,
                            parent: Some(index),
                            state: NodeState::Open,
                            seq,
                        });
                        open.push(SmallestCostHolder {
                            f_cost,
                            h_cost,
                            seq,
                            index: n_index,
                        });
                    }
                }
            }
            observer.on_expand_done(current_cell);
        }
        info!(
            "{} is not reachable from {}, {} nodes expanded",
            goal, start, expanded
        );
        Ok(Vec::new())
    }
}

/// [Pathfinder::find_path] with the default [SearchConfig].
pub fn find_path<O: Obstacles + ?Sized>(
    start: Cell,
    goal: Cell,
    width: i32,
    height: i32,
    obstacles: &O,
    observer: Option<&mut dyn SearchObserver>,
) -> Result<Vec<Cell>, PathError> {
    Pathfinder::default().find_path(start, goal, width, height, obstacles, observer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::is_valid_path;
    use crate::observer::{EventLog, ExpansionBudget, SearchEvent};
    use crate::FxHashSet;

    fn holder(f_cost: f64, h_cost: f64, seq: usize) -> SmallestCostHolder {
        SmallestCostHolder {
            f_cost,
            h_cost,
            seq,
            index: seq,
        }
    }

    fn pop_order(entries: Vec<SmallestCostHolder>) -> Vec<usize> {
        let mut heap: BinaryHeap<_> = entries.into_iter().collect();
        std::iter::from_fn(|| heap.pop().map(|h| h.index)).collect()
    }

    #[test]
    fn lowest_f_is_selected_first() {
        let order = pop_order(vec![holder(5.0, 1.0, 0), holder(3.0, 2.0, 1), holder(4.0, 0.5, 2)]);
        assert_eq!(order, vec![1, 2, 0]);
    }

    /// Equal f costs are broken by the lower h cost, regardless of insertion order.
    #[test]
    fn equal_f_prefers_lower_h() {
        let order = pop_order(vec![holder(4.0, 1.0, 0), holder(4.0, 2.0, 1)]);
        assert_eq!(order, vec![0, 1]);
        let order = pop_order(vec![holder(4.0, 2.0, 0), holder(4.0, 1.0, 1)]);
        assert_eq!(order, vec![1, 0]);
    }

    #[test]
    fn exact_ties_pop_latest_insertion() {
        let order = pop_order(vec![holder(3.0, 2.0, 0), holder(3.0, 2.0, 1), holder(3.0, 2.0, 2)]);
        assert_eq!(order, vec![2, 1, 0]);
    }

    //  ___
    // |S  |
    // | # |
    // |  G|
    //  ___
    #[test]
    fn solve_simple_problem() {
        let obstacles = vec![Cell::new(1, 1)];
        let mut log = EventLog::new();
        let path = find_path(
            Cell::new(0, 0),
            Cell::new(2, 2),
            3,
            3,
            &obstacles,
            Some(&mut log),
        )
        .unwrap();
        assert_eq!(
            path,
            vec![
                Cell::new(0, 0),
                Cell::new(0, 1),
                Cell::new(0, 2),
                Cell::new(1, 2),
                Cell::new(2, 2)
            ]
        );
        // (1, 0) and (0, 1) tie on both costs, the later one is expanded first. (1, 2) and
        // (2, 0) tie on f and (1, 2) wins on h.
        assert_eq!(
            log.expanded(),
            vec![
                Cell::new(0, 0),
                Cell::new(1, 0),
                Cell::new(0, 1),
                Cell::new(0, 2),
                Cell::new(1, 2)
            ]
        );
        assert_eq!(
            log.rejected(),
            vec![
                Cell::new(0, 0),
                Cell::new(0, 0),
                Cell::new(0, 1),
                Cell::new(0, 2)
            ]
        );
    }

    #[test]
    fn event_sequence_of_first_expansion() {
        let none: Vec<Cell> = Vec::new();
        let mut log = EventLog::new();
        find_path(Cell::new(0, 0), Cell::new(2, 0), 3, 1, &none, Some(&mut log)).unwrap();
        assert_eq!(
            log.events,
            vec![
                SearchEvent::Expand(Cell::new(0, 0)),
                SearchEvent::NeighborConsidered(Cell::new(1, 0)),
                SearchEvent::Cost {
                    cell: Cell::new(1, 0),
                    g_cost: 1.0,
                    h_cost: 1.0,
                    f_cost: 2.0
                },
                SearchEvent::ExpandDone(Cell::new(0, 0)),
                SearchEvent::Expand(Cell::new(1, 0)),
                SearchEvent::NeighborConsidered(Cell::new(0, 0)),
                SearchEvent::NeighborRejected(Cell::new(0, 0)),
                SearchEvent::NeighborConsidered(Cell::new(2, 0)),
            ]
        );
    }

    #[test]
    fn open_straight_line() {
        let none: FxHashSet<Cell> = FxHashSet::default();
        let path = find_path(Cell::new(0, 0), Cell::new(7, 5), 8, 8, &none, None).unwrap();
        assert_eq!(path.len(), 13);
        assert_eq!(path.first(), Some(&Cell::new(0, 0)));
        assert_eq!(path.last(), Some(&Cell::new(7, 5)));
        assert!(is_valid_path(&path, &none));
    }

    #[test]
    fn full_wall_blocks() {
        let wall: Vec<Cell> = (0..5).map(|y| Cell::new(2, y)).collect();
        let mut log = EventLog::new();
        let path = find_path(Cell::new(0, 0), Cell::new(4, 4), 5, 5, &wall, Some(&mut log)).unwrap();
        assert!(path.is_empty());
        // Every cell left of the wall gets expanded exactly once.
        let mut expanded = log.expanded();
        assert_eq!(expanded.len(), 10);
        expanded.sort_by_key(|c| (c.x, c.y));
        expanded.dedup();
        assert_eq!(expanded.len(), 10);
    }

    #[test]
    fn equal_start_goal() {
        let none: Vec<Cell> = Vec::new();
        let mut log = EventLog::new();
        let start = Cell::new(3, 3);
        let path = find_path(start, start, 8, 8, &none, Some(&mut log)).unwrap();
        assert_eq!(path, vec![start]);
        assert!(log.events.is_empty());
        let path = find_path(Cell::new(0, 0), Cell::new(0, 0), 1, 1, &none, None).unwrap();
        assert_eq!(path, vec![Cell::new(0, 0)]);
    }

    #[test]
    fn invalid_input_is_rejected() {
        let obstacles = vec![Cell::new(1, 1)];
        let origin = Cell::new(0, 0);
        assert_eq!(
            find_path(origin, origin, 0, 4, &obstacles, None),
            Err(PathError::InvalidBounds {
                width: 0,
                height: 4
            })
        );
        assert_eq!(
            find_path(origin, Cell::new(4, 0), 4, 4, &obstacles, None),
            Err(PathError::OutOfBounds {
                cell: Cell::new(4, 0),
                width: 4,
                height: 4
            })
        );
        assert_eq!(
            find_path(Cell::new(-1, 0), origin, 4, 4, &obstacles, None),
            Err(PathError::OutOfBounds {
                cell: Cell::new(-1, 0),
                width: 4,
                height: 4
            })
        );
        assert_eq!(
            find_path(origin, Cell::new(1, 1), 4, 4, &obstacles, None),
            Err(PathError::Blocked {
                cell: Cell::new(1, 1)
            })
        );
    }

    #[test]
    fn goal_next_to_start() {
        let none: Vec<Cell> = Vec::new();
        let path = find_path(Cell::new(2, 2), Cell::new(2, 1), 4, 4, &none, None).unwrap();
        assert_eq!(path, vec![Cell::new(2, 2), Cell::new(2, 1)]);
    }

    #[test]
    fn cancellation() {
        let none: Vec<Cell> = Vec::new();
        let mut log = EventLog::new();
        let mut budget = ExpansionBudget::new(&mut log, 3);
        let result = find_path(Cell::new(0, 0), Cell::new(7, 7), 8, 8, &none, Some(&mut budget));
        assert_eq!(result, Err(PathError::Cancelled { expanded: 3 }));
        assert_eq!(log.expanded().len(), 3);
    }

    #[test]
    fn relaxation_keeps_paths_valid() {
        let pathfinder = Pathfinder::new(SearchConfig {
            relax_open_nodes: true,
            ..SearchConfig::default()
        });
        let obstacles = vec![Cell::new(4, 4), Cell::new(5, 4), Cell::new(6, 4), Cell::new(7, 4)];
        let path = pathfinder
            .find_path(Cell::new(0, 0), Cell::new(7, 5), 8, 8, &obstacles, None)
            .unwrap();
        assert_eq!(path.len(), 13);
        assert!(is_valid_path(&path, &obstacles));
    }

    #[test]
    fn weighted_heuristic_still_reaches_goal() {
        let pathfinder = Pathfinder::new(SearchConfig {
            heuristic_factor: 1.5,
            ..SearchConfig::default()
        });
        let none: Vec<Cell> = Vec::new();
        let path = pathfinder
            .find_path(Cell::new(0, 0), Cell::new(9, 9), 10, 10, &none, None)
            .unwrap();
        assert_eq!(path.last(), Some(&Cell::new(9, 9)));
        assert!(is_valid_path(&path, &none));
    }
}
