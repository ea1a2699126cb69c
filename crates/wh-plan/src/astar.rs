//! Bounded A* over the `(cell, tick)` lattice.
//!
//! # Search space
//!
//! A state is a cell plus the ticks elapsed since departure.  Each tick an
//! agent either moves one cell along an axis or waits in place; every action
//! costs 1, so `g` of a state is simply its elapsed time.  The heuristic is
//! the Manhattan distance to the goal, which is admissible and consistent on
//! a 4-connected unit-cost grid.  That makes "closed on first push" safe: a
//! state can never be reached later with a lower cost.
//!
//! # Bounds
//!
//! Time is unbounded in principle (an agent may wait forever), so the search
//! is capped twice: successors beyond `horizon` elapsed ticks are pruned, and
//! the search gives up after `max_expansions` pops.  Both caps end in `None`,
//! the same "currently unreachable" answer as an exhausted open set.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rustc_hash::FxHashSet;

use wh_core::{AgentId, Cell, SimConfig, Tick};
use wh_grid::Grid;

use crate::{Path, PlanQuery, Planner, ReservationTable};

/// Space-time A* against the reservation ledger.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SpaceTimeAStar {
    /// Longest path considered, in ticks (waits included).
    pub horizon: u64,
    /// Heap pops allowed per query.
    pub max_expansions: usize,
}

impl SpaceTimeAStar {
    pub const DEFAULT_HORIZON: u64 = 300;
    pub const DEFAULT_MAX_EXPANSIONS: usize = 100_000;

    pub fn new(horizon: u64, max_expansions: usize) -> Self {
        Self { horizon, max_expansions }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.planner_horizon_ticks, config.planner_max_expansions)
    }
}

impl Default for SpaceTimeAStar {
    fn default() -> Self {
        Self::new(Self::DEFAULT_HORIZON, Self::DEFAULT_MAX_EXPANSIONS)
    }
}

impl Planner for SpaceTimeAStar {
    fn plan(&self, grid: &Grid, table: &ReservationTable, query: &PlanQuery) -> Option<Path> {
        search(self, grid, table, query)
    }
}

// ── Search internals ──────────────────────────────────────────────────────────

/// A pushed state.  `parent` indexes into the node arena.
struct Node {
    cell:    Cell,
    elapsed: u64,
    parent:  Option<usize>,
}

fn search(
    bounds: &SpaceTimeAStar,
    grid:   &Grid,
    table:  &ReservationTable,
    query:  &PlanQuery,
) -> Option<Path> {
    let PlanQuery { start, goal, depart, owner } = *query;

    if !grid.is_free(start) || !grid.is_free(goal) {
        return None;
    }
    if start == goal {
        return Some(Path::stationary(start, depart));
    }

    let mut nodes: Vec<Node> = vec![Node { cell: start, elapsed: 0, parent: None }];
    let mut seen: FxHashSet<(Cell, u64)> = FxHashSet::default();
    seen.insert((start, 0));

    // Min-heap on (f, h, arena index).  Lower h among equal f prefers states
    // closer to the goal; the arena index keeps ties in insertion order.
    let mut open: BinaryHeap<Reverse<(u64, u32, usize)>> = BinaryHeap::new();
    let h0 = start.manhattan(goal);
    open.push(Reverse((u64::from(h0), h0, 0)));

    let mut expansions = 0usize;
    while let Some(Reverse((_, _, idx))) = open.pop() {
        let (cell, elapsed) = (nodes[idx].cell, nodes[idx].elapsed);
        if cell == goal {
            let path = reconstruct(&nodes, idx, depart);
            tracing::trace!(agent = %owner, expansions, len = path.len(), "space-time search succeeded");
            return Some(path);
        }

        expansions += 1;
        if expansions > bounds.max_expansions {
            tracing::trace!(agent = %owner, expansions, from = %start, to = %goal, "expansion budget exhausted");
            return None;
        }

        let t = elapsed + 1;
        if t > bounds.horizon {
            continue;
        }
        let arrive = depart + t;
        for next in cell.successors() {
            if !is_passable(grid, table, owner, cell, next, arrive) || !seen.insert((next, t)) {
                continue;
            }
            let h = next.manhattan(goal);
            nodes.push(Node { cell: next, elapsed: t, parent: Some(idx) });
            open.push(Reverse((t + u64::from(h), h, nodes.len() - 1)));
        }
    }

    tracing::trace!(agent = %owner, expansions, from = %start, to = %goal, "open set exhausted");
    None
}

/// Successor check: static obstacles, another owner's cell lock at `arrive`,
/// or a swap against another owner's booked traversal.
#[inline]
fn is_passable(
    grid:   &Grid,
    table:  &ReservationTable,
    owner:  AgentId,
    from:   Cell,
    to:     Cell,
    arrive: Tick,
) -> bool {
    grid.is_free(to)
        && !table.is_cell_reserved_by_other(to, arrive, owner)
        && !table.is_edge_reserved_by_other(from, to, arrive, owner)
}

fn reconstruct(nodes: &[Node], goal_idx: usize, depart: Tick) -> Path {
    let mut cells = Vec::with_capacity(nodes[goal_idx].elapsed as usize + 1);
    let mut cur = Some(goal_idx);
    while let Some(i) = cur {
        cells.push(nodes[i].cell);
        cur = nodes[i].parent;
    }
    cells.reverse();
    Path::new(cells, depart).unwrap_or_else(|| Path::stationary(nodes[goal_idx].cell, depart))
}
