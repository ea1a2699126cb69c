//! The reservation table: a time-indexed ledger of cell and edge locks.
//!
//! # Layout
//!
//! ```text
//! cells: Cell → (Tick → AgentId)       at most one owner per (cell, tick)
//! edges: (from, to, Tick) → AgentId    directed traversal arriving at Tick
//! ```
//!
//! Writes are unconditional and the last writer for a key wins; arbitration
//! happens in the planner and the stepping protocols before anything is
//! written.  Queries on unknown keys report "not reserved".
//!
//! Entries are never evicted during normal stepping.  [`prune_before`]
//! exists as an explicit maintenance operation for long runs; nothing in
//! the simulator calls it on its own.
//!
//! [`prune_before`]: ReservationTable::prune_before

use rustc_hash::FxHashMap;

use wh_core::{AgentId, Cell, Tick};

use crate::Path;

/// Default length of the trailing goal lease, in ticks.
pub const DEFAULT_GOAL_DWELL: u64 = 50;

#[derive(Clone, Debug, Default)]
pub struct ReservationTable {
    cells: FxHashMap<Cell, FxHashMap<Tick, AgentId>>,
    edges: FxHashMap<(Cell, Cell, Tick), AgentId>,
}

impl ReservationTable {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Cell locks ────────────────────────────────────────────────────────

    #[inline]
    pub fn owner_at(&self, cell: Cell, tick: Tick) -> Option<AgentId> {
        self.cells.get(&cell).and_then(|by_tick| by_tick.get(&tick)).copied()
    }

    #[inline]
    pub fn is_cell_reserved(&self, cell: Cell, tick: Tick) -> bool {
        self.owner_at(cell, tick).is_some()
    }

    /// `true` if `cell` is held at `tick` by anyone other than `owner`.
    #[inline]
    pub fn is_cell_reserved_by_other(&self, cell: Cell, tick: Tick, owner: AgentId) -> bool {
        self.owner_at(cell, tick).is_some_and(|o| o != owner)
    }

    pub fn reserve_cell(&mut self, cell: Cell, tick: Tick, owner: AgentId) {
        self.cells.entry(cell).or_default().insert(tick, owner);
    }

    /// Reserve every cell of `path` at its scheduled tick.
    pub fn reserve_path(&mut self, path: &Path, owner: AgentId) {
        for (tick, cell) in path.timed_cells() {
            self.reserve_cell(cell, tick, owner);
        }
    }

    /// Hold `cell` for `duration` ticks starting at `start`.
    pub fn reserve_goal(&mut self, cell: Cell, start: Tick, duration: u64, owner: AgentId) {
        let by_tick = self.cells.entry(cell).or_default();
        for t in 0..duration {
            by_tick.insert(start + t, owner);
        }
    }

    /// The trailing lease on a destination cell after a path ends, covering
    /// `[start, start + duration)`.
    #[inline]
    pub fn reserve_goal_forever(&mut self, cell: Cell, start: Tick, owner: AgentId, duration: u64) {
        self.reserve_goal(cell, start, duration, owner);
    }

    // ── Edge locks ────────────────────────────────────────────────────────

    /// Swap check: `true` iff the *reverse* traversal `to → from` is booked
    /// for `tick`.
    #[inline]
    pub fn is_edge_reserved(&self, from: Cell, to: Cell, tick: Tick) -> bool {
        self.edges.contains_key(&(to, from, tick))
    }

    /// Swap check ignoring traversals booked by `owner` itself.
    #[inline]
    pub fn is_edge_reserved_by_other(&self, from: Cell, to: Cell, tick: Tick, owner: AgentId) -> bool {
        self.edges.get(&(to, from, tick)).is_some_and(|&o| o != owner)
    }

    /// Owner of the directed traversal `from → to` arriving at `tick`.
    #[inline]
    pub fn edge_owner(&self, from: Cell, to: Cell, tick: Tick) -> Option<AgentId> {
        self.edges.get(&(from, to, tick)).copied()
    }

    pub fn reserve_edge(&mut self, from: Cell, to: Cell, tick: Tick, owner: AgentId) {
        self.edges.insert((from, to, tick), owner);
    }

    /// Reserve every consecutive transition of `path`.
    pub fn reserve_edges(&mut self, path: &Path, owner: AgentId) {
        for (from, to, tick) in path.transitions() {
            self.reserve_edge(from, to, tick, owner);
        }
    }

    // ── Commit ────────────────────────────────────────────────────────────

    /// Book a freshly planned path: its cells, its transitions, the start
    /// cell at departure, and a `dwell`-tick lease on the goal once the path
    /// ends.
    pub fn commit_path(&mut self, path: &Path, owner: AgentId, dwell: u64) {
        self.reserve_path(path, owner);
        self.reserve_edges(path, owner);
        self.reserve_goal_forever(path.goal(), path.depart() + path.len() as u64, owner, dwell);
        self.reserve_cell(path.start(), path.depart(), owner);
    }

    // ── Maintenance ───────────────────────────────────────────────────────

    /// Drop every cell and edge lock strictly before `tick`.
    ///
    /// Returns the number of entries removed.
    pub fn prune_before(&mut self, tick: Tick) -> usize {
        let mut removed = 0;
        self.cells.retain(|_, by_tick| {
            let before = by_tick.len();
            by_tick.retain(|&t, _| t >= tick);
            removed += before - by_tick.len();
            !by_tick.is_empty()
        });
        let before = self.edges.len();
        self.edges.retain(|&(_, _, t), _| t >= tick);
        removed += before - self.edges.len();
        removed
    }

    /// Number of `(cell, tick)` locks held.
    pub fn cell_count(&self) -> usize {
        self.cells.values().map(|by_tick| by_tick.len()).sum()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
