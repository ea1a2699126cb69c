//! Plain data row types written by output backends.

use wh_agent::Agent;
use wh_core::Tick;
use wh_grid::{Grid, ObstacleRegion};
use wh_sim::TickReport;

/// One placed obstacle, in cells and in metres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleRow {
    pub kind:     &'static str,
    pub x:        i32,
    pub y:        i32,
    pub width:    i32,
    pub height:   i32,
    pub x_m:      f32,
    pub y_m:      f32,
    pub width_m:  f32,
    pub height_m: f32,
}

impl ObstacleRow {
    pub fn new(region: &ObstacleRegion, grid: &Grid) -> Self {
        let r = region.rect;
        let origin = grid.to_world(wh_core::Cell::new(r.x, r.y));
        Self {
            kind:     region.kind.as_str(),
            x:        r.x,
            y:        r.y,
            width:    r.w,
            height:   r.h,
            x_m:      origin.x,
            y_m:      origin.y,
            width_m:  r.w as f32 * grid.resolution(),
            height_m: r.h as f32 * grid.resolution(),
        }
    }
}

/// One agent at one tick.  `goal_x`/`goal_y` are `None` when the agent
/// holds no goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRow {
    pub tick:            u64,
    pub agent_id:        u32,
    pub x:               i32,
    pub y:               i32,
    pub state:           &'static str,
    pub goal_x:          Option<i32>,
    pub goal_y:          Option<i32>,
    pub completed_tasks: u32,
}

impl FrameRow {
    pub fn new(tick: Tick, agent: &Agent) -> Self {
        let pos = agent.current_position();
        let goal = agent.goal();
        Self {
            tick:            tick.0,
            agent_id:        agent.id.0,
            x:               pos.x,
            y:               pos.y,
            state:           agent.state().as_str(),
            goal_x:          goal.map(|g| g.x),
            goal_y:          goal.map(|g| g.y),
            completed_tasks: agent.completed_tasks(),
        }
    }
}

/// Counters for one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReportRow {
    pub tick:       u64,
    pub moved:      u64,
    pub blocked:    u64,
    pub replanned:  u64,
    pub idled:      u64,
    pub reassigned: u64,
}

impl From<&TickReport> for TickReportRow {
    fn from(r: &TickReport) -> Self {
        Self {
            tick:       r.tick.0,
            moved:      r.moved as u64,
            blocked:    r.blocked as u64,
            replanned:  r.replanned as u64,
            idled:      r.idled as u64,
            reassigned: r.reassigned as u64,
        }
    }
}
