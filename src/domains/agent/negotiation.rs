//! Head-on conflict resolution between an acting agent and the agent
//! standing in its front cell.

use crate::domains::grid::{Direction, Grid, Position};
use serde::{Deserialize, Serialize};

/// The slice of agent state the negotiator looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegotiationParty {
    pub position: Position,
    pub facing: Direction,
    pub target: Option<Position>,
    pub energy: i32,
}

impl NegotiationParty {
    fn is_exhausted(&self) -> bool {
        self.energy <= 0
    }

    /// Target on the line the agent is moving along. No target counts as off-axis.
    pub fn target_on_facing_axis(&self) -> bool {
        match self.target {
            Some(target) if self.facing.is_vertical() => target.x == self.position.x,
            Some(target) => target.y == self.position.y,
            None => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    /// Not a head-on conflict; attempt the move as usual.
    Proceed,
    /// Turn to the given direction and move this turn.
    Reroute(Direction),
    /// The opponent turns to the given direction and moves on its next
    /// turn without re-aiming; the acting agent stays put.
    Defer(Direction),
    /// Neither agent moves this turn.
    Hold,
    /// Every alternative is blocked; idle.
    Unreachable,
}

pub fn negotiate(me: &NegotiationParty, opponent: &NegotiationParty, grid: &Grid) -> Resolution {
    if !me.facing.is_opposite(opponent.facing) && !opponent.is_exhausted() {
        return Resolution::Proceed;
    }

    if !me.target_on_facing_axis() || opponent.is_exhausted() {
        return reroute(me, grid).map_or(Resolution::Unreachable, Resolution::Reroute);
    }

    if !opponent.target_on_facing_axis() {
        // an opponent with nowhere to go leaves both in place
        return reroute(opponent, grid).map_or(Resolution::Hold, Resolution::Defer);
    }

    if me.energy >= opponent.energy {
        return reroute(me, grid).map_or(Resolution::Unreachable, Resolution::Reroute);
    }

    Resolution::Hold
}

/// Among the three directions other than the current facing, in
/// enumeration order, the one whose next cell is closest to the target.
/// Blocked cells never qualify; the first minimum wins ties.
pub fn reroute(party: &NegotiationParty, grid: &Grid) -> Option<Direction> {
    let mut best: Option<(Direction, u32)> = None;
    for direction in Direction::ALL {
        if direction == party.facing {
            continue;
        }
        let next = party.position.step(direction);
        if !grid.is_passable(next) {
            continue;
        }
        let distance = party
            .target
            .map(|target| next.manhattan_distance(target))
            .unwrap_or(0);
        if best.map_or(true, |(_, shortest)| distance < shortest) {
            best = Some((direction, distance));
        }
    }
    best.map(|(direction, _)| direction)
}
