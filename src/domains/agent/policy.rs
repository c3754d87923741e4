use super::knowledge::MemoryMap;
use crate::common::PolicyError;
use crate::domains::grid::{AgentId, Direction, Position};

/// What an external decision source gets to see before proposing a move.
#[derive(Debug, Clone)]
pub struct PolicyContext<'a> {
    pub agent_id: &'a AgentId,
    pub position: Position,
    pub facing: Direction,
    pub carrying: bool,
    pub energy: i32,
    pub width: i32,
    pub height: i32,
    pub memory_map: &'a MemoryMap,
}

/// Pluggable override of the nearest-target choice. Proposals must be an
/// in-bounds cell next to the agent; anything else falls back to the
/// built-in algorithm for that turn.
pub trait DecisionPolicy: Send {
    fn name(&self) -> &str;

    fn propose_target(&mut self, context: &PolicyContext<'_>) -> Result<Position, PolicyError>;
}

pub fn validate_proposal(context: &PolicyContext<'_>, proposed: Position) -> Result<Position, PolicyError> {
    if proposed.x < 0 || proposed.y < 0 || proposed.x >= context.width || proposed.y >= context.height {
        return Err(PolicyError::OutOfBounds { proposed });
    }
    if !context.position.is_adjacent(proposed) {
        return Err(PolicyError::NotAdjacent {
            position: context.position,
            proposed,
        });
    }
    Ok(proposed)
}
