use crate::domains::agent::{Agent, AgentStatus, TargetKind};
use crate::domains::grid::{AgentId, CellState, Direction, Grid, Position, TeamId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub id: AgentId,
    pub team: TeamId,
    pub position: Position,
    pub facing: Direction,
    pub energy: i32,
    pub carrying: bool,
    pub target: Option<Position>,
    pub target_kind: Option<TargetKind>,
    pub status: AgentStatus,
    /// Holes currently credited to this agent.
    pub score: usize,
}

impl AgentSnapshot {
    pub fn capture(agent: &Agent, grid: &Grid) -> Self {
        Self {
            id: agent.id.clone(),
            team: agent.team,
            position: agent.position,
            facing: agent.facing,
            energy: agent.energy,
            carrying: agent.carrying,
            target: agent.target_position(),
            target_kind: agent.target.map(|t| t.kind),
            status: agent.status,
            score: grid.holes_filled_by(&agent.id),
        }
    }
}

/// State of the world at the end of a round. Round 0 is the initial layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub round: u64,
    pub cells: Vec<Vec<CellState>>,
    pub agents: Vec<AgentSnapshot>,
    pub score: usize,
    pub max_score: usize,
    pub finished: bool,
}

impl RoundSnapshot {
    pub fn agent(&self, agent_id: &str) -> Option<&AgentSnapshot> {
        self.agents.iter().find(|a| a.id == agent_id)
    }

    pub fn cell(&self, position: Position) -> Option<&CellState> {
        if position.x < 0 || position.y < 0 {
            return None;
        }
        self.cells.get(position.y as usize)?.get(position.x as usize)
    }
}
