use super::types::{AgentId, Position, Terrain};
use crate::common::DomainEvent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridEvent {
    pub grid_id: String,
    pub round: u64,
    pub kind: GridEventKind,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GridEventKind {
    GridCreated {
        width: i32,
        height: i32,
        drift_probability: f64,
    },
    TerrainSeeded {
        position: Position,
        terrain: Terrain,
    },
    AgentEntered {
        agent_id: AgentId,
        from: Option<Position>,
        to: Position,
    },
    AgentExited {
        agent_id: AgentId,
        from: Position,
    },
    OrbPicked {
        position: Position,
    },
    OrbPlaced {
        position: Position,
        agent_id: AgentId,
    },
    OrbDrifted {
        from: Position,
        to: Position,
    },
    HoleFilledByDrift {
        from: Position,
        hole: Position,
    },
    OrbStolen {
        hole: Position,
        relocated_to: Position,
    },
}

impl GridEvent {
    pub fn new(grid_id: &str, round: u64, kind: GridEventKind) -> Self {
        Self {
            grid_id: grid_id.to_string(),
            round,
            kind,
            timestamp: Utc::now(),
        }
    }
}

impl DomainEvent for GridEvent {
    fn event_type(&self) -> &'static str {
        match self.kind {
            GridEventKind::GridCreated { .. } => "GridCreated",
            GridEventKind::TerrainSeeded { .. } => "TerrainSeeded",
            GridEventKind::AgentEntered { .. } => "AgentEntered",
            GridEventKind::AgentExited { .. } => "AgentExited",
            GridEventKind::OrbPicked { .. } => "OrbPicked",
            GridEventKind::OrbPlaced { .. } => "OrbPlaced",
            GridEventKind::OrbDrifted { .. } => "OrbDrifted",
            GridEventKind::HoleFilledByDrift { .. } => "HoleFilledByDrift",
            GridEventKind::OrbStolen { .. } => "OrbStolen",
        }
    }

    fn aggregate_id(&self) -> &str {
        &self.grid_id
    }

    fn round(&self) -> u64 {
        self.round
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
