use crate::common::SetupError;
use crate::domains::agent::EnergyPolicy;
use crate::domains::grid::{cell_count, Position, TeamId, DEFAULT_DRIFT_PROBABILITY};
use serde::{Deserialize, Serialize};

/// Explicit starting cell of one agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentPlacement {
    pub x: i32,
    pub y: i32,
    pub team: TeamId,
}

impl AgentPlacement {
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

/// Lower bound on the number of agents of a team; missing agents are
/// placed on random free cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamQuota {
    pub team: TeamId,
    pub min_agents: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    pub width: i32,
    pub height: i32,
    pub hole_count: usize,
    pub orb_count: usize,
    pub field_of_view: i32,
    pub energy: i32,
    /// Team whose exhaustion ends the run.
    pub tracked_team: TeamId,
    pub teams: Vec<TeamQuota>,
    pub placements: Vec<AgentPlacement>,
    /// Explicit terrain. Random holes and orbs only top up to the counts.
    pub holes: Vec<Position>,
    pub orbs: Vec<Position>,
    pub obstacles: Vec<Position>,
    pub drift_probability: f64,
    pub energy_policy: EnergyPolicy,
    pub seed: u64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            width: 5,
            height: 5,
            hole_count: 3,
            orb_count: 3,
            field_of_view: 3,
            energy: 30,
            tracked_team: 1,
            teams: vec![TeamQuota {
                team: 1,
                min_agents: 1,
            }],
            placements: Vec::new(),
            holes: Vec::new(),
            orbs: Vec::new(),
            obstacles: Vec::new(),
            drift_probability: DEFAULT_DRIFT_PROBABILITY,
            energy_policy: EnergyPolicy::default(),
            seed: 0,
        }
    }
}

impl SimulationParams {
    /// Checks that do not depend on the layout. Placement conflicts are
    /// detected while the scenario is built.
    pub fn validate(&self) -> Result<(), SetupError> {
        if cell_count(self.width, self.height).is_none() {
            return Err(SetupError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.field_of_view <= 0 {
            return Err(SetupError::InvalidFieldOfView(self.field_of_view));
        }
        if self.energy <= 0 {
            return Err(SetupError::InvalidEnergy(self.energy));
        }
        if !(0.0..=1.0).contains(&self.drift_probability) {
            return Err(SetupError::InvalidDriftProbability(self.drift_probability));
        }
        Ok(())
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
