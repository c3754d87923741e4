use crate::common::SetupError;
use crate::domains::agent::EnergyPolicy;
use crate::domains::grid::{Position, TeamId, DEFAULT_DRIFT_PROBABILITY};
use crate::domains::simulation::{AgentPlacement, SimulationParams, TeamQuota};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub grid: GridConfig,
    pub agents: AgentsConfig,
    pub run: RunConfig,
    pub log: LogConfig,
    pub journal: JournalConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub width: i32,
    pub height: i32,
    pub holes: usize,
    pub orbs: usize,
    pub drift_probability: f64,
    pub hole_positions: Vec<Position>,
    pub orb_positions: Vec<Position>,
    pub obstacles: Vec<Position>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 5,
            height: 5,
            holes: 3,
            orbs: 3,
            drift_probability: DEFAULT_DRIFT_PROBABILITY,
            hole_positions: Vec::new(),
            orb_positions: Vec::new(),
            obstacles: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentsConfig {
    pub field_of_view: i32,
    pub energy: i32,
    pub tracked_team: TeamId,
    pub energy_policy: EnergyPolicy,
    pub teams: Vec<TeamQuota>,
    pub placements: Vec<AgentPlacement>,
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            field_of_view: 3,
            energy: 30,
            tracked_team: 1,
            energy_policy: EnergyPolicy::ChargeOnSuccess,
            teams: vec![TeamQuota {
                team: 1,
                min_agents: 2,
            }],
            placements: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Fixed seed for a reproducible run; a random one is drawn when absent.
    pub seed: Option<u64>,
    pub max_rounds: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_rounds: 500,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    /// `fast_log` file target. Console only when absent.
    pub file: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl LogConfig {
    pub fn level_filter(&self) -> log::LevelFilter {
        self.level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalConfig {
    /// Directory for the JSON-lines grid journal. In memory when absent.
    pub directory: Option<String>,
}

impl Config {
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Validated simulation parameters. `seed` is used when the file does
    /// not pin one.
    pub fn to_params(&self, seed: u64) -> Result<SimulationParams, SetupError> {
        let params = SimulationParams {
            width: self.grid.width,
            height: self.grid.height,
            hole_count: self.grid.holes,
            orb_count: self.grid.orbs,
            field_of_view: self.agents.field_of_view,
            energy: self.agents.energy,
            tracked_team: self.agents.tracked_team,
            teams: self.agents.teams.clone(),
            placements: self.agents.placements.clone(),
            holes: self.grid.hole_positions.clone(),
            orbs: self.grid.orb_positions.clone(),
            obstacles: self.grid.obstacles.clone(),
            drift_probability: self.grid.drift_probability,
            energy_policy: self.agents.energy_policy,
            seed: self.run.seed.unwrap_or(seed),
        };
        params.validate()?;
        Ok(params)
    }
}
