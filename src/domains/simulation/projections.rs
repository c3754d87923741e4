use crate::domains::grid::{AgentId, GridEvent, GridEventKind, Position};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Score tally rebuilt from the grid journal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scoreboard {
    pub per_agent: BTreeMap<AgentId, usize>,
    pub filled_holes: usize,
    pub drift_fills: usize,
    pub orbs_picked: usize,
    pub steals: usize,
    pub last_round: u64,
    #[serde(skip)]
    fillers: BTreeMap<Position, Option<AgentId>>,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score_of(&self, agent_id: &str) -> usize {
        self.per_agent.get(agent_id).copied().unwrap_or(0)
    }

    pub fn apply_event(&mut self, event: &GridEvent) {
        self.last_round = self.last_round.max(event.round);
        match &event.kind {
            GridEventKind::OrbPlaced { position, agent_id } => {
                self.fillers.insert(*position, Some(agent_id.clone()));
                *self.per_agent.entry(agent_id.clone()).or_default() += 1;
                self.filled_holes += 1;
            }
            GridEventKind::HoleFilledByDrift { hole, .. } => {
                self.fillers.insert(*hole, None);
                self.filled_holes += 1;
                self.drift_fills += 1;
            }
            GridEventKind::OrbStolen { hole, .. } => {
                if let Some(Some(agent_id)) = self.fillers.remove(hole) {
                    if let Some(score) = self.per_agent.get_mut(&agent_id) {
                        *score = score.saturating_sub(1);
                    }
                }
                self.filled_holes = self.filled_holes.saturating_sub(1);
                self.steals += 1;
            }
            GridEventKind::OrbPicked { .. } => {
                self.orbs_picked += 1;
            }
            _ => {}
        }
    }
}
