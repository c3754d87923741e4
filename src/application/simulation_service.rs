use crate::common::{
    AggregateStore, ApplicationError, ApplicationResult, DomainError, EventEnvelope, EventMetadata, EventStore,
};
use crate::domains::grid::{AgentId, Grid, GridEvent};
use crate::domains::simulation::{Scoreboard, Simulation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

const AGGREGATE_TYPE: &str = "Grid";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub stream_id: String,
    pub seed: u64,
    pub rounds: u64,
    pub finished: bool,
    pub score: usize,
    pub max_score: usize,
    pub per_agent: BTreeMap<AgentId, usize>,
    pub steals: usize,
    pub drift_fills: usize,
    pub events_recorded: u64,
}

impl RunSummary {
    pub fn reached_max_score(&self) -> bool {
        self.score >= self.max_score
    }
}

/// Drives a [`Simulation`] and journals every grid change. Each run writes
/// its own stream, `<grid id>-<run id>`, so runs can share one store.
pub struct SimulationService {
    simulation: Simulation,
    event_store: Arc<dyn EventStore + Send + Sync>,
    scoreboard: Scoreboard,
    run_id: Uuid,
    stream_id: String,
    committed: u64,
}

impl SimulationService {
    /// Journal the initial layout and return a service ready to step.
    pub async fn start(
        simulation: Simulation,
        event_store: Arc<dyn EventStore + Send + Sync>,
    ) -> ApplicationResult<Self> {
        let run_id = Uuid::new_v4();
        let stream_id = format!("{}-{}", simulation.grid().id, run_id);
        let mut service = Self {
            simulation,
            event_store,
            scoreboard: Scoreboard::new(),
            run_id,
            stream_id,
            committed: 0,
        };
        service.commit().await?;
        tracing::info!(
            run_id = %service.run_id,
            stream = %service.stream_id,
            seed = service.simulation.params().seed,
            "simulation started"
        );
        Ok(service)
    }

    /// One round, then journal what changed.
    pub async fn step(&mut self) -> ApplicationResult<bool> {
        let finished = self.simulation.step_round();
        self.commit().await?;
        Ok(finished)
    }

    pub async fn run_to_completion(&mut self, max_rounds: u64) -> ApplicationResult<RunSummary> {
        let mut finished = self.simulation.is_finished();
        while !finished && self.simulation.round() < max_rounds {
            finished = self.step().await?;
        }

        let summary = self.summary();
        if summary.finished {
            tracing::info!(
                rounds = summary.rounds,
                score = summary.score,
                max_score = summary.max_score,
                "simulation finished"
            );
        } else {
            tracing::warn!(rounds = summary.rounds, "round limit reached before the run finished");
        }
        Ok(summary)
    }

    async fn commit(&mut self) -> ApplicationResult<()> {
        let events: Vec<GridEvent> = self.simulation.pending_grid_events().to_vec();
        if events.is_empty() {
            return Ok(());
        }

        let metadata = EventMetadata {
            run_id: self.run_id,
            seed: self.simulation.params().seed,
            source: "SimulationService".to_string(),
        };
        let envelopes = events
            .iter()
            .enumerate()
            .map(|(offset, event)| {
                EventEnvelope::new(event, AGGREGATE_TYPE, self.committed + offset as u64, metadata.clone())
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(DomainError::from)?;

        self.event_store
            .append_events(&self.stream_id, self.committed, envelopes)
            .await
            .map_err(ApplicationError::EventStore)?;

        for event in &events {
            self.scoreboard.apply_event(event);
        }
        self.committed += events.len() as u64;
        self.simulation.mark_grid_events_committed();
        Ok(())
    }

    /// Rebuild the grid from the journal alone.
    pub async fn replay_grid(&self) -> ApplicationResult<Grid> {
        let envelopes = self
            .event_store
            .load_events(&self.stream_id, 0)
            .await
            .map_err(ApplicationError::EventStore)?;
        let events = envelopes
            .iter()
            .map(EventEnvelope::decode::<GridEvent>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(DomainError::from)?;

        let store = AggregateStore::load_from_history(Grid::blank(&self.simulation.grid().id), events)?;
        Ok(store.into_inner())
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            run_id: self.run_id,
            stream_id: self.stream_id.clone(),
            seed: self.simulation.params().seed,
            rounds: self.simulation.round(),
            finished: self.simulation.is_finished(),
            score: self.simulation.score(),
            max_score: self.simulation.max_score(),
            per_agent: self
                .simulation
                .agents()
                .iter()
                .map(|agent| (agent.id.clone(), self.simulation.agent_score(&agent.id)))
                .collect(),
            steals: self.scoreboard.steals,
            drift_fills: self.scoreboard.drift_fills,
            events_recorded: self.committed,
        }
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.simulation
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn stream_id(&self) -> &str {
        &self.stream_id
    }
}
