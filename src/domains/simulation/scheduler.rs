use super::params::SimulationParams;
use super::setup::build_scenario;
use super::snapshot::{AgentSnapshot, RoundSnapshot};
use crate::common::{AggregateRoot, SetupError};
use crate::domains::agent::{
    take_turn, Agent, DecisionPolicy, GossipMessage, TeamRoster, TurnAction, TurnContext,
};
use crate::domains::grid::{normalize_field_of_view, AgentId, Grid, GridEvent};
use crate::domains::logger::DynLogger;
use crate::domains::random::{seeded, RandomSource};
use std::collections::BTreeMap;

/// Round-based driver. Agents act one at a time in creation order; the
/// acting agent's gossip reaches its teammates' inboxes as soon as its
/// turn ends.
pub struct Simulation {
    params: SimulationParams,
    grid: Grid,
    agents: Vec<Agent>,
    roster: TeamRoster,
    rng: RandomSource,
    policies: BTreeMap<AgentId, Box<dyn DecisionPolicy>>,
    logger: DynLogger,
    round: u64,
    max_score: usize,
    finished: bool,
    history: Vec<RoundSnapshot>,
    last_actions: Vec<(AgentId, TurnAction)>,
}

impl Simulation {
    pub fn new(params: SimulationParams, logger: DynLogger) -> Result<Self, SetupError> {
        let mut rng = seeded(params.seed);
        let scenario = build_scenario(&params, &mut rng)?;
        let roster = TeamRoster::build(scenario.agents.iter().map(|a| (&a.id, a.team)));
        let max_score = scenario.grid.hole_count().min(scenario.grid.orb_count());

        logger.info(&format!(
            "simulation ready: {}x{} grid, {} agents, {} holes, {} orbs, seed {}",
            params.width,
            params.height,
            scenario.agents.len(),
            scenario.grid.hole_count(),
            scenario.grid.orb_count(),
            params.seed
        ));

        let mut simulation = Self {
            params,
            grid: scenario.grid,
            agents: scenario.agents,
            roster,
            rng,
            policies: BTreeMap::new(),
            logger,
            round: 0,
            max_score,
            finished: false,
            history: Vec::new(),
            last_actions: Vec::new(),
        };
        let initial = simulation.capture();
        simulation.history.push(initial);
        Ok(simulation)
    }

    /// Rebuild the scenario from the same parameters and a new seed.
    /// Agent ids change with the seed, so installed policies are dropped.
    pub fn reset_with_seed(&mut self, seed: u64) -> Result<(), SetupError> {
        let params = self.params.clone().with_seed(seed);
        *self = Self::new(params, self.logger.clone())?;
        Ok(())
    }

    pub fn set_policy(&mut self, agent_id: &str, policy: Box<dyn DecisionPolicy>) -> bool {
        if !self.agents.iter().any(|a| a.id == agent_id) {
            return false;
        }
        self.logger
            .info(&format!("agent {} now uses policy {}", agent_id, policy.name()));
        self.policies.insert(agent_id.to_string(), policy);
        true
    }

    pub fn clear_policy(&mut self, agent_id: &str) -> Option<Box<dyn DecisionPolicy>> {
        self.policies.remove(agent_id)
    }

    /// Advance one round. Returns whether the run is over; once it is,
    /// further calls do nothing and keep returning `true`.
    pub fn step_round(&mut self) -> bool {
        if self.finished {
            return true;
        }

        self.round += 1;
        self.grid.set_round(self.round);
        self.last_actions.clear();
        let field_of_view = normalize_field_of_view(self.params.field_of_view.max(1) as usize);

        for index in 0..self.agents.len() {
            if self.agents[index].is_retired() {
                continue;
            }
            let agent_id = self.agents[index].id.clone();
            let mut ctx = TurnContext {
                grid: &mut self.grid,
                rng: &mut self.rng,
                roster: &self.roster,
                field_of_view,
                energy_policy: self.params.energy_policy,
                policy: self.policies.get_mut(&agent_id),
                logger: &self.logger,
            };
            let action = take_turn(&mut self.agents, index, &mut ctx);
            self.deliver_outbox(index);
            self.last_actions.push((agent_id, action));
        }

        self.finished = self.is_over();
        let snapshot = self.capture();
        self.logger.info(&format!(
            "round {} done: score {}/{}{}",
            self.round,
            snapshot.score,
            self.max_score,
            if self.finished { ", finished" } else { "" }
        ));
        self.history.push(snapshot);
        self.finished
    }

    fn deliver_outbox(&mut self, index: usize) {
        let facts = self.agents[index].take_outbox();
        if facts.is_empty() {
            return;
        }
        let sender = self.agents[index].id.clone();
        let friends: Vec<AgentId> = self.roster.friends_of(&sender).cloned().collect();
        let round = self.round;
        for friend in self
            .agents
            .iter_mut()
            .filter(|a| !a.is_retired() && friends.contains(&a.id))
        {
            for fact in &facts {
                friend.deliver(GossipMessage {
                    from: sender.clone(),
                    round,
                    fact: fact.clone(),
                });
            }
        }
    }

    fn is_over(&self) -> bool {
        let tracked_retired = self
            .agents
            .iter()
            .filter(|a| a.team == self.params.tracked_team)
            .all(Agent::is_retired);
        tracked_retired || self.score() >= self.max_score
    }

    fn capture(&self) -> RoundSnapshot {
        RoundSnapshot {
            round: self.round,
            cells: self.grid.rows(),
            agents: self
                .agents
                .iter()
                .map(|agent| AgentSnapshot::capture(agent, &self.grid))
                .collect(),
            score: self.score(),
            max_score: self.max_score,
            finished: self.finished,
        }
    }

    /// Run until finished or `max_rounds` more rounds have passed.
    pub fn run(&mut self, max_rounds: u64) -> bool {
        for _ in 0..max_rounds {
            if self.step_round() {
                return true;
            }
        }
        self.finished
    }

    pub fn snapshot(&self, round: u64) -> Option<&RoundSnapshot> {
        self.history.iter().find(|s| s.round == round)
    }

    pub fn latest_snapshot(&self) -> Option<&RoundSnapshot> {
        self.history.last()
    }

    pub fn history(&self) -> &[RoundSnapshot] {
        &self.history
    }

    /// Filled holes on the grid.
    pub fn score(&self) -> usize {
        self.grid.filled_hole_count()
    }

    pub fn agent_score(&self, agent_id: &str) -> usize {
        self.grid.holes_filled_by(agent_id)
    }

    pub fn max_score(&self) -> usize {
        self.max_score
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, agent_id: &str) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == agent_id)
    }

    pub fn roster(&self) -> &TeamRoster {
        &self.roster
    }

    pub fn last_actions(&self) -> &[(AgentId, TurnAction)] {
        &self.last_actions
    }

    /// Grid events not yet handed to a journal, oldest first.
    pub fn pending_grid_events(&self) -> &[GridEvent] {
        self.grid.uncommitted_events()
    }

    pub fn mark_grid_events_committed(&mut self) {
        self.grid.mark_events_as_committed();
    }
}
