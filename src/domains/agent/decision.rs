//! One agent turn: interact with the cell underfoot, pick a target, face it
//! and step forward.

use super::aggregate::{Agent, AgentStatus, TargetKind};
use super::gossip::{Fact, FactKind, TeamRoster};
use super::negotiation::{negotiate, reroute, Resolution};
use super::policy::{validate_proposal, DecisionPolicy, PolicyContext};
use crate::common::{DecisionError, GridError};
use crate::domains::grid::{surrounding, AgentId, Direction, FieldOfView, Grid, Position, Terrain};
use crate::domains::logger::DynLogger;
use crate::domains::random::RandomSource;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// When a move costs energy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyPolicy {
    #[default]
    ChargeOnSuccess,
    ChargeOnAttempt,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnAction {
    Stole(Position),
    Placed(Position),
    Picked(Position),
    Moved { from: Position, to: Position },
    Blocked(GridError),
    Deferred { opponent: AgentId, direction: Direction },
    Held,
    Unreachable,
    Idle,
    Retired,
}

/// Everything a turn may touch besides the agents themselves.
pub struct TurnContext<'a> {
    pub grid: &'a mut Grid,
    pub rng: &'a mut RandomSource,
    pub roster: &'a TeamRoster,
    pub field_of_view: usize,
    pub energy_policy: EnergyPolicy,
    pub policy: Option<&'a mut Box<dyn DecisionPolicy>>,
    pub logger: &'a DynLogger,
}

enum TurnPlan {
    Done(TurnAction),
    Advance,
    Negotiate(AgentId),
}

/// Run the turn of `agents[index]`. The opponent in a head-on conflict is
/// the only other agent that can be mutated, and only through `Defer`.
pub fn take_turn(agents: &mut [Agent], index: usize, ctx: &mut TurnContext<'_>) -> TurnAction {
    let plan = match agents.get_mut(index) {
        Some(agent) => plan_turn(agent, ctx),
        None => return TurnAction::Idle,
    };

    match plan {
        TurnPlan::Done(action) => action,
        TurnPlan::Advance => match agents.get_mut(index) {
            Some(agent) => step_forward(agent, ctx),
            None => TurnAction::Idle,
        },
        TurnPlan::Negotiate(opponent_id) => {
            let opponent_index = agents.iter().position(|a| a.id == opponent_id);
            let Some((me, opponent)) = opponent_index.and_then(|other| pair_mut(agents, index, other)) else {
                return match agents.get_mut(index) {
                    Some(agent) => step_forward(agent, ctx),
                    None => TurnAction::Idle,
                };
            };
            resolve_conflict(me, opponent, ctx)
        }
    }
}

fn pair_mut(agents: &mut [Agent], a: usize, b: usize) -> Option<(&mut Agent, &mut Agent)> {
    if a == b || a >= agents.len() || b >= agents.len() {
        return None;
    }
    if a < b {
        let (left, right) = agents.split_at_mut(b);
        Some((&mut left[a], &mut right[0]))
    } else {
        let (left, right) = agents.split_at_mut(a);
        Some((&mut right[0], &mut left[b]))
    }
}

fn plan_turn(agent: &mut Agent, ctx: &mut TurnContext<'_>) -> TurnPlan {
    agent.drain_inbox();
    let view = perceive(agent, ctx);

    if let Some(action) = interact(agent, ctx) {
        agent.status = AgentStatus::Interacting;
        return TurnPlan::Done(action);
    }

    if agent.target_position() == Some(agent.position) {
        agent.release_target();
    }

    if agent.is_exhausted() {
        agent.status = AgentStatus::Idle;
        if agent.energy == 0 {
            agent.energy = -1;
            agent.release_target();
            ctx.logger
                .info(&format!("agent {} ran out of energy at {}", agent.id, agent.position));
            return TurnPlan::Done(TurnAction::Retired);
        }
        return TurnPlan::Done(TurnAction::Idle);
    }

    agent.status = AgentStatus::Targeting;
    update_target(agent, ctx);
    if agent.target.is_none() {
        agent.status = AgentStatus::Idle;
        return TurnPlan::Done(TurnAction::Idle);
    }

    if agent.accelerated {
        agent.accelerated = false;
        return TurnPlan::Advance;
    }

    agent.face_target();
    match view.agent_in_front(agent.facing) {
        Some(other) if other != agent.id => TurnPlan::Negotiate(other.to_string()),
        _ => TurnPlan::Advance,
    }
}

fn perceive(agent: &mut Agent, ctx: &TurnContext<'_>) -> FieldOfView {
    let view = surrounding(&*ctx.grid, agent.position, ctx.field_of_view);
    for fact in agent.knowledge.observe(&view) {
        agent.gossip(fact);
    }
    view
}

/// Steal, place or pick on the current cell. `None` when nothing happened.
fn interact(agent: &mut Agent, ctx: &mut TurnContext<'_>) -> Option<TurnAction> {
    let here = agent.position;
    let terrain = ctx.grid.cell_state(here).ok()?.terrain;

    if !agent.carrying && terrain == Terrain::FilledHole {
        let rival = ctx
            .grid
            .hole_filler(here)
            .map(|filler| filler != &agent.id && !ctx.roster.are_teammates(filler, &agent.id))
            .unwrap_or(false);
        if rival {
            match ctx.grid.steal_item(here, &mut *ctx.rng) {
                Ok(()) => {
                    agent.knowledge.mark_reopened(here);
                    agent.gossip(Fact::add(FactKind::Hole, vec![here]));
                    agent.gossip(Fact::remove(FactKind::FilledHole, vec![here]));
                    ctx.logger
                        .info(&format!("agent {} stole the orb from hole {}", agent.id, here));
                    return Some(TurnAction::Stole(here));
                }
                Err(err) => ctx.logger.warn(&format!("agent {} steal failed: {}", agent.id, err)),
            }
        }
    }

    if agent.carrying && terrain == Terrain::Hole {
        agent.release_target();
        match ctx.grid.place_item(here, &agent.id, agent.carrying, &mut *ctx.rng) {
            Ok(()) => {
                agent.carrying = false;
                agent.knowledge.mark_filled(here);
                agent.gossip(Fact::add(FactKind::FilledHole, vec![here]));
                ctx.logger.info(&format!("agent {} filled hole {}", agent.id, here));
                perceive(agent, ctx);
                return Some(TurnAction::Placed(here));
            }
            Err(err) => ctx.logger.warn(&format!("agent {} place failed: {}", agent.id, err)),
        }
    }

    if !agent.carrying && terrain == Terrain::Orb {
        agent.release_target();
        match ctx.grid.pick_item(here) {
            Ok(()) => {
                agent.carrying = true;
                agent.knowledge.forget_orb(here);
                agent.gossip(Fact::remove(FactKind::Orb, vec![here]));
                ctx.logger.info(&format!("agent {} picked the orb at {}", agent.id, here));
                perceive(agent, ctx);
                return Some(TurnAction::Picked(here));
            }
            Err(err) => ctx.logger.warn(&format!("agent {} pick failed: {}", agent.id, err)),
        }
    }

    None
}

fn update_target(agent: &mut Agent, ctx: &mut TurnContext<'_>) {
    if let Some(policy) = ctx.policy.as_mut() {
        let memory_map = agent
            .knowledge
            .memory_map(ctx.grid.width(), ctx.grid.height(), agent.position);
        let context = PolicyContext {
            agent_id: &agent.id,
            position: agent.position,
            facing: agent.facing,
            carrying: agent.carrying,
            energy: agent.energy,
            width: ctx.grid.width(),
            height: ctx.grid.height(),
            memory_map: &memory_map,
        };
        let proposal = policy
            .propose_target(&context)
            .and_then(|proposed| validate_proposal(&context, proposed));
        match proposal {
            Ok(position) => {
                agent.set_target(position, TargetKind::Policy);
                return;
            }
            Err(err) => ctx.logger.warn(&format!(
                "agent {}: policy {} failed ({}), using nearest target",
                agent.id,
                policy.name(),
                err
            )),
        }
    }

    let relevant: Vec<Position> = if agent.carrying {
        agent.knowledge.known_holes().to_vec()
    } else {
        agent.knowledge.known_orbs().to_vec()
    };

    if let Some(target) = agent.target {
        if target.kind != TargetKind::Exploration && !relevant.contains(&target.position) {
            agent.release_target();
        }
    }

    let here = agent.position;
    let nearest = relevant
        .iter()
        .copied()
        .filter(|position| !agent.knowledge.is_locked(*position))
        .fold(None, |best: Option<(Position, u32)>, candidate| {
            let distance = here.manhattan_distance(candidate);
            match best {
                Some((_, shortest)) if shortest <= distance => best,
                _ => Some((candidate, distance)),
            }
        });

    match nearest {
        Some((candidate, distance)) => {
            let replace = match agent.target {
                None => true,
                Some(target) if target.kind != TargetKind::Item => true,
                Some(target) => distance < here.manhattan_distance(target.position),
            };
            if replace {
                agent.lock_target(candidate);
            }
        }
        None if agent.target.is_none() => {
            if let Some(position) = exploration_target(agent, ctx) {
                agent.set_target(position, TargetKind::Exploration);
            }
        }
        None => {}
    }
}

/// Random unvisited cell, else one never stood on, else any stood-on cell.
fn exploration_target(agent: &Agent, ctx: &mut TurnContext<'_>) -> Option<Position> {
    let knowledge = &agent.knowledge;
    let reachable: Vec<Position> = ctx
        .grid
        .positions()
        .filter(|position| *position != agent.position && ctx.grid.is_passable(*position))
        .collect();

    let unvisited: Vec<Position> = reachable
        .iter()
        .copied()
        .filter(|position| !knowledge.visited().contains(position))
        .collect();
    let pool = if !unvisited.is_empty() {
        unvisited
    } else {
        let untraversed: Vec<Position> = reachable
            .iter()
            .copied()
            .filter(|position| !knowledge.traversed().contains(position))
            .collect();
        if !untraversed.is_empty() {
            untraversed
        } else {
            reachable
        }
    };

    pool.choose(&mut *ctx.rng).copied()
}

/// Move one cell along the current facing. A wall or obstacle ahead is
/// sidestepped through the best other direction; with no way around, the
/// target is dropped so the next turn can choose again.
fn step_forward(agent: &mut Agent, ctx: &mut TurnContext<'_>) -> TurnAction {
    agent.status = AgentStatus::Moving;
    let from = agent.position;
    let to = from.step(agent.facing);

    let err = match ctx.grid.enter(to, &agent.id) {
        Ok(()) => return moved(agent, from, to),
        Err(err) => err,
    };

    if matches!(err, GridError::Obstructed { .. } | GridError::OutOfBounds { .. }) {
        match reroute(&agent.negotiation_party(), &*ctx.grid) {
            Some(direction) => {
                let side = from.step(direction);
                if ctx.grid.enter(side, &agent.id).is_ok() {
                    ctx.logger
                        .info(&format!("agent {} sidesteps {} around {}", agent.id, direction, to));
                    agent.facing = direction;
                    return moved(agent, from, side);
                }
            }
            None => {
                ctx.logger
                    .warn(&format!("agent {} is boxed in at {}, dropping its target", agent.id, from));
                agent.release_target();
            }
        }
    }

    if ctx.energy_policy == EnergyPolicy::ChargeOnAttempt {
        agent.energy -= 1;
    }
    TurnAction::Blocked(err)
}

fn moved(agent: &mut Agent, from: Position, to: Position) -> TurnAction {
    agent.position = to;
    agent.energy -= 1;
    agent.knowledge.mark_traversed(to);
    agent.gossip(Fact::add(FactKind::Traversed, vec![to]));
    TurnAction::Moved { from, to }
}

fn resolve_conflict(me: &mut Agent, opponent: &mut Agent, ctx: &mut TurnContext<'_>) -> TurnAction {
    let resolution = negotiate(&me.negotiation_party(), &opponent.negotiation_party(), &*ctx.grid);
    match resolution {
        Resolution::Proceed => step_forward(me, ctx),
        Resolution::Reroute(direction) => {
            ctx.logger.info(&format!(
                "agent {} reroutes {} around agent {}",
                me.id, direction, opponent.id
            ));
            me.facing = direction;
            step_forward(me, ctx)
        }
        Resolution::Defer(direction) => {
            ctx.logger.info(&format!(
                "agent {} waits while agent {} turns {}",
                me.id, opponent.id, direction
            ));
            opponent.facing = direction;
            opponent.accelerated = true;
            me.status = AgentStatus::Idle;
            TurnAction::Deferred {
                opponent: opponent.id.clone(),
                direction,
            }
        }
        Resolution::Hold => {
            me.status = AgentStatus::Idle;
            TurnAction::Held
        }
        Resolution::Unreachable => {
            let err = DecisionError::TargetUnreachable { position: me.position };
            ctx.logger.warn(&format!("agent {} idles: {}", me.id, err));
            me.status = AgentStatus::Idle;
            TurnAction::Unreachable
        }
    }
}
