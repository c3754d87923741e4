use super::params::SimulationParams;
use crate::common::SetupError;
use crate::domains::agent::Agent;
use crate::domains::grid::{Grid, Position, Terrain};
use crate::domains::random::{uuid_from, RandomSource};
use rand::seq::SliceRandom;
use std::collections::BTreeSet;

pub(crate) struct Scenario {
    pub grid: Grid,
    pub agents: Vec<Agent>,
}

/// Lay out agents, obstacles, holes and orbs. Explicit placements claim
/// their cells first; random agents, holes and orbs fill the rest.
pub(crate) fn build_scenario(params: &SimulationParams, rng: &mut RandomSource) -> Result<Scenario, SetupError> {
    params.validate()?;

    let mut grid = Grid::new(params.width, params.height, params.drift_probability).map_err(|_| {
        SetupError::InvalidDimensions {
            width: params.width,
            height: params.height,
        }
    })?;
    let mut claimed = BTreeSet::new();

    for placement in &params.placements {
        claim(&grid, &mut claimed, placement.position())?;
    }
    for position in params.obstacles.iter().chain(&params.holes).chain(&params.orbs) {
        claim(&grid, &mut claimed, *position)?;
    }

    let terrain = params
        .obstacles
        .iter()
        .map(|p| (*p, Terrain::Obstacle))
        .chain(params.holes.iter().map(|p| (*p, Terrain::Hole)))
        .chain(params.orbs.iter().map(|p| (*p, Terrain::Orb)));
    for (position, kind) in terrain {
        grid.seed_terrain(position, kind)
            .map_err(|_| SetupError::DuplicatePlacement { position })?;
    }

    let mut agents = Vec::new();
    for placement in &params.placements {
        let position = placement.position();
        let agent = Agent::new(uuid_from(rng).to_string(), placement.team, position, params.energy);
        grid.enter(position, &agent.id)
            .map_err(|_| SetupError::DuplicatePlacement { position })?;
        agents.push(agent);
    }

    for quota in &params.teams {
        let present = agents.iter().filter(|a| a.team == quota.team).count();
        for placed in present..quota.min_agents {
            let free = grid.free_positions();
            let Some(position) = free.choose(rng).copied() else {
                return Err(SetupError::NotEnoughAgentCells {
                    team: quota.team,
                    missing: quota.min_agents - placed,
                });
            };
            let agent = Agent::new(uuid_from(rng).to_string(), quota.team, position, params.energy);
            grid.enter(position, &agent.id)
                .map_err(|_| SetupError::DuplicatePlacement { position })?;
            agents.push(agent);
        }
    }

    let extra_holes = params.hole_count.saturating_sub(params.holes.len());
    let extra_orbs = params.orb_count.saturating_sub(params.orbs.len());
    let mut available = grid.free_positions();
    if extra_holes + extra_orbs > available.len() {
        return Err(SetupError::NotEnoughCells {
            requested: extra_holes + extra_orbs,
            available: available.len(),
        });
    }
    available.shuffle(rng);

    let mut available = available.into_iter();
    for position in available.by_ref().take(extra_holes) {
        grid.seed_terrain(position, Terrain::Hole)
            .map_err(|_| SetupError::DuplicatePlacement { position })?;
    }
    for position in available.take(extra_orbs) {
        grid.seed_terrain(position, Terrain::Orb)
            .map_err(|_| SetupError::DuplicatePlacement { position })?;
    }

    Ok(Scenario { grid, agents })
}

fn claim(grid: &Grid, claimed: &mut BTreeSet<Position>, position: Position) -> Result<(), SetupError> {
    if !grid.is_valid_position(position) {
        return Err(SetupError::PlacementOutOfBounds { position });
    }
    if !claimed.insert(position) {
        return Err(SetupError::DuplicatePlacement { position });
    }
    Ok(())
}
