use crate::common::{GridError, GridResult};
use crate::domains::grid::events::{GridEvent, GridEventKind};
use crate::domains::grid::types::{AgentId, CellState, Position, Terrain};
use std::collections::{BTreeMap, BTreeSet};

pub const DEFAULT_GRID_ID: &str = "grid";
pub const DEFAULT_DRIFT_PROBABILITY: f64 = 0.1;
pub const MAX_CELLS: usize = 1 << 22;

/// Number of cells of a `width x height` grid. `None` unless both sides are
/// positive and the product stays within [`MAX_CELLS`].
pub fn cell_count(width: i32, height: i32) -> Option<usize> {
    if width <= 0 || height <= 0 {
        return None;
    }
    width
        .checked_mul(height)
        .map(|cells| cells as usize)
        .filter(|cells| *cells <= MAX_CELLS)
}

/// The shared playing field. Every mutation goes through a command method
/// that validates, emits a [`GridEvent`] and applies it, so the journal of
/// uncommitted events always replays to the current state.
#[derive(Debug, Clone)]
pub struct Grid {
    pub id: String,
    pub(super) width: i32,
    pub(super) height: i32,
    pub(super) cells: Vec<CellState>,
    /// Hole position -> agent that filled it. `None` for open holes and for
    /// holes filled by a drifting orb.
    pub(super) holes: BTreeMap<Position, Option<AgentId>>,
    pub(super) orbs: BTreeSet<Position>,
    pub(super) occupants: BTreeMap<AgentId, Position>,
    pub(super) drift_probability: f64,
    pub(super) round: u64,
    pub version: u64,
    pub(super) uncommitted_events: Vec<GridEvent>,
}

impl Grid {
    /// Fails with `InvalidDimensions` unless [`cell_count`] accepts the size.
    pub fn new(width: i32, height: i32, drift_probability: f64) -> GridResult<Self> {
        let mut grid = Self::blank(DEFAULT_GRID_ID);
        grid.commit(GridEventKind::GridCreated {
            width,
            height,
            drift_probability,
        })?;
        Ok(grid)
    }

    /// A zero-sized grid, the starting point for journal replay.
    pub fn blank(id: &str) -> Self {
        Self {
            id: id.to_string(),
            width: 0,
            height: 0,
            cells: Vec::new(),
            holes: BTreeMap::new(),
            orbs: BTreeSet::new(),
            occupants: BTreeMap::new(),
            drift_probability: DEFAULT_DRIFT_PROBABILITY,
            round: 0,
            version: 0,
            uncommitted_events: Vec::new(),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn drift_probability(&self) -> f64 {
        self.drift_probability
    }

    /// Stamp subsequent events with the given round.
    pub fn set_round(&mut self, round: u64) {
        self.round = round;
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn is_valid_position(&self, position: Position) -> bool {
        position.x >= 0 && position.x < self.width && position.y >= 0 && position.y < self.height
    }

    /// In bounds and not an obstacle.
    pub fn is_passable(&self, position: Position) -> bool {
        self.cell_state(position)
            .map(|cell| cell.terrain != Terrain::Obstacle)
            .unwrap_or(false)
    }

    pub(super) fn index(&self, position: Position) -> GridResult<usize> {
        if !self.is_valid_position(position) {
            return Err(GridError::OutOfBounds { position });
        }
        Ok((position.y * self.width + position.x) as usize)
    }

    pub fn cell_state(&self, position: Position) -> GridResult<&CellState> {
        let index = self.index(position)?;
        Ok(&self.cells[index])
    }

    pub(super) fn cell_mut(&mut self, position: Position) -> GridResult<&mut CellState> {
        let index = self.index(position)?;
        Ok(&mut self.cells[index])
    }

    /// All cell positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Position::new(x, y)))
    }

    pub fn rows(&self) -> Vec<Vec<CellState>> {
        self.cells
            .chunks(self.width.max(1) as usize)
            .map(|row| row.to_vec())
            .collect()
    }

    pub fn agent_position(&self, agent_id: &str) -> Option<Position> {
        self.occupants.get(agent_id).copied()
    }

    pub fn orb_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.orbs.iter().copied()
    }

    pub fn orb_count(&self) -> usize {
        self.orbs.len()
    }

    pub fn hole_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.holes.keys().copied()
    }

    pub fn hole_count(&self) -> usize {
        self.holes.len()
    }

    pub fn filled_hole_count(&self) -> usize {
        self.holes
            .keys()
            .filter(|pos| {
                self.cell_state(**pos)
                    .map(|cell| cell.terrain == Terrain::FilledHole)
                    .unwrap_or(false)
            })
            .count()
    }

    /// Agent credited with filling the hole at `position`, if any.
    pub fn hole_filler(&self, position: Position) -> Option<&AgentId> {
        self.holes.get(&position).and_then(|filler| filler.as_ref())
    }

    pub fn holes_filled_by(&self, agent_id: &str) -> usize {
        self.holes
            .values()
            .filter(|filler| filler.as_deref() == Some(agent_id))
            .count()
    }

    /// Cells with empty terrain and nobody standing on them.
    pub fn free_positions(&self) -> Vec<Position> {
        self.positions()
            .filter(|pos| {
                self.cell_state(*pos)
                    .map(|cell| cell.terrain == Terrain::Empty && !cell.has_agent())
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Place initial terrain. Only allowed on an empty cell.
    pub fn seed_terrain(&mut self, position: Position, terrain: Terrain) -> GridResult<()> {
        let cell = self.cell_state(position)?;
        if cell.terrain != Terrain::Empty {
            return Err(GridError::Obstructed { position });
        }
        self.commit(GridEventKind::TerrainSeeded { position, terrain })
    }

    /// Move `agent_id` onto `position`, leaving its previous cell in the
    /// same step. Entering an occupied cell always fails.
    pub fn enter(&mut self, position: Position, agent_id: &str) -> GridResult<()> {
        let cell = self.cell_state(position)?;
        if cell.terrain == Terrain::Obstacle {
            return Err(GridError::Obstructed { position });
        }
        if let Some(occupant) = cell.occupant() {
            return Err(GridError::CellOccupied {
                position,
                occupant: occupant.clone(),
            });
        }
        let from = self.agent_position(agent_id);
        self.commit(GridEventKind::AgentEntered {
            agent_id: agent_id.to_string(),
            from,
            to: position,
        })
    }

    /// Remove the agent's label from its current cell.
    pub fn exit(&mut self, agent_id: &str) -> GridResult<()> {
        match self.agent_position(agent_id) {
            Some(from) => self.commit(GridEventKind::AgentExited {
                agent_id: agent_id.to_string(),
                from,
            }),
            None => Ok(()),
        }
    }

    pub(super) fn commit(&mut self, kind: GridEventKind) -> GridResult<()> {
        let event = GridEvent::new(&self.id, self.round, kind);
        self.apply_event(&event)?;
        self.version += 1;
        self.uncommitted_events.push(event);
        Ok(())
    }
}
