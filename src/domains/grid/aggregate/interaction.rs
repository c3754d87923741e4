use super::Grid;
use crate::common::{GridError, GridResult};
use crate::domains::grid::events::GridEventKind;
use crate::domains::grid::types::{Direction, Position, Terrain};
use rand::Rng;

impl Grid {
    pub fn pick_item(&mut self, position: Position) -> GridResult<()> {
        let cell = self.cell_state(position)?;
        if cell.terrain != Terrain::Orb {
            return Err(GridError::NoItemHere { position });
        }
        self.commit(GridEventKind::OrbPicked { position })
    }

    /// Drop a carried orb into the hole at `position`, then let the
    /// remaining orbs drift.
    pub fn place_item<R: Rng + ?Sized>(
        &mut self,
        position: Position,
        agent_id: &str,
        carrying: bool,
        rng: &mut R,
    ) -> GridResult<()> {
        let cell = self.cell_state(position)?;
        if !carrying {
            return Err(GridError::NotCarrying {
                agent_id: agent_id.to_string(),
            });
        }
        if cell.terrain != Terrain::Hole {
            return Err(GridError::NoHoleHere { position });
        }
        self.commit(GridEventKind::OrbPlaced {
            position,
            agent_id: agent_id.to_string(),
        })?;
        self.drift_orbs(rng)
    }

    /// Knock the orb out of a filled hole and drop it on a random free cell.
    pub fn steal_item<R: Rng + ?Sized>(&mut self, position: Position, rng: &mut R) -> GridResult<()> {
        let cell = self.cell_state(position)?;
        if cell.terrain != Terrain::FilledHole {
            return Err(GridError::NoFilledHole { position });
        }
        let free = self.free_positions();
        if free.is_empty() {
            return Err(GridError::NoFreeCell);
        }
        let relocated_to = free[rng.gen_range(0..free.len())];
        self.commit(GridEventKind::OrbStolen {
            hole: position,
            relocated_to,
        })
    }

    /// Each live orb independently moves one step with probability
    /// `drift_probability`. Orbs and filled holes block; an open hole swallows
    /// the orb and becomes filled without a credited agent.
    pub fn drift_orbs<R: Rng + ?Sized>(&mut self, rng: &mut R) -> GridResult<()> {
        let orbs: Vec<Position> = self.orbs.iter().copied().collect();
        for orb in orbs {
            let direction = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];
            let roll: f64 = rng.gen();
            if roll >= self.drift_probability {
                continue;
            }

            let destination = orb.step(direction);
            let terrain = match self.cell_state(destination) {
                Ok(cell) => cell.terrain,
                Err(_) => continue,
            };
            match terrain {
                Terrain::Empty => self.commit(GridEventKind::OrbDrifted {
                    from: orb,
                    to: destination,
                })?,
                Terrain::Hole => self.commit(GridEventKind::HoleFilledByDrift {
                    from: orb,
                    hole: destination,
                })?,
                Terrain::Orb | Terrain::FilledHole | Terrain::Obstacle => continue,
            }
        }
        Ok(())
    }
}
