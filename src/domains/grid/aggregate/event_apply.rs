use super::{cell_count, Grid};
use crate::common::{AggregateRoot, DomainResult, GridError, GridResult};
use crate::domains::grid::events::{GridEvent, GridEventKind};
use crate::domains::grid::types::{CellState, Terrain};

impl Grid {
	pub(super) fn apply_event(&mut self, event: &GridEvent) -> GridResult<()> {
		match &event.kind {
			GridEventKind::GridCreated { width, height, drift_probability } => {
				let cells = cell_count(*width, *height).ok_or(GridError::InvalidDimensions {
					width: *width,
					height: *height,
				})?;
				self.width = *width;
				self.height = *height;
				self.drift_probability = *drift_probability;
				self.cells = vec![CellState::default(); cells];
				self.holes.clear();
				self.orbs.clear();
				self.occupants.clear();
			}
			GridEventKind::TerrainSeeded { position, terrain } => {
				self.cell_mut(*position)?.terrain = *terrain;
				match terrain {
					Terrain::Hole => {
						self.holes.insert(*position, None);
					}
					Terrain::Orb => {
						self.orbs.insert(*position);
					}
					_ => {}
				}
			}
			GridEventKind::AgentEntered { agent_id, from, to } => {
				// validate the destination before touching the old cell
				self.index(*to)?;
				if let Some(from) = from {
					self.cell_mut(*from)?.remove_agent(agent_id);
				}
				self.cell_mut(*to)?.add_agent(agent_id);
				self.occupants.insert(agent_id.clone(), *to);
			}
			GridEventKind::AgentExited { agent_id, from } => {
				self.cell_mut(*from)?.remove_agent(agent_id);
				self.occupants.remove(agent_id);
			}
			GridEventKind::OrbPicked { position } => {
				self.cell_mut(*position)?.terrain = Terrain::Empty;
				self.orbs.remove(position);
			}
			GridEventKind::OrbPlaced { position, agent_id } => {
				self.cell_mut(*position)?.terrain = Terrain::FilledHole;
				self.holes.insert(*position, Some(agent_id.clone()));
			}
			GridEventKind::OrbDrifted { from, to } => {
				self.cell_mut(*from)?.terrain = Terrain::Empty;
				self.cell_mut(*to)?.terrain = Terrain::Orb;
				self.orbs.remove(from);
				self.orbs.insert(*to);
			}
			GridEventKind::HoleFilledByDrift { from, hole } => {
				self.cell_mut(*from)?.terrain = Terrain::Empty;
				self.cell_mut(*hole)?.terrain = Terrain::FilledHole;
				self.orbs.remove(from);
				self.holes.insert(*hole, None);
			}
			GridEventKind::OrbStolen { hole, relocated_to } => {
				self.cell_mut(*hole)?.terrain = Terrain::Hole;
				self.cell_mut(*relocated_to)?.terrain = Terrain::Orb;
				self.holes.insert(*hole, None);
				self.orbs.insert(*relocated_to);
			}
		}
		Ok(())
	}
}

impl AggregateRoot for Grid {
	type Event = GridEvent;

	fn aggregate_id(&self) -> &str { &self.id }
	fn version(&self) -> u64 { self.version }
	fn apply(&mut self, event: &Self::Event) -> DomainResult<()> {
		self.apply_event(event)?;
		self.version += 1;
		Ok(())
	}
	fn uncommitted_events(&self) -> &[Self::Event] {
		&self.uncommitted_events
	}
	fn mark_events_as_committed(&mut self) {
		self.uncommitted_events.clear();
	}
}
