use super::gossip::{Fact, FactKind, Sign};
use crate::domains::grid::{FieldOfView, Position, Terrain};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// What one agent believes about the grid. Orbs and holes keep discovery
/// order because nearest-target ties go to the first one found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeStore {
    orbs: Vec<Position>,
    holes: Vec<Position>,
    filled_holes: BTreeSet<Position>,
    visited: BTreeSet<Position>,
    traversed: BTreeSet<Position>,
    locked: BTreeSet<Position>,
}

impl KnowledgeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn known_orbs(&self) -> &[Position] {
        &self.orbs
    }

    pub fn known_holes(&self) -> &[Position] {
        &self.holes
    }

    pub fn filled_holes(&self) -> &BTreeSet<Position> {
        &self.filled_holes
    }

    pub fn visited(&self) -> &BTreeSet<Position> {
        &self.visited
    }

    pub fn traversed(&self) -> &BTreeSet<Position> {
        &self.traversed
    }

    pub fn locked(&self) -> &BTreeSet<Position> {
        &self.locked
    }

    pub fn knows_orb(&self, position: Position) -> bool {
        self.orbs.contains(&position)
    }

    pub fn knows_hole(&self, position: Position) -> bool {
        self.holes.contains(&position)
    }

    pub fn is_locked(&self, position: Position) -> bool {
        self.locked.contains(&position)
    }

    /// Merge everything visible in `view` and return the new facts.
    pub fn observe(&mut self, view: &FieldOfView) -> Vec<Fact> {
        let mut visited = Vec::new();
        let mut new_orbs = Vec::new();
        let mut gone_orbs = Vec::new();
        let mut new_holes = Vec::new();
        let mut reopened = Vec::new();
        let mut new_filled = Vec::new();

        for (position, cell) in view.visible() {
            if self.visited.insert(position) {
                visited.push(position);
            }

            match cell.terrain {
                Terrain::Orb => {
                    if push_unique(&mut self.orbs, position) {
                        new_orbs.push(position);
                    }
                }
                Terrain::Hole => {
                    // a filled hole seen open again was emptied by a steal
                    if self.filled_holes.remove(&position) {
                        reopened.push(position);
                    }
                    if push_unique(&mut self.holes, position) {
                        new_holes.push(position);
                    }
                }
                Terrain::FilledHole => {
                    let was_open = remove_all(&mut self.holes, &[position]);
                    if self.filled_holes.insert(position) || was_open {
                        new_filled.push(position);
                    }
                }
                Terrain::Empty | Terrain::Obstacle => {}
            }

            if cell.terrain != Terrain::Orb && remove_all(&mut self.orbs, &[position]) {
                gone_orbs.push(position);
            }
        }

        [
            Fact::add(FactKind::Visited, visited),
            Fact::add(FactKind::Orb, new_orbs),
            Fact::remove(FactKind::Orb, gone_orbs),
            Fact::add(FactKind::Hole, new_holes),
            Fact::remove(FactKind::FilledHole, reopened),
            Fact::add(FactKind::FilledHole, new_filled),
        ]
        .into_iter()
        .filter(|fact| !fact.positions.is_empty())
        .collect()
    }

    /// Idempotent merge of a fact, local or gossiped.
    pub fn apply(&mut self, fact: &Fact) {
        let positions = fact.positions.as_slice();
        match (fact.kind, fact.sign) {
            (FactKind::Orb, Sign::Add) => {
                for position in positions {
                    push_unique(&mut self.orbs, *position);
                }
            }
            (FactKind::Orb, Sign::Remove) => {
                remove_all(&mut self.orbs, positions);
            }
            (FactKind::Hole, Sign::Add) => {
                for position in positions {
                    push_unique(&mut self.holes, *position);
                }
            }
            (FactKind::Hole, Sign::Remove) => {
                remove_all(&mut self.holes, positions);
            }
            (FactKind::FilledHole, Sign::Add) => {
                remove_all(&mut self.holes, positions);
                self.filled_holes.extend(positions.iter().copied());
            }
            (FactKind::FilledHole, Sign::Remove) => subtract(&mut self.filled_holes, positions),
            (FactKind::Lock, Sign::Add) => self.locked.extend(positions.iter().copied()),
            (FactKind::Lock, Sign::Remove) => subtract(&mut self.locked, positions),
            (FactKind::Visited, Sign::Add) => self.visited.extend(positions.iter().copied()),
            (FactKind::Visited, Sign::Remove) => subtract(&mut self.visited, positions),
            (FactKind::Traversed, Sign::Add) => self.traversed.extend(positions.iter().copied()),
            (FactKind::Traversed, Sign::Remove) => subtract(&mut self.traversed, positions),
        }
    }

    pub fn lock(&mut self, position: Position) -> bool {
        self.locked.insert(position)
    }

    pub fn unlock(&mut self, position: Position) -> bool {
        self.locked.remove(&position)
    }

    pub fn mark_traversed(&mut self, position: Position) -> bool {
        self.traversed.insert(position)
    }

    /// Picked up by this agent.
    pub fn forget_orb(&mut self, position: Position) -> bool {
        remove_all(&mut self.orbs, &[position])
    }

    /// Filled by this agent.
    pub fn mark_filled(&mut self, position: Position) {
        remove_all(&mut self.holes, &[position]);
        self.filled_holes.insert(position);
    }

    /// Emptied by this agent's steal.
    pub fn mark_reopened(&mut self, position: Position) {
        self.filled_holes.remove(&position);
        push_unique(&mut self.holes, position);
    }

    /// Render the beliefs as a `width x height` map, used as the input of
    /// external decision policies.
    pub fn memory_map(&self, width: i32, height: i32, me: Position) -> MemoryMap {
        let rows = (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| {
                        let position = Position::new(x, y);
                        let belief = if self.filled_holes.contains(&position) {
                            Belief::FilledHole
                        } else if self.holes.contains(&position) {
                            Belief::Hole
                        } else if self.orbs.contains(&position) {
                            Belief::Orb
                        } else if self.visited.contains(&position) {
                            Belief::Empty
                        } else {
                            Belief::Unknown
                        };
                        MemoryCell {
                            belief,
                            me: position == me,
                        }
                    })
                    .collect()
            })
            .collect();
        MemoryMap { rows }
    }
}

fn push_unique(list: &mut Vec<Position>, position: Position) -> bool {
    if list.contains(&position) {
        return false;
    }
    list.push(position);
    true
}

fn remove_all(list: &mut Vec<Position>, positions: &[Position]) -> bool {
    let before = list.len();
    list.retain(|p| !positions.contains(p));
    list.len() != before
}

fn subtract(set: &mut BTreeSet<Position>, positions: &[Position]) {
    for position in positions {
        set.remove(position);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Belief {
    Unknown,
    Empty,
    Orb,
    Hole,
    FilledHole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryCell {
    pub belief: Belief,
    pub me: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryMap {
    pub rows: Vec<Vec<MemoryCell>>,
}

impl MemoryMap {
    pub fn get(&self, position: Position) -> Option<&MemoryCell> {
        if position.x < 0 || position.y < 0 {
            return None;
        }
        self.rows.get(position.y as usize)?.get(position.x as usize)
    }
}

impl fmt::Display for MemoryMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            let line: Vec<String> = row
                .iter()
                .map(|cell| {
                    let label = match cell.belief {
                        Belief::Unknown => "-",
                        Belief::Empty => "empty",
                        Belief::Orb => "orb",
                        Belief::Hole => "hole",
                        Belief::FilledHole => "filled",
                    };
                    if cell.me {
                        format!("[{:<6}]", format!("{label}+me"))
                    } else {
                        format!("[{label:<6}]")
                    }
                })
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
