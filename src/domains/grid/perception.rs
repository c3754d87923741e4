//! Agent-centred field of view over the grid.

use super::aggregate::Grid;
use super::types::{CellState, Direction, Position};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewCell {
    /// Beyond the grid edge. Distinct from an empty cell.
    Outside,
    Visible(CellState),
}

impl ViewCell {
    pub fn cell(&self) -> Option<&CellState> {
        match self {
            ViewCell::Outside => None,
            ViewCell::Visible(cell) => Some(cell),
        }
    }
}

/// A square window of `size x size` cells centred on `center`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOfView {
    pub center: Position,
    pub size: usize,
    pub cells: Vec<Vec<ViewCell>>,
}

impl FieldOfView {
    pub fn radius(&self) -> i32 {
        (self.size / 2) as i32
    }

    fn top_left(&self) -> Position {
        Position::new(self.center.x - self.radius(), self.center.y - self.radius())
    }

    /// Cell at an absolute grid position, `None` when it lies outside the window.
    pub fn cell_at(&self, position: Position) -> Option<&ViewCell> {
        let origin = self.top_left();
        let row = position.y - origin.y;
        let col = position.x - origin.x;
        if row < 0 || col < 0 {
            return None;
        }
        self.cells.get(row as usize)?.get(col as usize)
    }

    pub fn front_cell(&self, facing: Direction) -> Option<&ViewCell> {
        self.cell_at(self.center.step(facing))
    }

    /// Agent standing directly ahead, if the window shows one.
    pub fn agent_in_front(&self, facing: Direction) -> Option<&str> {
        self.front_cell(facing)
            .and_then(ViewCell::cell)
            .and_then(CellState::occupant)
            .map(String::as_str)
    }

    /// Every window cell with its absolute position, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &ViewCell)> + '_ {
        let origin = self.top_left();
        self.cells.iter().enumerate().flat_map(move |(row, cells)| {
            cells.iter().enumerate().map(move |(col, cell)| {
                (Position::new(origin.x + col as i32, origin.y + row as i32), cell)
            })
        })
    }

    /// Visible in-bounds cells only.
    pub fn visible(&self) -> impl Iterator<Item = (Position, &CellState)> + '_ {
        self.iter()
            .filter_map(|(position, view)| view.cell().map(|cell| (position, cell)))
    }
}

/// Even sizes are rounded up so the agent sits in the centre.
pub fn normalize_field_of_view(field_of_view: usize) -> usize {
    if field_of_view % 2 == 0 {
        field_of_view.saturating_add(1)
    } else {
        field_of_view
    }
}

/// Window of `field_of_view` cells around `center`. The radius never exceeds
/// the longer grid side, since every cell past it would be `Outside` anyway.
pub fn surrounding(grid: &Grid, center: Position, field_of_view: usize) -> FieldOfView {
    let longest = grid.width().max(grid.height()).max(0) as usize;
    let radius = (normalize_field_of_view(field_of_view) / 2).min(longest);
    let size = radius * 2 + 1;
    let radius = radius as i32;

    let cells = (center.y - radius..=center.y + radius)
        .map(|y| {
            (center.x - radius..=center.x + radius)
                .map(|x| match grid.cell_state(Position::new(x, y)) {
                    Ok(cell) => ViewCell::Visible(cell.clone()),
                    Err(_) => ViewCell::Outside,
                })
                .collect()
        })
        .collect();

    FieldOfView {
        center,
        size,
        cells,
    }
}
