use crate::domains::grid::Position;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejections of grid primitives. Every one of these is an expected outcome
/// of normal play and is consumed by the decision engine.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GridError {
    #[error("Grid of {width}x{height} cells cannot be allocated")]
    InvalidDimensions { width: i32, height: i32 },

    #[error("Position {position} is outside the grid")]
    OutOfBounds { position: Position },

    #[error("Cell {position} is already occupied by {occupant}")]
    CellOccupied { position: Position, occupant: String },

    #[error("Cell {position} is obstructed")]
    Obstructed { position: Position },

    #[error("No orb at {position}")]
    NoItemHere { position: Position },

    #[error("No open hole at {position}")]
    NoHoleHere { position: Position },

    #[error("Agent {agent_id} is not carrying an orb")]
    NotCarrying { agent_id: String },

    #[error("No filled hole at {position}")]
    NoFilledHole { position: Position },

    #[error("No free cell left to relocate an orb")]
    NoFreeCell,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecisionError {
    #[error("Every direction out of {position} is blocked")]
    TargetUnreachable { position: Position },
}

/// Failures of an external decision policy. They never abort a round; the
/// engine falls back to the nearest-target algorithm.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    #[error("Policy unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Policy proposed {proposed}, which is not adjacent to {position}")]
    NotAdjacent { position: Position, proposed: Position },

    #[error("Policy proposed {proposed}, which is outside the grid")]
    OutOfBounds { proposed: Position },
}

/// Contract violations detected while building a scenario. These are the
/// only fatal errors and are raised before any round runs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SetupError {
    #[error("Grid dimensions must be positive and bounded, got {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },

    #[error("Field of view must be positive, got {0}")]
    InvalidFieldOfView(i32),

    #[error("Initial energy must be positive, got {0}")]
    InvalidEnergy(i32),

    #[error("Drift probability must be within [0, 1], got {0}")]
    InvalidDriftProbability(f64),

    #[error("Placement {position} is outside the grid")]
    PlacementOutOfBounds { position: Position },

    #[error("Position {position} is claimed twice")]
    DuplicatePlacement { position: Position },

    #[error("Requested {requested} holes and orbs but only {available} free cells remain")]
    NotEnoughCells { requested: usize, available: usize },

    #[error("Cannot place {missing} more agents for team {team}: grid is full")]
    NotEnoughAgentCells { team: u32, missing: usize },
}

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Aggregate not found: {id}")]
    AggregateNotFound { id: String },

    #[error("Invalid command: {reason}")]
    InvalidCommand { reason: String },

    #[error("Grid rejected the command: {0}")]
    Grid(#[from] GridError),

    #[error("Scenario setup failed: {0}")]
    Setup(#[from] SetupError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Event store error: {0}")]
    EventStore(String),

    #[error("Configuration error: {0}")]
    Configuration(#[from] anyhow::Error),
}

impl From<SetupError> for ApplicationError {
    fn from(err: SetupError) -> Self {
        ApplicationError::Domain(DomainError::Setup(err))
    }
}

pub type GridResult<T> = Result<T, GridError>;
pub type DomainResult<T> = Result<T, DomainError>;
pub type ApplicationResult<T> = Result<T, ApplicationError>;
