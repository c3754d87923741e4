pub mod agent;
pub mod grid;
pub mod logger;
pub mod random;
pub mod simulation;

pub use logger::*;
