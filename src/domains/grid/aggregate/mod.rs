pub mod event_apply;
pub mod grid;
pub mod interaction;

pub use grid::*;
