pub mod aggregate;
pub mod events;
pub mod perception;
pub mod types;

pub use aggregate::*;
pub use events::*;
pub use perception::*;
pub use types::*;
