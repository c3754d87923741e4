pub mod params;
pub mod projections;
pub mod scheduler;
pub mod setup;
pub mod snapshot;

pub use params::*;
pub use projections::*;
pub use scheduler::*;
pub use snapshot::*;
