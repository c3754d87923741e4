pub mod aggregate;
pub mod decision;
pub mod gossip;
pub mod knowledge;
pub mod negotiation;
pub mod policy;

pub use aggregate::*;
pub use decision::*;
pub use gossip::*;
pub use knowledge::*;
pub use negotiation::*;
pub use policy::*;
