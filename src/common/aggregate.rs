use crate::common::{DomainEvent, DomainResult};
use serde::{Deserialize, Serialize};

/// State that is changed only by its own journal events. Commands push the
/// events they produce onto a pending list, which the journal writer drains
/// with [`AggregateRoot::mark_events_as_committed`] once they are stored.
pub trait AggregateRoot: Send + Sync + Clone {
    type Event: DomainEvent + Serialize + for<'de> Deserialize<'de>;

    fn aggregate_id(&self) -> &str;

    /// Number of events applied so far, replayed or live.
    fn version(&self) -> u64;

    fn apply(&mut self, event: &Self::Event) -> DomainResult<()>;

    fn uncommitted_events(&self) -> &[Self::Event];

    fn mark_events_as_committed(&mut self);
}

/// Replay cursor: an aggregate plus the count of journal entries folded
/// into it. A replay stops at the first event that does not apply.
#[derive(Debug, Clone)]
pub struct AggregateStore<T: AggregateRoot> {
    pub aggregate: T,
    pub version: u64,
}

impl<T: AggregateRoot> AggregateStore<T> {
    pub fn new(aggregate: T) -> Self {
        let version = aggregate.version();
        Self { aggregate, version }
    }

    pub fn load_from_history(blank: T, journal: Vec<T::Event>) -> DomainResult<Self> {
        let mut replay = Self::new(blank);
        for event in &journal {
            replay.fold(event)?;
        }
        Ok(replay)
    }

    /// Apply one more journal entry.
    pub fn fold(&mut self, event: &T::Event) -> DomainResult<()> {
        self.aggregate.apply(event)?;
        self.version += 1;
        Ok(())
    }

    pub fn into_inner(self) -> T {
        self.aggregate
    }
}
