use crate::common::{EventEnvelope, EventStore};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory journal, one stream per aggregate id.
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    events: RwLock<HashMap<String, Vec<EventEnvelope>>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self {
            events: RwLock::new(HashMap::new()),
        }
    }

    pub async fn stream_len(&self, aggregate_id: &str) -> usize {
        self.events
            .read()
            .await
            .get(aggregate_id)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn append_events(
        &self,
        aggregate_id: &str,
        expected_version: u64,
        events: Vec<EventEnvelope>,
    ) -> Result<(), String> {
        let mut store = self.events.write().await;

        let stream = store.entry(aggregate_id.to_string()).or_default();

        let current_version = stream.len() as u64;
        if current_version != expected_version {
            return Err(format!(
                "Version mismatch on {}: expected {}, stream has {}",
                aggregate_id, expected_version, current_version
            ));
        }

        stream.extend(events);
        Ok(())
    }

    async fn load_events(
        &self,
        aggregate_id: &str,
        from_version: u64,
    ) -> Result<Vec<EventEnvelope>, String> {
        let store = self.events.read().await;

        Ok(store
            .get(aggregate_id)
            .map(|events| events.iter().skip(from_version as usize).cloned().collect())
            .unwrap_or_default())
    }

    async fn load_events_by_type(
        &self,
        event_type: &str,
        from_round: Option<u64>,
    ) -> Result<Vec<EventEnvelope>, String> {
        let store = self.events.read().await;

        let mut matching: Vec<EventEnvelope> = store
            .values()
            .flatten()
            .filter(|event| event.event_type == event_type)
            .filter(|event| from_round.map_or(true, |round| event.round >= round))
            .cloned()
            .collect();

        matching.sort_by_key(|event| (event.round, event.sequence));
        Ok(matching)
    }
}
