use crate::common::{EventEnvelope, EventStore};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Journal on disk in JSON Lines format, one `<aggregate_id>.jsonl` file
/// per stream. Lets a finished run be inspected or replayed later.
pub struct FileEventStore {
    base_path: PathBuf,
}

impl FileEventStore {
    pub fn new<P: Into<PathBuf>>(base_path: P) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn get_file_path(&self, aggregate_id: &str) -> PathBuf {
        self.base_path.join(format!("{}.jsonl", aggregate_id))
    }

    async fn ensure_base_dir(&self) -> Result<(), String> {
        tokio::fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| format!("Failed to create event store directory: {}", e))
    }

    async fn read_stream(path: &Path) -> Result<Vec<EventEnvelope>, String> {
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Ok(Vec::new());
        }

        let file = File::open(path)
            .await
            .map_err(|e| format!("Failed to open event file {}: {}", path.display(), e))?;

        let mut lines = BufReader::new(file).lines();
        let mut events = Vec::new();
        let mut line_number = 0u64;

        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| format!("Failed to read line: {}", e))?
        {
            line_number += 1;
            if line.trim().is_empty() {
                continue;
            }
            let event: EventEnvelope = serde_json::from_str(&line).map_err(|e| {
                format!(
                    "Failed to deserialize event at {}:{}: {}",
                    path.display(),
                    line_number,
                    e
                )
            })?;
            events.push(event);
        }

        Ok(events)
    }
}

#[async_trait]
impl EventStore for FileEventStore {
    async fn append_events(
        &self,
        aggregate_id: &str,
        expected_version: u64,
        events: Vec<EventEnvelope>,
    ) -> Result<(), String> {
        self.ensure_base_dir().await?;

        let file_path = self.get_file_path(aggregate_id);
        let current_version = Self::read_stream(&file_path).await?.len() as u64;
        if current_version != expected_version {
            return Err(format!(
                "Version mismatch on {}: expected {}, stream has {}",
                aggregate_id, expected_version, current_version
            ));
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file_path)
            .await
            .map_err(|e| format!("Failed to open event file {}: {}", file_path.display(), e))?;

        for event in events {
            let json_line = serde_json::to_string(&event)
                .map_err(|e| format!("Failed to serialize event: {}", e))?;

            file.write_all(json_line.as_bytes())
                .await
                .map_err(|e| format!("Failed to write event: {}", e))?;
            file.write_all(b"\n")
                .await
                .map_err(|e| format!("Failed to write newline: {}", e))?;
        }

        file.flush()
            .await
            .map_err(|e| format!("Failed to flush file: {}", e))?;

        Ok(())
    }

    async fn load_events(
        &self,
        aggregate_id: &str,
        from_version: u64,
    ) -> Result<Vec<EventEnvelope>, String> {
        let events = Self::read_stream(&self.get_file_path(aggregate_id)).await?;
        Ok(events.into_iter().skip(from_version as usize).collect())
    }

    async fn load_events_by_type(
        &self,
        event_type: &str,
        from_round: Option<u64>,
    ) -> Result<Vec<EventEnvelope>, String> {
        self.ensure_base_dir().await?;

        let mut matching = Vec::new();
        let mut dir = tokio::fs::read_dir(&self.base_path)
            .await
            .map_err(|e| format!("Failed to read directory: {}", e))?;

        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| format!("Failed to read directory entry: {}", e))?
        {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("jsonl") {
                continue;
            }
            matching.extend(
                Self::read_stream(&path)
                    .await?
                    .into_iter()
                    .filter(|event| event.event_type == event_type)
                    .filter(|event| from_round.map_or(true, |round| event.round >= round)),
            );
        }

        matching.sort_by_key(|event| (event.round, event.sequence));
        Ok(matching)
    }
}
