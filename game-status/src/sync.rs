//! Source of synchronized game snapshots.
//!
//! The client talks to the chess server through a sync collaborator that is
//! injected into [`crate::GameListService`]. This module defines the seam;
//! the network implementation lives with the client's connection code.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::ingest::records_from_json;
use crate::record::{GameRecord, SchemaViolation};

/// Error types for fetching a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Server is not reachable
    #[error("Game source unavailable: {0}")]
    Unavailable(String),

    /// The fetch itself failed
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// The server returned rows that do not fit the field registry
    #[error("Malformed game data: {0}")]
    Malformed(#[from] SchemaViolation),
}

/// Supplies complete, consistent snapshots of the user's games.
///
/// Implementations must never hand out a record that is mid-update; each
/// call returns a whole snapshot in server order.
#[async_trait]
pub trait GameSource: Send + Sync {
    /// Fetch the current snapshot.
    async fn fetch(&self) -> Result<Vec<GameRecord>, SyncError>;

    /// Check if the source can currently be reached.
    async fn is_available(&self) -> bool;

    /// Name for log fields.
    fn name(&self) -> &str;
}

/// In-memory game source.
///
/// Serves whatever snapshot it was last given. Used for offline rendering
/// from a cached snapshot file and in tests.
pub struct StaticGameSource {
    records: Arc<RwLock<Vec<GameRecord>>>,
    available: Arc<RwLock<bool>>,
}

impl StaticGameSource {
    /// Create a source serving `records`.
    pub fn new(records: Vec<GameRecord>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
            available: Arc::new(RwLock::new(true)),
        }
    }

    /// Create a source from a JSON array of server rows.
    pub fn from_json(rows: &serde_json::Value) -> Result<Self, SchemaViolation> {
        Ok(Self::new(records_from_json(rows)?))
    }

    /// Replace the whole snapshot.
    pub async fn replace(&self, records: Vec<GameRecord>) {
        let mut guard = self.records.write().await;
        *guard = records;
    }

    /// Simulate losing or regaining the connection.
    pub async fn set_available(&self, available: bool) {
        let mut guard = self.available.write().await;
        *guard = available;
    }
}

impl Default for StaticGameSource {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl GameSource for StaticGameSource {
    async fn fetch(&self) -> Result<Vec<GameRecord>, SyncError> {
        if !self.is_available().await {
            return Err(SyncError::Unavailable("static source offline".to_string()));
        }
        Ok(self.records.read().await.clone())
    }

    async fn is_available(&self) -> bool {
        *self.available.read().await
    }

    fn name(&self) -> &str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_static_source() {
        let source = StaticGameSource::from_json(&json!([
            { "game_id": "1", "archived": 0, "state": 1, "user_won": 0, "user_lost": 0, "drawn": 0 }
        ]))
        .unwrap();

        assert_eq!(source.fetch().await.unwrap().len(), 1);

        source.replace(Vec::new()).await;
        assert!(source.fetch().await.unwrap().is_empty());

        source.set_available(false).await;
        assert!(matches!(source.fetch().await, Err(SyncError::Unavailable(_))));
    }

    #[test]
    fn test_from_json_rejects_bad_rows() {
        let result = StaticGameSource::from_json(&json!([{ "game_id": "1" }]));
        assert!(matches!(result, Err(SchemaViolation::MalformedRow { index: 0, .. })));

        let empty = StaticGameSource::default();
        let records = tokio_test::block_on(empty.fetch()).unwrap();
        assert!(records.is_empty());
        assert_eq!(empty.name(), "static");
    }
}
