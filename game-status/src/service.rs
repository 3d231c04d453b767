//! GameListService - composes a game source with the partition engine.
//!
//! The service owns the client's cached snapshot. It is constructed with an
//! injected [`GameSource`], started once, refreshed after every sync and shut
//! down explicitly; views are always computed from a whole snapshot.

use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tracing::{debug, info, warn};

use crate::config::GameListConfig;
use crate::partition::{partition, partition_blocks, GameBlocks, GameView};
use crate::record::{GameRecord, SchemaViolation};
use crate::status::classify;
use crate::sync::{GameSource, SyncError};

/// Error types for the service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Service not started, or already shut down
    #[error("Service not started - call start() first")]
    NotStarted,

    /// Fetching from the game source failed
    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    /// A record does not fit the field registry
    #[error("Schema violation: {0}")]
    Schema(#[from] SchemaViolation),

    /// Two records in one snapshot share a game ID
    #[error("Duplicate game ID in snapshot: {0}")]
    DuplicateGameId(String),
}

impl ServiceError {
    /// Message for the list surface. Malformed data is never rendered
    /// partially.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NotStarted => "Games are still loading",
            Self::Sync(SyncError::Malformed(_)) | Self::Schema(_) | Self::DuplicateGameId(_) => {
                "Unable to display games"
            }
            Self::Sync(_) => "Unable to reach the game server",
        }
    }
}

/// Holds the synchronized snapshot and serves ordered game lists.
pub struct GameListService {
    /// Configuration
    config: GameListConfig,
    /// Injected sync collaborator
    source: Arc<dyn GameSource>,
    /// Current snapshot, replaced wholesale on refresh
    snapshot: Arc<RwLock<Option<Arc<Vec<GameRecord>>>>>,
}

impl GameListService {
    /// Create a new service over the given source.
    pub fn new(source: Arc<dyn GameSource>) -> Self {
        Self {
            config: GameListConfig::default(),
            source,
            snapshot: Arc::new(RwLock::new(None)),
        }
    }

    /// Create with configuration.
    pub fn with_config(mut self, config: GameListConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &GameListConfig {
        &self.config
    }

    /// Load the first snapshot. The service serves views only after this
    /// succeeds.
    pub async fn start(&self) -> Result<(), ServiceError> {
        info!(source = %self.source.name(), "Starting GameListService");

        let records = self.load().await?;
        let count = records.len();
        *self.snapshot.write().await = Some(Arc::new(records));

        info!(games = count, "GameListService started");
        Ok(())
    }

    /// Check if the service holds a snapshot.
    pub async fn is_started(&self) -> bool {
        self.snapshot.read().await.is_some()
    }

    /// Fetch a fresh snapshot and swap it in.
    ///
    /// On failure the previous snapshot stays in place.
    pub async fn refresh(&self) -> Result<usize, ServiceError> {
        if !self.is_started().await {
            return Err(ServiceError::NotStarted);
        }

        let records = self.load().await?;
        let count = records.len();

        let mut guard = self.snapshot.write().await;
        // shutdown() may have run while we were fetching.
        if guard.is_none() {
            return Err(ServiceError::NotStarted);
        }
        *guard = Some(Arc::new(records));

        info!(games = count, "Game snapshot refreshed");
        Ok(count)
    }

    /// Games for `view`, ordered user's turn, opponent's turn, finished.
    pub async fn view(&self, view: GameView) -> Result<Vec<GameRecord>, ServiceError> {
        let snapshot = self.current().await?;
        let ordered = partition(&snapshot, view)?;
        Ok(ordered.into_iter().cloned().collect())
    }

    /// Games for `view`, kept as separate blocks.
    pub async fn blocks(&self, view: GameView) -> Result<GameBlocks<GameRecord>, ServiceError> {
        let snapshot = self.current().await?;
        let blocks = partition_blocks(&snapshot, view)?;
        Ok(blocks.cloned())
    }

    /// Games for the configured default view.
    pub async fn default_view(&self) -> Result<Vec<GameRecord>, ServiceError> {
        self.view(self.config.default_view).await
    }

    /// Refresh on the configured interval until `shutdown` flips to true
    /// or its sender is dropped.
    pub async fn run_refresh_loop(&self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.config.refresh_interval());
        // First tick completes immediately; start() already loaded.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.refresh().await {
                        Ok(_) => {}
                        Err(ServiceError::NotStarted) => break,
                        Err(e) => warn!(error = %e, "Game refresh failed, keeping previous snapshot"),
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        debug!("Refresh loop stopped");
    }

    /// Drop the snapshot. Views fail with [`ServiceError::NotStarted`]
    /// until the service is started again.
    pub async fn shutdown(&self) {
        *self.snapshot.write().await = None;
        info!("GameListService shut down");
    }

    async fn current(&self) -> Result<Arc<Vec<GameRecord>>, ServiceError> {
        self.snapshot
            .read()
            .await
            .as_ref()
            .map(Arc::clone)
            .ok_or(ServiceError::NotStarted)
    }

    /// Fetch and validate a complete snapshot.
    async fn load(&self) -> Result<Vec<GameRecord>, ServiceError> {
        let records = self.source.fetch().await?;

        for record in &records {
            record.validate()?;
            classify(record)?;
        }

        if self.config.reject_duplicate_ids {
            let mut seen = HashSet::with_capacity(records.len());
            for record in &records {
                let id = record.game_id()?;
                if !seen.insert(id) {
                    return Err(ServiceError::DuplicateGameId(id.to_string()));
                }
            }
        }

        debug!(source = %self.source.name(), games = records.len(), "Fetched game snapshot");
        Ok(records)
    }
}
