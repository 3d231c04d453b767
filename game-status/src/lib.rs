//! Game status classification for the chess client game lists
//!
//! Turns a synchronized snapshot of the user's games into display-ready
//! lists. Games are grouped into three blocks in fixed precedence:
//!
//! - **Your turn**: unresolved games waiting on the user
//! - **Opponent's turn**: unresolved games waiting on the opponent
//! - **Finished**: games with a win, loss or draw recorded
//!
//! Within a block, games keep the order the server delivered them in.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   snapshot   ┌─────────────────┐   view   ┌───────────┐
//! │  GameSource  │─────────────▶│ GameListService │─────────▶│ partition │
//! │ (injected)   │              │ (owns snapshot) │          │  engine   │
//! └──────────────┘              └─────────────────┘          └───────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use game_status::{GameListService, GameView, StaticGameSource};
//!
//! let source = Arc::new(StaticGameSource::from_json(&rows)?);
//! let service = GameListService::new(source);
//! service.start().await?;
//! let archived = service.view(GameView::Archived).await?;
//! ```

pub mod config;
pub mod field;
pub mod ingest;
pub mod partition;
pub mod record;
pub mod service;
pub mod status;
pub mod sync;

// Re-export main types
pub use config::{ConfigError, GameListConfig};
pub use field::{Field, ValueKind};
pub use ingest::{record_from_json, record_to_json, records_from_json};
pub use partition::{
    partition, partition_blocks, partition_by_concat, GameBlocks, GameView, ParseViewError,
    RecordFilter,
};
pub use record::{FieldValue, GameRecord, GameRecordBuilder, SchemaViolation};
pub use service::{GameListService, ServiceError};
pub use status::{
    classify, is_finished, is_opponents_turn, is_users_turn, outcome, Block, GameStatus, Outcome,
    Turn,
};
pub use sync::{GameSource, StaticGameSource, SyncError};
