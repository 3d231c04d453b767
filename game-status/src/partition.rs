//! Classification and stable partitioning of game lists.
//!
//! Given the client's snapshot in server order and a view filter, produces
//! the games to display as three contiguous blocks: the user's turn, then
//! the opponent's turn, then finished games. Each block keeps the relative
//! order the games had in the snapshot.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::record::{GameRecord, SchemaViolation};
use crate::status::{classify, is_finished, is_opponents_turn, is_users_turn, Block};

/// Predicate selecting which records a list shows.
pub trait RecordFilter {
    fn matches(&self, record: &GameRecord) -> Result<bool, SchemaViolation>;
}

impl<F> RecordFilter for F
where
    F: Fn(&GameRecord) -> Result<bool, SchemaViolation>,
{
    fn matches(&self, record: &GameRecord) -> Result<bool, SchemaViolation> {
        self(record)
    }
}

/// The game lists a client shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameView {
    /// Games not yet archived
    #[default]
    Active,
    /// Archived games
    Archived,
    /// Everything in the snapshot
    All,
}

impl GameView {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Archived => "archived",
            Self::All => "all",
        }
    }
}

impl RecordFilter for GameView {
    fn matches(&self, record: &GameRecord) -> Result<bool, SchemaViolation> {
        match self {
            Self::Active => Ok(!record.is_archived()?),
            Self::Archived => record.is_archived(),
            Self::All => Ok(true),
        }
    }
}

impl fmt::Display for GameView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized view name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown view `{0}` (expected active, archived or all)")]
pub struct ParseViewError(String);

impl FromStr for GameView {
    type Err = ParseViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "archived" => Ok(Self::Archived),
            "all" => Ok(Self::All),
            _ => Err(ParseViewError(s.to_string())),
        }
    }
}

/// Order the records passing `filter` as user's turn, opponent's turn,
/// finished, each block stable with respect to `records`.
///
/// Single pass with one insertion cursor per block: each cursor marks the
/// end of its block in the output built so far. A malformed record aborts
/// the whole call; no partial list is returned.
pub fn partition<'a, F>(
    records: &'a [GameRecord],
    filter: F,
) -> Result<Vec<&'a GameRecord>, SchemaViolation>
where
    F: RecordFilter,
{
    let mut ordered = Vec::new();
    let (mut u_pos, mut o_pos, mut f_pos) = (0usize, 0usize, 0usize);

    for record in records {
        if !filter.matches(record)? {
            continue;
        }
        match classify(record)?.block() {
            Block::UsersTurn => {
                ordered.insert(u_pos, record);
                u_pos += 1;
                o_pos += 1;
                f_pos += 1;
            }
            Block::OpponentsTurn => {
                ordered.insert(o_pos, record);
                o_pos += 1;
                f_pos += 1;
            }
            Block::Finished => {
                ordered.insert(f_pos, record);
                f_pos += 1;
            }
        }
    }

    debug!(
        total = records.len(),
        users_turn = u_pos,
        opponents_turn = o_pos - u_pos,
        finished = f_pos - o_pos,
        "Partitioned game list"
    );

    Ok(ordered)
}

/// Same result as [`partition`], computed as three stable filters
/// concatenated.
pub fn partition_by_concat<'a, F>(
    records: &'a [GameRecord],
    filter: F,
) -> Result<Vec<&'a GameRecord>, SchemaViolation>
where
    F: RecordFilter,
{
    let predicates: [fn(&GameRecord) -> Result<bool, SchemaViolation>; 3] =
        [is_users_turn, is_opponents_turn, is_finished];

    let mut ordered = Vec::new();
    for predicate in predicates {
        for record in records {
            if filter.matches(record)? && predicate(record)? {
                ordered.push(record);
            }
        }
    }
    Ok(ordered)
}

/// Partitioned games kept as separate blocks, for surfaces with section
/// headings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameBlocks<R> {
    pub users_turn: Vec<R>,
    pub opponents_turn: Vec<R>,
    pub finished: Vec<R>,
}

impl<R> Default for GameBlocks<R> {
    fn default() -> Self {
        Self {
            users_turn: Vec::new(),
            opponents_turn: Vec::new(),
            finished: Vec::new(),
        }
    }
}

impl<R> GameBlocks<R> {
    /// Records in one block.
    pub fn block(&self, block: Block) -> &[R] {
        match block {
            Block::UsersTurn => &self.users_turn,
            Block::OpponentsTurn => &self.opponents_turn,
            Block::Finished => &self.finished,
        }
    }

    /// Blocks in precedence order.
    pub fn iter(&self) -> impl Iterator<Item = (Block, &[R])> {
        Block::ALL.into_iter().map(move |b| (b, self.block(b)))
    }

    pub fn len(&self) -> usize {
        self.users_turn.len() + self.opponents_turn.len() + self.finished.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Concatenate the blocks in precedence order.
    pub fn flatten(self) -> Vec<R> {
        let mut all = self.users_turn;
        all.extend(self.opponents_turn);
        all.extend(self.finished);
        all
    }

    fn block_mut(&mut self, block: Block) -> &mut Vec<R> {
        match block {
            Block::UsersTurn => &mut self.users_turn,
            Block::OpponentsTurn => &mut self.opponents_turn,
            Block::Finished => &mut self.finished,
        }
    }
}

impl<'a> GameBlocks<&'a GameRecord> {
    /// Owned copy, for holding past the snapshot's lifetime.
    pub fn cloned(&self) -> GameBlocks<GameRecord> {
        GameBlocks {
            users_turn: self.users_turn.iter().map(|r| (*r).clone()).collect(),
            opponents_turn: self.opponents_turn.iter().map(|r| (*r).clone()).collect(),
            finished: self.finished.iter().map(|r| (*r).clone()).collect(),
        }
    }
}

/// Partition into separate blocks. `flatten()` of the result equals
/// [`partition`].
pub fn partition_blocks<'a, F>(
    records: &'a [GameRecord],
    filter: F,
) -> Result<GameBlocks<&'a GameRecord>, SchemaViolation>
where
    F: RecordFilter,
{
    let mut blocks = GameBlocks::default();
    for record in records {
        if filter.matches(record)? {
            blocks.block_mut(classify(record)?.block()).push(record);
        }
    }
    Ok(blocks)
}
