//! Derived game status.
//!
//! A well-formed record is in exactly one of three states: the user's turn,
//! the opponent's turn, or finished. Terminal outcome flags take priority
//! over `state`, which is meaningless once the game is resolved.

use serde::{Deserialize, Serialize};

use crate::field::Field;
use crate::record::{GameRecord, SchemaViolation};

/// Whose turn it is on an unresolved game, as carried in `state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Turn {
    Opponent = 0,
    User = 1,
}

impl Turn {
    /// Parse a `state` value.
    pub fn from_state(state: i64) -> Option<Self> {
        match state {
            0 => Some(Self::Opponent),
            1 => Some(Self::User),
            _ => None,
        }
    }
}

/// Terminal outcome of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Won,
    Lost,
    Drawn,
}

impl Outcome {
    /// Flag that records this outcome.
    pub fn field(&self) -> Field {
        match self {
            Self::Won => Field::UserWon,
            Self::Lost => Field::UserLost,
            Self::Drawn => Field::Drawn,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Won => "won",
            Self::Lost => "lost",
            Self::Drawn => "drawn",
        }
    }
}

/// Display block a game belongs to, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Block {
    UsersTurn,
    OpponentsTurn,
    Finished,
}

impl Block {
    /// All blocks, highest precedence first.
    pub const ALL: [Block; 3] = [Block::UsersTurn, Block::OpponentsTurn, Block::Finished];

    /// Key used in serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UsersTurn => "users_turn",
            Self::OpponentsTurn => "opponents_turn",
            Self::Finished => "finished",
        }
    }

    /// Section heading for list surfaces.
    pub fn title(&self) -> &'static str {
        match self {
            Self::UsersTurn => "Your turn",
            Self::OpponentsTurn => "Opponent's turn",
            Self::Finished => "Finished",
        }
    }
}

/// Classified status of one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    UsersTurn,
    OpponentsTurn,
    Finished(Outcome),
}

impl GameStatus {
    pub fn block(&self) -> Block {
        match self {
            Self::UsersTurn => Block::UsersTurn,
            Self::OpponentsTurn => Block::OpponentsTurn,
            Self::Finished(_) => Block::Finished,
        }
    }
}

/// Terminal outcome of a record, if any.
///
/// More than one outcome flag set is a schema violation, not a tie to break.
pub fn outcome(record: &GameRecord) -> Result<Option<Outcome>, SchemaViolation> {
    let mut found = None;
    for candidate in [Outcome::Won, Outcome::Lost, Outcome::Drawn] {
        if record.flag(candidate.field())? {
            if found.is_some() {
                return Err(SchemaViolation::ConflictingOutcome {
                    game_id: record.label().to_string(),
                });
            }
            found = Some(candidate);
        }
    }
    Ok(found)
}

/// Classify a record into exactly one status.
///
/// `state` is read and kind-checked even on finished games so a record
/// missing it never classifies.
pub fn classify(record: &GameRecord) -> Result<GameStatus, SchemaViolation> {
    let state = record.integer(Field::State)?;
    if let Some(outcome) = outcome(record)? {
        return Ok(GameStatus::Finished(outcome));
    }
    match Turn::from_state(state) {
        Some(Turn::User) => Ok(GameStatus::UsersTurn),
        Some(Turn::Opponent) => Ok(GameStatus::OpponentsTurn),
        None => Err(SchemaViolation::StateOutOfRange {
            game_id: record.label().to_string(),
            value: state,
        }),
    }
}

/// Whether the game has a terminal outcome.
pub fn is_finished(record: &GameRecord) -> Result<bool, SchemaViolation> {
    Ok(outcome(record)?.is_some())
}

/// Whether the game is unresolved and waiting on the opponent.
pub fn is_opponents_turn(record: &GameRecord) -> Result<bool, SchemaViolation> {
    Ok(classify(record)? == GameStatus::OpponentsTurn)
}

/// Whether the game is unresolved and waiting on the user.
pub fn is_users_turn(record: &GameRecord) -> Result<bool, SchemaViolation> {
    Ok(classify(record)? == GameStatus::UsersTurn)
}
