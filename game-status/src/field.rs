//! Field registry for game records.
//!
//! The registry is closed: every field a synchronized game record may carry
//! is listed here together with the kind of value it must hold.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of value a registry field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Signed integer
    Integer,
    /// True/false flag
    Boolean,
    /// Opaque string identifier
    Identifier,
}

impl ValueKind {
    /// Get string representation for error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Identifier => "identifier",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recognized game record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Stable identity of a game
    GameId,
    /// Whether the game has been moved out of the active set
    Archived,
    /// Whose turn it is while the game is unresolved (0 = opponent, 1 = user)
    State,
    /// Terminal outcome: the user won
    UserWon,
    /// Terminal outcome: the user lost
    UserLost,
    /// Terminal outcome: draw
    Drawn,
}

impl Field {
    /// Every field in the registry.
    pub const ALL: [Field; 6] = [
        Field::GameId,
        Field::Archived,
        Field::State,
        Field::UserWon,
        Field::UserLost,
        Field::Drawn,
    ];

    /// The terminal outcome flags.
    pub const OUTCOMES: [Field; 3] = [Field::UserWon, Field::UserLost, Field::Drawn];

    /// Value kind declared for this field.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::GameId => ValueKind::Identifier,
            Self::State => ValueKind::Integer,
            Self::Archived | Self::UserWon | Self::UserLost | Self::Drawn => ValueKind::Boolean,
        }
    }

    /// Key used for this field in server rows.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::GameId => "game_id",
            Self::Archived => "archived",
            Self::State => "state",
            Self::UserWon => "user_won",
            Self::UserLost => "user_lost",
            Self::Drawn => "drawn",
        }
    }

    /// Look up a field by its server row key.
    pub fn from_wire_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.wire_name() == name)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}
