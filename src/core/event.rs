//! Game history events.
//!
//! History is append-only: a bet appends one event, a challenge appends a
//! `Challenge` followed by a `Result`. Events are immutable once recorded.

use serde::{Deserialize, Serialize};

use super::bet::Bet;
use super::player::PlayerId;

/// Outcome of a resolved challenge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChallengeResult {
    /// True when the bettor overstated (fewer matching dice than claimed).
    pub successful: bool,
    /// Dice on the table matching the challenged bet, wild ones included.
    pub dice_count: u32,
}

/// What happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Bet { bet: Bet },
    Challenge { target: PlayerId },
    Result { result: ChallengeResult },
}

/// A recorded event with the acting player and wall-clock time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameEvent {
    pub player: PlayerId,
    pub kind: EventKind,
    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
}

impl GameEvent {
    #[must_use]
    pub fn bet(bet: Bet, timestamp_ms: u64) -> Self {
        Self {
            player: bet.player,
            kind: EventKind::Bet { bet },
            timestamp_ms,
        }
    }

    #[must_use]
    pub fn challenge(challenger: PlayerId, target: PlayerId, timestamp_ms: u64) -> Self {
        Self {
            player: challenger,
            kind: EventKind::Challenge { target },
            timestamp_ms,
        }
    }

    #[must_use]
    pub fn result(challenger: PlayerId, result: ChallengeResult, timestamp_ms: u64) -> Self {
        Self {
            player: challenger,
            kind: EventKind::Result { result },
            timestamp_ms,
        }
    }

    /// The bet carried by a `Bet` event.
    #[must_use]
    pub fn as_bet(&self) -> Option<&Bet> {
        match &self.kind {
            EventKind::Bet { bet } => Some(bet),
            _ => None,
        }
    }
}

/// Current wall-clock time in milliseconds since the Unix epoch.
#[must_use]
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
