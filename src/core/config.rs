//! Game configuration.
//!
//! `GameConfig` describes the table: who sits where, whether each seat is
//! automated, how many dice everyone starts with, the opponent difficulty
//! and an optional seed for reproducible games.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::player::{PlayerId, PlayerMap};

/// Dice each player starts with.
pub const DEFAULT_STARTING_DICE: usize = 5;

/// Opponent strength.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Multiplier applied to the estimated matching dice before challenging.
    ///
    /// Higher values tolerate bolder bets before calling a bluff.
    #[must_use]
    pub fn challenge_multiplier(self) -> f64 {
        match self {
            Self::Easy => 0.8,
            Self::Medium => 1.0,
            Self::Hard => 1.2,
        }
    }

    /// Probability of raising quantity instead of advancing the face.
    #[must_use]
    pub fn raise_quantity_probability(self) -> f64 {
        match self {
            Self::Easy => 0.7,
            Self::Medium => 0.5,
            Self::Hard => 0.3,
        }
    }

    /// Scale applied to the opening quantity of a fresh round.
    #[must_use]
    pub fn opening_scale(self) -> f64 {
        match self {
            Self::Easy => 0.7,
            Self::Medium | Self::Hard => 1.0,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            other => Err(format!("unknown difficulty {other:?}")),
        }
    }
}

/// Configuration for one seat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatConfig {
    pub name: String,
    pub is_automated: bool,
}

impl SeatConfig {
    pub fn human(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_automated: false,
        }
    }

    pub fn automated(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_automated: true,
        }
    }
}

/// A configuration no table can be dealt from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("players must start with at least 1 die")]
    NoStartingDice,
}

/// Complete game configuration.
///
/// Deserialized configs are validated, so a stored config cannot smuggle
/// in a table without dice.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GameConfigFields")]
pub struct GameConfig {
    /// Seat 0 and seat 1.
    pub seats: PlayerMap<SeatConfig>,

    /// Dice per player at game start.
    pub starting_dice: usize,

    /// Difficulty handed to automated opponents.
    pub difficulty: Difficulty,

    /// RNG seed. `None` draws one from OS entropy at build time.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seats: PlayerMap::new(|p| {
                if p.index() == 0 {
                    SeatConfig::human("You")
                } else {
                    SeatConfig::automated("Android")
                }
            }),
            starting_dice: DEFAULT_STARTING_DICE,
            difficulty: Difficulty::default(),
            seed: None,
        }
    }
}

#[derive(Deserialize)]
struct GameConfigFields {
    seats: PlayerMap<SeatConfig>,
    starting_dice: usize,
    difficulty: Difficulty,
    seed: Option<u64>,
}

impl TryFrom<GameConfigFields> for GameConfig {
    type Error = ConfigError;

    fn try_from(fields: GameConfigFields) -> Result<Self, Self::Error> {
        let config = Self {
            seats: fields.seats,
            starting_dice: fields.starting_dice,
            difficulty: fields.difficulty,
            seed: fields.seed,
        };
        config.validate()?;
        Ok(config)
    }
}

impl GameConfig {
    /// Human in seat 0 against an automated opponent in seat 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that a table can be dealt from this config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.starting_dice == 0 {
            return Err(ConfigError::NoStartingDice);
        }
        Ok(())
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the starting dice per player.
    ///
    /// # Panics
    ///
    /// Panics if `count` is zero.
    #[must_use]
    pub fn with_starting_dice(mut self, count: usize) -> Self {
        assert!(count > 0, "Players must start with at least 1 die");
        self.starting_dice = count;
        self
    }

    #[must_use]
    pub fn with_seat(mut self, player: PlayerId, seat: SeatConfig) -> Self {
        self.seats[player] = seat;
        self
    }

    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }
}
