//! Core engine types: dice, bets, players, events, actions, state, RNG,
//! configuration.
//!
//! These are plain data types with their local rules (face validation,
//! bet ordering, wild counting). Phase transitions live in `rules`.

pub mod rng;
pub mod dice;
pub mod bet;
pub mod player;
pub mod event;
pub mod action;
pub mod config;
pub mod state;
pub mod view;

pub use rng::{GameRng, GameRngState};
pub use dice::{roll_die, tally, DiceTally, Die, Face, FACE_COUNT};
pub use bet::{is_higher, Bet};
pub use player::{Hand, Player, PlayerId, PlayerMap, SEATS};
pub use event::{now_ms, ChallengeResult, EventKind, GameEvent};
pub use action::Action;
pub use config::{ConfigError, Difficulty, GameConfig, SeatConfig, DEFAULT_STARTING_DICE};
pub use state::{CheckpointError, GameState, Phase};
pub use view::{PlayerView, OBSERVATION_LEN};
