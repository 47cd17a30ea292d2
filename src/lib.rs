//! # liars-dice
//!
//! A two-player Liar's Dice engine with wild ones, and the automated
//! opponents that play it.
//!
//! ## Design Principles
//!
//! 1. **Snapshot Transitions**: Every mutator maps the current `GameState`
//!    to a new one. History uses `im` vectors, so snapshots are cheap to
//!    clone, compare and checkpoint.
//!
//! 2. **Silent Rejection**: Out-of-phase calls and bets that do not outrank
//!    the current bet leave the state untouched and report a `Rejection`.
//!    Callers may invoke mutators speculatively.
//!
//! 3. **Hidden Information**: Opponents decide from a `PlayerView`, which
//!    carries only the viewer's own dice values.
//!
//! ## Modules
//!
//! - `core`: Dice, bets, players, events, actions, state, views, RNG,
//!   configuration
//! - `rules`: Phase transitions and the `Game` owner
//! - `opponent`: `Opponent` trait, heuristic and delegated opponents, turn
//!   driver
//! - `recording`: Fire-and-forget persistence of sessions, rolls and events
//! - `python` (feature `python`): PyO3 bindings

pub mod core;
pub mod rules;
pub mod opponent;
pub mod recording;

#[cfg(feature = "python")]
pub mod python;

// Re-export commonly used types
pub use crate::core::{
    Action, Bet, ChallengeResult, DiceTally, Die, Difficulty, EventKind, Face, GameConfig,
    GameEvent, GameRng, GameRngState, GameState, Phase, Player, PlayerId, PlayerMap, PlayerView,
    SeatConfig,
};

pub use crate::rules::{Game, Rejection, Transition};

pub use crate::opponent::{
    DecisionProvider, DelegatedOpponent, DelegationConfig, HeuristicOpponent, Opponent, TurnDriver,
};

pub use crate::recording::{
    EventRecorder, JsonLinesSink, MemorySink, Record, RecordSink, RecorderConfig,
};
