//! Game rules: phase transitions and the game owner.
//!
//! - `transitions`: pure snapshot-to-snapshot functions for each mutator
//! - `game`: `Game`, the single owner of a table's state, RNG and recorder
//!
//! Invalid calls are never errors. They come back as
//! `Transition::Ignored(reason)` with the state untouched, so schedulers and
//! opponents can call mutators speculatively.

pub mod transitions;
pub mod game;

pub use game::{Game, Transition};
pub use transitions::Rejection;
