//! The game state snapshot.
//!
//! ## GameState
//!
//! One value holds everything about a game: phase, seats and their dice,
//! the active and previous player, the current and previous bet, the dice
//! tally, round bookkeeping and the event history. Transitions in
//! [`crate::rules`] take a snapshot and build a new one; a rejected
//! transition leaves the original untouched.
//!
//! History uses `im::Vector`, so cloning a snapshot to apply a transition
//! does not copy the whole event log.
//!
//! ## Invariants
//!
//! - `total_dice` equals the sum of both players' dice counts
//! - `dice_tally` sums to `total_dice`
//! - no bet exists before the first round is dealt

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::bet::Bet;
use super::config::GameConfig;
use super::dice::{DiceTally, Die};
use super::event::{ChallengeResult, GameEvent};
use super::player::{Player, PlayerId, PlayerMap};
use super::view::PlayerView;

/// Game phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No game has been dealt yet.
    #[default]
    Starting,
    /// Players take turns raising or challenging.
    Betting,
    /// A challenge was resolved and all dice are face up.
    Revealing,
    /// One player has no dice left.
    Ended,
}

/// Errors from checkpoint encoding.
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("checkpoint encoding failed: {0}")]
    Encode(#[source] bincode::Error),
    #[error("checkpoint decoding failed: {0}")]
    Decode(#[source] bincode::Error),
    #[error("checkpoint is inconsistent: {0}")]
    Inconsistent(&'static str),
}

/// Complete game state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub(crate) session_id: Option<Uuid>,
    pub(crate) phase: Phase,
    pub(crate) players: PlayerMap<Player>,
    pub(crate) active_player: PlayerId,
    pub(crate) previous_player: Option<PlayerId>,
    pub(crate) current_bet: Option<Bet>,
    pub(crate) previous_bet: Option<Bet>,
    pub(crate) dice_tally: DiceTally,
    pub(crate) total_dice: u32,
    pub(crate) round: u32,
    pub(crate) round_winner: Option<PlayerId>,
    pub(crate) round_loser: Option<PlayerId>,
    pub(crate) winner: Option<PlayerId>,
    pub(crate) loser: Option<PlayerId>,
    pub(crate) challenge_result: Option<ChallengeResult>,
    pub(crate) history: Vector<GameEvent>,
}

impl GameState {
    /// A table in the `Starting` phase: seats filled from `config`, no dice.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        Self {
            session_id: None,
            phase: Phase::Starting,
            players: PlayerMap::new(|id| {
                let seat = &config.seats[id];
                Player::new(id, seat.name.clone(), seat.is_automated)
            }),
            active_player: PlayerId::new(0),
            previous_player: None,
            current_bet: None,
            previous_bet: None,
            dice_tally: DiceTally::new(),
            total_dice: 0,
            round: 0,
            round_winner: None,
            round_loser: None,
            winner: None,
            loser: None,
            challenge_result: None,
            history: Vector::new(),
        }
    }

    // === Progression ===

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Round number, 1 for the first dealt round and 0 before any game.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    #[must_use]
    pub fn session_id(&self) -> Option<Uuid> {
        self.session_id
    }

    /// Whose turn it is.
    #[must_use]
    pub fn active_player_id(&self) -> PlayerId {
        self.active_player
    }

    /// The player who acted last this round, if anyone has.
    #[must_use]
    pub fn previous_player_id(&self) -> Option<PlayerId> {
        self.previous_player
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase == Phase::Ended
    }

    // === Players ===

    #[must_use]
    pub fn players(&self) -> &PlayerMap<Player> {
        &self.players
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id]
    }

    /// The player whose turn it is.
    #[must_use]
    pub fn active_player(&self) -> &Player {
        &self.players[self.active_player]
    }

    /// Display name per player.
    #[must_use]
    pub fn player_display_names(&self) -> FxHashMap<PlayerId, String> {
        self.players
            .iter()
            .map(|(id, player)| (id, player.name.clone()))
            .collect()
    }

    /// Every die on the table, seat 0 first.
    pub fn all_dice(&self) -> impl Iterator<Item = &Die> {
        self.players.values().flat_map(|p| p.dice.iter())
    }

    // === Bets ===

    #[must_use]
    pub fn current_bet(&self) -> Option<&Bet> {
        self.current_bet.as_ref()
    }

    #[must_use]
    pub fn previous_bet(&self) -> Option<&Bet> {
        self.previous_bet.as_ref()
    }

    // === Dice ===

    /// Per-face count over both players' dice.
    #[must_use]
    pub fn dice_tally(&self) -> &DiceTally {
        &self.dice_tally
    }

    #[must_use]
    pub fn total_dice(&self) -> u32 {
        self.total_dice
    }

    // === Resolution ===

    #[must_use]
    pub fn round_winner(&self) -> Option<PlayerId> {
        self.round_winner
    }

    #[must_use]
    pub fn round_loser(&self) -> Option<PlayerId> {
        self.round_loser
    }

    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    #[must_use]
    pub fn loser(&self) -> Option<PlayerId> {
        self.loser
    }

    /// Outcome of the last challenge, while its dice are revealed.
    #[must_use]
    pub fn challenge_result(&self) -> Option<ChallengeResult> {
        self.challenge_result
    }

    // === History ===

    #[must_use]
    pub fn history(&self) -> &Vector<GameEvent> {
        &self.history
    }

    // === Views ===

    /// What `player` is allowed to see: their own dice and public information.
    #[must_use]
    pub fn view_for(&self, player: PlayerId) -> PlayerView {
        PlayerView::new(self, player)
    }

    // === Internal bookkeeping ===

    /// Recompute `dice_tally` and `total_dice` from the players' dice.
    pub(crate) fn recount(&mut self) {
        self.dice_tally = self.all_dice().collect();
        self.total_dice = self.dice_tally.total();
    }

    /// Check the aggregate invariants.
    pub fn validate(&self) -> Result<(), CheckpointError> {
        let held: usize = self.players.values().map(Player::dice_count).sum();
        if held as u32 != self.total_dice {
            return Err(CheckpointError::Inconsistent("total dice differs from dice held"));
        }
        let recount: DiceTally = self.all_dice().collect();
        if recount != self.dice_tally {
            return Err(CheckpointError::Inconsistent("dice tally differs from dice held"));
        }
        if self.current_bet.is_some() && self.phase == Phase::Starting {
            return Err(CheckpointError::Inconsistent("bet before the game started"));
        }
        Ok(())
    }

    // === Checkpoints ===

    /// Encode the snapshot with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(CheckpointError::Encode)
    }

    /// Decode and validate a snapshot produced by [`GameState::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let state: Self = bincode::deserialize(bytes).map_err(CheckpointError::Decode)?;
        state.validate()?;
        Ok(state)
    }
}
