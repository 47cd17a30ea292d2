//! Automated opponents.
//!
//! An [`Opponent`] receives the acting player's [`PlayerView`] and the
//! table difficulty and returns an [`Action`]. Views carry only the
//! viewer's own dice values, so no implementation can peek at hidden dice.
//!
//! - [`HeuristicOpponent`]: probabilistic bluff detection, resolves
//!   immediately
//! - [`DelegatedOpponent`]: asks an external [`DecisionProvider`], falls back
//!   to a challenge on any failure
//!
//! [`TurnDriver`] is the scheduler glue: it asks the opponent when an
//! automated player is due and feeds the action back through the game's
//! public mutators.

pub mod delegated;
pub mod heuristic;
#[cfg(feature = "remote")]
pub mod http;

use futures::future::BoxFuture;
use tracing::{debug, warn};

use crate::core::{Action, Difficulty, Phase, PlayerView};
use crate::rules::{Game, Transition};

pub use delegated::{
    parse_decision, DecisionError, DecisionProvider, DecisionRequest, DelegatedOpponent,
    DelegationConfig, SeatSummary, DEFAULT_DECISION_TIMEOUT, SYSTEM_PROMPT,
};
pub use heuristic::{best_face, HeuristicOpponent, CHALLENGE_JITTER};
#[cfg(feature = "remote")]
pub use http::HttpDecisionProvider;

/// Decision policy for an automated seat.
///
/// The returned action should be legal against `view.current_bet`; the
/// game ignores anything else.
pub trait Opponent: Send {
    fn decide(&mut self, view: PlayerView, difficulty: Difficulty) -> BoxFuture<'_, Action>;
}

impl<O: Opponent + ?Sized> Opponent for Box<O> {
    fn decide(&mut self, view: PlayerView, difficulty: Difficulty) -> BoxFuture<'_, Action> {
        (**self).decide(view, difficulty)
    }
}

/// What [`TurnDriver::play_automated_turn`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AutomatedTurn {
    pub action: Action,
    pub transition: Transition,
}

/// Drives automated seats of a [`Game`].
pub struct TurnDriver<O> {
    opponent: O,
}

impl<O: Opponent> TurnDriver<O> {
    #[must_use]
    pub fn new(opponent: O) -> Self {
        Self { opponent }
    }

    /// If the active player is automated and betting is open, ask the
    /// opponent and apply its action. Returns `None` when no automated
    /// player is due.
    pub async fn play_automated_turn(&mut self, game: &mut Game) -> Option<AutomatedTurn> {
        if !game.awaiting_automated_player() {
            return None;
        }
        let player = game.state().active_player_id();
        let view = game.view_for(player);
        let difficulty = game.config().difficulty;

        let action = self.opponent.decide(view, difficulty).await;
        let transition = game.apply(action);
        match transition {
            Transition::Applied => debug!(%player, %action, "automated action applied"),
            Transition::Ignored(reason) => {
                warn!(%player, %action, %reason, "automated action ignored")
            }
        }
        Some(AutomatedTurn { action, transition })
    }

    /// Play a table whose seats are all automated until the game ends.
    ///
    /// Stops early when a human seat is due or an automated action is
    /// ignored. Returns the number of actions applied.
    pub async fn play_out(&mut self, game: &mut Game) -> usize {
        let mut applied = 0;
        loop {
            match game.state().phase() {
                Phase::Betting => match self.play_automated_turn(game).await {
                    Some(turn) if turn.transition.is_applied() => applied += 1,
                    _ => return applied,
                },
                Phase::Revealing => {
                    game.next_round();
                }
                Phase::Starting | Phase::Ended => return applied,
            }
        }
    }
}
