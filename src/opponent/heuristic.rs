//! Probabilistic heuristic opponent.
//!
//! ## Challenge
//!
//! The opponent expects its own matching dice (face plus wilds) and about a
//! third of the unseen dice to match the bet. The estimate is scaled by the
//! difficulty's challenge multiplier, jittered by up to ±0.2, and the bet is
//! challenged when its quantity exceeds the result. A bet claiming more dice
//! than are in play is always challenged.
//!
//! ## Bet
//!
//! Otherwise it bets on the face it holds most of, counting wilds towards
//! every face and preferring the higher face on ties. With no face held at
//! least twice it picks a random face in 2..=6. Openings claim about a third
//! of the dice in play; raises either add one to the quantity or keep the
//! quantity and move to the next face, wrapping six to two with one more die.

use futures::future::{self, BoxFuture};

use crate::core::{Action, Bet, DiceTally, Difficulty, Face, GameRng, PlayerView};

use super::Opponent;

/// Symmetric noise added to the challenge threshold.
pub const CHALLENGE_JITTER: f64 = 0.2;

/// Heuristic opponent with its own RNG stream.
#[derive(Clone, Debug)]
pub struct HeuristicOpponent {
    rng: GameRng,
}

impl HeuristicOpponent {
    #[must_use]
    pub fn new(rng: GameRng) -> Self {
        Self { rng }
    }

    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(GameRng::new(seed))
    }

    /// Pick an action for the viewer. Never returns a bet that fails to
    /// outrank the current one.
    pub fn choose_action(&mut self, view: &PlayerView, difficulty: Difficulty) -> Action {
        let tally = view.own_tally();
        match view.current_bet {
            None => self.opening_bet(view, &tally, difficulty),
            Some(bet) if self.should_challenge(view, &tally, &bet, difficulty) => Action::Challenge,
            Some(bet) => self.raise(&tally, &bet, difficulty),
        }
    }

    fn should_challenge(
        &mut self,
        view: &PlayerView,
        tally: &DiceTally,
        bet: &Bet,
        difficulty: Difficulty,
    ) -> bool {
        if bet.quantity > view.total_dice {
            return true;
        }
        let own_matches = tally.matching(bet.value);
        let unseen_matches = view.unseen_dice() * 2 / 6;
        let estimate = f64::from(own_matches + unseen_matches);
        let threshold = estimate * difficulty.challenge_multiplier() + self.rng.jitter(CHALLENGE_JITTER);
        f64::from(bet.quantity) > threshold
    }

    fn opening_bet(&mut self, view: &PlayerView, tally: &DiceTally, difficulty: Difficulty) -> Action {
        let scaled = f64::from(view.total_dice) / 3.0 * difficulty.opening_scale();
        let quantity = (scaled.floor() as u32).max(1);
        Action::bet(quantity, self.target_face(tally))
    }

    fn raise(&mut self, tally: &DiceTally, bet: &Bet, difficulty: Difficulty) -> Action {
        let action = if self.rng.gen_bool(difficulty.raise_quantity_probability()) {
            Action::bet(bet.quantity.saturating_add(1), self.target_face(tally))
        } else {
            match bet.value.next_non_wild() {
                (face, true) => Action::bet(bet.quantity.saturating_add(1), face),
                (face, false) => Action::bet(bet.quantity, face),
            }
        };

        if action.is_legal(Some(bet)) {
            action
        } else {
            Action::bet(bet.quantity.saturating_add(1), bet.value)
        }
    }

    /// Best held face, or a random non-wild face without a concentration.
    fn target_face(&mut self, tally: &DiceTally) -> Face {
        match best_face(tally) {
            (face, count) if count > 1 => face,
            _ => self.rng.face_at_least(Face::TWO),
        }
    }
}

/// Face in 2..=6 with the highest count including wilds. Ties go to the
/// higher face.
#[must_use]
pub fn best_face(tally: &DiceTally) -> (Face, u32) {
    Face::all()
        .filter(|face| !face.is_wild())
        .map(|face| (face, tally.matching(face)))
        .max_by_key(|&(face, count)| (count, face))
        .unwrap_or((Face::TWO, 0))
}

impl Opponent for HeuristicOpponent {
    fn decide(&mut self, view: PlayerView, difficulty: Difficulty) -> BoxFuture<'_, Action> {
        let action = self.choose_action(&view, difficulty);
        Box::pin(future::ready(action))
    }
}
