//! Per-player observations.
//!
//! A [`PlayerView`] is everything one player may legitimately see: their
//! own dice, how many dice the opponent holds, the bets, the round and the
//! public history. Opponents decide from views, never from the full state,
//! so hidden dice values cannot leak into a decision.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::bet::Bet;
use super::dice::{DiceTally, Face, FACE_COUNT};
use super::event::GameEvent;
use super::player::{PlayerId, PlayerMap};
use super::state::{GameState, Phase};

/// Length of [`PlayerView::encode`] output.
pub const OBSERVATION_LEN: usize = FACE_COUNT + 9;

/// One player's observation of the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub me: PlayerId,
    pub own_dice: Vec<Face>,
    pub dice_counts: PlayerMap<usize>,
    pub names: PlayerMap<String>,
    pub total_dice: u32,
    pub current_bet: Option<Bet>,
    pub previous_bet: Option<Bet>,
    pub active_player: PlayerId,
    pub previous_player: Option<PlayerId>,
    pub phase: Phase,
    pub round: u32,
    pub history: Vector<GameEvent>,
}

impl PlayerView {
    pub(crate) fn new(state: &GameState, me: PlayerId) -> Self {
        Self {
            me,
            own_dice: state.player(me).dice.iter().map(|d| d.value).collect(),
            dice_counts: PlayerMap::new(|id| state.player(id).dice_count()),
            names: PlayerMap::new(|id| state.player(id).name.clone()),
            total_dice: state.total_dice(),
            current_bet: state.current_bet().copied(),
            previous_bet: state.previous_bet().copied(),
            active_player: state.active_player_id(),
            previous_player: state.previous_player_id(),
            phase: state.phase(),
            round: state.round(),
            history: state.history().clone(),
        }
    }

    /// Tally of the viewer's own dice.
    #[must_use]
    pub fn own_tally(&self) -> DiceTally {
        let mut tally = DiceTally::new();
        for &face in &self.own_dice {
            tally.add(face);
        }
        tally
    }

    /// Dice the viewer cannot see.
    #[must_use]
    pub fn unseen_dice(&self) -> u32 {
        self.total_dice.saturating_sub(self.own_dice.len() as u32)
    }

    #[must_use]
    pub fn is_my_turn(&self) -> bool {
        self.phase == Phase::Betting && self.active_player == self.me
    }

    /// Fixed-size feature vector for learning pipelines.
    ///
    /// Layout: own face counts (6), own dice, opponent dice, total dice,
    /// current bet quantity and face, previous bet quantity and face,
    /// round, my-turn flag. Counts are divided by the total dice in play.
    #[must_use]
    pub fn encode(&self) -> Vec<f32> {
        let scale = self.total_dice.max(1) as f32;
        let mut out = Vec::with_capacity(OBSERVATION_LEN);

        let tally = self.own_tally();
        out.extend(tally.iter().map(|(_, count)| count as f32 / scale));

        out.push(self.dice_counts[self.me] as f32 / scale);
        out.push(self.dice_counts[self.me.other()] as f32 / scale);
        out.push(self.total_dice as f32);

        for bet in [self.current_bet, self.previous_bet] {
            match bet {
                Some(bet) => {
                    out.push(bet.quantity as f32 / scale);
                    out.push(f32::from(bet.value.value()) / 6.0);
                }
                None => out.extend([0.0, 0.0]),
            }
        }

        out.push(self.round as f32);
        out.push(if self.is_my_turn() { 1.0 } else { 0.0 });
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::GameConfig;
    use crate::core::dice::Die;

    fn state_with(hands: [&[u8]; 2]) -> GameState {
        let mut state = GameState::new(&GameConfig::default());
        for (id, player) in state.players.iter_mut() {
            for (i, &v) in hands[id.index()].iter().enumerate() {
                player.dice.push(Die::new(i as u32, Face::new(v).unwrap()));
            }
        }
        state.phase = Phase::Betting;
        state.recount();
        state
    }

    #[test]
    fn test_view_hides_opponent_values() {
        let state = state_with([&[1, 1, 3], &[6, 6, 6, 6]]);
        let view = state.view_for(PlayerId::new(0));

        assert_eq!(view.own_dice, vec![Face::ONE, Face::ONE, Face::THREE]);
        assert_eq!(view.dice_counts[PlayerId::new(1)], 4);
        assert_eq!(view.total_dice, 7);
        assert_eq!(view.unseen_dice(), 4);
        assert_eq!(view.own_tally().matching(Face::THREE), 3);
    }

    #[test]
    fn test_encode_length_and_turn_flag() {
        let state = state_with([&[2, 2], &[5]]);
        let mine = state.view_for(PlayerId::new(0)).encode();
        let theirs = state.view_for(PlayerId::new(1)).encode();

        assert_eq!(mine.len(), OBSERVATION_LEN);
        assert_eq!(theirs.len(), OBSERVATION_LEN);
        assert_eq!(mine[OBSERVATION_LEN - 1], 1.0);
        assert_eq!(theirs[OBSERVATION_LEN - 1], 0.0);
    }
}
