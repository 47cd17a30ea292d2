//! The game owner.
//!
//! `Game` holds the single `GameState` of a table together with the RNG
//! that rolls its dice. Mutators mirror what a player or scheduler can ask
//! for; each one either swaps in a new snapshot or leaves the state as it
//! was and reports why. Accepted transitions are forwarded to an optional
//! [`EventRecorder`] without waiting on it.
//!
//! ```
//! use liars_dice::core::{GameConfig, Phase};
//! use liars_dice::rules::Game;
//!
//! let mut game = Game::new(GameConfig::default().with_seed(7));
//! game.start_game();
//! assert_eq!(game.state().phase(), Phase::Betting);
//!
//! // Out-of-phase calls are ignored
//! assert!(!game.next_round().is_applied());
//! ```

use rustc_hash::FxHashMap;
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::{
    now_ms, Action, Face, GameConfig, GameRng, GameRngState, GameState, Phase, Player, PlayerId,
    PlayerMap, PlayerView,
};
use crate::recording::{EventRecorder, Record};

use super::transitions::{self, Rejection};

/// What a mutator did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// The state moved to a new snapshot.
    Applied,
    /// The call was ignored; the state is unchanged.
    Ignored(Rejection),
}

impl Transition {
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    /// The rejection reason, if the call was ignored.
    #[must_use]
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Self::Applied => None,
            Self::Ignored(reason) => Some(*reason),
        }
    }
}

/// A table: configuration, current snapshot, dice RNG and recorder.
pub struct Game {
    config: GameConfig,
    state: GameState,
    rng: GameRng,
    recorder: Option<EventRecorder>,
}

impl Game {
    /// Create a table in the `Starting` phase.
    ///
    /// # Panics
    ///
    /// Panics if `config` gives players no starting dice.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        if let Err(err) = config.validate() {
            panic!("Invalid game config: {err}");
        }
        let rng = match config.seed {
            Some(seed) => GameRng::new(seed),
            None => GameRng::from_entropy(),
        };
        Self {
            state: GameState::new(&config),
            config,
            rng,
            recorder: None,
        }
    }

    /// Resume a table from a checkpoint.
    #[must_use]
    pub fn from_checkpoint(config: GameConfig, state: GameState, rng: &GameRngState) -> Self {
        Self {
            config,
            state,
            rng: GameRng::from_state(rng),
            recorder: None,
        }
    }

    /// Forward accepted transitions to `recorder`.
    #[must_use]
    pub fn with_recorder(mut self, recorder: EventRecorder) -> Self {
        self.recorder = Some(recorder);
        self
    }

    /// Snapshot and RNG position, enough to resume with [`Game::from_checkpoint`].
    #[must_use]
    pub fn checkpoint(&self) -> (GameState, GameRngState) {
        (self.state.clone(), self.rng.state())
    }

    // === Queries ===

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Read-only view of the current snapshot.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn active_player(&self) -> &Player {
        self.state.active_player()
    }

    #[must_use]
    pub fn player_display_names(&self) -> FxHashMap<PlayerId, String> {
        self.state.player_display_names()
    }

    /// Observation for `player`, as handed to opponents.
    #[must_use]
    pub fn view_for(&self, player: PlayerId) -> PlayerView {
        self.state.view_for(player)
    }

    /// An independent RNG stream derived from the table's RNG, for seating
    /// an opponent without disturbing the dice sequence.
    pub fn fork_rng(&mut self) -> GameRng {
        self.rng.fork()
    }

    /// Whether the scheduler should ask an automated opponent to act.
    #[must_use]
    pub fn awaiting_automated_player(&self) -> bool {
        self.state.phase() == Phase::Betting && self.state.active_player().is_automated
    }

    // === Mutators ===

    /// Deal a new game. Always applies, whatever the current phase.
    pub fn start_game(&mut self) -> Transition {
        let next = transitions::start(&self.config, &mut self.rng);
        self.commit("start game", Ok(next), true)
    }

    /// Deal a new game from known dice.
    ///
    /// # Panics
    ///
    /// Panics if either hand is empty.
    pub fn start_game_with_rolls(
        &mut self,
        rolls: &PlayerMap<Vec<Face>>,
        first: PlayerId,
        session_id: Option<Uuid>,
    ) -> Transition {
        let next = transitions::start_from_rolls(&self.config, rolls, first, session_id);
        self.commit("start game", Ok(next), true)
    }

    /// Raise the bet as the active player.
    pub fn place_bet(&mut self, quantity: u32, value: u8) -> Transition {
        let next = transitions::place_bet(&self.state, quantity, value, now_ms());
        self.commit("place bet", next, false)
    }

    /// Challenge the current bet as the active player.
    pub fn challenge(&mut self) -> Transition {
        let next = transitions::challenge(&self.state, now_ms());
        self.commit("challenge", next, false)
    }

    /// Resolve the revealed round.
    pub fn next_round(&mut self) -> Transition {
        let next = transitions::next_round(&self.state, &mut self.rng);
        self.commit("next round", next, false)
    }

    /// Throw the current game away and deal a new one.
    pub fn restart_game(&mut self) -> Transition {
        self.state = GameState::new(&self.config);
        debug!("table reset");
        self.start_game()
    }

    /// Apply an action on behalf of the active player.
    pub fn apply(&mut self, action: Action) -> Transition {
        match action {
            Action::Bet { quantity, value } => self.place_bet(quantity, value.value()),
            Action::Challenge => self.challenge(),
        }
    }

    fn commit(
        &mut self,
        what: &'static str,
        next: Result<GameState, Rejection>,
        dealt: bool,
    ) -> Transition {
        let next = match next {
            Ok(next) => next,
            Err(reason) => {
                debug!(%reason, "{what} ignored");
                return Transition::Ignored(reason);
            }
        };

        let previous = std::mem::replace(&mut self.state, next);
        let state = &self.state;
        debug!(
            phase = ?state.phase(),
            round = state.round(),
            active = %state.active_player_id(),
            "{what} applied"
        );
        if dealt {
            info!(session = ?state.session_id(), first = %state.active_player_id(), "game started");
        }
        match state.phase() {
            Phase::Betting if dealt || previous.phase() != Phase::Betting => {
                info!(round = state.round(), first = %state.active_player_id(), "round started");
            }
            Phase::Revealing => {
                if let (Some(result), Some(loser)) = (state.challenge_result(), state.round_loser()) {
                    info!(
                        successful = result.successful,
                        dice_count = result.dice_count,
                        %loser,
                        "challenge resolved"
                    );
                }
            }
            Phase::Ended => {
                info!(winner = ?state.winner(), rounds = state.round(), "game over");
            }
            _ => {}
        }

        if let Some(recorder) = &self.recorder {
            for record in Record::for_transition(&previous, &self.state, dealt) {
                recorder.record(record);
            }
        }
        Transition::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Difficulty, EventKind};

    fn faces(values: &[u8]) -> Vec<Face> {
        values.iter().map(|&v| Face::new(v).unwrap()).collect()
    }

    fn seeded() -> Game {
        Game::new(GameConfig::default().with_seed(42))
    }

    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_every_deal_logs_game_start() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let mut game = seeded();
            game.start_game();
            game.place_bet(2, 3);
            // Redeal in the middle of a betting round
            game.start_game();
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert_eq!(output.matches("game started").count(), 2);
        assert_eq!(output.matches("round started").count(), 2);
    }

    #[test]
    #[should_panic(expected = "at least 1 die")]
    fn test_empty_table_rejected() {
        let config = GameConfig {
            starting_dice: 0,
            ..GameConfig::default()
        };
        let _ = Game::new(config);
    }

    #[test]
    fn test_forked_rng_seats_opponent() {
        use crate::opponent::HeuristicOpponent;

        let mut game = seeded();
        let mut twin = seeded();
        let mut opponent = HeuristicOpponent::new(game.fork_rng());
        game.start_game();
        twin.start_game();
        assert_eq!(game.state(), twin.state());

        let view = game.view_for(game.state().active_player_id());
        let action = opponent.choose_action(&view, Difficulty::Medium);
        assert!(game.apply(action).is_applied());
    }

    #[test]
    fn test_starting_phase_ignores_everything() {
        let mut game = seeded();
        let before = game.state().clone();

        assert!(!game.place_bet(1, 2).is_applied());
        assert!(!game.challenge().is_applied());
        assert!(!game.next_round().is_applied());
        assert_eq!(game.state(), &before);
    }

    #[test]
    fn test_start_and_bet() {
        let mut game = seeded();
        assert!(game.start_game().is_applied());
        let first = game.state().active_player_id();

        assert!(game.place_bet(2, 3).is_applied());
        assert_eq!(game.state().active_player_id(), first.other());
        assert!(matches!(
            game.state().history().back().map(|e| e.kind),
            Some(EventKind::Bet { .. })
        ));
    }

    #[test]
    fn test_rejection_reason_reported() {
        let mut game = seeded();
        game.start_game();
        game.place_bet(3, 4);
        assert_eq!(
            game.place_bet(3, 3),
            Transition::Ignored(Rejection::NotHigher {
                quantity: 3,
                value: Face::THREE
            })
        );
    }

    #[test]
    fn test_apply_routes_actions() {
        let mut game = seeded();
        game.start_game();
        assert!(game.apply(Action::bet(1, Face::SIX)).is_applied());
        assert!(game.apply(Action::Challenge).is_applied());
        assert_eq!(game.state().phase(), Phase::Revealing);
    }

    #[test]
    fn test_restart_resets_round() {
        let mut game = seeded();
        game.start_game();
        game.place_bet(1, 6);
        game.challenge();
        game.next_round();

        assert!(game.restart_game().is_applied());
        assert_eq!(game.state().round(), 1);
        assert_eq!(game.state().total_dice(), 10);
        assert!(game.state().history().is_empty());
    }

    #[test]
    fn test_checkpoint_resume_continues_identically() {
        let mut game = seeded();
        game.start_game();
        game.place_bet(1, 6);
        game.challenge();

        let (state, rng) = game.checkpoint();
        let mut resumed = Game::from_checkpoint(game.config().clone(), state, &rng);

        game.next_round();
        resumed.next_round();
        assert_eq!(game.state(), resumed.state());
    }

    #[test]
    fn test_awaiting_automated_player() {
        let mut game = seeded();
        let rolls = PlayerMap::new(|_| faces(&[2, 3]));
        game.start_game_with_rolls(&rolls, PlayerId::new(1), None);
        assert!(game.awaiting_automated_player());

        game.place_bet(1, 2);
        assert!(!game.awaiting_automated_player());
    }
}
