//! Game and opponent bindings for Python.

use std::borrow::Cow;

use numpy::PyArray1;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::core::{Difficulty, GameConfig, GameState, Phase, PlayerId, SeatConfig};
use crate::opponent::HeuristicOpponent;
use crate::rules::{Game, Transition};

use super::py_core::{PyAction, PyPlayerId};

fn applied(transition: Transition) -> bool {
    transition.is_applied()
}

fn phase_name(phase: Phase) -> &'static str {
    match phase {
        Phase::Starting => "starting",
        Phase::Betting => "betting",
        Phase::Revealing => "revealing",
        Phase::Ended => "ended",
    }
}

fn to_value_error(e: impl std::fmt::Display) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// Python wrapper for a two-seat table.
///
/// Mutators return True when applied and False when ignored.
#[pyclass(name = "Game")]
pub struct PyGame(pub Game);

#[pymethods]
impl PyGame {
    /// Create a table in the starting phase.
    ///
    /// # Arguments
    /// - seed: RNG seed; None draws from OS entropy
    /// - starting_dice: Dice per player at the start
    /// - difficulty: "easy", "medium" or "hard"
    /// - human_name / opponent_name: Seat names
    /// - self_play: Mark both seats automated
    #[new]
    #[pyo3(signature = (
        seed = None,
        starting_dice = 5,
        difficulty = "medium",
        human_name = "You",
        opponent_name = "Android",
        self_play = false
    ))]
    fn new(
        seed: Option<u64>,
        starting_dice: usize,
        difficulty: &str,
        human_name: &str,
        opponent_name: &str,
        self_play: bool,
    ) -> PyResult<Self> {
        if starting_dice == 0 {
            return Err(PyValueError::new_err("starting_dice must be at least 1"));
        }
        let difficulty: Difficulty = difficulty.parse().map_err(PyValueError::new_err)?;
        let first = if self_play {
            SeatConfig::automated(human_name)
        } else {
            SeatConfig::human(human_name)
        };
        let mut config = GameConfig::new()
            .with_starting_dice(starting_dice)
            .with_difficulty(difficulty)
            .with_seat(PlayerId::new(0), first)
            .with_seat(PlayerId::new(1), SeatConfig::automated(opponent_name));
        if let Some(seed) = seed {
            config = config.with_seed(seed);
        }
        Ok(Self(Game::new(config)))
    }

    fn start_game(&mut self) -> bool {
        applied(self.0.start_game())
    }

    fn place_bet(&mut self, quantity: u32, value: u8) -> bool {
        applied(self.0.place_bet(quantity, value))
    }

    fn challenge(&mut self) -> bool {
        applied(self.0.challenge())
    }

    fn next_round(&mut self) -> bool {
        applied(self.0.next_round())
    }

    fn restart_game(&mut self) -> bool {
        applied(self.0.restart_game())
    }

    /// Apply an action for the active player.
    fn apply(&mut self, action: &PyAction) -> bool {
        applied(self.0.apply(action.0))
    }

    #[getter]
    fn phase(&self) -> &'static str {
        phase_name(self.0.state().phase())
    }

    #[getter]
    fn round(&self) -> u32 {
        self.0.state().round()
    }

    #[getter]
    fn active_player(&self) -> PyPlayerId {
        PyPlayerId(self.0.state().active_player_id())
    }

    #[getter]
    fn total_dice(&self) -> u32 {
        self.0.state().total_dice()
    }

    /// Current bet as (player, quantity, value).
    #[getter]
    fn current_bet(&self) -> Option<(PyPlayerId, u32, u8)> {
        self.0
            .state()
            .current_bet()
            .map(|bet| (PyPlayerId(bet.player), bet.quantity, bet.value.value()))
    }

    #[getter]
    fn winner(&self) -> Option<PyPlayerId> {
        self.0.state().winner().map(PyPlayerId)
    }

    #[getter]
    fn is_over(&self) -> bool {
        self.0.state().is_over()
    }

    #[getter]
    fn awaiting_automated_player(&self) -> bool {
        self.0.awaiting_automated_player()
    }

    /// Face values of a player's dice.
    fn dice(&self, player: &PyPlayerId) -> Vec<u8> {
        self.0
            .state()
            .player(player.0)
            .dice
            .iter()
            .map(|d| d.value.value())
            .collect()
    }

    /// Encoded observation for `player` as a float32 array.
    fn observation<'py>(&self, py: Python<'py>, player: &PyPlayerId) -> Bound<'py, PyArray1<f32>> {
        PyArray1::from_slice_bound(py, &self.0.view_for(player.0).encode())
    }

    /// The player's view as JSON.
    fn view_json(&self, player: &PyPlayerId) -> PyResult<String> {
        serde_json::to_string(&self.0.view_for(player.0)).map_err(to_value_error)
    }

    /// Serialized snapshot of the current state.
    fn state_bytes(&self) -> PyResult<Cow<'static, [u8]>> {
        self.0.state().to_bytes().map(Cow::Owned).map_err(to_value_error)
    }

    /// Check that `data` decodes to a consistent snapshot.
    #[staticmethod]
    fn validate_state_bytes(data: &[u8]) -> PyResult<()> {
        GameState::from_bytes(data).map(|_| ()).map_err(to_value_error)
    }

    fn __repr__(&self) -> String {
        let state = self.0.state();
        format!(
            "Game(round={}, phase={}, active=P{}, dice={})",
            state.round(),
            phase_name(state.phase()),
            state.active_player_id().index(),
            state.total_dice()
        )
    }
}

/// Python wrapper for the heuristic opponent.
#[pyclass(name = "HeuristicOpponent")]
pub struct PyHeuristicOpponent(pub HeuristicOpponent);

#[pymethods]
impl PyHeuristicOpponent {
    #[new]
    #[pyo3(signature = (seed = 0))]
    fn new(seed: u64) -> Self {
        Self(HeuristicOpponent::seeded(seed))
    }

    /// Choose an action for the active player of `game`.
    fn choose(&mut self, game: &PyGame) -> PyAction {
        let game = &game.0;
        let view = game.view_for(game.state().active_player_id());
        PyAction(self.0.choose_action(&view, game.config().difficulty))
    }
}
