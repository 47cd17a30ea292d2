//! Python bindings for the liars-dice engine.
//!
//! # Quick Start
//!
//! ```python
//! import liars_dice as ld
//!
//! game = ld.Game(seed=42, difficulty="hard", self_play=True)
//! bot = ld.HeuristicOpponent(seed=7)
//!
//! game.start_game()
//! while not game.is_over:
//!     if game.phase == "revealing":
//!         game.next_round()
//!         continue
//!     obs = game.observation(game.active_player)
//!     game.apply(bot.choose(game))
//! ```

use pyo3::prelude::*;

mod py_core;
mod py_games;

pub use py_core::*;
pub use py_games::*;

/// liars_dice: two-seat Liar's Dice with wild ones.
#[pymodule]
fn liars_dice(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyPlayerId>()?;
    m.add_class::<PyAction>()?;

    m.add_class::<PyGame>()?;
    m.add_class::<PyHeuristicOpponent>()?;

    m.add("OBSERVATION_LEN", crate::core::OBSERVATION_LEN)?;
    Ok(())
}
