//! Fire-and-forget persistence of game records.
//!
//! ## Usage
//!
//! ```no_run
//! # async fn run() -> Result<(), liars_dice::recording::SinkError> {
//! use liars_dice::core::GameConfig;
//! use liars_dice::recording::{EventRecorder, JsonLinesSink, RecorderConfig};
//! use liars_dice::rules::Game;
//!
//! let sink = JsonLinesSink::open("games.jsonl").await?;
//! let (recorder, handle) = EventRecorder::spawn(sink, RecorderConfig::default());
//!
//! let mut game = Game::new(GameConfig::default()).with_recorder(recorder);
//! game.start_game();
//!
//! drop(game);
//! let stats = handle.finish().await;
//! # let _ = stats;
//! # Ok(())
//! # }
//! ```

pub mod record;
pub mod recorder;
pub mod sink;

pub use record::{Record, RecordBody, SeatRecord};
pub use recorder::{
    EventRecorder, RecorderConfig, RecorderHandle, RecorderStats, DEFAULT_RECORDER_CAPACITY,
};
pub use sink::{JsonLinesSink, MemorySink, RecordSink, SinkError};
