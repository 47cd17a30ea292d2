//! Background recorder.
//!
//! `EventRecorder` is the game-side handle: `record` never blocks and never
//! fails. Records go through a bounded channel to a Tokio task that writes
//! them to a [`RecordSink`]. When the channel is full the record is dropped
//! and counted.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::record::Record;
use super::sink::RecordSink;

/// Default channel capacity.
pub const DEFAULT_RECORDER_CAPACITY: usize = 1024;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecorderConfig {
    /// Records buffered between the game and the sink.
    pub capacity: usize,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_RECORDER_CAPACITY,
        }
    }
}

impl RecorderConfig {
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Recorder capacity must be at least 1");
        self.capacity = capacity;
        self
    }
}

/// Counters reported when the drain task finishes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RecorderStats {
    pub written: u64,
    pub failed: u64,
}

/// Game-side handle. Clones feed the same sink.
#[derive(Clone, Debug)]
pub struct EventRecorder {
    sender: mpsc::Sender<Record>,
    dropped: Arc<AtomicU64>,
}

impl EventRecorder {
    /// Spawn the drain task for `sink`.
    ///
    /// The task ends once every clone of the returned recorder is dropped.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn spawn<S: RecordSink>(sink: S, config: RecorderConfig) -> (Self, RecorderHandle) {
        let (sender, receiver) = mpsc::channel(config.capacity.max(1));
        let task = tokio::spawn(drain(sink, receiver));
        let recorder = Self {
            sender,
            dropped: Arc::new(AtomicU64::new(0)),
        };
        (recorder, RecorderHandle { task })
    }

    /// Queue a record without waiting.
    pub fn record(&self, record: Record) {
        match self.sender.try_send(record) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                warn!("record queue full, dropping record");
            }
            Err(TrySendError::Closed(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                debug!("recorder closed, dropping record");
            }
        }
    }

    /// Records dropped because the queue was full or closed.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Owner of the drain task.
pub struct RecorderHandle {
    task: JoinHandle<RecorderStats>,
}

impl RecorderHandle {
    /// Wait for the drain task. Drop every recorder first or this never
    /// returns.
    pub async fn finish(self) -> RecorderStats {
        match self.task.await {
            Ok(stats) => stats,
            Err(e) => {
                warn!(error = %e, "recorder task failed");
                RecorderStats::default()
            }
        }
    }
}

async fn drain<S: RecordSink>(mut sink: S, mut receiver: mpsc::Receiver<Record>) -> RecorderStats {
    let mut stats = RecorderStats::default();
    while let Some(record) = receiver.recv().await {
        match sink.write(&record).await {
            Ok(()) => stats.written += 1,
            Err(e) => {
                stats.failed += 1;
                warn!(error = %e, round = record.round, "failed to persist record");
            }
        }
    }
    if let Err(e) = sink.flush().await {
        warn!(error = %e, "failed to flush record sink");
    }
    debug!(written = stats.written, failed = stats.failed, "recorder stopped");
    stats
}
