//! Record sinks.

use std::path::Path;
use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use thiserror::Error;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};

use super::record::Record;

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("sink rejected record: {0}")]
    Rejected(String),
}

/// Destination for recorded game records.
///
/// Sinks run on the recorder's background task, never on the game's call
/// path, so a slow or failing sink only costs records.
pub trait RecordSink: Send + 'static {
    fn write<'a>(&'a mut self, record: &'a Record) -> BoxFuture<'a, Result<(), SinkError>>;

    fn flush(&mut self) -> BoxFuture<'_, Result<(), SinkError>> {
        Box::pin(async { Ok(()) })
    }
}

/// Appends one JSON object per line to a file.
pub struct JsonLinesSink {
    out: BufWriter<File>,
}

impl JsonLinesSink {
    /// Open `path` for appending, creating it if needed.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        Ok(Self {
            out: BufWriter::new(file),
        })
    }
}

impl RecordSink for JsonLinesSink {
    fn write<'a>(&'a mut self, record: &'a Record) -> BoxFuture<'a, Result<(), SinkError>> {
        Box::pin(async move {
            let mut line = serde_json::to_vec(record)?;
            line.push(b'\n');
            self.out.write_all(&line).await?;
            Ok(())
        })
    }

    fn flush(&mut self) -> BoxFuture<'_, Result<(), SinkError>> {
        Box::pin(async move {
            self.out.flush().await?;
            Ok(())
        })
    }
}

/// Keeps records in memory. Clones share the same buffer.
#[derive(Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<Record>>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything written so far.
    #[must_use]
    pub fn records(&self) -> Vec<Record> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl RecordSink for MemorySink {
    fn write<'a>(&'a mut self, record: &'a Record) -> BoxFuture<'a, Result<(), SinkError>> {
        Box::pin(async move {
            self.records
                .lock()
                .map_err(|_| SinkError::Rejected("memory sink poisoned".into()))?
                .push(record.clone());
            Ok(())
        })
    }
}
