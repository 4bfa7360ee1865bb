//! JSON-lines record of a session's commitments and reveals.

use fair_dice_core::{GameEvent, SessionId};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct Entry<'a> {
    session: Option<SessionId>,
    event: &'a GameEvent,
}

/// Appends one JSON object per line
pub struct Transcript {
    out: Box<dyn Write + Send>,
}

impl Transcript {
    /// Open `path` for appending, creating it if needed
    pub fn create(path: &Path) -> io::Result<Self> {
        let file: File = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(Box::new(BufWriter::new(file))))
    }

    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self { out }
    }

    /// Whether an event belongs in the transcript
    pub fn wants(event: &GameEvent) -> bool {
        matches!(
            event,
            GameEvent::Committed(_) | GameEvent::Revealed(_) | GameEvent::Finished(_)
        )
    }

    pub fn record(
        &mut self,
        session: Option<SessionId>,
        event: &GameEvent,
    ) -> Result<(), TranscriptError> {
        serde_json::to_writer(&mut self.out, &Entry { session, event })?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}
