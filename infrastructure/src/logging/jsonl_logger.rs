//! JSONL transcript writer for blackboard traffic.
//!
//! Each [`ConversationEvent`] becomes one JSON line carrying a `type`, a
//! `logged_at` timestamp and a per-file `seq`, appended through a buffered
//! writer. A transcript can be replayed to audit how a consensus formed.

use blackboard_application::{ConversationEvent, ConversationLogger};
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::warn;

struct Transcript {
    writer: BufWriter<File>,
    seq: u64,
}

/// JSONL conversation logger that writes one JSON object per line.
///
/// Thread-safe via a `Mutex`. Flushes after every line and on `Drop`.
pub struct JsonlConversationLogger {
    transcript: Mutex<Transcript>,
    path: PathBuf,
}

impl JsonlConversationLogger {
    /// Create (or truncate) a transcript at `path`, creating parent
    /// directories as needed.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        Self::open(path.as_ref(), false)
    }

    /// Append to an existing transcript, creating it if missing.
    pub fn append(path: impl AsRef<Path>) -> io::Result<Self> {
        Self::open(path.as_ref(), true)
    }

    fn open(path: &Path, append: bool) -> io::Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path)?;

        Ok(Self {
            transcript: Mutex::new(Transcript {
                writer: BufWriter::new(file),
                seq: 0,
            }),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the transcript file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn record(event: ConversationEvent, seq: u64) -> Value {
        let logged_at = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let mut map = match event.payload {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("data".to_string(), other);
                map
            }
        };
        map.insert("type".to_string(), Value::String(event.event_type.to_string()));
        map.insert("seq".to_string(), Value::from(seq));
        map.insert("logged_at".to_string(), Value::String(logged_at));
        Value::Object(map)
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let mut transcript = self.transcript.lock().unwrap_or_else(PoisonError::into_inner);
        let event_type = event.event_type;
        let seq = transcript.seq + 1;
        let record = Self::record(event, seq);

        let line = match serde_json::to_string(&record) {
            Ok(line) => line,
            Err(e) => {
                warn!("Could not serialize {} event for transcript: {}", event_type, e);
                return;
            }
        };
        transcript.seq = seq;

        let written = writeln!(transcript.writer, "{}", line).and_then(|_| transcript.writer.flush());
        if let Err(e) = written {
            warn!("Could not write to transcript {}: {}", self.path.display(), e);
        }
    }
}

impl Drop for JsonlConversationLogger {
    fn drop(&mut self) {
        let transcript = self.transcript.get_mut().unwrap_or_else(PoisonError::into_inner);
        let _ = transcript.writer.flush();
    }
}
