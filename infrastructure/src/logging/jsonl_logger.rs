//! JSONL file writer for discussion events.
//!
//! Each [`DiscussionEvent`] is serialized as a single JSON line stamped
//! with `type`, `timestamp`, and a monotonic `seq`, appended to the file
//! via a buffered writer. Groups log concurrently, so millisecond
//! timestamps can tie; `seq` makes the write order explicit.

use colloquy_application::ports::discussion_logger::{
    DiscussionEvent, DiscussionEventKind, DiscussionLogger,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;

/// Discussion logger that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on `Drop`.
pub struct JsonlDiscussionLogger {
    writer: Mutex<BufWriter<File>>,
    seq: AtomicU64,
    path: PathBuf,
}

impl JsonlDiscussionLogger {
    /// Create a new logger writing to the given path.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    /// Returns `None` if the file cannot be created.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create discussion log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match File::create(path) {
            Ok(f) => f,
            Err(e) => {
                warn!(
                    "Could not create discussion log file {}: {}",
                    path.display(),
                    e
                );
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            seq: AtomicU64::new(0),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Stamp an event payload with its envelope fields. Object payloads are
/// merged in place; anything else is wrapped under `data`.
fn render_record(
    kind: DiscussionEventKind,
    seq: u64,
    timestamp: String,
    payload: serde_json::Value,
) -> serde_json::Value {
    let mut map = match payload {
        serde_json::Value::Object(map) => map,
        other => {
            let mut map = serde_json::Map::new();
            map.insert("data".to_string(), other);
            map
        }
    };
    map.insert(
        "type".to_string(),
        serde_json::Value::String(kind.as_str().to_string()),
    );
    map.insert("seq".to_string(), serde_json::Value::from(seq));
    map.insert("timestamp".to_string(), serde_json::Value::String(timestamp));
    serde_json::Value::Object(map)
}

impl DiscussionLogger for JsonlDiscussionLogger {
    fn log(&self, event: DiscussionEvent) {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst);
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        let record = render_record(event.kind, seq, timestamp, event.payload);

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            // Flush each line so a crashed session keeps its events
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlDiscussionLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
