// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::codec::to_ndjson;
use crate::entry::LogEntry;
use crate::error::SessionResult;

/// Milliseconds since the Unix epoch
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// A stopped session, serialized and ready for persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedSession {
    pub started_at_ms: i64,
    pub entry_count: usize,
    pub ndjson: String,
}

impl FinishedSession {
    pub fn file_name(&self) -> String {
        format!("session_{}.ndjson", self.started_at_ms)
    }

    /// Writes `<dir>/session_<start-ms>.ndjson`, creating `dir` if needed.
    pub fn write_to_dir<P: AsRef<Path>>(&self, dir: P) -> SessionResult<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        fs::write(&path, &self.ndjson)?;
        info!(path = %path.display(), entries = self.entry_count, "session written");
        Ok(path)
    }
}

/// Boolean-gated session buffer.
#[derive(Debug, Default)]
pub struct SessionRecorder {
    enabled: bool,
    started_at_ms: i64,
    entries: Vec<LogEntry>,
}

impl SessionRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Starts a session. Does nothing if one is already running.
    pub fn enable(&mut self, now_ms: i64) {
        if self.enabled {
            return;
        }
        self.enabled = true;
        self.started_at_ms = now_ms;
        self.entries.clear();
        info!(started_at_ms = now_ms, "session logging enabled");
    }

    /// Appends an entry while enabled; returns whether it was kept.
    pub fn record(&mut self, entry: LogEntry) -> bool {
        if self.enabled {
            self.entries.push(entry);
        }
        self.enabled
    }

    /// Stops the session, serializes the buffer and clears it.
    /// `Ok(None)` when logging was not enabled.
    pub fn disable(&mut self) -> SessionResult<Option<FinishedSession>> {
        if !self.enabled {
            debug!("disable called while session logging was off");
            return Ok(None);
        }
        self.enabled = false;
        let ndjson = to_ndjson(&self.entries)?;
        let finished = FinishedSession {
            started_at_ms: self.started_at_ms,
            entry_count: self.entries.len(),
            ndjson,
        };
        self.entries.clear();
        info!(entries = finished.entry_count, "session logging disabled");
        Ok(Some(finished))
    }
}
