// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session log line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Session JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Session IO error: {0}")]
    Io(#[from] std::io::Error),
}
