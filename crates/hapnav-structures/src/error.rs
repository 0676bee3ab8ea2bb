// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Common error type for hapnav data operations.
///
/// Covers parameter validation, (de)serialization of grids and logs, and
/// internal invariant breaches that indicate a bug rather than bad input.
///
/// # Examples
/// ```
/// use hapnav_structures::NavDataError;
///
/// fn validate_probes(count: u32) -> Result<(), NavDataError> {
///     if count == 0 {
///         return Err(NavDataError::BadParameters("Probe count must be > 0".into()));
///     }
///     Ok(())
/// }
///
/// assert!(validate_probes(0).is_err());
/// assert!(validate_probes(8).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum NavDataError {
    /// Failed to deserialize text or bytes into data structures
    DeserializationError(String),
    /// Failed to serialize data structures
    SerializationError(String),
    /// Invalid parameters provided to a function
    BadParameters(String),
    /// Internal error indicating a bug (please report)
    InternalError(String),
}

impl Display for NavDataError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            NavDataError::DeserializationError(msg) => {
                write!(f, "Failed to Deserialize: {}", msg)
            }
            NavDataError::SerializationError(msg) => {
                write!(f, "Failed to Serialize: {}", msg)
            }
            NavDataError::BadParameters(msg) => write!(f, "Bad Parameters: {}", msg),
            NavDataError::InternalError(msg) => write!(
                f,
                "Internal Error, please raise an issue: {}",
                msg
            ),
        }
    }
}

impl Error for NavDataError {}
