//! Core subtitle types.
//!
//! Timing is stored as float seconds relative to track start. Subtitle text
//! is an opaque byte payload: it is never decoded or parsed semantically,
//! only passed through, so any encoding survives a read/transform/write
//! round trip.

use std::path::PathBuf;

/// One subtitle interval: text visible from `begin_secs` to `end_secs`.
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleEvent {
    /// Begin timestamp in seconds.
    pub begin_secs: f64,
    /// End timestamp in seconds; `begin_secs <= end_secs`.
    pub end_secs: f64,
    /// Raw text payload in its original encoding.
    pub text: Vec<u8>,
}

impl SubtitleEvent {
    /// Create a new event.
    pub fn new(begin_secs: f64, end_secs: f64, text: Vec<u8>) -> Self {
        Self {
            begin_secs,
            end_secs,
            text,
        }
    }
}

/// Ordered subtitle events, immutable once parsed.
#[derive(Debug, Clone, Default)]
pub struct SubtitleData {
    pub events: Vec<SubtitleEvent>,
}

impl SubtitleData {
    /// Create empty subtitle data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check whether there are no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// End of the last-ending event, in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.events.iter().map(|e| e.end_secs).fold(0.0, f64::max)
    }
}

/// Errors that can occur during subtitle operations.
#[derive(Debug, thiserror::Error)]
pub enum SubtitleError {
    /// Failed to read subtitle file.
    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write subtitle file.
    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Parse error.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Errors that can occur while parsing SRT content.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Malformed timestamp.
    #[error("invalid time format: '{0}'")]
    InvalidTime(String),

    /// Entry block without a timing line.
    #[error("entry {seq} has no timing line")]
    MissingTiming { seq: i64 },
}
