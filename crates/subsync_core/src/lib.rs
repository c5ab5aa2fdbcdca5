//! Subsync Core - subtitle/audio alignment engine.
//!
//! This crate contains the computational core of automatic subtitle
//! synchronization with zero UI dependencies: spectral feature extraction,
//! speech probability estimation, the shift/skew search and the
//! quality-of-fit analysis. Audio decoding and process orchestration live
//! in the caller.

pub mod analysis;
pub mod audio;
pub mod config;
pub mod features;
pub mod logging;
pub mod model;
mod parallel;
pub mod subtitles;
pub mod sync;

pub use audio::AudioTrack;
pub use config::SyncConfig;
pub use model::SpeechModel;
pub use sync::{synchronize, synchronize_files, SyncError, SyncReport};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
