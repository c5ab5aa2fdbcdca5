//! Subtitle data model and SRT I/O.

pub mod srt;
pub mod transform;
pub mod types;

pub use srt::{parse_srt, read_srt_file, write_srt, write_srt_file};
pub use transform::{transform_events, transform_srt_file};
pub use types::{ParseError, SubtitleData, SubtitleError, SubtitleEvent};
