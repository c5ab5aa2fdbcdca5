//! Timestamp remapping of subtitle events.

use std::path::Path;

use super::srt::{read_srt_file, write_srt_file};
use super::types::{SubtitleData, SubtitleError, SubtitleEvent};

/// Remap every event's begin/end through `f(seconds)`, preserving text and
/// relative order.
pub fn transform_events<F>(data: &SubtitleData, f: F) -> SubtitleData
where
    F: Fn(f64) -> f64,
{
    SubtitleData {
        events: data
            .events
            .iter()
            .map(|event| SubtitleEvent::new(f(event.begin_secs), f(event.end_secs), event.text.clone()))
            .collect(),
    }
}

/// Read an SRT file, remap all timestamps through `f`, and write the result.
///
/// Sequence numbers come out reassigned from 1; text bytes are untouched.
pub fn transform_srt_file<F>(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    f: F,
) -> Result<(), SubtitleError>
where
    F: Fn(f64) -> f64,
{
    let data = read_srt_file(input)?;
    write_srt_file(output, &transform_events(&data, f))
}
