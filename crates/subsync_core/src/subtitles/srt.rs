//! Binary pass-through SRT reader and writer.
//!
//! SRT files come in many encodings; instead of guessing, everything is
//! handled as bytes and only the structural parts (sequence numbers,
//! timestamps, separators) are interpreted as ASCII. Text payloads pass
//! through untouched.
//!
//! Parsing tolerates real-world sloppiness: UTF BOMs, mixed line endings,
//! and blocks whose first line is not a sequence number (these are merged
//! into the previous entry's text). The writer emits Windows line endings,
//! no BOM, and reassigns sequence numbers starting at 1.

use std::fs;
use std::path::Path;

use super::types::{ParseError, SubtitleData, SubtitleError, SubtitleEvent};

const BOMS: [&[u8]; 2] = [b"\xEF\xBB\xBF", b"\xFE\xFF"];

/// Parse raw SRT bytes.
pub fn parse_srt(data: &[u8]) -> Result<SubtitleData, ParseError> {
    let data = normalize_line_endings(strip_bom(data));

    let mut out = SubtitleData::new();

    for block in split_blocks(&data) {
        let lines: Vec<&[u8]> = block.split(|&b| b == b'\n').collect();

        let seq = match parse_ascii_int(lines[0]) {
            Some(seq) => seq,
            None => {
                // Not a sequence number: stray continuation of the previous
                // entry, folded into its text. Orphans before the first
                // valid entry are dropped.
                if let Some(last) = out.events.last_mut() {
                    for line in &lines {
                        last.text.push(b'\n');
                        last.text.extend_from_slice(line);
                    }
                }
                continue;
            }
        };

        if lines.len() < 2 {
            return Err(ParseError::MissingTiming { seq });
        }

        let (begin, end) = parse_timing(lines[1])?;
        let text = lines[2..].join(&b'\n');

        out.events.push(SubtitleEvent::new(begin, end, text));
    }

    Ok(out)
}

/// Read and parse an SRT file.
pub fn read_srt_file(path: impl AsRef<Path>) -> Result<SubtitleData, SubtitleError> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|source| SubtitleError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_srt(&data)?)
}

/// Serialize subtitle data to SRT bytes.
///
/// Sequence numbers are reassigned starting at 1; text bytes pass through
/// with line endings converted to CRLF.
pub fn write_srt(data: &SubtitleData) -> Vec<u8> {
    let mut out = Vec::new();
    for (i, event) in data.events.iter().enumerate() {
        out.extend_from_slice(format!("{}\r\n", i + 1).as_bytes());
        out.extend_from_slice(
            format!(
                "{} --> {}\r\n",
                format_srt_time(event.begin_secs),
                format_srt_time(event.end_secs)
            )
            .as_bytes(),
        );

        let text = trim_trailing_whitespace(&event.text);
        for &byte in text {
            if byte == b'\n' {
                out.extend_from_slice(b"\r\n");
            } else {
                out.push(byte);
            }
        }
        out.extend_from_slice(b"\r\n\r\n");
    }
    out
}

/// Write subtitle data to an SRT file.
pub fn write_srt_file(path: impl AsRef<Path>, data: &SubtitleData) -> Result<(), SubtitleError> {
    let path = path.as_ref();
    fs::write(path, write_srt(data)).map_err(|source| SubtitleError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Format float seconds as an SRT timestamp (`HH:MM:SS,mmm`).
pub fn format_srt_time(secs: f64) -> String {
    let msecs = (secs * 1000.0).round().max(0.0) as u64;
    let millis = msecs % 1000;
    let total_secs = msecs / 1000;
    format!(
        "{:02}:{:02}:{:02},{:03}",
        total_secs / 3600,
        (total_secs / 60) % 60,
        total_secs % 60,
        millis
    )
}

/// Parse an SRT timestamp (`HH:MM:SS,mmm`, period also accepted).
pub fn parse_srt_time(bytes: &[u8]) -> Option<f64> {
    let text = std::str::from_utf8(bytes).ok()?.trim();
    let mut parts = text.split(':');

    let hours: f64 = parts.next()?.parse().ok()?;
    let minutes: f64 = parts.next()?.parse().ok()?;
    let seconds: f64 = parts.next()?.replace(',', ".").parse().ok()?;
    if parts.next().is_some() {
        return None;
    }

    Some((hours * 60.0 + minutes) * 60.0 + seconds)
}

fn parse_timing(line: &[u8]) -> Result<(f64, f64), ParseError> {
    let invalid = || ParseError::InvalidTime(String::from_utf8_lossy(line).into_owned());

    let separator = b" --> ";
    let pos = line
        .windows(separator.len())
        .position(|w| w == separator)
        .ok_or_else(invalid)?;

    let begin = parse_srt_time(&line[..pos]).ok_or_else(invalid)?;
    let end = parse_srt_time(&line[pos + separator.len()..]).ok_or_else(invalid)?;
    Ok((begin, end))
}

fn strip_bom(data: &[u8]) -> &[u8] {
    for bom in BOMS {
        if data.starts_with(bom) {
            return &data[bom.len()..];
        }
    }
    data
}

fn normalize_line_endings(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut i = 0;
    while i < data.len() {
        if data[i] == b'\r' {
            out.push(b'\n');
            if i + 1 < data.len() && data[i + 1] == b'\n' {
                i += 1;
            }
        } else {
            out.push(data[i]);
        }
        i += 1;
    }
    out
}

/// Non-empty, whitespace-trimmed entry blocks separated by blank lines.
fn split_blocks(data: &[u8]) -> impl Iterator<Item = &[u8]> {
    split_on(data, b"\n\n")
        .into_iter()
        .map(trim_ascii)
        .filter(|block| !block.is_empty())
}

fn split_on<'a>(data: &'a [u8], separator: &[u8]) -> Vec<&'a [u8]> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i + separator.len() <= data.len() {
        if &data[i..i + separator.len()] == separator {
            parts.push(&data[start..i]);
            i += separator.len();
            start = i;
        } else {
            i += 1;
        }
    }
    parts.push(&data[start..]);
    parts
}

fn trim_ascii(data: &[u8]) -> &[u8] {
    let start = data
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(data.len());
    let end = data
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |p| p + 1);
    &data[start..end]
}

fn trim_trailing_whitespace(data: &[u8]) -> &[u8] {
    let end = data
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(0, |p| p + 1);
    &data[..end]
}

fn parse_ascii_int(bytes: &[u8]) -> Option<i64> {
    std::str::from_utf8(bytes).ok()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC: &[u8] = b"1\n00:00:01,000 --> 00:00:04,000\nHello, world!\n\n2\n00:00:05,500 --> 00:00:08,000\nSecond line.\nStill second.\n";

    #[test]
    fn parses_basic_file() {
        let data = parse_srt(BASIC).unwrap();

        assert_eq!(data.len(), 2);
        assert!((data.events[0].begin_secs - 1.0).abs() < 1e-9);
        assert!((data.events[0].end_secs - 4.0).abs() < 1e-9);
        assert_eq!(data.events[0].text, b"Hello, world!");
        assert!((data.events[1].begin_secs - 5.5).abs() < 1e-9);
        assert_eq!(data.events[1].text, b"Second line.\nStill second.");
    }

    #[test]
    fn parses_crlf_and_bom() {
        let mut input = b"\xEF\xBB\xBF".to_vec();
        input.extend_from_slice(b"1\r\n00:00:01,000 --> 00:00:02,000\r\nText\r\n");

        let data = parse_srt(&input).unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data.events[0].text, b"Text");
    }

    #[test]
    fn merges_orphan_blocks_into_previous_entry() {
        let input = b"1\n00:00:01,000 --> 00:00:02,000\nFirst part\n\ncontinued text\n\n2\n00:00:03,000 --> 00:00:04,000\nNext\n";

        let data = parse_srt(input).unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data.events[0].text, b"First part\ncontinued text");
    }

    #[test]
    fn text_bytes_pass_through_undecoded() {
        // Latin-1 payload that is not valid UTF-8.
        let mut input = b"1\n00:00:01,000 --> 00:00:02,000\n".to_vec();
        input.extend_from_slice(&[0xE4, 0xF6, 0xE5]);
        input.push(b'\n');

        let data = parse_srt(&input).unwrap();
        assert_eq!(data.events[0].text, vec![0xE4, 0xF6, 0xE5]);

        let written = write_srt(&data);
        let back = parse_srt(&written).unwrap();
        assert_eq!(back.events[0].text, vec![0xE4, 0xF6, 0xE5]);
    }

    #[test]
    fn malformed_timing_is_an_error() {
        let input = b"1\nnot a timing line\nText\n";
        let err = parse_srt(input).unwrap_err();
        assert!(matches!(err, ParseError::InvalidTime(_)));
    }

    #[test]
    fn time_parsing_accepts_comma_and_period() {
        assert!((parse_srt_time(b"00:00:01,500").unwrap() - 1.5).abs() < 1e-9);
        assert!((parse_srt_time(b"00:00:01.500").unwrap() - 1.5).abs() < 1e-9);
        assert!((parse_srt_time(b"01:02:03,004").unwrap() - 3723.004).abs() < 1e-9);
        assert!(parse_srt_time(b"1:2").is_none());
    }

    #[test]
    fn formatting_rounds_to_milliseconds() {
        assert_eq!(format_srt_time(0.0), "00:00:00,000");
        assert_eq!(format_srt_time(1.234), "00:00:01,234");
        assert_eq!(format_srt_time(0.9996), "00:00:01,000");
        assert_eq!(format_srt_time(3723.5), "01:02:03,500");
        // Negative timestamps from extreme shifts clamp to zero.
        assert_eq!(format_srt_time(-1.0), "00:00:00,000");
    }

    #[test]
    fn writer_renumbers_from_one() {
        let data = parse_srt(b"7\n00:00:01,000 --> 00:00:02,000\nA\n\n9\n00:00:03,000 --> 00:00:04,000\nB\n").unwrap();
        let written = write_srt(&data);
        let text = String::from_utf8(written).unwrap();

        assert!(text.starts_with("1\r\n00:00:01,000"));
        assert!(text.contains("\r\n\r\n2\r\n00:00:03,000"));
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subs.srt");

        let data = parse_srt(BASIC).unwrap();
        write_srt_file(&path, &data).unwrap();
        let back = read_srt_file(&path).unwrap();

        assert_eq!(back.events, data.events);
    }
}
