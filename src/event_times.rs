//! Event-time normalization: classify a raw line into one of three shapes,
//! slice out the start/end date texts and parse both into epoch seconds.

use crate::config::EventTimeOptions;
use crate::date::parse_epoch;
use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::io::{BufRead, Write};

/// Characters consumed from the front of underscore and prefixed lines.
pub const HEAD_SKIP: usize = 7;
/// Marker length stripped from each token on plain lines (and the underscore end token).
pub const FIELD_MARKER_LEN: usize = 2;
/// Offset appended to texts that arrive without one.
pub const UTC_OFFSET_SUFFIX: &str = "-0100";
/// Literal that marks a prefixed line.
pub const LINE_PREFIX: &str = "bar";
/// Trailing marker of an underscore line.
pub const UNDERSCORE_MARKER: char = '_';

/// Input shape of a raw line. Classification checks in declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineShape {
    Underscore,
    Prefixed,
    Plain,
}

/// Which parsed value gets which label in the emitted record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LabelOrder {
    /// first text -> `start`, second text -> `end`
    #[default]
    Natural,
    /// first text -> `end`, second text -> `start`
    Swapped,
}

/// Date texts sliced out of one line, before parsing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawEventTimes {
    pub start: String,
    pub end: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct EventTimes {
    pub start: i64,
    pub end: i64,
}

pub fn classify(line: &str) -> LineShape {
    if line.ends_with(UNDERSCORE_MARKER) {
        LineShape::Underscore
    } else if line.starts_with(LINE_PREFIX) {
        LineShape::Prefixed
    } else {
        LineShape::Plain
    }
}

/// Slice the two date texts out of `line` according to its shape.
pub fn extract(line: &str) -> Result<RawEventTimes> {
    match classify(line) {
        LineShape::Underscore => extract_underscore(line),
        LineShape::Prefixed => extract_prefixed(line),
        LineShape::Plain => extract_plain(line),
    }
}

pub fn extract_underscore(line: &str) -> Result<RawEventTimes> {
    let (first, second) = two_tokens(char_slice(line, HEAD_SKIP, None))?;
    Ok(RawEventTimes {
        start: first.to_string(),
        end: with_offset(char_slice(second, FIELD_MARKER_LEN, None)),
    })
}

/// The end token only carries a time of day; it is spliced into the start text
/// between its first 11 characters and everything from character 16 on.
pub fn extract_prefixed(line: &str) -> Result<RawEventTimes> {
    let (start, end) = two_tokens(char_slice(line, HEAD_SKIP, None))?;
    let mut rebuilt = String::with_capacity(start.len() + end.len());
    rebuilt.push_str(char_slice(start, 0, Some(11)));
    rebuilt.push_str(end);
    rebuilt.push_str(char_slice(start, 16, None));
    Ok(RawEventTimes { start: start.to_string(), end: rebuilt })
}

pub fn extract_plain(line: &str) -> Result<RawEventTimes> {
    let (first, second) = two_tokens(line)?;
    Ok(RawEventTimes {
        start: with_offset(char_slice(first, FIELD_MARKER_LEN, None)),
        end: with_offset(char_slice(second, FIELD_MARKER_LEN, None)),
    })
}

/// Extract and parse one (already trimmed) line.
pub fn normalize_line(line: &str, opts: &EventTimeOptions) -> Result<EventTimes> {
    let raw = extract(line)?;
    let first = parse_epoch(opts.parser, &raw.start)?;
    let second = parse_epoch(opts.parser, &raw.end)?;
    Ok(match opts.labels {
        LabelOrder::Natural => EventTimes { start: first, end: second },
        LabelOrder::Swapped => EventTimes { start: second, end: first },
    })
}

/// Convert every non-blank line of `reader`, in order. The first bad line fails the run.
pub fn convert_lines<R: BufRead>(reader: R, opts: &EventTimeOptions) -> Result<Vec<EventTimes>> {
    let mut out = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("read line {}", idx + 1))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let rec = normalize_line(line, opts).with_context(|| format!("line {}: '{}'", idx + 1, line))?;
        out.push(rec);
    }
    tracing::debug!(records = out.len(), parser = %opts.parser, "event times converted");
    Ok(out)
}

pub fn write_json_array<W: Write>(records: &[EventTimes], mut writer: W, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut writer, records)?;
    } else {
        serde_json::to_writer(&mut writer, records)?;
    }
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

fn two_tokens(text: &str) -> Result<(&str, &str)> {
    let mut it = text.split_whitespace();
    match (it.next(), it.next(), it.next()) {
        (Some(a), Some(b), None) => Ok((a, b)),
        _ => bail!("expected 2 whitespace-separated fields, got {}", text.split_whitespace().count()),
    }
}

fn with_offset(text: &str) -> String {
    format!("{text}{UTC_OFFSET_SUFFIX}")
}

/// Character-indexed slice that clamps to the string end instead of panicking.
fn char_slice(s: &str, from: usize, to: Option<usize>) -> &str {
    let byte_at = |n: usize| s.char_indices().nth(n).map(|(i, _)| i).unwrap_or(s.len());
    let lo = byte_at(from);
    let hi = to.map(byte_at).unwrap_or(s.len()).max(lo);
    &s[lo..hi]
}
