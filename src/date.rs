//! Timestamp parsing for tweet `created_at` values and event-time strings.
//! Every successful parse yields whole seconds since the Unix epoch (UTC).

use anyhow::{anyhow, Result};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use time::format_description::well_known::{Rfc2822, Rfc3339};
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

/// Which date grammar `parse_epoch` accepts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TimeParser {
    /// Only the tweet wire format: `Wed Jul 25 10:00:00 +0000 2012`.
    Strict,
    /// The strict format plus ISO-8601 variants, RFC 3339, RFC 2822
    /// and bare dates. Inputs without an offset are taken as UTC.
    /// A `_` end-of-field marker right before the offset (or at the end) is ignored.
    #[default]
    Flexible,
}

impl fmt::Display for TimeParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeParser::Strict => f.write_str("strict"),
            TimeParser::Flexible => f.write_str("flexible"),
        }
    }
}

impl FromStr for TimeParser {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(TimeParser::Strict),
            "flexible" | "free" => Ok(TimeParser::Flexible),
            other => Err(format!("unknown time parser '{other}' (expected strict|flexible)")),
        }
    }
}

/// Parse `text` into UTC epoch seconds.
pub fn parse_epoch(parser: TimeParser, text: &str) -> Result<i64> {
    let s = text.trim();
    let parsed = match parser {
        TimeParser::Strict => parse_strict(s),
        TimeParser::Flexible => parse_flexible(s),
    };
    parsed.ok_or_else(|| anyhow!("unparsable date '{}' ({} parser)", s, parser))
}

/// Tweet `created_at` format.
pub fn parse_strict(s: &str) -> Option<i64> {
    OffsetDateTime::parse(
        s,
        format_description!(
            "[weekday repr:short] [month repr:short] [day] [hour]:[minute]:[second] [offset_hour sign:mandatory][offset_minute] [year]"
        ),
    )
    .ok()
    .map(|dt| dt.unix_timestamp())
}

fn parse_flexible(s: &str) -> Option<i64> {
    if let Some(ts) = parse_strict(s) {
        return Some(ts);
    }
    let stripped = strip_end_marker(s);
    let s = stripped.as_ref();

    let with_offset = [
        OffsetDateTime::parse(
            s,
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][offset_hour sign:mandatory][offset_minute]"),
        ),
        OffsetDateTime::parse(
            s,
            format_description!("[year]-[month]-[day] [hour]:[minute]:[second][offset_hour sign:mandatory][offset_minute]"),
        ),
        OffsetDateTime::parse(s, &Rfc3339),
        OffsetDateTime::parse(s, &Rfc2822),
    ];
    if let Some(dt) = with_offset.into_iter().flatten().next() {
        return Some(dt.unix_timestamp());
    }

    let naive = [
        PrimitiveDateTime::parse(s, format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]")),
        PrimitiveDateTime::parse(s, format_description!("[year]-[month]-[day] [hour]:[minute]:[second]")),
    ];
    if let Some(dt) = naive.into_iter().flatten().next() {
        return Some(dt.assume_utc().unix_timestamp());
    }

    Date::parse(s, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|d| d.midnight().assume_utc().unix_timestamp())
}

/// `2012-01-01T11:00:00_-0100` -> `2012-01-01T11:00:00-0100`, `..._` -> `...`.
fn strip_end_marker(s: &str) -> Cow<'_, str> {
    if let Some(head) = s.strip_suffix('_') {
        return Cow::Borrowed(head);
    }
    match s.rsplit_once('_') {
        Some((head, offset)) if is_utc_offset(offset) => Cow::Owned(format!("{head}{offset}")),
        _ => Cow::Borrowed(s),
    }
}

fn is_utc_offset(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 5 && matches!(b[0], b'+' | b'-') && b[1..].iter().all(u8::is_ascii_digit)
}

/// RFC 3339 rendering of an epoch second, in UTC.
pub fn format_epoch(ts: i64) -> Result<String> {
    let dt = OffsetDateTime::from_unix_timestamp(ts)?;
    Ok(dt.format(&Rfc3339)?)
}
