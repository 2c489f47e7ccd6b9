//! Tweet selection and listing: language filter, optional keyword, cursor limit,
//! then an ascending stable sort on the parsed `created_at`.

use crate::config::TweetQueryOptions;
use crate::date::{format_epoch, parse_strict};
use crate::store::DocumentStore;
use crate::text::clean_text;
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::io::Write;

pub const LISTING_HEADER: &str = "TimeStamp Tweet";

/// The fields the listing needs; everything else in the document is ignored.
#[derive(Clone, Debug, Deserialize)]
pub struct Tweet {
    pub lang: Option<String>,
    pub created_at: String,
    pub text: String,
}

/// A selected tweet: epoch seconds plus the cleaned body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimedTweet {
    pub timestamp: i64,
    pub text: String,
}

impl Tweet {
    pub fn matches(&self, opts: &TweetQueryOptions) -> bool {
        if self.lang.as_deref() != Some(opts.lang.as_str()) {
            return false;
        }
        match &opts.keyword {
            Some(kw) => self.text.contains(kw.as_str()),
            None => true,
        }
    }

    pub fn timed(&self) -> Result<TimedTweet> {
        let timestamp = parse_strict(&self.created_at)
            .ok_or_else(|| anyhow!("unparsable created_at '{}'", self.created_at))?;
        Ok(TimedTweet { timestamp, text: clean_text(&self.text) })
    }
}

pub fn select_tweets(store: &dyn DocumentStore, opts: &TweetQueryOptions) -> Result<Vec<TimedTweet>> {
    let mut selected = Vec::new();
    let mut seen = 0u64;
    let limit = opts.limit;

    store.for_each(&opts.collection, &mut |doc: Value| {
        seen += 1;
        if limit.is_some_and(|n| selected.len() >= n) {
            return Ok(());
        }
        // Cheap language check before the typed parse so foreign records with
        // odd shapes don't fail the run.
        if doc.get("lang").and_then(|v| v.as_str()) != Some(opts.lang.as_str()) {
            return Ok(());
        }
        let tweet: Tweet = serde_json::from_value(doc)
            .with_context(|| format!("{} record {}", opts.collection, seen))?;
        if !tweet.matches(opts) {
            return Ok(());
        }
        selected.push(tweet.timed().with_context(|| format!("{} record {}", opts.collection, seen))?);
        Ok(())
    })?;

    selected.sort_by_key(|t| t.timestamp);
    tracing::info!(collection = %opts.collection, lang = %opts.lang, scanned = seen, selected = selected.len(), "tweets selected");
    Ok(selected)
}

/// Header line, then `<timestamp> <text>` per tweet.
pub fn write_listing<W: Write>(tweets: &[TimedTweet], mut writer: W, human_timestamps: bool) -> Result<()> {
    writeln!(writer, "{}", LISTING_HEADER)?;
    for t in tweets {
        if human_timestamps {
            writeln!(writer, "{} {}", format_epoch(t.timestamp)?, t.text)?;
        } else {
            writeln!(writer, "{} {}", t.timestamp, t.text)?;
        }
    }
    writer.flush()?;
    Ok(())
}
