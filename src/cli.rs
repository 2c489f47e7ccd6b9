use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};

use crate::config::{AggregateOptions, EventTimeOptions, StoreOptions, TweetQueryOptions};
use crate::date::TimeParser;
use crate::event_times::LabelOrder;

#[derive(Debug, Parser)]
#[command(name = "tweetl")]
#[command(about = "Batch tools for tweet collections: event times, aggregates, listings, section joins")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Normalize event-time lines into a JSON array of {start, end} epoch seconds
    EventTimes(EventTimesArgs),
    /// Write olympics.<category>.langs.json per category
    Langs(AggregateArgs),
    /// Write olympics.<category>.tags.json per category
    Tags(AggregateArgs),
    /// Print tweets of one language sorted by creation time
    Tweets(TweetsArgs),
    /// Join section labels onto feature rows (CSV on stdout)
    Join(JoinArgs),
}

#[derive(Debug, Args)]
pub struct EventTimesArgs {
    /// Read lines from this file instead of stdin
    #[arg(long)]
    pub input: Option<PathBuf>,
    /// Date grammar: strict (tweet format only) or flexible
    #[arg(long, default_value_t = TimeParser::Flexible)]
    pub parser: TimeParser,
    /// Shorthand for --parser strict
    #[arg(long, conflicts_with = "parser")]
    pub strict: bool,
    /// Label the first parsed value `end` and the second `start`
    #[arg(long)]
    pub swap_labels: bool,
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Debug, Args)]
pub struct StoreArgs {
    /// Directory holding <collection>.jsonl[.zst] files
    #[arg(long)]
    pub store: PathBuf,
    /// Read buffer per collection file, in bytes (at least 8 KiB)
    #[arg(long, default_value_t = 256 * 1024)]
    pub read_buffer: usize,
}

#[derive(Debug, Args)]
pub struct AggregateArgs {
    #[command(flatten)]
    pub store: StoreArgs,
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
    /// Repeatable; defaults to all, gymnastics, tennis, archery, judo, fencing
    #[arg(long = "category")]
    pub categories: Vec<String>,
    #[arg(long, default_value = "olympics")]
    pub prefix: String,
    /// Keep the N highest counts; 0 keeps everything
    #[arg(long)]
    pub top: Option<usize>,
    /// Keep store order instead of sorting by count
    #[arg(long)]
    pub no_sort: bool,
    #[arg(long)]
    pub pretty: bool,
    /// Categories processed at once
    #[arg(long, default_value_t = 1)]
    pub jobs: usize,
    #[arg(long)]
    pub progress: bool,
    /// Write buffer per output file, in bytes (at least 8 KiB)
    #[arg(long, default_value_t = 64 * 1024)]
    pub write_buffer: usize,
}

#[derive(Debug, Args)]
pub struct TweetsArgs {
    #[command(flatten)]
    pub store: StoreArgs,
    /// A number is taken as the limit, anything else as the keyword
    #[arg(value_name = "KEYWORD|LIMIT")]
    pub terms: Vec<String>,
    /// Keep only tweets whose text contains this (case-sensitive)
    #[arg(long)]
    pub keyword: Option<String>,
    #[arg(long, default_value = "en")]
    pub lang: String,
    /// Stop after this many matching tweets (before sorting)
    #[arg(long)]
    pub limit: Option<usize>,
    #[arg(long, default_value = "tweets")]
    pub collection: String,
    /// Print RFC 3339 timestamps instead of epoch seconds
    #[arg(long)]
    pub human: bool,
}

#[derive(Debug, Args)]
pub struct JoinArgs {
    /// TSV: doc_id, section
    pub sections: PathBuf,
    /// TSV whose multi-field rows give the document ids in order
    pub ids: PathBuf,
    /// Space-separated features, one line per document id
    pub features: PathBuf,
}

impl EventTimesArgs {
    pub fn options(&self) -> EventTimeOptions {
        let parser = if self.strict { TimeParser::Strict } else { self.parser };
        let labels = if self.swap_labels { LabelOrder::Swapped } else { LabelOrder::Natural };
        EventTimeOptions::default().with_parser(parser).with_labels(labels).with_pretty(self.pretty)
    }
}

impl StoreArgs {
    pub fn options(&self) -> StoreOptions {
        StoreOptions::default().with_root(&self.store).with_io_read_buffer(self.read_buffer)
    }
}

impl AggregateArgs {
    pub fn options(&self) -> AggregateOptions {
        let opts = AggregateOptions::default()
            .with_collection_prefix(&self.prefix)
            .with_top_n(self.top)
            .with_sort(!self.no_sort)
            .with_pretty(self.pretty)
            .with_concurrency(self.jobs)
            .with_progress(self.progress)
            .with_io_write_buffer(self.write_buffer);
        if self.categories.is_empty() {
            opts
        } else {
            opts.with_categories(&self.categories)
        }
    }
}

impl TweetsArgs {
    /// Positional terms fill whatever `--keyword`/`--limit` left open; each may be given once.
    pub fn query(&self) -> Result<TweetQueryOptions> {
        let mut keyword = self.keyword.clone();
        let mut limit = self.limit;
        for term in &self.terms {
            match term.parse::<usize>() {
                Ok(n) if limit.is_none() => limit = Some(n),
                Ok(_) => bail!("limit given twice (positional '{}')", term),
                Err(_) if keyword.is_none() => keyword = Some(term.clone()),
                Err(_) => bail!("keyword given twice (positional '{}')", term),
            }
        }

        let opts = TweetQueryOptions::default()
            .with_collection(&self.collection)
            .with_lang(&self.lang)
            .with_limit(limit)
            .with_human_timestamps(self.human);
        Ok(match keyword {
            Some(kw) => opts.with_keyword(kw),
            None => opts,
        })
    }
}
