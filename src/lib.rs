mod config;
mod date;
mod event_times;
mod text;

mod zstd_jsonl;
mod ndjson;
mod store;

mod concurrency;
mod progress;
mod util;

mod aggregate;
mod tweets;
mod join;

pub mod cli;

pub use crate::config::{
    AggregateOptions, EventTimeOptions, StoreOptions, TweetQueryOptions, DEFAULT_CATEGORIES,
    DEFAULT_COLLECTION_PREFIX, DEFAULT_LANG, DEFAULT_TWEETS_COLLECTION,
};
pub use crate::date::{format_epoch, parse_epoch, parse_strict, TimeParser};

// Event-time normalizer, including the per-shape slicing rules.
pub use crate::event_times::{
    classify, convert_lines, extract, extract_plain, extract_prefixed, extract_underscore,
    normalize_line, write_json_array, EventTimes, LabelOrder, LineShape, RawEventTimes,
    UTC_OFFSET_SUFFIX,
};

pub use crate::text::{clean_text, remove_http, remove_line_breaks, remove_oddities};

// Document store abstraction and the directory-backed implementation.
pub use crate::store::{CollectionFile, CollectionFormat, DocumentStore, JsonlStore};
pub use crate::ndjson::{JsonArrayWriter, NdjsonReader};

pub use crate::aggregate::{
    extract_aggregates, extract_category, rank, AggregateKind, AggregateRecord, AggregateReport,
    CategoryFailure, CategoryOutput, LabelCount, DEFAULT_TAG_TOP_N,
};
pub use crate::tweets::{select_tweets, write_listing, TimedTweet, Tweet, LISTING_HEADER};
pub use crate::join::{join_section_files, join_sections, read_doc_ids, read_sections, SectionMap};

pub use crate::util::init_tracing_once;
