use crate::date::TimeParser;
use crate::event_times::LabelOrder;
use std::path::{Path, PathBuf};

/// Categories the aggregate collections are bucketed by.
pub const DEFAULT_CATEGORIES: &[&str] = &["all", "gymnastics", "tennis", "archery", "judo", "fencing"];
pub const DEFAULT_COLLECTION_PREFIX: &str = "olympics";
pub const DEFAULT_TWEETS_COLLECTION: &str = "tweets";
pub const DEFAULT_LANG: &str = "en";

/// Options for the event-time converter.
#[derive(Clone, Copy, Debug, Default)]
pub struct EventTimeOptions {
    pub parser: TimeParser,
    pub labels: LabelOrder,
    pub pretty: bool,
}

impl EventTimeOptions {
    pub fn with_parser(mut self, parser: TimeParser) -> Self {
        self.parser = parser;
        self
    }
    pub fn with_labels(mut self, labels: LabelOrder) -> Self {
        self.labels = labels;
        self
    }
    pub fn with_pretty(mut self, yes: bool) -> Self {
        self.pretty = yes;
        self
    }
}

/// Where the document store lives and how it is read.
#[derive(Clone, Debug)]
pub struct StoreOptions {
    pub root: PathBuf,
    pub read_buffer_bytes: usize, // BufReader capacity
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self { root: PathBuf::from("./store"), read_buffer_bytes: 256 * 1024 }
    }
}

impl StoreOptions {
    pub fn with_root(mut self, root: impl AsRef<Path>) -> Self {
        self.root = root.as_ref().to_path_buf();
        self
    }
    pub fn with_io_read_buffer(mut self, bytes: usize) -> Self {
        self.read_buffer_bytes = bytes.max(8 * 1024);
        self
    }
}

/// Options for per-category aggregate extraction.
#[derive(Clone, Debug)]
pub struct AggregateOptions {
    pub collection_prefix: String,
    pub categories: Vec<String>,
    pub top_n: Option<usize>,       // None = per-kind default, Some(0) = keep everything
    pub sort: bool,                 // descending by count
    pub pretty: bool,
    pub concurrency: usize,         // categories processed at once
    pub progress: bool,
    pub write_buffer_bytes: usize,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            collection_prefix: DEFAULT_COLLECTION_PREFIX.to_string(),
            categories: DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect(),
            top_n: None,
            sort: true,
            pretty: false,
            concurrency: 1,
            progress: false,
            write_buffer_bytes: 64 * 1024,
        }
    }
}

impl AggregateOptions {
    pub fn with_collection_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.collection_prefix = prefix.into();
        self
    }
    /// Replace the category list. Entries are trimmed and lowercased; empty ones are dropped.
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut v: Vec<String> = Vec::new();
        for c in categories {
            let c = c.as_ref().trim().to_lowercase();
            if !c.is_empty() && !v.contains(&c) {
                v.push(c);
            }
        }
        self.categories = v;
        self
    }
    pub fn with_top_n(mut self, n: Option<usize>) -> Self {
        self.top_n = n;
        self
    }
    pub fn with_sort(mut self, yes: bool) -> Self {
        self.sort = yes;
        self
    }
    pub fn with_pretty(mut self, yes: bool) -> Self {
        self.pretty = yes;
        self
    }
    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
    pub fn with_io_write_buffer(mut self, bytes: usize) -> Self {
        self.write_buffer_bytes = bytes.max(8 * 1024);
        self
    }
}

/// Tweet selection for the listing operation.
#[derive(Clone, Debug)]
pub struct TweetQueryOptions {
    pub collection: String,
    pub lang: String,
    pub keyword: Option<String>,    // case-sensitive substring of the body
    pub limit: Option<usize>,       // cap on matching records read, before sorting
    pub human_timestamps: bool,     // RFC 3339 instead of epoch seconds in the listing
}

impl Default for TweetQueryOptions {
    fn default() -> Self {
        Self {
            collection: DEFAULT_TWEETS_COLLECTION.to_string(),
            lang: DEFAULT_LANG.to_string(),
            keyword: None,
            limit: None,
            human_timestamps: false,
        }
    }
}

impl TweetQueryOptions {
    pub fn with_collection(mut self, name: impl Into<String>) -> Self {
        self.collection = name.into();
        self
    }
    pub fn with_lang(mut self, lang: impl AsRef<str>) -> Self {
        self.lang = lang.as_ref().trim().to_string();
        self
    }
    /// Empty keywords are ignored.
    pub fn with_keyword(mut self, kw: impl Into<String>) -> Self {
        let kw = kw.into();
        self.keyword = if kw.is_empty() { None } else { Some(kw) };
        self
    }
    pub fn with_limit(mut self, n: Option<usize>) -> Self {
        self.limit = n;
        self
    }
    pub fn with_human_timestamps(mut self, yes: bool) -> Self {
        self.human_timestamps = yes;
        self
    }
}
