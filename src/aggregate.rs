//! Per-category aggregate extraction. The counts were produced upstream by the
//! store's own aggregation into one collection per category; here they are only
//! reshaped, ordered, truncated and written as one JSON array file per category.

use crate::concurrency::for_each_limited;
use crate::config::AggregateOptions;
use crate::ndjson::JsonArrayWriter;
use crate::progress::maybe_count_progress;
use crate::store::DocumentStore;
use anyhow::{anyhow, Context, Result};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Tag files keep only the most frequent entries.
pub const DEFAULT_TAG_TOP_N: usize = 150;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AggregateKind {
    Langs,
    Tags,
}

impl AggregateKind {
    pub fn suffix(self) -> &'static str {
        match self {
            AggregateKind::Langs => "langs",
            AggregateKind::Tags => "tags",
        }
    }

    pub fn default_top_n(self) -> Option<usize> {
        match self {
            AggregateKind::Langs => None,
            AggregateKind::Tags => Some(DEFAULT_TAG_TOP_N),
        }
    }

    /// `<prefix>.<category>.<kind>`; the output file adds `.json`.
    pub fn collection_name(self, prefix: &str, category: &str) -> String {
        format!("{}.{}.{}", prefix, category, self.suffix())
    }

    fn shape(self, entry: LabelCount) -> AggregateRecord {
        match self {
            AggregateKind::Langs => AggregateRecord::Lang { lang: entry.label, count: entry.count },
            AggregateKind::Tags => AggregateRecord::Tag { key: entry.label, value: entry.count },
        }
    }
}

impl fmt::Display for AggregateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// One upstream aggregate row: `_id` is the label, `value` (or `count`) the count.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelCount {
    pub label: Value,
    pub count: i64,
}

impl LabelCount {
    pub fn from_document(doc: &Value) -> Result<Self> {
        let label = doc.get("_id").cloned().ok_or_else(|| anyhow!("aggregate row without _id: {}", doc))?;
        let raw = doc
            .get("value")
            .or_else(|| doc.get("count"))
            .ok_or_else(|| anyhow!("aggregate row without value/count: {}", doc))?;
        let count = raw
            .as_i64()
            .or_else(|| raw.as_f64().map(|f| f as i64))
            .ok_or_else(|| anyhow!("non-numeric count {} for {}", raw, label))?;
        Ok(Self { label, count })
    }
}

/// Output record; field names depend on the kind.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AggregateRecord {
    Lang {
        #[serde(rename = "user.lang")]
        lang: Value,
        count: i64,
    },
    Tag {
        key: Value,
        value: i64,
    },
}

#[derive(Clone, Debug)]
pub struct CategoryOutput {
    pub category: String,
    pub path: PathBuf,
    pub records: u64,
}

#[derive(Clone, Debug)]
pub struct CategoryFailure {
    pub category: String,
    pub error: String,
}

/// Outcome of a run; both lists follow the configured category order.
#[derive(Clone, Debug, Default)]
pub struct AggregateReport {
    pub written: Vec<CategoryOutput>,
    pub failed: Vec<CategoryFailure>,
}

impl AggregateReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Stable descending sort by count, then truncation (`Some(0)` or `None` keeps all).
pub fn rank(mut entries: Vec<LabelCount>, sort: bool, top_n: Option<usize>) -> Vec<LabelCount> {
    if sort {
        entries.sort_by(|a, b| b.count.cmp(&a.count));
    }
    if let Some(n) = top_n.filter(|n| *n > 0) {
        entries.truncate(n);
    }
    entries
}

/// Read, reshape and write one category.
pub fn extract_category(
    store: &dyn DocumentStore,
    kind: AggregateKind,
    category: &str,
    out_dir: &Path,
    opts: &AggregateOptions,
) -> Result<CategoryOutput> {
    let collection = kind.collection_name(&opts.collection_prefix, category);
    let mut entries = Vec::new();
    store.for_each(&collection, &mut |doc: Value| {
        entries.push(LabelCount::from_document(&doc).with_context(|| format!("collection {}", collection))?);
        Ok(())
    })?;

    let top_n = opts.top_n.or_else(|| kind.default_top_n());
    let ranked = rank(entries, opts.sort, top_n);

    let path = out_dir.join(format!("{}.json", collection));
    let mut w = JsonArrayWriter::create(&path, opts.pretty, opts.write_buffer_bytes)?;
    for entry in ranked {
        w.push(&kind.shape(entry))?;
    }
    let records = w.finish()?;
    tracing::info!(category, kind = %kind, records, path = %path.display(), "aggregate written");
    Ok(CategoryOutput { category: category.to_string(), path, records })
}

/// Extract every configured category. Categories are independent: a failure is
/// logged and recorded in the report while the others still get written.
pub fn extract_aggregates(
    store: &dyn DocumentStore,
    kind: AggregateKind,
    out_dir: &Path,
    opts: &AggregateOptions,
) -> Result<AggregateReport> {
    fs::create_dir_all(out_dir).with_context(|| format!("create {}", out_dir.display()))?;

    let report = Mutex::new(AggregateReport::default());
    let pb = maybe_count_progress(opts.progress, opts.categories.len() as u64, &format!("Extract {}", kind));

    for_each_limited(&opts.categories, opts.concurrency, |category| {
        match extract_category(store, kind, category, out_dir, opts) {
            Ok(out) => report.lock().written.push(out),
            Err(e) => {
                let error = format!("{:#}", e);
                tracing::warn!(category = %category, kind = %kind, error = %error, "category failed");
                report.lock().failed.push(CategoryFailure { category: category.clone(), error });
            }
        }
        if let Some(pb) = &pb { pb.inc(1); }
    });

    if let Some(pb) = pb { pb.finish_with_message(format!("{} done", kind)); }

    let mut report = report.into_inner();
    let pos = |c: &str| opts.categories.iter().position(|x| x == c).unwrap_or(usize::MAX);
    report.written.sort_by_key(|o| pos(&o.category));
    report.failed.sort_by_key(|f| pos(&f.category));
    Ok(report)
}
