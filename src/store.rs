//! Read-only document store. A collection is one NDJSON file in the store
//! directory, optionally zstd-compressed: `<name>.jsonl` or `<name>.jsonl.zst`.

use crate::config::StoreOptions;
use crate::ndjson::NdjsonReader;
use crate::zstd_jsonl::for_each_line_cfg;
use anyhow::{anyhow, bail, Context, Result};
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Source of documents for the extraction and listing operations.
pub trait DocumentStore: Sync {
    /// Visit every document of `collection` in stored order.
    fn for_each(&self, collection: &str, f: &mut dyn FnMut(Value) -> Result<()>) -> Result<()>;
    fn contains(&self, collection: &str) -> bool;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollectionFormat {
    Jsonl,
    JsonlZst,
}

#[derive(Clone, Debug)]
pub struct CollectionFile {
    pub format: CollectionFormat,
    pub path: PathBuf,
}

/// Directory-backed store. Collections are discovered once at open time.
#[derive(Clone, Debug)]
pub struct JsonlStore {
    opts: StoreOptions,
    collections: BTreeMap<String, CollectionFile>,
}

impl JsonlStore {
    pub fn open(opts: StoreOptions) -> Result<Self> {
        if !opts.root.is_dir() {
            bail!("store directory {} does not exist", opts.root.display());
        }
        let collections = discover_collections(&opts.root)?;
        tracing::info!(root = %opts.root.display(), collections = collections.len(), "store opened");
        Ok(Self { opts, collections })
    }

    pub fn open_dir(root: impl AsRef<Path>) -> Result<Self> {
        Self::open(StoreOptions::default().with_root(root))
    }

    pub fn collection_names(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(|s| s.as_str())
    }

    pub fn collection_file(&self, name: &str) -> Option<&CollectionFile> {
        self.collections.get(name)
    }
}

impl DocumentStore for JsonlStore {
    fn for_each(&self, collection: &str, f: &mut dyn FnMut(Value) -> Result<()>) -> Result<()> {
        let file = self
            .collections
            .get(collection)
            .ok_or_else(|| {
                let known: Vec<&str> = self.collection_names().collect();
                anyhow!("collection not found: {} (store has: {})", collection, known.join(", "))
            })?;

        let mut on_line = |lineno: u64, line: &str| -> Result<()> {
            if line.trim().is_empty() {
                return Ok(());
            }
            let doc: Value = serde_json::from_str(line)
                .with_context(|| format!("collection {} line {}: invalid JSON", collection, lineno))?;
            f(doc)
        };

        match file.format {
            CollectionFormat::JsonlZst => for_each_line_cfg(&file.path, self.opts.read_buffer_bytes, on_line),
            CollectionFormat::Jsonl => {
                let mut rdr = NdjsonReader::open(&file.path, self.opts.read_buffer_bytes)
                    .with_context(|| format!("open {}", file.path.display()))?;
                let mut buf = String::new();
                let mut lineno = 0u64;
                while rdr.read_line(&mut buf)? > 0 {
                    lineno += 1;
                    on_line(lineno, &buf)?;
                }
                Ok(())
            }
        }
    }

    fn contains(&self, collection: &str) -> bool {
        self.collections.contains_key(collection)
    }
}

/// Map collection names to files directly under `root`. When both a plain and a
/// compressed file exist for one name, the plain file wins.
fn discover_collections(root: &Path) -> Result<BTreeMap<String, CollectionFile>> {
    let re = Regex::new(r"^(.+)\.jsonl(\.zst)?$")?;
    let mut map = BTreeMap::new();
    for entry in WalkDir::new(root).min_depth(1).max_depth(1) {
        let ent = entry.with_context(|| format!("scan {}", root.display()))?;
        if !ent.file_type().is_file() {
            continue;
        }
        let Some(name) = ent.file_name().to_str() else { continue };
        let Some(caps) = re.captures(name) else { continue };
        let format = if caps.get(2).is_some() { CollectionFormat::JsonlZst } else { CollectionFormat::Jsonl };
        let file = CollectionFile { format, path: ent.path().to_path_buf() };
        let plain_seen = matches!(map.get(&caps[1]), Some(CollectionFile { format: CollectionFormat::Jsonl, .. }));
        if plain_seen {
            tracing::warn!(collection = &caps[1], "both .jsonl and .jsonl.zst present; using .jsonl");
        } else {
            map.insert(caps[1].to_string(), file);
        }
    }
    Ok(map)
}
