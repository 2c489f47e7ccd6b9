#![allow(dead_code)]

use serde_json::{json, Value};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

/// Write a plain NDJSON collection file `<dir>/<name>.jsonl`.
pub fn write_jsonl(dir: &Path, name: &str, docs: &[Value]) {
    fs::create_dir_all(dir).unwrap();
    let mut f = File::create(dir.join(format!("{name}.jsonl"))).unwrap();
    for d in docs {
        writeln!(&mut f, "{}", d).unwrap();
    }
}

/// Write a zstd-compressed collection file `<dir>/<name>.jsonl.zst`.
pub fn write_zst(dir: &Path, name: &str, docs: &[Value]) {
    fs::create_dir_all(dir).unwrap();
    let f = File::create(dir.join(format!("{name}.jsonl.zst"))).unwrap();
    let mut enc = zstd::stream::write::Encoder::new(f, 3).unwrap();
    for d in docs {
        writeln!(&mut enc, "{}", d).unwrap();
    }
    enc.finish().unwrap();
}

pub fn read_json(path: &Path) -> Value {
    serde_json::from_reader(File::open(path).unwrap()).unwrap()
}

/// Tweets collection used by the listing tests:
/// - t1..t5 are English, t6 is French, t7 has no `lang`
/// - t2 and t4 share a timestamp (t2 comes first in store order)
/// - t3 carries a URL, a line break and a bare `#`
pub fn make_tweet_store() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let docs = vec![
        json!({"id": "t1", "lang": "en", "created_at": "Wed Jul 25 12:00:00 +0000 2012", "text": "Tennis final tonight"}),
        json!({"id": "t2", "lang": "en", "created_at": "Wed Jul 25 10:00:00 +0000 2012", "text": "first of a tie"}),
        json!({"id": "t3", "lang": "en", "created_at": "Wed Jul 25 09:00:00 +0000 2012", "text": "Go #\nteam http://t.co/x now", "user": {"lang": "en"}}),
        json!({"id": "t4", "lang": "en", "created_at": "Wed Jul 25 10:00:00 +0000 2012", "text": "second of a tie tennis"}),
        json!({"id": "t5", "lang": "en", "created_at": "Thu Jul 26 08:00:00 +0000 2012", "text": "archery tennis"}),
        json!({"id": "t6", "lang": "fr", "created_at": "Wed Jul 25 08:00:00 +0000 2012", "text": "Tennis en français"}),
        json!({"id": "t7", "created_at": "Wed Jul 25 07:00:00 +0000 2012", "text": "no lang"}),
    ];
    write_jsonl(dir.path(), "tweets", &docs);
    dir
}
