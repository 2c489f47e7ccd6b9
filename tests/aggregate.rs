#[path = "common/mod.rs"]
mod common;

use common::*;
use serde_json::{json, Value};
use tweetl::{extract_aggregates, rank, AggregateKind, AggregateOptions, JsonlStore, LabelCount};

/// 200 tag rows with counts 0..199 in ascending order, so sorting matters.
fn tag_rows() -> Vec<Value> {
    (0..200).map(|i| json!({"_id": format!("tag{i}"), "value": i})).collect()
}

/// Tags: sorted descending by count and cut to the top 150, one file per category.
#[test]
fn tags_sorted_and_truncated_per_category() {
    let store_dir = tempfile::tempdir().unwrap();
    let out_dir = tempfile::tempdir().unwrap();
    write_jsonl(store_dir.path(), "olympics.all.tags", &tag_rows());
    write_zst(store_dir.path(), "olympics.tennis.tags", &[json!({"_id": "#wimbledon", "value": 3.0})]);

    let store = JsonlStore::open_dir(store_dir.path()).unwrap();
    let opts = AggregateOptions::default().with_categories(["all", "tennis"]);
    let report = extract_aggregates(&store, AggregateKind::Tags, out_dir.path(), &opts).unwrap();
    assert!(report.is_success());
    assert_eq!(report.written.len(), 2);

    let all = read_json(&out_dir.path().join("olympics.all.tags.json"));
    let arr = all.as_array().unwrap();
    assert_eq!(arr.len(), 150);
    assert_eq!(arr[0], json!({"key": "tag199", "value": 199}));
    assert_eq!(arr[149], json!({"key": "tag50", "value": 50}));

    let tennis = read_json(&out_dir.path().join("olympics.tennis.tags.json"));
    assert_eq!(tennis, json!([{"key": "#wimbledon", "value": 3}]));
}

/// Langs: reshaped to {"user.lang", count}, not truncated by default.
#[test]
fn langs_reshaped_with_user_lang_key() {
    let store_dir = tempfile::tempdir().unwrap();
    let out_dir = tempfile::tempdir().unwrap();
    write_jsonl(
        store_dir.path(),
        "olympics.judo.langs",
        &[json!({"_id": "ja", "count": 5}), json!({"_id": "en", "count": 9}), json!({"_id": null, "count": 1})],
    );

    let store = JsonlStore::open_dir(store_dir.path()).unwrap();
    let opts = AggregateOptions::default().with_categories(["judo"]);
    extract_aggregates(&store, AggregateKind::Langs, out_dir.path(), &opts).unwrap();

    let judo = read_json(&out_dir.path().join("olympics.judo.langs.json"));
    assert_eq!(
        judo,
        json!([
            {"user.lang": "en", "count": 9},
            {"user.lang": "ja", "count": 5},
            {"user.lang": null, "count": 1}
        ])
    );
}

/// A missing collection fails only its own category; the rest are still written.
#[test]
fn failing_category_does_not_stop_the_others() {
    let store_dir = tempfile::tempdir().unwrap();
    let out_dir = tempfile::tempdir().unwrap();
    write_jsonl(store_dir.path(), "olympics.all.tags", &tag_rows());
    write_jsonl(store_dir.path(), "olympics.fencing.tags", &[json!({"_id": "x", "value": "many"})]);
    write_jsonl(store_dir.path(), "olympics.archery.tags", &[json!({"_id": "bow", "value": 2})]);

    let store = JsonlStore::open_dir(store_dir.path()).unwrap();
    let opts = AggregateOptions::default().with_concurrency(3);
    let report = extract_aggregates(&store, AggregateKind::Tags, out_dir.path(), &opts).unwrap();

    assert!(!report.is_success());
    let written: Vec<&str> = report.written.iter().map(|o| o.category.as_str()).collect();
    assert_eq!(written, vec!["all", "archery"]);
    let failed: Vec<&str> = report.failed.iter().map(|f| f.category.as_str()).collect();
    assert_eq!(failed, vec!["gymnastics", "tennis", "judo", "fencing"]);
    assert!(report.failed[0].error.contains("collection not found"));
    assert!(out_dir.path().join("olympics.archery.tags.json").exists());
    assert!(!out_dir.path().join("olympics.fencing.tags.json").exists());
    let leftovers = std::fs::read_dir(out_dir.path())
        .unwrap()
        .filter(|e| e.as_ref().unwrap().file_name().to_string_lossy().ends_with(".inprogress"))
        .count();
    assert_eq!(leftovers, 0);
}

/// More jobs than categories: every category still runs once and the report keeps category order.
#[test]
fn parallel_extraction_covers_every_category() {
    let store_dir = tempfile::tempdir().unwrap();
    let out_dir = tempfile::tempdir().unwrap();
    for category in tweetl::DEFAULT_CATEGORIES {
        write_jsonl(store_dir.path(), &format!("olympics.{category}.langs"), &[json!({"_id": category, "value": 1})]);
    }

    let store = JsonlStore::open_dir(store_dir.path()).unwrap();
    let opts = AggregateOptions::default().with_concurrency(8).with_io_write_buffer(16 * 1024);
    let report = extract_aggregates(&store, AggregateKind::Langs, out_dir.path(), &opts).unwrap();

    assert!(report.is_success());
    let written: Vec<&str> = report.written.iter().map(|o| o.category.as_str()).collect();
    assert_eq!(written, tweetl::DEFAULT_CATEGORIES);
    let judo = read_json(&out_dir.path().join("olympics.judo.langs.json"));
    assert_eq!(judo, json!([{"user.lang": "judo", "count": 1}]));
}

/// Equal counts keep store order; `Some(0)` keeps everything; unsorted keeps input order.
#[test]
fn rank_is_stable_and_top_zero_keeps_all() {
    let rows = vec![
        LabelCount { label: json!("a"), count: 1 },
        LabelCount { label: json!("b"), count: 5 },
        LabelCount { label: json!("c"), count: 1 },
        LabelCount { label: json!("d"), count: 5 },
    ];
    let labels = |v: Vec<LabelCount>| v.into_iter().map(|e| e.label.as_str().unwrap().to_string()).collect::<Vec<_>>();

    assert_eq!(labels(rank(rows.clone(), true, Some(0))), vec!["b", "d", "a", "c"]);
    assert_eq!(labels(rank(rows.clone(), true, Some(3))), vec!["b", "d", "a"]);
    assert_eq!(labels(rank(rows, false, Some(2))), vec!["a", "b"]);
}

#[test]
fn explicit_top_n_overrides_kind_default() {
    let store_dir = tempfile::tempdir().unwrap();
    let out_dir = tempfile::tempdir().unwrap();
    write_jsonl(store_dir.path(), "olympics.all.tags", &tag_rows());

    let store = JsonlStore::open_dir(store_dir.path()).unwrap();
    let opts = AggregateOptions::default().with_categories(["all"]).with_top_n(Some(0)).with_pretty(true);
    extract_aggregates(&store, AggregateKind::Tags, out_dir.path(), &opts).unwrap();

    let all = read_json(&out_dir.path().join("olympics.all.tags.json"));
    assert_eq!(all.as_array().unwrap().len(), 200);
}
