use serde_json::json;
use tweetl::JsonArrayWriter;

/// The array only appears under its final name after `finish`.
#[test]
fn finish_promotes_staging_file() {
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("olympics.judo.tags.json");

    let mut w = JsonArrayWriter::create(&dest, false, 0).unwrap();
    let staging = w.tmp_path().to_path_buf();
    w.push(&json!({"key": "#judo", "value": 2})).unwrap();
    w.push(&json!({"key": "#ippon", "value": 1})).unwrap();
    assert!(staging.exists());
    assert!(!dest.exists());

    assert_eq!(w.finish().unwrap(), 2);
    assert!(!staging.exists());
    let text = std::fs::read_to_string(&dest).unwrap();
    assert_eq!(text, "[{\"key\":\"#judo\",\"value\":2},{\"key\":\"#ippon\",\"value\":1}]\n");
}

/// A writer abandoned part way (an error between `create` and `finish`) leaves nothing behind.
#[test]
fn dropped_writer_removes_staging_file() {
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("olympics.all.langs.json");

    let mut w = JsonArrayWriter::create(&dest, true, 64 * 1024).unwrap();
    let staging = w.tmp_path().to_path_buf();
    w.push(&json!({"user.lang": "en", "count": 3})).unwrap();
    drop(w);

    assert!(!staging.exists());
    assert!(!dest.exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

/// An existing output is replaced, not appended to.
#[test]
fn finish_replaces_previous_output() {
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("out.json");
    std::fs::write(&dest, "stale").unwrap();

    let w = JsonArrayWriter::create(&dest, true, 0).unwrap();
    assert_eq!(w.finish().unwrap(), 0);
    assert_eq!(std::fs::read_to_string(&dest).unwrap(), "[\n\n]\n");
}
