use tweetl::{clean_text, remove_http, remove_line_breaks, remove_oddities};

#[test]
fn cleaner_examples() {
    assert_eq!(remove_http("hello http://x.com world"), "hello world");
    assert_eq!(remove_oddities("a # b htt c"), "a b c");
    assert_eq!(remove_line_breaks("a\nb\rc"), "a b c");
}

#[test]
fn http_filter_matches_token_prefix_only() {
    // https counts, a mid-token "http" does not
    assert_eq!(remove_http("see https://t.co/abc and nothttp"), "see and nothttp");
    assert_eq!(remove_http("  lots   of\tspace  "), "lots of space");
}

#[test]
fn oddities_are_exact_matches() {
    assert_eq!(remove_oddities("#rio2016 # htt http"), "#rio2016 http");
}

#[test]
fn clean_text_is_idempotent() {
    let raw = "Go #\r\nteam http://t.co/x htt now";
    let once = clean_text(raw);
    assert_eq!(once, "Go team now");
    assert_eq!(clean_text(&once), once);
}
