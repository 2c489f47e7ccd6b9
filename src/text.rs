//! Display cleanup for tweet bodies.

/// Tokens dropped by `remove_oddities`: a bare hash and a truncated link stub.
pub const ODDITIES: &[&str] = &["#", "htt"];

/// Replace every `\n` and `\r` with a single space.
pub fn remove_line_breaks(text: &str) -> String {
    text.replace(['\n', '\r'], " ")
}

/// Drop whitespace tokens starting with `http`; runs of whitespace collapse to one space.
pub fn remove_http(text: &str) -> String {
    join_tokens(text.split_whitespace().filter(|t| !t.starts_with("http")))
}

/// Drop tokens that are exactly one of `ODDITIES`.
pub fn remove_oddities(text: &str) -> String {
    join_tokens(text.split_whitespace().filter(|t| !ODDITIES.contains(t)))
}

/// Full cleanup applied before a tweet is printed.
pub fn clean_text(text: &str) -> String {
    remove_oddities(&remove_http(&remove_line_breaks(text)))
}

fn join_tokens<'a>(tokens: impl Iterator<Item = &'a str>) -> String {
    tokens.collect::<Vec<_>>().join(" ")
}
