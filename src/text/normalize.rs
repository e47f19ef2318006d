// Text normalizer: reduces free text to lowercase Latin words.
//
// Steps, in order:
// 1. Lowercase
// 2. Drop URLs (`http://...`, `https://...`, `www...`)
// 3. Replace every character outside a-z and whitespace with a space
// 4. Collapse whitespace runs and trim
//
// The output only contains a-z and single spaces, so running it twice gives
// the same result as running it once.

use std::sync::LazyLock;

use regex_lite::Regex;

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+|www\S+").expect("URL pattern is valid"));

/// Normalize text for keyword matching. Never fails; empty in, empty out.
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let lower = text.to_lowercase();
    let without_urls = URL_PATTERN.replace_all(&lower, "");

    let letters_only: String = without_urls
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    letters_only.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize possibly-absent text. `None` becomes an empty string.
pub fn normalize_opt(text: Option<&str>) -> String {
    text.map(normalize).unwrap_or_default()
}
