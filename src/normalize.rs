//! Vendor-specific text normalization, applied after the span model.

use std::sync::OnceLock;

use regex::Regex;

fn trailing_punctuation() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Braces are punctuation too, but close a trailing placeholder.
    PATTERN.get_or_init(|| Regex::new(r"[\s\p{P}--[{}]]+$").expect("valid pattern"))
}

/// Normalize a slot-template sample: lower-case the literal text, keep
/// `{slot}` names untouched, and strip terminal punctuation.
///
/// ```ignore
/// assert_eq!(alexa_sample("Book a {CityName} flight!"), "book a {CityName} flight");
/// ```
pub fn alexa_sample(sample: &str) -> String {
    let mut normalized = String::with_capacity(sample.len());
    let mut in_placeholder = false;

    for c in sample.trim().chars() {
        match c {
            '{' => {
                in_placeholder = true;
                normalized.push(c);
            }
            '}' => {
                in_placeholder = false;
                normalized.push(c);
            }
            _ if in_placeholder => normalized.push(c),
            _ => normalized.extend(c.to_lowercase()),
        }
    }

    trailing_punctuation().replace(&normalized, "").into_owned()
}
