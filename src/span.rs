//! Span model: conversions between placeholder templates and span-annotated text.
//!
//! Two notations describe the same annotated utterance:
//!
//! - a template, `book a {city} flight`, where the entity is an inline placeholder
//! - expanded text, `book a Paris flight`, plus the span `[7, 12)` tagged `city`
//!
//! All offsets are half-open `[start, end)` ranges counted in Unicode scalar
//! values (`char`s), never bytes. Byte ranges are only derived internally when
//! slicing.

use std::iter;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::SpanError;

/// Half-open character range into an expanded utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// A span tagged with the slot or entity it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedSpan {
    pub tag: String,
    pub value: String,
    pub span: Span,
}

/// Result of expanding a template or joining segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expanded {
    pub text: String,
    pub spans: Vec<TaggedSpan>,
}

/// A fragment of an utterance, tagged with an alias when it is an entity value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub alias: Option<String>,
}

impl Segment {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            alias: None,
        }
    }

    pub fn tagged(text: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            alias: Some(alias.into()),
        }
    }
}

/// Number of chars in `text`, the unit of every offset.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte index of the char at `char_index`; `char_len(text)` maps to `text.len()`.
pub fn byte_offset(text: &str, char_index: usize) -> Option<usize> {
    text.char_indices()
        .map(|(byte, _)| byte)
        .chain(iter::once(text.len()))
        .nth(char_index)
}

/// Byte range covered by a char span, if the span lies within `text`.
pub fn byte_range(text: &str, span: Span) -> Option<Range<usize>> {
    if span.start > span.end {
        return None;
    }
    let start = byte_offset(text, span.start)?;
    let end = byte_offset(text, span.end)?;
    Some(start..end)
}

/// Substring covered by a char span.
pub fn slice(text: &str, span: Span) -> Option<&str> {
    byte_range(text, span).map(|range| &text[range])
}

/// Expand every `{slot}` placeholder in `template` with the value returned by `lookup`.
///
/// Scanning happens against the raw template; a running delta (placeholder
/// length minus substitution length) shifts each raw position into the
/// expanded string.
///
/// # Errors
///
/// * `MalformedTemplate` for unbalanced or nested braces and empty placeholders
/// * `UnknownSlot` when `lookup` has no value for a slot
///
/// # Example
///
/// ```ignore
/// let lookup = |slot: &str| (slot == "city").then(|| "Paris".to_string());
/// let expanded = expand("book a {city} flight", lookup)?;
/// assert_eq!(expanded.text, "book a Paris flight");
/// assert_eq!(expanded.spans[0].span, Span::new(7, 12));
/// ```
pub fn expand<F>(template: &str, mut lookup: F) -> Result<Expanded, SpanError>
where
    F: FnMut(&str) -> Option<String>,
{
    let mut text = String::with_capacity(template.len());
    let mut spans = Vec::new();
    let mut delta: isize = 0;
    let mut chars = template.chars().enumerate();

    while let Some((raw_start, c)) = chars.next() {
        match c {
            '{' => {
                let mut slot = String::new();
                let raw_end = loop {
                    match chars.next() {
                        Some((pos, '}')) => break pos + 1,
                        Some((pos, '{')) => {
                            return Err(malformed(template, pos, "nested '{'"));
                        }
                        Some((_, ch)) => slot.push(ch),
                        None => return Err(malformed(template, raw_start, "unclosed '{'")),
                    }
                };
                if slot.is_empty() {
                    return Err(malformed(template, raw_start, "empty placeholder"));
                }

                let value = lookup(&slot).ok_or_else(|| SpanError::UnknownSlot {
                    slot: slot.clone(),
                    template: template.to_string(),
                })?;

                let start = shift(raw_start, delta);
                delta += (raw_end - raw_start) as isize - char_len(&value) as isize;
                let end = shift(raw_end, delta);

                text.push_str(&value);
                spans.push(TaggedSpan {
                    tag: slot,
                    value,
                    span: Span::new(start, end),
                });
            }
            '}' => return Err(malformed(template, raw_start, "unmatched '}'")),
            _ => text.push(c),
        }
    }

    Ok(Expanded { text, spans })
}

fn shift(raw: usize, delta: isize) -> usize {
    (raw as isize - delta) as usize
}

fn malformed(template: &str, position: usize, reason: &'static str) -> SpanError {
    SpanError::MalformedTemplate {
        template: template.to_string(),
        position,
        reason,
    }
}

/// Check that spans are non-empty, inside `text`, sorted and non-overlapping.
pub fn validate<I>(text: &str, spans: I) -> Result<(), SpanError>
where
    I: IntoIterator<Item = Span>,
{
    let len = char_len(text);
    let mut previous_end = 0;

    for span in spans {
        let reason = if span.is_empty() {
            Some("empty or inverted range")
        } else if span.end > len {
            Some("range exceeds text length")
        } else if span.start < previous_end {
            Some("overlaps or precedes the previous span")
        } else {
            None
        };

        if let Some(reason) = reason {
            return Err(SpanError::InvalidSpan {
                text: text.to_string(),
                start: span.start,
                end: span.end,
                reason,
            });
        }
        previous_end = span.end;
    }

    Ok(())
}

/// Rebuild a template by replacing each tagged span with `{tag}`.
///
/// Spans are applied back to front so earlier offsets never move. Text that
/// already holds a literal brace cannot be told apart from a placeholder and
/// fails with `MalformedTemplate`.
pub fn collapse<'a, I>(text: &str, spans: I) -> Result<String, SpanError>
where
    I: IntoIterator<Item = (&'a str, Span)>,
{
    if let Some(position) = text.chars().position(|c| c == '{' || c == '}') {
        return Err(malformed(text, position, "literal brace in text"));
    }

    let spans: Vec<(&str, Span)> = spans.into_iter().collect();
    validate(text, spans.iter().map(|(_, span)| *span))?;

    let ranges: Vec<(&str, Range<usize>)> = spans
        .iter()
        .filter_map(|(tag, span)| byte_range(text, *span).map(|range| (*tag, range)))
        .collect();

    let mut template = text.to_string();
    for (tag, range) in ranges.into_iter().rev() {
        template.replace_range(range, &format!("{{{}}}", tag));
    }
    Ok(template)
}

/// Split `text` into ordered plain and tagged fragments.
///
/// Walks the spans left to right with a single cursor; gaps become plain
/// fragments and trailing text is kept.
pub fn split_segments<'a, I>(text: &str, spans: I) -> Result<Vec<Segment>, SpanError>
where
    I: IntoIterator<Item = (&'a str, Span)>,
{
    let spans: Vec<(&str, Span)> = spans.into_iter().collect();
    validate(text, spans.iter().map(|(_, span)| *span))?;

    let len = char_len(text);
    let mut segments = Vec::with_capacity(spans.len() * 2 + 1);
    let mut cursor = 0;

    for (tag, span) in spans {
        if span.start > cursor {
            segments.push(Segment::plain(char_slice(text, cursor, span.start)));
        }
        segments.push(Segment::tagged(char_slice(text, span.start, span.end), tag));
        cursor = span.end;
    }
    if cursor < len {
        segments.push(Segment::plain(char_slice(text, cursor, len)));
    }

    Ok(segments)
}

// Callers validate bounds first.
fn char_slice(text: &str, start: usize, end: usize) -> &str {
    slice(text, Span::new(start, end)).unwrap_or_default()
}

/// Concatenate fragments into one utterance, emitting a span per tagged fragment.
pub fn join_segments<'a, I>(segments: I) -> Expanded
where
    I: IntoIterator<Item = &'a Segment>,
{
    let mut text = String::new();
    let mut spans = Vec::new();
    let mut cursor = 0;

    for segment in segments {
        let len = char_len(&segment.text);
        text.push_str(&segment.text);
        if let Some(alias) = &segment.alias {
            spans.push(TaggedSpan {
                tag: alias.clone(),
                value: segment.text.clone(),
                span: Span::new(cursor, cursor + len),
            });
        }
        cursor += len;
    }

    Expanded { text, spans }
}
