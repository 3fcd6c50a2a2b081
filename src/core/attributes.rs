//! Tag and Instruction Parsing
//!
//! Splits a captured tag or processing-instruction body into a name and
//! an ordered attribute map. Names are opaque: namespace prefixes are kept
//! verbatim and never resolved.

use super::buffer::is_trim_char;
use indexmap::IndexMap;
use memchr::memchr2;
use std::borrow::Cow;

/// Attribute map in first-seen order; a repeated key keeps its slot and takes the later value
pub type Attributes = IndexMap<String, String>;

/// A tag or instruction split into name and attributes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTag {
    /// Tag name or instruction target (may carry a `prefix:`)
    pub name: String,
    /// Attributes in source order
    pub attributes: Attributes,
}

impl ParsedTag {
    /// Create a tag with no attributes
    pub fn new(name: impl Into<String>) -> Self {
        ParsedTag {
            name: name.into(),
            attributes: Attributes::new(),
        }
    }

    /// Builder-style attribute insertion
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Look up an attribute value
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

/// Parse a delimiter-stripped, trimmed tag body
///
/// `xml version="2.0" encoding="utf-8"` yields name `xml` with two
/// attributes. The body is split at every whitespace run that is followed
/// by an attribute name and `=`. Each pair takes its value from between
/// the first and second `=`, so a value containing `=` is truncated there,
/// and every quote character in the value is dropped. Never fails.
pub fn parse_tag(span: &str) -> ParsedTag {
    let mut segments = split_segments(span).into_iter();
    let name = segments.next().unwrap_or_default();

    let mut attributes = Attributes::with_capacity(segments.len());
    for segment in segments {
        let mut parts = segment.split('=');
        let key = parts.next().unwrap_or_default();
        let value = parts.next().unwrap_or_default();
        let value = strip_quotes(value.trim_matches(is_trim_char));
        attributes.insert(key.to_owned(), value.into_owned());
    }

    ParsedTag {
        name: name.to_owned(),
        attributes,
    }
}

/// Split at whitespace runs that precede `name=`
fn split_segments(span: &str) -> Vec<&str> {
    let mut segments = Vec::with_capacity(4);
    let mut segment_start = 0;
    let mut chars = span.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if !is_trim_char(c) {
            continue;
        }

        // Take the whole run so the split point never lands mid-run
        let mut run_end = idx + c.len_utf8();
        while let Some(&(next_idx, next)) = chars.peek() {
            if !is_trim_char(next) {
                break;
            }
            run_end = next_idx + next.len_utf8();
            chars.next();
        }

        if starts_attribute(&span[run_end..]) {
            segments.push(&span[segment_start..idx]);
            segment_start = run_end;
        }
    }

    segments.push(&span[segment_start..]);
    segments
}

/// Check for one or more name characters immediately followed by `=`
#[inline]
fn starts_attribute(rest: &str) -> bool {
    let bytes = rest.as_bytes();
    let name_len = bytes.iter().take_while(|&&b| is_attr_name_byte(b)).count();
    name_len > 0 && bytes.get(name_len) == Some(&b'=')
}

#[inline]
fn is_attr_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b':' | b'-')
}

/// Remove every `"` and `'`, not just a surrounding pair
fn strip_quotes(value: &str) -> Cow<'_, str> {
    if memchr2(b'"', b'\'', value.as_bytes()).is_none() {
        return Cow::Borrowed(value);
    }
    Cow::Owned(value.chars().filter(|&c| c != '"' && c != '\'').collect())
}
