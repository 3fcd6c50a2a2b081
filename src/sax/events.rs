//! Feed Event Types
//!
//! Owned events produced by the feed tokenizer.

use crate::core::attributes::{Attributes, ParsedTag};

/// A structural event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    /// Trimmed, non-empty text content
    Text(String),

    /// Processing instruction `<?name attr="..."?>`
    Instruction {
        /// Instruction target
        name: String,
        /// Attributes in source order
        attributes: Attributes,
    },

    /// Start of an element (or the first half of a self-closing one)
    OpenTag {
        /// Element name, prefix included
        name: String,
        /// Attributes in source order
        attributes: Attributes,
    },

    /// End of an element
    ///
    /// Carries whatever attributes the end tag was written with, so
    /// `</self name="x">` reports `name`.
    CloseTag {
        /// Element name, prefix included
        name: String,
        /// Attributes in source order
        attributes: Attributes,
    },

    /// CDATA payload, verbatim
    CData(String),
}

impl FeedEvent {
    /// Build an instruction event from a parsed body
    pub fn instruction(tag: ParsedTag) -> Self {
        FeedEvent::Instruction {
            name: tag.name,
            attributes: tag.attributes,
        }
    }

    /// Build an open tag event from a parsed body
    pub fn open_tag(tag: ParsedTag) -> Self {
        FeedEvent::OpenTag {
            name: tag.name,
            attributes: tag.attributes,
        }
    }

    /// Build a close tag event from a parsed body
    pub fn close_tag(tag: ParsedTag) -> Self {
        FeedEvent::CloseTag {
            name: tag.name,
            attributes: tag.attributes,
        }
    }

    /// Check if this is an open tag event
    #[inline]
    pub fn is_open_tag(&self) -> bool {
        matches!(self, FeedEvent::OpenTag { .. })
    }

    /// Check if this is a close tag event
    #[inline]
    pub fn is_close_tag(&self) -> bool {
        matches!(self, FeedEvent::CloseTag { .. })
    }

    /// Check if this is a text event
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self, FeedEvent::Text(_))
    }

    /// Get the name of a tag or instruction event
    pub fn name(&self) -> Option<&str> {
        match self {
            FeedEvent::Instruction { name, .. }
            | FeedEvent::OpenTag { name, .. }
            | FeedEvent::CloseTag { name, .. } => Some(name),
            FeedEvent::Text(_) | FeedEvent::CData(_) => None,
        }
    }

    /// Get the attributes of a tag or instruction event
    pub fn attributes(&self) -> Option<&Attributes> {
        match self {
            FeedEvent::Instruction { attributes, .. }
            | FeedEvent::OpenTag { attributes, .. }
            | FeedEvent::CloseTag { attributes, .. } => Some(attributes),
            FeedEvent::Text(_) | FeedEvent::CData(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_accessors() {
        let event = FeedEvent::open_tag(ParsedTag::new("entry").with_attribute("id", "1"));
        assert!(event.is_open_tag());
        assert!(!event.is_close_tag());
        assert_eq!(event.name(), Some("entry"));
        assert_eq!(event.attributes().and_then(|a| a.get("id")).map(String::as_str), Some("1"));
    }

    #[test]
    fn test_content_events_have_no_name() {
        assert_eq!(FeedEvent::Text("x".into()).name(), None);
        assert!(FeedEvent::CData("x".into()).attributes().is_none());
        assert!(FeedEvent::Text("x".into()).is_text());
    }
}
