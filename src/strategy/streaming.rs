//! Streaming Feed Parser
//!
//! Stateful parser that accepts byte chunks, decodes them, and queues the
//! resulting events until the caller takes them.

use crate::core::encoding::Utf8Decoder;
use crate::core::tokenizer::FeedTokenizer;
use crate::sax::{EventCollector, FeedEvent};

/// Reason returned when a chunk arrives after the finish notification
pub const WRITE_AFTER_FINISH: &str = "write_after_finish";

/// Stateful streaming parser for one document
pub struct StreamingParser {
    /// Tokenizer and its event queue; `None` once finished
    tokenizer: Option<FeedTokenizer<EventCollector>>,
    /// Decoder holding any partial UTF-8 sequence between chunks
    decoder: Utf8Decoder,
    /// Reusable decode buffer
    text: String,
}

impl StreamingParser {
    /// Create a new streaming parser
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    /// Create a parser whose event queue starts with room for `events`
    pub fn with_capacity(events: usize) -> Self {
        StreamingParser {
            tokenizer: Some(FeedTokenizer::new(EventCollector::with_capacity(events))),
            decoder: Utf8Decoder::new(),
            text: String::with_capacity(8192),
        }
    }

    /// Feed a chunk of data to the parser
    ///
    /// # Errors
    ///
    /// Returns [`WRITE_AFTER_FINISH`] if the parser was already finished.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<(), &'static str> {
        let tokenizer = self.tokenizer.as_mut().ok_or(WRITE_AFTER_FINISH)?;
        self.text.clear();
        self.decoder.decode(chunk, &mut self.text);
        tokenizer.feed(&self.text);
        Ok(())
    }

    /// Take up to `max` parsed events
    /// Returns events and leaves remaining events in place
    pub fn take_events(&mut self, max: usize) -> Vec<FeedEvent> {
        self.tokenizer
            .as_mut()
            .map(|tokenizer| tokenizer.handler_mut().take_first(max))
            .unwrap_or_default()
    }

    /// Get number of available events
    pub fn available_events(&self) -> usize {
        self.tokenizer
            .as_ref()
            .map_or(0, |tokenizer| tokenizer.handler().event_count())
    }

    /// Bytes held back by the decoder and the tokenizer's lookback window
    pub fn pending_bytes(&self) -> usize {
        let window = self.tokenizer.as_ref().map_or(0, |t| t.buffered_bytes());
        self.decoder.pending_bytes() + window
    }

    /// Check if the finish notification has been received
    pub fn is_finished(&self) -> bool {
        self.tokenizer.is_none()
    }

    /// Finish notification: no more input follows
    ///
    /// Returns every event not yet taken. Constructs still open are
    /// dropped without an event. Calling this again returns an empty list.
    pub fn finish(&mut self) -> Vec<FeedEvent> {
        let Some(mut tokenizer) = self.tokenizer.take() else {
            return Vec::new();
        };
        self.text.clear();
        self.decoder.finish(&mut self.text);
        tokenizer.feed(&self.text);
        tokenizer.finish().into_events()
    }
}

impl Default for StreamingParser {
    fn default() -> Self {
        Self::new()
    }
}
