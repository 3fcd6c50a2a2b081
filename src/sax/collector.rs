//! Event Collector
//!
//! Implements FeedHandler to queue events for batch return to Elixir.

use super::events::FeedEvent;
use crate::core::attributes::ParsedTag;
use crate::core::tokenizer::{FeedHandler, FeedTokenizer};

/// Collector that records events in document order
#[derive(Debug, Default)]
pub struct EventCollector {
    events: Vec<FeedEvent>,
}

impl EventCollector {
    /// Create a new collector
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    /// Create with estimated capacity
    pub fn with_capacity(events: usize) -> Self {
        Self {
            events: Vec::with_capacity(events),
        }
    }

    /// Get the collected events as a slice
    pub fn events(&self) -> &[FeedEvent] {
        &self.events
    }

    /// Get number of collected events
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Take all collected events
    pub fn take_events(&mut self) -> Vec<FeedEvent> {
        std::mem::take(&mut self.events)
    }

    /// Take up to `max` events, oldest first, leaving the rest queued
    pub fn take_first(&mut self, max: usize) -> Vec<FeedEvent> {
        let count = max.min(self.events.len());
        if count == self.events.len() {
            std::mem::take(&mut self.events)
        } else {
            self.events.drain(..count).collect()
        }
    }

    /// Consume the collector
    pub fn into_events(self) -> Vec<FeedEvent> {
        self.events
    }
}

impl FeedHandler for EventCollector {
    fn text(&mut self, text: &str) {
        self.events.push(FeedEvent::Text(text.to_owned()));
    }

    fn instruction(&mut self, instruction: &ParsedTag) {
        self.events.push(FeedEvent::instruction(instruction.clone()));
    }

    fn open_tag(&mut self, tag: &ParsedTag) {
        self.events.push(FeedEvent::open_tag(tag.clone()));
    }

    fn close_tag(&mut self, tag: &ParsedTag) {
        self.events.push(FeedEvent::close_tag(tag.clone()));
    }

    fn cdata(&mut self, data: &str) {
        self.events.push(FeedEvent::CData(data.to_owned()));
    }
}

/// Tokenize a complete document and return its events
pub fn tokenize(input: &str) -> Vec<FeedEvent> {
    let mut tokenizer = FeedTokenizer::new(EventCollector::new());
    tokenizer.feed(input);
    tokenizer.finish().into_events()
}
