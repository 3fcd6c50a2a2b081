//! Tokenizing Strategy Module
//!
//! Drivers built on the feed tokenizer:
//! - Streaming: chunked bytes in, queued events out (one document)
//! - Parallel: many independent documents on the Rayon pool

pub mod parallel;
pub mod streaming;

pub use streaming::StreamingParser;
