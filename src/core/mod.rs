//! Core feed scanning primitives
//!
//! This module contains the building blocks of the feed tokenizer:
//! - Buffer: lookback window and span extraction
//! - Tokenizer: character-driven state machine and FeedHandler trait
//! - Attributes: tag/instruction name and attribute splitting
//! - Encoding: incremental UTF-8 decoding for byte producers

pub mod attributes;
pub mod buffer;
pub mod encoding;
pub mod tokenizer;
