//! FeedScan - Incremental, non-validating XML tokenizer for feeds
//!
//! Scans RSS/Atom/RDF-shaped documents from chunked input without holding
//! the document in memory, reporting a flat sequence of events:
//! text, instruction, open tag, close tag, CDATA. Comments are skipped.
//! No validation, entity decoding, or namespace resolution is performed.
//!
//! Entry points:
//! A: One-shot tokenizer (tokenize)
//! B: Streaming parser resource (streaming_*)
//! C: Parallel tokenizing of independent documents (tokenize_parallel)
//!
//! The same pieces are usable from Rust: implement [`FeedHandler`], hand it
//! to a [`FeedTokenizer`], call `feed` per chunk and `finish` at the end.

use rustler::{Binary, Encoder, Env, NifResult, ResourceArc, Term};

pub mod core;
pub mod reader;
mod resource;
pub mod sax;
pub mod strategy;
mod term;

pub use crate::core::attributes::{parse_tag, Attributes, ParsedTag};
pub use crate::core::tokenizer::{FeedHandler, FeedTokenizer, PendingTagKind, ScanState};
pub use reader::tokenize_reader;
pub use sax::{EventCollector, FeedEvent};
pub use strategy::StreamingParser;

use resource::{StreamingParserRef, StreamingParserResource};
use term::{documents_to_term, error_term, events_to_term};

// ============================================================================
// Allocator Configuration
// ============================================================================

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

// ============================================================================
// Strategy A: One-Shot Tokenizer
// ============================================================================

/// Tokenize a complete document and return its events
#[rustler::nif]
fn tokenize<'a>(env: Env<'a>, input: Binary<'a>) -> NifResult<Term<'a>> {
    let events = strategy::parallel::tokenize_bytes(input.as_slice());
    Ok(events_to_term(env, events))
}

// ============================================================================
// Strategy B: Streaming Parser
// ============================================================================

/// Create a new streaming parser
#[rustler::nif]
fn streaming_new() -> StreamingParserRef {
    ResourceArc::new(StreamingParserResource::new())
}

/// Feed a chunk of data to the streaming parser
/// Returns {available_events, pending_bytes} or {:error, reason}
#[rustler::nif]
fn streaming_feed<'a>(
    env: Env<'a>,
    parser: StreamingParserRef,
    chunk: Binary<'a>,
) -> NifResult<Term<'a>> {
    let result = parser
        .with_parser(|inner| {
            inner
                .feed(chunk.as_slice())
                .map(|()| (inner.available_events(), inner.pending_bytes()))
        })
        .and_then(|fed| fed);

    match result {
        Ok(status) => Ok(status.encode(env)),
        Err(reason) => Ok(error_term(env, reason)),
    }
}

/// Take up to `max` events from the streaming parser
#[rustler::nif]
fn streaming_take_events<'a>(
    env: Env<'a>,
    parser: StreamingParserRef,
    max: usize,
) -> NifResult<Term<'a>> {
    match parser.with_parser(|inner| inner.take_events(max)) {
        Ok(events) => Ok(events_to_term(env, events)),
        Err(reason) => Ok(error_term(env, reason)),
    }
}

/// Finish notification: returns every event not yet taken
#[rustler::nif]
fn streaming_finish<'a>(env: Env<'a>, parser: StreamingParserRef) -> NifResult<Term<'a>> {
    match parser.with_parser(|inner| inner.finish()) {
        Ok(events) => Ok(events_to_term(env, events)),
        Err(reason) => Ok(error_term(env, reason)),
    }
}

/// Get streaming parser status
/// Returns {available_events, pending_bytes, finished?} or {:error, reason}
#[rustler::nif]
fn streaming_status<'a>(env: Env<'a>, parser: StreamingParserRef) -> NifResult<Term<'a>> {
    let result = parser.with_parser(|inner| {
        (
            inner.available_events(),
            inner.pending_bytes(),
            inner.is_finished(),
        )
    });

    match result {
        Ok(status) => Ok(status.encode(env)),
        Err(reason) => Ok(error_term(env, reason)),
    }
}

// ============================================================================
// Strategy C: Parallel Tokenizing
// ============================================================================

/// Tokenize independent documents in parallel
/// Returns one event list per document, in input order
#[rustler::nif(schedule = "DirtyCpu")]
fn tokenize_parallel<'a>(env: Env<'a>, documents: Vec<Binary<'a>>) -> NifResult<Term<'a>> {
    let inputs: Vec<&[u8]> = documents.iter().map(|doc| doc.as_slice()).collect();
    let results = strategy::parallel::tokenize_parallel(&inputs);
    Ok(documents_to_term(env, results))
}

// ============================================================================
// NIF Initialization
// ============================================================================

rustler::init!("Elixir.FeedScan.Native");
