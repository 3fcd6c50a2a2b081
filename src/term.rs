//! Elixir Term Conversion Utilities
//!
//! Converts feed events to Elixir terms.

use crate::core::attributes::Attributes;
use crate::sax::FeedEvent;
use rustler::{Encoder, Env, NewBinary, Term};

// Pre-defined atoms for efficiency - created once at compile time
rustler::atoms! {
    text,
    instruction,
    open_tag,
    close_tag,
    cdata,
    error,
}

/// Convert a string to a binary term (more efficient than .encode())
#[inline]
fn str_to_binary<'a>(env: Env<'a>, s: &str) -> Term<'a> {
    let bytes = s.as_bytes();
    let mut binary = NewBinary::new(env, bytes.len());
    binary.as_mut_slice().copy_from_slice(bytes);
    binary.into()
}

/// Convert attributes to a list of `{name, value}` tuples in source order
fn attributes_to_term<'a>(env: Env<'a>, attributes: &Attributes) -> Term<'a> {
    let mut list = Term::list_new_empty(env);
    for (k, v) in attributes.iter().rev() {
        let tuple = (str_to_binary(env, k), str_to_binary(env, v));
        list = list.list_prepend(tuple.encode(env));
    }
    list
}

/// Convert events to an Elixir list
pub fn events_to_term<'a>(env: Env<'a>, events: Vec<FeedEvent>) -> Term<'a> {
    let mut list = Term::list_new_empty(env);
    for event in events.into_iter().rev() {
        let event_term = event_to_term(env, &event);
        list = list.list_prepend(event_term);
    }
    list
}

/// Convert a single event to an Elixir term
pub fn event_to_term<'a>(env: Env<'a>, event: &FeedEvent) -> Term<'a> {
    match event {
        FeedEvent::Text(content) => (text(), str_to_binary(env, content)).encode(env),
        FeedEvent::Instruction { name, attributes } => (
            instruction(),
            str_to_binary(env, name),
            attributes_to_term(env, attributes),
        )
            .encode(env),
        FeedEvent::OpenTag { name, attributes } => (
            open_tag(),
            str_to_binary(env, name),
            attributes_to_term(env, attributes),
        )
            .encode(env),
        FeedEvent::CloseTag { name, attributes } => (
            close_tag(),
            str_to_binary(env, name),
            attributes_to_term(env, attributes),
        )
            .encode(env),
        FeedEvent::CData(content) => (cdata(), str_to_binary(env, content)).encode(env),
    }
}

/// Convert a list of per-document event lists
pub fn documents_to_term<'a>(env: Env<'a>, documents: Vec<Vec<FeedEvent>>) -> Term<'a> {
    let mut list = Term::list_new_empty(env);
    for events in documents.into_iter().rev() {
        list = list.list_prepend(events_to_term(env, events));
    }
    list
}

/// `{:error, reason}`
pub fn error_term<'a>(env: Env<'a>, reason: &str) -> Term<'a> {
    (error(), reason).encode(env)
}
