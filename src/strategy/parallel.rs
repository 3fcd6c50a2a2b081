//! Parallel Tokenization
//!
//! Uses Rayon to tokenize independent documents in parallel. Each document
//! gets its own tokenizer instance; no scan state is shared.

use rayon::prelude::*;
use crate::core::encoding::Utf8Decoder;
use crate::core::tokenizer::FeedTokenizer;
use crate::sax::{EventCollector, FeedEvent};

/// Tokenize a single byte document
pub fn tokenize_bytes(input: &[u8]) -> Vec<FeedEvent> {
    let mut text = String::with_capacity(input.len());
    let mut decoder = Utf8Decoder::new();
    decoder.decode(input, &mut text);
    decoder.finish(&mut text);

    let mut tokenizer = FeedTokenizer::new(EventCollector::new());
    tokenizer.feed(&text);
    tokenizer.finish().into_events()
}

/// Tokenize multiple documents in parallel, results in input order
pub fn tokenize_parallel(documents: &[&[u8]]) -> Vec<Vec<FeedEvent>> {
    documents
        .par_iter()
        .map(|doc| tokenize_bytes(doc))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sax::tokenize;

    #[test]
    fn test_parallel_matches_sequential() {
        let docs: Vec<String> = (0..16)
            .map(|i| format!("<feed><entry id=\"{i}\"><title>Post {i}</title></entry></feed>"))
            .collect();
        let inputs: Vec<&[u8]> = docs.iter().map(|d| d.as_bytes()).collect();

        let results = tokenize_parallel(&inputs);
        assert_eq!(results.len(), docs.len());
        for (doc, events) in docs.iter().zip(&results) {
            assert_eq!(events, &tokenize(doc));
        }
    }

    #[test]
    fn test_documents_are_independent() {
        // An unterminated comment in one document must not leak into the next
        let inputs: Vec<&[u8]> = vec![&b"<a><!-- open"[..], &b"<b>text</b>"[..]];
        let results = tokenize_parallel(&inputs);
        assert_eq!(results[0].len(), 1);
        assert_eq!(results[1], tokenize("<b>text</b>"));
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let events = tokenize_bytes(b"<a>x\xFFy</a>");
        assert_eq!(events[1], FeedEvent::Text("x\u{FFFD}y".into()));
    }
}
