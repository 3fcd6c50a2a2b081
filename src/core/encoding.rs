//! Incremental UTF-8 Decoding
//!
//! Byte producers hand the tokenizer arbitrary chunks, so a multi-byte
//! character can be split across two chunks. The decoder holds the
//! incomplete tail until the next chunk arrives. Invalid sequences decode
//! to U+FFFD instead of failing.

use std::str;

/// Longest incomplete UTF-8 prefix that can be pending
const MAX_PENDING: usize = 3;

/// Stateful UTF-8 decoder for chunked input
#[derive(Debug, Default, Clone)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Utf8Decoder {
            pending: Vec::with_capacity(MAX_PENDING),
        }
    }

    /// Bytes of an incomplete character held back from the last chunk
    pub fn pending_bytes(&self) -> usize {
        self.pending.len()
    }

    /// Decode a chunk, appending complete characters to `out`
    pub fn decode(&mut self, chunk: &[u8], out: &mut String) {
        if self.pending.is_empty() {
            self.decode_complete(chunk, out);
        } else {
            let mut joined = std::mem::take(&mut self.pending);
            joined.extend_from_slice(chunk);
            self.decode_complete(&joined, out);
        }
    }

    /// Flush at end of input; an incomplete trailing character becomes U+FFFD
    pub fn finish(&mut self, out: &mut String) {
        if !self.pending.is_empty() {
            log::debug!(
                target: "feedscan.encoding",
                "input ended inside a UTF-8 sequence ({} bytes)",
                self.pending.len()
            );
            self.pending.clear();
            out.push(char::REPLACEMENT_CHARACTER);
        }
    }

    fn decode_complete(&mut self, mut input: &[u8], out: &mut String) {
        loop {
            match str::from_utf8(input) {
                Ok(valid) => {
                    out.push_str(valid);
                    return;
                }
                Err(e) => {
                    let (valid, rest) = input.split_at(e.valid_up_to());
                    out.push_str(str::from_utf8(valid).unwrap_or_default());
                    match e.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            input = &rest[len..];
                        }
                        None => {
                            // Incomplete sequence at the end of the chunk
                            self.pending.extend_from_slice(rest);
                            return;
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_chunks(chunks: &[&[u8]]) -> String {
        let mut decoder = Utf8Decoder::new();
        let mut out = String::new();
        for chunk in chunks {
            decoder.decode(chunk, &mut out);
        }
        decoder.finish(&mut out);
        out
    }

    #[test]
    fn test_ascii_passthrough() {
        assert_eq!(decode_chunks(&[&b"<root>"[..], &b"text</root>"[..]]), "<root>text</root>");
    }

    #[test]
    fn test_split_multibyte_character() {
        let bytes = "a€b".as_bytes();
        // '€' is three bytes; split after each of them
        for split in 1..bytes.len() {
            let (head, tail) = bytes.split_at(split);
            assert_eq!(decode_chunks(&[head, tail]), "a€b", "split at {split}");
        }
    }

    #[test]
    fn test_one_byte_at_a_time() {
        let text = "Ünïcödé 日本語 🦀";
        let chunks: Vec<&[u8]> = text.as_bytes().chunks(1).collect();
        assert_eq!(decode_chunks(&chunks), text);
    }

    #[test]
    fn test_pending_bytes_reported() {
        let mut decoder = Utf8Decoder::new();
        let mut out = String::new();
        decoder.decode(&"€".as_bytes()[..2], &mut out);
        assert_eq!(out, "");
        assert_eq!(decoder.pending_bytes(), 2);
        decoder.decode(&"€".as_bytes()[2..], &mut out);
        assert_eq!(out, "€");
        assert_eq!(decoder.pending_bytes(), 0);
    }

    #[test]
    fn test_invalid_bytes_replaced() {
        assert_eq!(decode_chunks(&[&b"a\xFFb"[..]]), "a\u{FFFD}b");
    }

    #[test]
    fn test_truncated_at_end_replaced() {
        assert_eq!(decode_chunks(&[&"x€".as_bytes()[..2]]), "x\u{FFFD}");
    }
}
