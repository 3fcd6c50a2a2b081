//! Buffered Feed Reader
//!
//! Pulls chunks from any source implementing Read and pushes them through
//! a FeedTokenizer, so a file or socket can be tokenized without holding
//! the whole document in memory.

use crate::core::encoding::Utf8Decoder;
use crate::core::tokenizer::{FeedHandler, FeedTokenizer};
use std::io::{self, Read};

/// Buffer size for reading chunks
const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Buffered reader for streaming input
pub struct BufferedReader<R: Read> {
    reader: R,
    buffer: Vec<u8>,
    end: usize,
    eof: bool,
}

impl<R: Read> BufferedReader<R> {
    /// Create a new buffered reader
    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, DEFAULT_BUFFER_SIZE)
    }

    /// Create a new buffered reader with specified buffer capacity
    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        BufferedReader {
            reader,
            buffer: vec![0u8; capacity.max(1)],
            end: 0,
            eof: false,
        }
    }

    /// Read the next chunk into the buffer
    ///
    /// Returns `Ok(false)` once the source is exhausted. Interrupted reads
    /// are retried.
    pub fn fill_buffer(&mut self) -> io::Result<bool> {
        if self.eof {
            self.end = 0;
            return Ok(false);
        }

        let read = loop {
            match self.reader.read(&mut self.buffer) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        };

        self.end = read;
        if read == 0 {
            self.eof = true;
            Ok(false)
        } else {
            Ok(true)
        }
    }

    /// Get the chunk read by the last fill
    pub fn buffered(&self) -> &[u8] {
        &self.buffer[..self.end]
    }

    /// Check if we've reached end of input
    pub fn is_eof(&self) -> bool {
        self.eof
    }
}

/// Tokenize everything `reader` yields, reporting to `handler`
///
/// Returns the handler after the finish notification. Read errors are
/// propagated; malformed markup never is.
pub fn tokenize_reader<R: Read, H: FeedHandler>(reader: R, handler: H) -> io::Result<H> {
    tokenize_reader_with_capacity(reader, handler, DEFAULT_BUFFER_SIZE)
}

/// Same as [`tokenize_reader`] with an explicit chunk size
pub fn tokenize_reader_with_capacity<R: Read, H: FeedHandler>(
    reader: R,
    handler: H,
    capacity: usize,
) -> io::Result<H> {
    let mut reader = BufferedReader::with_capacity(reader, capacity);
    let mut decoder = Utf8Decoder::new();
    let mut tokenizer = FeedTokenizer::new(handler);
    let mut text = String::with_capacity(capacity);

    while reader.fill_buffer()? {
        text.clear();
        decoder.decode(reader.buffered(), &mut text);
        tokenizer.feed(&text);
    }

    text.clear();
    decoder.finish(&mut text);
    tokenizer.feed(&text);
    Ok(tokenizer.finish())
}
