//! Scan Buffer - lookback window for the feed tokenizer
//!
//! Holds every character consumed since the last extraction boundary.
//! The front of the window is the single character retained from the
//! previous extraction; it only serves as lookback context and never
//! becomes part of a span.

/// Characters trimmed from extracted spans (Unicode whitespace plus BOM)
#[inline]
pub fn is_trim_char(c: char) -> bool {
    c.is_whitespace() || c == '\u{FEFF}'
}

/// Trim whitespace and byte order marks from both ends of a span
#[inline]
pub fn trim_span(s: &str) -> &str {
    s.trim_matches(is_trim_char)
}

/// Lookback window between extraction boundaries
#[derive(Debug, Clone)]
pub struct ScanBuffer {
    window: String,
    /// Byte length of the retained lookback character at the front (0 before the first extraction)
    retained: usize,
    /// Logical end of the window in bytes
    cursor: usize,
}

impl ScanBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Create an empty buffer with room for `capacity` bytes of span
    pub fn with_capacity(capacity: usize) -> Self {
        ScanBuffer {
            window: String::with_capacity(capacity),
            retained: 0,
            cursor: 0,
        }
    }

    /// Append a consumed character and advance the cursor past it
    #[inline]
    pub fn push(&mut self, c: char) {
        self.window.truncate(self.cursor);
        self.window.push(c);
        self.cursor = self.window.len();
    }

    /// Move the cursor back over the last consumed character
    ///
    /// The character stays in the window, so it is still the one retained
    /// by the next extraction.
    #[inline]
    pub fn step_back(&mut self) {
        if let Some((idx, _)) = self.window[..self.cursor].char_indices().next_back() {
            self.cursor = idx;
        }
    }

    /// Character `n` positions before the cursor (0 = the one just consumed)
    ///
    /// The retained character is visible here, which is what lets
    /// multi-character delimiters straddle an extraction boundary.
    #[inline]
    pub fn lookback(&self, n: usize) -> Option<char> {
        self.window[..self.cursor].chars().rev().nth(n)
    }

    /// Logical length of the window in characters, retained character included
    pub fn len(&self) -> usize {
        self.window[..self.cursor].chars().count()
    }

    /// Check if nothing has been consumed since the last extraction
    pub fn is_empty(&self) -> bool {
        self.cursor <= self.retained
    }

    /// Bytes currently held, retained character included
    pub fn buffered_bytes(&self) -> usize {
        self.window.len()
    }

    /// Extract the span since the last boundary
    ///
    /// Drops the retained opener and the delimiter just before the cursor,
    /// trims, then resets the window to retain only the last consumed
    /// character.
    pub fn extract(&mut self) -> String {
        let span = trim_span(self.body()).to_owned();
        self.reset();
        span
    }

    /// Reset to the next boundary without materializing the span
    pub fn discard(&mut self) {
        self.reset();
    }

    /// Raw span between the retained opener and the closing delimiter
    fn body(&self) -> &str {
        let end = self.window[..self.cursor]
            .char_indices()
            .next_back()
            .map_or(0, |(idx, _)| idx);
        if end <= self.retained {
            ""
        } else {
            &self.window[self.retained..end]
        }
    }

    fn reset(&mut self) {
        let last = self.window.chars().next_back();
        self.window.clear();
        if let Some(c) = last {
            self.window.push(c);
        }
        self.retained = self.window.len();
        self.cursor = self.window.len();
    }
}

impl Default for ScanBuffer {
    fn default() -> Self {
        Self::new()
    }
}
