//! Feed Tokenizer - character-driven state machine
//!
//! Consumes decoded text one character at a time and reports structural
//! events to a [`FeedHandler`]:
//! - Text runs (trimmed, whitespace-only runs suppressed)
//! - Processing instructions
//! - Open and close tags (self-closing tags report both)
//! - CDATA sections (verbatim)
//!
//! Comments are consumed silently. Nothing is validated and nothing fails:
//! a construct left open at [`FeedTokenizer::finish`] simply never reports.
//!
//! Chunk boundaries carry no meaning. All scan state lives in the
//! tokenizer, so feeding a document one character at a time produces the
//! same events as feeding it in one piece.

use super::attributes::{parse_tag, ParsedTag};
use super::buffer::{trim_span, ScanBuffer};

const LOG_TARGET: &str = "feedscan.tokenizer";

/// Current scanning state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanState {
    /// Between markup, accumulating text
    #[default]
    Text,
    /// After `<`, inside a tag until `>`
    TagOpen,
    /// Inside `<?...?>`
    Instruction,
    /// Inside `<!--...-->`
    Comment,
    /// Inside `<![CDATA[...]]`
    CData,
}

/// Classification of the tag currently being scanned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PendingTagKind {
    /// No tag in progress
    #[default]
    None,
    /// `<name ...>`
    Opening,
    /// `</name ...>`
    Closing,
    /// `<name .../>`
    SelfClosing,
}

impl PendingTagKind {
    /// Add the closing classification, keeping an opening one
    #[inline]
    pub fn with_closing(self) -> Self {
        match self {
            PendingTagKind::Opening | PendingTagKind::SelfClosing => PendingTagKind::SelfClosing,
            PendingTagKind::None | PendingTagKind::Closing => PendingTagKind::Closing,
        }
    }

    /// Whether completion reports an open tag
    #[inline]
    pub fn opens(self) -> bool {
        matches!(self, PendingTagKind::Opening | PendingTagKind::SelfClosing)
    }

    /// Whether completion reports a close tag
    #[inline]
    pub fn closes(self) -> bool {
        matches!(self, PendingTagKind::Closing | PendingTagKind::SelfClosing)
    }
}

/// Receiver for tokenizer events
///
/// Every method is called synchronously from inside [`FeedTokenizer::feed`],
/// in document order. All methods default to doing nothing, so a handler
/// only implements what it subscribes to.
pub trait FeedHandler {
    /// Trimmed, non-empty text between markup
    fn text(&mut self, _text: &str) {}

    /// Processing instruction, e.g. `<?xml version="1.0"?>`
    fn instruction(&mut self, _instruction: &ParsedTag) {}

    /// Opening tag, also reported first for a self-closing tag
    fn open_tag(&mut self, _tag: &ParsedTag) {}

    /// Closing tag, also reported right after the open of a self-closing tag
    fn close_tag(&mut self, _tag: &ParsedTag) {}

    /// CDATA payload, unmodified
    fn cdata(&mut self, _data: &str) {}
}

impl<H: FeedHandler + ?Sized> FeedHandler for &mut H {
    fn text(&mut self, text: &str) {
        (**self).text(text)
    }

    fn instruction(&mut self, instruction: &ParsedTag) {
        (**self).instruction(instruction)
    }

    fn open_tag(&mut self, tag: &ParsedTag) {
        (**self).open_tag(tag)
    }

    fn close_tag(&mut self, tag: &ParsedTag) {
        (**self).close_tag(tag)
    }

    fn cdata(&mut self, data: &str) {
        (**self).cdata(data)
    }
}

/// Incremental tokenizer for one document stream
pub struct FeedTokenizer<H: FeedHandler> {
    handler: H,
    state: ScanState,
    tag_kind: PendingTagKind,
    buffer: ScanBuffer,
}

impl<H: FeedHandler> FeedTokenizer<H> {
    /// Create a tokenizer reporting to `handler`
    pub fn new(handler: H) -> Self {
        FeedTokenizer {
            handler,
            state: ScanState::Text,
            tag_kind: PendingTagKind::None,
            buffer: ScanBuffer::new(),
        }
    }

    /// Get the current scan state
    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Get the classification of the tag in progress
    pub fn tag_kind(&self) -> PendingTagKind {
        self.tag_kind
    }

    /// Borrow the handler
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Mutably borrow the handler (e.g. to drain collected events between chunks)
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Bytes held in the lookback window
    pub fn buffered_bytes(&self) -> usize {
        self.buffer.buffered_bytes()
    }

    /// Process a chunk of text
    ///
    /// Returns once the chunk is exhausted; events are delivered to the
    /// handler before this returns.
    pub fn feed(&mut self, chunk: &str) {
        for c in chunk.chars() {
            self.consume(c);
        }
    }

    /// End of input
    ///
    /// Nothing is flushed: an unterminated construct or trailing text never
    /// reports. Returns the handler.
    pub fn finish(self) -> H {
        if self.state != ScanState::Text {
            log::debug!(
                target: LOG_TARGET,
                "finish inside unterminated {:?} ({} bytes dropped)",
                self.state,
                self.buffer.buffered_bytes()
            );
        }
        self.handler
    }

    fn consume(&mut self, c: char) {
        let prev = self.buffer.lookback(0);
        self.buffer.push(c);

        match self.state {
            ScanState::Text => {
                if c == '<' {
                    self.start_tag();
                }
            }
            ScanState::TagOpen => self.scan_tag(prev, c),
            ScanState::Instruction => {
                if prev == Some('?') && c == '>' {
                    self.end_instruction();
                }
            }
            ScanState::CData => {
                if prev == Some(']') && c == ']' {
                    self.end_cdata();
                }
            }
            ScanState::Comment => {
                if self.buffer.lookback(2) == Some('-') && prev == Some('-') && c == '>' {
                    self.buffer.discard();
                    self.state = ScanState::Text;
                }
            }
        }
    }

    fn scan_tag(&mut self, prev: Option<char>, c: char) {
        let opener = self.buffer.lookback(2);

        match (opener, prev, c) {
            (_, Some('<'), '?') => {
                self.buffer.discard();
                self.enter(ScanState::Instruction);
            }
            (_, Some('<'), '/') => {
                self.buffer.discard();
                self.tag_kind = PendingTagKind::Closing;
            }
            (Some('<'), Some('!'), '[') => {
                self.buffer.discard();
                self.enter(ScanState::CData);
            }
            (Some('<'), Some('!'), '-') => {
                // Comment bodies are never materialized
                self.enter(ScanState::Comment);
            }
            (_, _, '>') => {
                if prev == Some('/') {
                    self.tag_kind = self.tag_kind.with_closing();
                }
                self.end_tag();
            }
            _ => {}
        }
    }

    fn enter(&mut self, state: ScanState) {
        log::trace!(target: LOG_TARGET, "enter {state:?}");
        self.state = state;
    }

    fn start_tag(&mut self) {
        let text = self.buffer.extract();
        if !text.is_empty() {
            log::trace!(target: LOG_TARGET, "emit text: {text:?}");
            self.handler.text(&text);
        }
        self.state = ScanState::TagOpen;
        self.tag_kind = PendingTagKind::Opening;
    }

    fn end_tag(&mut self) {
        let span = self.buffer.extract();
        let body = span.strip_suffix('/').map_or(span.as_str(), trim_span);
        let tag = parse_tag(body);

        log::trace!(target: LOG_TARGET, "emit {:?} tag: {tag:?}", self.tag_kind);
        if self.tag_kind.opens() {
            self.handler.open_tag(&tag);
        }
        if self.tag_kind.closes() {
            self.handler.close_tag(&tag);
        }

        self.tag_kind = PendingTagKind::None;
        self.state = ScanState::Text;
    }

    fn end_instruction(&mut self) {
        // Exclude the `?` of `?>` from the span
        self.buffer.step_back();
        let instruction = parse_tag(&self.buffer.extract());
        log::trace!(target: LOG_TARGET, "emit instruction: {instruction:?}");
        self.handler.instruction(&instruction);
        self.state = ScanState::Text;
    }

    fn end_cdata(&mut self) {
        // Span is `CDATA[payload]`; the terminator is `]]`, a following `>` is text
        let span = self.buffer.extract();
        let data = cdata_payload(&span);
        log::trace!(target: LOG_TARGET, "emit cdata: {data:?}");
        self.handler.cdata(data);
        self.state = ScanState::Text;
    }
}

/// Everything between the first `[` and the last `]`
fn cdata_payload(span: &str) -> &str {
    let bytes = span.as_bytes();
    let start = memchr::memchr(b'[', bytes).map_or(0, |idx| idx + 1);
    let end = memchr::memrchr(b']', bytes).unwrap_or(bytes.len());
    if end <= start {
        ""
    } else {
        &span[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test handler that records events as flat strings
    #[derive(Default)]
    struct TestHandler {
        events: Vec<String>,
    }

    fn render(tag: &ParsedTag) -> String {
        let attrs: Vec<String> = tag
            .attributes
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        format!("{}[{}]", tag.name, attrs.join(","))
    }

    impl FeedHandler for TestHandler {
        fn text(&mut self, text: &str) {
            self.events.push(format!("text:{text}"));
        }

        fn instruction(&mut self, instruction: &ParsedTag) {
            self.events.push(format!("pi:{}", render(instruction)));
        }

        fn open_tag(&mut self, tag: &ParsedTag) {
            self.events.push(format!("open:{}", render(tag)));
        }

        fn close_tag(&mut self, tag: &ParsedTag) {
            self.events.push(format!("close:{}", render(tag)));
        }

        fn cdata(&mut self, data: &str) {
            self.events.push(format!("cdata:{data}"));
        }
    }

    fn scan(input: &str) -> Vec<String> {
        let mut tokenizer = FeedTokenizer::new(TestHandler::default());
        tokenizer.feed(input);
        tokenizer.finish().events
    }

    fn scan_chunked(input: &str, size: usize) -> Vec<String> {
        let mut tokenizer = FeedTokenizer::new(TestHandler::default());
        let chars: Vec<char> = input.chars().collect();
        for chunk in chars.chunks(size) {
            let chunk: String = chunk.iter().collect();
            tokenizer.feed(&chunk);
        }
        tokenizer.finish().events
    }

    #[test]
    fn test_instruction_inside_root() {
        assert_eq!(
            scan(r#"<root><?xml version="2.0" encoding="utf-8"?></root>"#),
            ["open:root[]", "pi:xml[version=2.0,encoding=utf-8]", "close:root[]"]
        );
    }

    #[test]
    fn test_nested_with_text() {
        assert_eq!(
            scan(r#"<root name="steeljuice"><sub>TEXT</sub></root>"#),
            [
                "open:root[name=steeljuice]",
                "open:sub[]",
                "text:TEXT",
                "close:sub[]",
                "close:root[]",
            ]
        );
    }

    #[test]
    fn test_end_tag_with_attributes() {
        assert_eq!(
            scan(r#"</self name="steeljuice">"#),
            ["close:self[name=steeljuice]"]
        );
    }

    #[test]
    fn test_cdata_verbatim() {
        assert_eq!(
            scan("<root><![CDATA[<p>cdata-text</br></p>]]</root>"),
            ["open:root[]", "cdata:<p>cdata-text</br></p>", "close:root[]"]
        );
        assert_eq!(
            scan("<a><![CDATA[  &amp; x  ]]</a>"),
            ["open:a[]", "cdata:  &amp; x  ", "close:a[]"]
        );
    }

    #[test]
    fn test_cdata_terminator_leaves_gt_as_text() {
        assert_eq!(
            scan("<a><![CDATA[x]]></a>"),
            ["open:a[]", "cdata:x", "text:>", "close:a[]"]
        );
    }

    #[test]
    fn test_empty_cdata() {
        assert_eq!(scan("<![CDATA[]]"), ["cdata:"]);
    }

    #[test]
    fn test_comments_are_silent() {
        assert_eq!(
            scan("<root><!--c1-->TEXT<!--c2--></root>"),
            ["open:root[]", "text:TEXT", "close:root[]"]
        );
        assert_eq!(
            scan("<root><!-- <a>x</a> <![CDATA[y]] --></root>"),
            ["open:root[]", "close:root[]"]
        );
    }

    #[test]
    fn test_self_closing() {
        assert_eq!(scan("<x/>"), ["open:x[]", "close:x[]"]);
        assert_eq!(scan("<x />"), ["open:x[]", "close:x[]"]);
        assert_eq!(
            scan(r#"<link href="http://a.org/b/"/>"#),
            ["open:link[href=http://a.org/b/]", "close:link[href=http://a.org/b/]"]
        );
    }

    #[test]
    fn test_whitespace_text_suppressed() {
        assert_eq!(
            scan("<a>\n  \t<b> x </b>\n</a>"),
            ["open:a[]", "open:b[]", "text:x", "close:b[]", "close:a[]"]
        );
    }

    #[test]
    fn test_leading_text_keeps_first_character() {
        assert_eq!(scan("hello<a>"), ["text:hello", "open:a[]"]);
        assert_eq!(scan("x<a>"), ["text:x", "open:a[]"]);
    }

    #[test]
    fn test_text_keeps_trailing_slash() {
        assert_eq!(
            scan("<link>http://example.org/</link>"),
            ["open:link[]", "text:http://example.org/", "close:link[]"]
        );
        assert_eq!(scan("b/<x>"), ["text:b/", "open:x[]"]);
    }

    #[test]
    fn test_unterminated_constructs_never_report() {
        assert_eq!(scan("<a><!-- open"), ["open:a[]"]);
        assert_eq!(scan("<a><![CDATA[open"), ["open:a[]"]);
        assert_eq!(scan("<a><?pi x='1'"), ["open:a[]"]);
        assert_eq!(scan("<a>trailing"), ["open:a[]"]);
        assert_eq!(scan("<a><b"), ["open:a[]"]);
    }

    #[test]
    fn test_state_after_finish_input() {
        let mut tokenizer = FeedTokenizer::new(TestHandler::default());
        tokenizer.feed("<a><!-");
        assert_eq!(tokenizer.state(), ScanState::Comment);
        tokenizer.feed("- x -->");
        assert_eq!(tokenizer.state(), ScanState::Text);
        tokenizer.feed("</");
        assert_eq!(tokenizer.state(), ScanState::TagOpen);
        assert_eq!(tokenizer.tag_kind(), PendingTagKind::Closing);
        tokenizer.feed("a>");
        assert_eq!(tokenizer.tag_kind(), PendingTagKind::None);
    }

    #[test]
    fn test_doctype_reports_as_open_tag() {
        assert_eq!(
            scan("<!DOCTYPE html><a/>"),
            ["open:!DOCTYPE html[]", "open:a[]", "close:a[]"]
        );
    }

    #[test]
    fn test_chunk_boundary_independence() {
        let doc = concat!(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n",
            "<feed xmlns=\"http://www.w3.org/2005/Atom\">\n",
            "  <!-- generated -->\n",
            "  <title type='text'>Ünïcödé — feed</title>\n",
            "  <link rel=\"self\" href=\"http://example.org/\"/>\n",
            "  <entry><content><![CDATA[<b>bold</b> ]] ]]></content></entry>\n",
            "</feed>\n",
        );
        let whole = scan(doc);
        assert!(!whole.is_empty());
        for size in [1usize, 2, 3, 4, 8, 16, 32, 64] {
            assert_eq!(scan_chunked(doc, size), whole, "chunk size {size}");
        }
    }

    #[test]
    fn test_split_at_every_boundary() {
        let doc = "<r a='1'><!--c--><![CDATA[d]]<?p q=\"2\"?><s/>t</r>";
        let whole = scan(doc);
        for (idx, _) in doc.char_indices().skip(1) {
            let mut tokenizer = FeedTokenizer::new(TestHandler::default());
            tokenizer.feed(&doc[..idx]);
            tokenizer.feed(&doc[idx..]);
            assert_eq!(tokenizer.finish().events, whole, "split at {idx}");
        }
    }

    #[test]
    fn test_handler_by_reference() {
        let mut handler = TestHandler::default();
        {
            let mut tokenizer = FeedTokenizer::new(&mut handler);
            tokenizer.feed("<a>b</a>");
            tokenizer.finish();
        }
        assert_eq!(handler.events, ["open:a[]", "text:b", "close:a[]"]);
    }

    #[test]
    fn test_pending_tag_kind() {
        assert_eq!(PendingTagKind::Opening.with_closing(), PendingTagKind::SelfClosing);
        assert_eq!(PendingTagKind::Closing.with_closing(), PendingTagKind::Closing);
        assert!(PendingTagKind::SelfClosing.opens() && PendingTagKind::SelfClosing.closes());
        assert!(!PendingTagKind::Closing.opens());
        assert!(!PendingTagKind::None.closes());
    }

    #[test]
    fn test_cdata_payload_bounds() {
        assert_eq!(cdata_payload("CDATA[abc]"), "abc");
        assert_eq!(cdata_payload("CDATA[a]b]"), "a]b");
        assert_eq!(cdata_payload("x]"), "x");
        assert_eq!(cdata_payload("]["), "");
    }
}
