use std::io::BufRead;
use std::iter::FusedIterator;

use tracing::{debug, trace};

use crate::chars::{is_blank, is_blankz, is_bom, is_break, is_breakz, is_tab};
use crate::indent::Indentation;
use crate::queue::TokenQueue;
use crate::reader::Reader;
use crate::simple_key::{SimpleKey, SimpleKeys};
use crate::{Encoding, Mark, ScalarStyle, ScanError, Token, TokenData};

mod directive;
mod scalar;

pub use self::directive::MAX_NUMBER_LENGTH;

/// The YAML scanner.
///
/// Converts a character stream into a stream of [`Token`]s. Tokens are
/// pulled one at a time, either through the [`Iterator`] implementation,
/// [`Scanner::scan`], or the [`Scanner::move_next`] / [`Scanner::current`]
/// pair.
///
/// The first token is always [`TokenData::StreamStart`] and the last one
/// [`TokenData::StreamEnd`]. Any error is fatal: the scanner does not
/// produce further tokens after it.
pub struct Scanner<'r> {
    reader: Reader<'r>,
    /// Tokens scanned but not handed out yet.
    tokens: TokenQueue,
    /// The indentation levels and the flow nesting depth.
    indentation: Indentation,
    /// The simple key candidates, one per flow level.
    simple_keys: SimpleKeys,
    /// May a simple key occur at the current position?
    simple_key_allowed: bool,
    /// Was a `%YAML` directive seen since the last document marker?
    version_directive_seen: bool,
    /// Have we started to scan the input stream?
    stream_start_produced: bool,
    /// Have we handed out the STREAM-END token?
    stream_end_produced: bool,
    /// Is the head of the queue ready to be handed out?
    token_available: bool,
    /// Did scanning fail?
    failed: bool,
    /// The token returned by the last successful [`Scanner::move_next`].
    current: Option<Token>,
}

impl<'r> Default for Scanner<'r> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> Scanner<'r> {
    /// Create a scanner. Call [`Scanner::set_input`] or
    /// [`Scanner::set_input_string`] before pulling tokens; a scanner without
    /// input scans an empty stream.
    pub fn new() -> Scanner<'r> {
        Scanner {
            reader: Reader::new(),
            tokens: TokenQueue::new(),
            indentation: Indentation::new(),
            simple_keys: SimpleKeys::new(),
            simple_key_allowed: false,
            version_directive_seen: false,
            stream_start_produced: false,
            stream_end_produced: false,
            token_available: false,
            failed: false,
            current: None,
        }
    }

    /// Set a string input.
    pub fn set_input_string(&mut self, input: &'r str) {
        self.reader.set_input(input.as_bytes());
    }

    /// Set a generic input handler.
    ///
    /// The encoding is detected from the byte order mark, defaulting to
    /// UTF-8, unless it was set with [`Scanner::set_encoding`].
    pub fn set_input<R: BufRead + 'r>(&mut self, input: R) {
        self.reader.set_input(input);
    }

    /// Set the source encoding, skipping detection.
    pub fn set_encoding(&mut self, encoding: Encoding) {
        self.reader.set_encoding(encoding);
    }

    /// The source encoding. [`Encoding::Any`] until the first token has been
    /// scanned.
    pub fn encoding(&self) -> Encoding {
        self.reader.encoding()
    }

    /// The position of the scanner in the input.
    pub fn mark(&self) -> Mark {
        self.reader.mark()
    }

    /// Scan the input stream and produce the next token.
    ///
    /// Call the function subsequently to produce a sequence of tokens
    /// corresponding to the input stream. The initial token is
    /// [`TokenData::StreamStart`] and the final one [`TokenData::StreamEnd`].
    /// Once the stream end was produced, or scanning failed, further calls
    /// keep returning [`TokenData::StreamEnd`].
    ///
    /// [`Scanner`] is also an [`Iterator`], whose by-value `scan` adapter
    /// shadows this method on an owned scanner; call it as
    /// `Scanner::scan(&mut scanner)`.
    pub fn scan(&mut self) -> Result<Token, ScanError> {
        if self.stream_end_produced || self.failed {
            let mark = self.reader.mark();
            return Ok(Token {
                data: TokenData::StreamEnd,
                start_mark: mark,
                end_mark: mark,
            });
        }
        if !self.token_available {
            if let Err(err) = self.fetch_more_tokens() {
                self.failed = true;
                return Err(err);
            }
        }
        let Some(token) = self.tokens.pop() else {
            unreachable!("no more tokens, but stream-end was not produced")
        };
        self.token_available = false;
        if token.data.is_stream_end() {
            self.stream_end_produced = true;
        }
        trace!(data = ?token.data, line = token.start_mark.line, column = token.start_mark.column, "scanned token");
        Ok(token)
    }

    /// Is there another token to pull?
    ///
    /// False once [`TokenData::StreamEnd`] has been handed out, or after an
    /// error.
    pub fn has_next(&self) -> bool {
        !self.stream_end_produced && !self.failed
    }

    /// Advance to the next token. Returns `Ok(false)` once the stream end
    /// has been handed out.
    pub fn move_next(&mut self) -> Result<bool, ScanError> {
        match self.next() {
            Some(Ok(token)) => {
                self.current = Some(token);
                Ok(true)
            }
            Some(Err(err)) => {
                self.current = None;
                Err(err)
            }
            None => {
                self.current = None;
                Ok(false)
            }
        }
    }

    /// The token produced by the last successful [`Scanner::move_next`].
    pub fn current(&self) -> Option<&Token> {
        self.current.as_ref()
    }

    /// Scan until the head of the queue can no longer be preceded by a KEY
    /// token, i.e. no live simple key candidate points at it.
    fn fetch_more_tokens(&mut self) -> Result<(), ScanError> {
        loop {
            let mut need_more_tokens = self.tokens.is_empty();
            if !need_more_tokens {
                self.simple_keys.expire_stale(self.reader.mark())?;
                need_more_tokens = self.simple_keys.is_pending(self.tokens.head_number());
            }
            if !need_more_tokens {
                break;
            }
            self.fetch_next_token()?;
        }
        self.token_available = true;
        Ok(())
    }

    fn fetch_next_token(&mut self) -> Result<(), ScanError> {
        self.reader.cache(1)?;
        if !self.stream_start_produced {
            self.fetch_stream_start();
            return Ok(());
        }
        self.scan_to_next_token()?;
        self.simple_keys.expire_stale(self.reader.mark())?;
        self.unroll_indent(self.reader.mark().column as i64);
        self.reader.cache(4)?;

        let Some(ch) = self.reader.peek(0) else {
            return self.fetch_stream_end();
        };
        let next = self.reader.peek(1);
        let at_line_start = self.reader.mark().column == 0;

        if at_line_start && ch == '%' {
            return self.fetch_directive();
        }
        if at_line_start && self.check_document_indicator('-') {
            return self.fetch_document_indicator(TokenData::DocumentStart);
        }
        if at_line_start && self.check_document_indicator('.') {
            return self.fetch_document_indicator(TokenData::DocumentEnd);
        }

        let in_flow = self.indentation.in_flow();
        match ch {
            '[' => self.fetch_flow_collection_start(TokenData::FlowSequenceStart),
            '{' => self.fetch_flow_collection_start(TokenData::FlowMappingStart),
            ']' => self.fetch_flow_collection_end(TokenData::FlowSequenceEnd),
            '}' => self.fetch_flow_collection_end(TokenData::FlowMappingEnd),
            ',' => self.fetch_flow_entry(),
            '-' if is_blankz(next) => self.fetch_block_entry(),
            '?' if in_flow || is_blankz(next) => self.fetch_key(),
            ':' if in_flow || is_blankz(next) => self.fetch_value(),
            '*' => self.fetch_anchor(true),
            '&' => self.fetch_anchor(false),
            '!' => self.fetch_tag(),
            '|' if !in_flow => self.fetch_block_scalar(true),
            '>' if !in_flow => self.fetch_block_scalar(false),
            '\'' => self.fetch_flow_scalar(true),
            '"' => self.fetch_flow_scalar(false),
            _ if self.check_plain_scalar_start(ch, next) => self.fetch_plain_scalar(),
            '\t' => self.scanner_error(
                "while scanning for the next token",
                self.reader.mark(),
                "found a tab character where an indentation space is expected",
            ),
            _ => self.scanner_error(
                "while scanning for the next token",
                self.reader.mark(),
                "found character that cannot start any token",
            ),
        }
    }

    /// `---` or `...` followed by a blank or the end of the line.
    fn check_document_indicator(&self, indicator: char) -> bool {
        self.reader.check_at(indicator, 0)
            && self.reader.check_at(indicator, 1)
            && self.reader.check_at(indicator, 2)
            && is_blankz(self.reader.peek(3))
    }

    fn check_plain_scalar_start(&self, ch: char, next: Option<char>) -> bool {
        let is_indicator = is_blankz(ch)
            || matches!(
                ch,
                '-' | '?'
                    | ':'
                    | ','
                    | '['
                    | ']'
                    | '{'
                    | '}'
                    | '#'
                    | '&'
                    | '*'
                    | '!'
                    | '|'
                    | '>'
                    | '\''
                    | '"'
                    | '%'
                    | '@'
                    | '`'
            );
        !is_indicator
            || ch == '-' && !is_blank(next)
            || !self.indentation.in_flow() && matches!(ch, '?' | ':') && !is_blankz(next)
    }

    pub(crate) fn scanner_error<T>(
        &self,
        context: &'static str,
        context_mark: Mark,
        problem: &'static str,
    ) -> Result<T, ScanError> {
        Err(ScanError::Problem {
            context,
            context_mark,
            problem,
            problem_mark: self.reader.mark(),
        })
    }

    fn save_simple_key(&mut self) -> Result<(), ScanError> {
        if !self.simple_key_allowed {
            return Ok(());
        }
        let mark = self.reader.mark();
        let required =
            !self.indentation.in_flow() && self.indentation.current() == mark.column as i64;
        let key = SimpleKey {
            possible: true,
            required,
            token_number: self.tokens.next_number(),
            mark,
        };
        self.simple_keys.save(key, mark)
    }

    fn remove_simple_key(&mut self) -> Result<(), ScanError> {
        self.simple_keys.remove(self.reader.mark())
    }

    fn increase_flow_level(&mut self) {
        self.simple_keys.push_level();
        self.indentation.enter_flow();
    }

    fn decrease_flow_level(&mut self) {
        if self.indentation.in_flow() {
            self.indentation.leave_flow();
            self.simple_keys.pop_level();
        }
    }

    /// Open a block collection if `column` is deeper than the current
    /// indentation. The start token is inserted at token number `number`, or
    /// appended when `number` is `None`.
    fn roll_indent(&mut self, column: i64, number: Option<usize>, data: TokenData, mark: Mark) {
        if !self.indentation.increase_indent(column) {
            return;
        }
        debug!(column, ?data, "opening block collection");
        let token = Token {
            data,
            start_mark: mark,
            end_mark: mark,
        };
        match number {
            Some(number) => self.tokens.insert(number, token),
            None => self.tokens.push(token),
        }
    }

    /// Close every block collection deeper than `column`.
    fn unroll_indent(&mut self, column: i64) {
        let closed = self.indentation.unwind_to(column);
        if closed != 0 {
            debug!(column, closed, "closing block collections");
        }
        let mark = self.reader.mark();
        for _ in 0..closed {
            self.tokens.push(Token {
                data: TokenData::BlockEnd,
                start_mark: mark,
                end_mark: mark,
            });
        }
    }

    fn fetch_stream_start(&mut self) {
        self.simple_keys.push_level();
        self.simple_key_allowed = true;
        self.stream_start_produced = true;
        let mark = self.reader.mark();
        self.tokens.push(Token {
            data: TokenData::StreamStart,
            start_mark: mark,
            end_mark: mark,
        });
    }

    fn fetch_stream_end(&mut self) -> Result<(), ScanError> {
        self.reader.finish_line();
        self.unroll_indent(-1);
        self.remove_simple_key()?;
        self.simple_key_allowed = false;
        let mark = self.reader.mark();
        self.tokens.push(Token {
            data: TokenData::StreamEnd,
            start_mark: mark,
            end_mark: mark,
        });
        Ok(())
    }

    fn fetch_directive(&mut self) -> Result<(), ScanError> {
        self.unroll_indent(-1);
        self.remove_simple_key()?;
        self.simple_key_allowed = false;
        let token = self.scan_directive()?;
        self.tokens.push(token);
        Ok(())
    }

    fn fetch_document_indicator(&mut self, data: TokenData) -> Result<(), ScanError> {
        self.unroll_indent(-1);
        self.remove_simple_key()?;
        self.simple_key_allowed = false;
        self.version_directive_seen = false;
        let start_mark = self.reader.mark();
        self.reader.skip();
        self.reader.skip();
        self.reader.skip();
        let end_mark = self.reader.mark();
        self.tokens.push(Token {
            data,
            start_mark,
            end_mark,
        });
        Ok(())
    }

    fn fetch_flow_collection_start(&mut self, data: TokenData) -> Result<(), ScanError> {
        self.save_simple_key()?;
        self.increase_flow_level();
        self.simple_key_allowed = true;
        self.push_indicator(data);
        Ok(())
    }

    fn fetch_flow_collection_end(&mut self, data: TokenData) -> Result<(), ScanError> {
        self.remove_simple_key()?;
        self.decrease_flow_level();
        self.simple_key_allowed = false;
        self.push_indicator(data);
        Ok(())
    }

    fn fetch_flow_entry(&mut self) -> Result<(), ScanError> {
        self.remove_simple_key()?;
        self.simple_key_allowed = true;
        self.push_indicator(TokenData::FlowEntry);
        Ok(())
    }

    fn fetch_block_entry(&mut self) -> Result<(), ScanError> {
        if !self.indentation.in_flow() {
            if !self.simple_key_allowed {
                return self.scanner_error(
                    "",
                    self.reader.mark(),
                    "block sequence entries are not allowed in this context",
                );
            }
            let mark = self.reader.mark();
            self.roll_indent(
                mark.column as i64,
                None,
                TokenData::BlockSequenceStart,
                mark,
            );
        }
        self.remove_simple_key()?;
        self.simple_key_allowed = true;
        self.push_indicator(TokenData::BlockEntry);
        Ok(())
    }

    fn fetch_key(&mut self) -> Result<(), ScanError> {
        if !self.indentation.in_flow() {
            if !self.simple_key_allowed {
                return self.scanner_error(
                    "",
                    self.reader.mark(),
                    "mapping keys are not allowed in this context",
                );
            }
            let mark = self.reader.mark();
            self.roll_indent(mark.column as i64, None, TokenData::BlockMappingStart, mark);
        }
        self.remove_simple_key()?;
        self.simple_key_allowed = !self.indentation.in_flow();
        self.push_indicator(TokenData::Key);
        Ok(())
    }

    fn fetch_value(&mut self) -> Result<(), ScanError> {
        if let Some(simple_key) = self.simple_keys.take_possible() {
            self.tokens.insert(
                simple_key.token_number,
                Token {
                    data: TokenData::Key,
                    start_mark: simple_key.mark,
                    end_mark: simple_key.mark,
                },
            );
            self.roll_indent(
                simple_key.mark.column as i64,
                Some(simple_key.token_number),
                TokenData::BlockMappingStart,
                simple_key.mark,
            );
            self.simple_key_allowed = false;
        } else {
            if !self.indentation.in_flow() {
                if !self.simple_key_allowed {
                    return self.scanner_error(
                        "",
                        self.reader.mark(),
                        "mapping values are not allowed in this context",
                    );
                }
                let mark = self.reader.mark();
                self.roll_indent(mark.column as i64, None, TokenData::BlockMappingStart, mark);
            }
            self.simple_key_allowed = !self.indentation.in_flow();
        }
        self.push_indicator(TokenData::Value);
        Ok(())
    }

    fn fetch_anchor(&mut self, alias: bool) -> Result<(), ScanError> {
        self.save_simple_key()?;
        self.simple_key_allowed = false;
        let token = self.scan_anchor(alias)?;
        self.tokens.push(token);
        Ok(())
    }

    fn fetch_tag(&mut self) -> Result<(), ScanError> {
        self.save_simple_key()?;
        self.simple_key_allowed = false;
        let token = self.scan_tag()?;
        self.tokens.push(token);
        Ok(())
    }

    fn fetch_block_scalar(&mut self, literal: bool) -> Result<(), ScanError> {
        self.remove_simple_key()?;
        self.simple_key_allowed = true;
        let style = if literal {
            ScalarStyle::Literal
        } else {
            ScalarStyle::Folded
        };
        let token = self.scan_block_scalar(style)?;
        self.tokens.push(token);
        Ok(())
    }

    fn fetch_flow_scalar(&mut self, single: bool) -> Result<(), ScanError> {
        self.save_simple_key()?;
        self.simple_key_allowed = false;
        let style = if single {
            ScalarStyle::SingleQuoted
        } else {
            ScalarStyle::DoubleQuoted
        };
        let token = self.scan_flow_scalar(style)?;
        self.tokens.push(token);
        Ok(())
    }

    fn fetch_plain_scalar(&mut self) -> Result<(), ScanError> {
        self.save_simple_key()?;
        self.simple_key_allowed = false;
        let token = self.scan_plain_scalar()?;
        self.tokens.push(token);
        Ok(())
    }

    /// Consume a one-character indicator and queue its token.
    fn push_indicator(&mut self, data: TokenData) {
        let start_mark = self.reader.mark();
        self.reader.skip();
        let end_mark = self.reader.mark();
        self.tokens.push(Token {
            data,
            start_mark,
            end_mark,
        });
    }

    /// Skip blanks, comments and line breaks up to the next token.
    fn scan_to_next_token(&mut self) -> Result<(), ScanError> {
        loop {
            self.reader.cache(1)?;
            if self.reader.mark().column == 0 && is_bom(self.reader.peek(0)) {
                self.reader.skip();
                self.reader.cache(1)?;
            }

            // Tabs are only skipped where they cannot be mistaken for
            // indentation.
            while self.reader.check(' ')
                || (self.indentation.in_flow() || !self.simple_key_allowed)
                    && is_tab(self.reader.peek(0))
            {
                self.reader.skip();
                self.reader.cache(1)?;
            }

            if self.reader.check('#') {
                while !is_breakz(self.reader.peek(0)) {
                    self.reader.skip();
                    self.reader.cache(1)?;
                }
            }

            if !is_break(self.reader.peek(0)) {
                break;
            }
            self.reader.cache(2)?;
            self.reader.skip_line();
            if !self.indentation.in_flow() {
                self.simple_key_allowed = true;
            }
        }
        Ok(())
    }

    /// Skip blanks and an optional comment after a directive or block scalar
    /// header, then require the end of the line.
    fn skip_line_trailer(
        &mut self,
        context: &'static str,
        start_mark: Mark,
    ) -> Result<(), ScanError> {
        self.reader.cache(1)?;
        while is_blank(self.reader.peek(0)) {
            self.reader.skip();
            self.reader.cache(1)?;
        }
        if self.reader.check('#') {
            while !is_breakz(self.reader.peek(0)) {
                self.reader.skip();
                self.reader.cache(1)?;
            }
        }
        if !is_breakz(self.reader.peek(0)) {
            return self.scanner_error(
                context,
                start_mark,
                "did not find expected comment or line break",
            );
        }
        if is_break(self.reader.peek(0)) {
            self.reader.cache(2)?;
            self.reader.skip_line();
        }
        Ok(())
    }
}

impl<'r> Iterator for Scanner<'r> {
    type Item = Result<Token, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.has_next() {
            return None;
        }
        Some(Scanner::scan(self))
    }
}

impl<'r> FusedIterator for Scanner<'r> {}
