use crate::chars::{
    as_digit, as_hex, is_blank, is_blankz, is_break, is_breakz, is_digit, is_flow_indicator,
    is_hex, is_space, is_tab,
};
use crate::{Mark, ScalarStyle, ScanError, Scanner, Token, TokenData};

/// How a block scalar treats its trailing line breaks.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Chomping {
    /// `-`: drop every trailing line break.
    Strip,
    /// The default: keep the final line break only.
    Clip,
    /// `+`: keep every trailing line break.
    Keep,
}

impl<'r> Scanner<'r> {
    fn check_document_boundary(&self) -> bool {
        self.reader.mark().column == 0
            && (self.check_document_indicator('-') || self.check_document_indicator('.'))
    }

    pub(super) fn scan_block_scalar(&mut self, style: ScalarStyle) -> Result<Token, ScanError> {
        let literal = style == ScalarStyle::Literal;
        let mut string = String::new();
        let mut leading_break = String::new();
        let mut trailing_breaks = String::new();
        let mut chomping = Chomping::Clip;
        let mut increment: i64 = 0;
        let mut indent: i64 = 0;
        let mut leading_blank = false;
        let start_mark = self.reader.mark();
        self.reader.skip();
        self.reader.cache(1)?;

        // The chomping and indentation indicators may come in either order.
        if let Some(indicator @ ('+' | '-')) = self.reader.peek(0) {
            chomping = chomping_for(indicator);
            self.reader.skip();
            self.reader.cache(1)?;
            if is_digit(self.reader.peek(0)) {
                increment = self.scan_indentation_indicator(start_mark)?;
            }
        } else if is_digit(self.reader.peek(0)) {
            increment = self.scan_indentation_indicator(start_mark)?;
            self.reader.cache(1)?;
            if let Some(indicator @ ('+' | '-')) = self.reader.peek(0) {
                chomping = chomping_for(indicator);
                self.reader.skip();
            }
        }

        self.skip_line_trailer("while scanning a block scalar", start_mark)?;

        let mut end_mark = self.reader.mark();
        if increment != 0 {
            let current = self.indentation.current();
            indent = if current >= 0 {
                current + increment
            } else {
                increment
            };
        }
        self.scan_block_scalar_breaks(&mut indent, &mut trailing_breaks, start_mark, &mut end_mark)?;

        self.reader.cache(1)?;
        while self.reader.mark().column as i64 == indent && !self.reader.is_eof() {
            let trailing_blank = is_blank(self.reader.peek(0));
            if !literal && leading_break.starts_with('\n') && !leading_blank && !trailing_blank {
                // Fold the break into a space, unless blank lines followed it.
                if trailing_breaks.is_empty() {
                    string.push(' ');
                }
                leading_break.clear();
            } else {
                string.push_str(&leading_break);
                leading_break.clear();
            }
            string.push_str(&trailing_breaks);
            trailing_breaks.clear();

            leading_blank = is_blank(self.reader.peek(0));
            while !is_breakz(self.reader.peek(0)) {
                self.reader.read_into(&mut string);
                self.reader.cache(1)?;
            }
            self.reader.cache(2)?;
            self.reader.read_line_into(&mut leading_break);
            self.scan_block_scalar_breaks(
                &mut indent,
                &mut trailing_breaks,
                start_mark,
                &mut end_mark,
            )?;
        }

        if chomping != Chomping::Strip {
            string.push_str(&leading_break);
        }
        if chomping == Chomping::Keep {
            string.push_str(&trailing_breaks);
        }

        Ok(Token {
            data: TokenData::scalar(style, string),
            start_mark,
            end_mark,
        })
    }

    fn scan_indentation_indicator(&mut self, start_mark: Mark) -> Result<i64, ScanError> {
        match self.reader.peek(0) {
            Some('0') => self.scanner_error(
                "while scanning a block scalar",
                start_mark,
                "found an indentation indicator equal to 0",
            ),
            Some(ch) => {
                self.reader.skip();
                Ok(i64::from(as_digit(ch)))
            }
            None => Ok(0),
        }
    }

    /// Consume the indentation and empty lines in front of a block scalar
    /// line, determining the content indentation if it is not known yet.
    fn scan_block_scalar_breaks(
        &mut self,
        indent: &mut i64,
        breaks: &mut String,
        start_mark: Mark,
        end_mark: &mut Mark,
    ) -> Result<(), ScanError> {
        let mut max_indent: i64 = 0;
        *end_mark = self.reader.mark();
        loop {
            self.reader.cache(1)?;
            while (*indent == 0 || (self.reader.mark().column as i64) < *indent)
                && is_space(self.reader.peek(0))
            {
                self.reader.skip();
                self.reader.cache(1)?;
            }
            let column = self.reader.mark().column as i64;
            if column > max_indent {
                max_indent = column;
            }
            if (*indent == 0 || column < *indent) && is_tab(self.reader.peek(0)) {
                return self.scanner_error(
                    "while scanning a block scalar",
                    start_mark,
                    "found a tab character where an indentation space is expected",
                );
            }
            if !is_break(self.reader.peek(0)) {
                break;
            }
            self.reader.cache(2)?;
            self.reader.read_line_into(breaks);
            *end_mark = self.reader.mark();
        }

        if *indent == 0 {
            *indent = max_indent.max(self.indentation.current() + 1).max(1);
        }
        Ok(())
    }

    pub(super) fn scan_flow_scalar(&mut self, style: ScalarStyle) -> Result<Token, ScanError> {
        let single = style == ScalarStyle::SingleQuoted;
        let quote = if single { '\'' } else { '"' };
        let mut string = String::new();
        let mut leading_break = String::new();
        let mut trailing_breaks = String::new();
        let mut whitespaces = String::new();

        let start_mark = self.reader.mark();
        self.reader.skip();
        loop {
            self.reader.cache(4)?;
            if self.check_document_boundary() {
                return self.scanner_error(
                    "while scanning a quoted scalar",
                    start_mark,
                    "found unexpected document indicator",
                );
            }
            if self.reader.is_eof() {
                return self.scanner_error(
                    "while scanning a quoted scalar",
                    start_mark,
                    "found unexpected end of stream",
                );
            }

            self.reader.cache(2)?;
            let mut leading_blanks = false;
            while !is_blankz(self.reader.peek(0)) {
                if single && self.reader.check('\'') && self.reader.check_at('\'', 1) {
                    string.push('\'');
                    self.reader.skip();
                    self.reader.skip();
                } else if self.reader.check(quote) {
                    break;
                } else if !single && self.reader.check('\\') && is_break(self.reader.peek(1)) {
                    // An escaped line break joins the lines without a space.
                    self.reader.cache(3)?;
                    self.reader.skip();
                    self.reader.skip_line();
                    leading_blanks = true;
                    break;
                } else if !single && self.reader.check('\\') {
                    self.scan_escape(&mut string, start_mark)?;
                } else {
                    self.reader.read_into(&mut string);
                }
                self.reader.cache(2)?;
            }

            self.reader.cache(1)?;
            if self.reader.check(quote) {
                break;
            }

            self.reader.cache(1)?;
            while is_blank(self.reader.peek(0)) || is_break(self.reader.peek(0)) {
                if is_blank(self.reader.peek(0)) {
                    if leading_blanks {
                        self.reader.skip();
                    } else {
                        self.reader.read_into(&mut whitespaces);
                    }
                } else {
                    self.reader.cache(2)?;
                    if leading_blanks {
                        self.reader.read_line_into(&mut trailing_breaks);
                    } else {
                        whitespaces.clear();
                        self.reader.read_line_into(&mut leading_break);
                        leading_blanks = true;
                    }
                }
                self.reader.cache(1)?;
            }

            if leading_blanks {
                fold_breaks(&mut string, &mut leading_break, &mut trailing_breaks);
            } else {
                string.push_str(&whitespaces);
                whitespaces.clear();
            }
        }

        self.reader.skip();
        let end_mark = self.reader.mark();
        Ok(Token {
            data: TokenData::scalar(style, string),
            start_mark,
            end_mark,
        })
    }

    /// Decode one escape sequence of a double-quoted scalar. The reader is
    /// at the backslash and at least two characters are cached.
    fn scan_escape(&mut self, string: &mut String, start_mark: Mark) -> Result<(), ScanError> {
        let code_length = match self.reader.peek(1) {
            Some('0') => {
                string.push('\0');
                0
            }
            Some('a') => {
                string.push('\x07');
                0
            }
            Some('b') => {
                string.push('\x08');
                0
            }
            Some('t' | '\t') => {
                string.push('\t');
                0
            }
            Some('n') => {
                string.push('\n');
                0
            }
            Some('v') => {
                string.push('\x0B');
                0
            }
            Some('f') => {
                string.push('\x0C');
                0
            }
            Some('r') => {
                string.push('\r');
                0
            }
            Some('e') => {
                string.push('\x1B');
                0
            }
            Some(ch @ (' ' | '"' | '/' | '\\')) => {
                string.push(ch);
                0
            }
            // NEL (#x85)
            Some('N') => {
                string.push('\u{0085}');
                0
            }
            // #xA0
            Some('_') => {
                string.push('\u{00a0}');
                0
            }
            // LS (#x2028)
            Some('L') => {
                string.push('\u{2028}');
                0
            }
            // PS (#x2029)
            Some('P') => {
                string.push('\u{2029}');
                0
            }
            Some('x') => 2,
            Some('u') => 4,
            Some('U') => 8,
            _ => {
                return self.scanner_error(
                    "while parsing a quoted scalar",
                    start_mark,
                    "found unknown escape character",
                );
            }
        };
        self.reader.skip();
        self.reader.skip();
        if code_length == 0 {
            return Ok(());
        }

        self.reader.cache(code_length)?;
        let mut value: u32 = 0;
        for k in 0..code_length {
            match self.reader.peek(k) {
                Some(ch) if is_hex(ch) => value = (value << 4) + as_hex(ch),
                _ => {
                    return self.scanner_error(
                        "while parsing a quoted scalar",
                        start_mark,
                        "did not find expected hexdecimal number",
                    );
                }
            }
        }
        let Some(ch) = char::from_u32(value) else {
            return self.scanner_error(
                "while parsing a quoted scalar",
                start_mark,
                "found invalid Unicode character escape code",
            );
        };
        string.push(ch);
        for _ in 0..code_length {
            self.reader.skip();
        }
        Ok(())
    }

    pub(super) fn scan_plain_scalar(&mut self) -> Result<Token, ScanError> {
        let mut string = String::new();
        let mut leading_break = String::new();
        let mut trailing_breaks = String::new();
        let mut whitespaces = String::new();
        let mut leading_blanks = false;
        let indent = self.indentation.current() + 1;
        let in_flow = self.indentation.in_flow();
        let start_mark = self.reader.mark();
        let mut end_mark = start_mark;

        loop {
            self.reader.cache(4)?;
            if self.check_document_boundary() || self.reader.check('#') {
                break;
            }

            while !is_blankz(self.reader.peek(0)) {
                let next = self.reader.peek(1);
                if in_flow && self.reader.check(':') && (next == Some('?') || is_flow_indicator(next))
                {
                    return self.scanner_error(
                        "while scanning a plain scalar",
                        start_mark,
                        "found unexpected ':'",
                    );
                }
                if self.reader.check(':') && is_blankz(next)
                    || in_flow && is_flow_indicator(self.reader.peek(0))
                {
                    break;
                }

                if leading_blanks {
                    fold_breaks(&mut string, &mut leading_break, &mut trailing_breaks);
                    leading_blanks = false;
                } else if !whitespaces.is_empty() {
                    string.push_str(&whitespaces);
                    whitespaces.clear();
                }

                self.reader.read_into(&mut string);
                end_mark = self.reader.mark();
                self.reader.cache(2)?;
            }

            if !(is_blank(self.reader.peek(0)) || is_break(self.reader.peek(0))) {
                break;
            }

            self.reader.cache(1)?;
            while is_blank(self.reader.peek(0)) || is_break(self.reader.peek(0)) {
                if is_blank(self.reader.peek(0)) {
                    if leading_blanks
                        && (self.reader.mark().column as i64) < indent
                        && is_tab(self.reader.peek(0))
                    {
                        return self.scanner_error(
                            "while scanning a plain scalar",
                            start_mark,
                            "found a tab character that violates indentation",
                        );
                    }
                    if leading_blanks {
                        self.reader.skip();
                    } else {
                        self.reader.read_into(&mut whitespaces);
                    }
                } else {
                    self.reader.cache(2)?;
                    if leading_blanks {
                        self.reader.read_line_into(&mut trailing_breaks);
                    } else {
                        whitespaces.clear();
                        self.reader.read_line_into(&mut leading_break);
                        leading_blanks = true;
                    }
                }
                self.reader.cache(1)?;
            }

            if !in_flow && (self.reader.mark().column as i64) < indent {
                break;
            }
        }

        if leading_blanks {
            self.simple_key_allowed = true;
        }

        Ok(Token {
            data: TokenData::PlainScalar { text: string },
            start_mark,
            end_mark,
        })
    }
}

fn chomping_for(indicator: char) -> Chomping {
    if indicator == '+' {
        Chomping::Keep
    } else {
        Chomping::Strip
    }
}

/// Join two lines of a flow or plain scalar. A single line break becomes a
/// space; otherwise the breaks after the first are kept.
fn fold_breaks(string: &mut String, leading_break: &mut String, trailing_breaks: &mut String) {
    if leading_break.starts_with('\n') {
        if trailing_breaks.is_empty() {
            string.push(' ');
        } else {
            string.push_str(trailing_breaks);
            trailing_breaks.clear();
        }
    } else {
        string.push_str(leading_break);
        string.push_str(trailing_breaks);
        trailing_breaks.clear();
    }
    leading_break.clear();
}
