//! Directives, anchors, aliases and tags.

use tracing::debug;

use crate::chars::{as_digit, as_hex, is_alpha, is_blank, is_blankz, is_digit, is_hex, is_uri_char};
use crate::{Mark, ScanError, Scanner, Token, TokenData};

/// The maximum number of digits in a `%YAML` version number.
pub const MAX_NUMBER_LENGTH: usize = 9;

impl<'r> Scanner<'r> {
    pub(super) fn scan_directive(&mut self) -> Result<Token, ScanError> {
        let start_mark = self.reader.mark();
        self.reader.skip();
        let name = self.scan_directive_name(start_mark)?;

        let data = match name.as_str() {
            "YAML" => {
                if self.version_directive_seen {
                    return self.scanner_error(
                        "while scanning a directive",
                        start_mark,
                        "found duplicate %YAML directive",
                    );
                }
                let (major, minor) = self.scan_version_directive_value(start_mark)?;
                self.version_directive_seen = true;
                TokenData::VersionDirective { major, minor }
            }
            "TAG" => {
                let (handle, prefix) = self.scan_tag_directive_value(start_mark)?;
                TokenData::TagDirective { handle, prefix }
            }
            _ => {
                return self.scanner_error(
                    "while scanning a directive",
                    start_mark,
                    "found unknown directive name",
                );
            }
        };
        let end_mark = self.reader.mark();
        debug!(?data, "scanned directive");

        self.skip_line_trailer("while scanning a directive", start_mark)?;

        Ok(Token {
            data,
            start_mark,
            end_mark,
        })
    }

    fn scan_directive_name(&mut self, start_mark: Mark) -> Result<String, ScanError> {
        let mut string = String::new();
        self.reader.cache(1)?;
        while is_alpha(self.reader.peek(0)) {
            self.reader.read_into(&mut string);
            self.reader.cache(1)?;
        }

        if string.is_empty() {
            self.scanner_error(
                "while scanning a directive",
                start_mark,
                "could not find expected directive name",
            )
        } else if !is_blankz(self.reader.peek(0)) {
            self.scanner_error(
                "while scanning a directive",
                start_mark,
                "found unexpected non-alphabetical character",
            )
        } else {
            Ok(string)
        }
    }

    fn skip_blanks(&mut self) -> Result<(), ScanError> {
        self.reader.cache(1)?;
        while is_blank(self.reader.peek(0)) {
            self.reader.skip();
            self.reader.cache(1)?;
        }
        Ok(())
    }

    fn scan_version_directive_value(&mut self, start_mark: Mark) -> Result<(i32, i32), ScanError> {
        self.skip_blanks()?;
        let major = self.scan_version_directive_number(start_mark)?;
        if !self.reader.check('.') {
            return self.scanner_error(
                "while scanning a %YAML directive",
                start_mark,
                "did not find expected digit or '.' character",
            );
        }
        self.reader.skip();
        let minor = self.scan_version_directive_number(start_mark)?;
        Ok((major, minor))
    }

    fn scan_version_directive_number(&mut self, start_mark: Mark) -> Result<i32, ScanError> {
        let mut value: i32 = 0;
        let mut length = 0;
        self.reader.cache(1)?;
        while let Some(ch) = self.reader.peek(0).filter(|ch| is_digit(*ch)) {
            length += 1;
            if length > MAX_NUMBER_LENGTH {
                return self.scanner_error(
                    "while scanning a %YAML directive",
                    start_mark,
                    "found extremely long version number",
                );
            }
            value = value * 10 + as_digit(ch) as i32;
            self.reader.skip();
            self.reader.cache(1)?;
        }
        if length == 0 {
            return self.scanner_error(
                "while scanning a %YAML directive",
                start_mark,
                "did not find expected version number",
            );
        }
        Ok(value)
    }

    /// Returns `(handle, prefix)`.
    fn scan_tag_directive_value(&mut self, start_mark: Mark) -> Result<(String, String), ScanError> {
        self.skip_blanks()?;
        let handle = self.scan_tag_handle(true, start_mark)?;

        self.reader.cache(1)?;
        if !is_blank(self.reader.peek(0)) {
            return self.scanner_error(
                "while scanning a %TAG directive",
                start_mark,
                "did not find expected whitespace",
            );
        }
        self.skip_blanks()?;

        let prefix = self.scan_tag_uri(true, true, None, start_mark)?;
        self.reader.cache(1)?;
        if !is_blankz(self.reader.peek(0)) {
            return self.scanner_error(
                "while scanning a %TAG directive",
                start_mark,
                "did not find expected whitespace or line break",
            );
        }
        Ok((handle, prefix))
    }

    pub(super) fn scan_anchor(&mut self, alias: bool) -> Result<Token, ScanError> {
        let mut name = String::new();
        let start_mark = self.reader.mark();
        self.reader.skip();
        self.reader.cache(1)?;
        while is_alpha(self.reader.peek(0)) {
            self.reader.read_into(&mut name);
            self.reader.cache(1)?;
        }
        let end_mark = self.reader.mark();

        let terminated = is_blankz(self.reader.peek(0))
            || matches!(
                self.reader.peek(0),
                Some('?' | ':' | ',' | ']' | '}' | '%' | '@' | '`')
            );
        if name.is_empty() || !terminated {
            return self.scanner_error(
                if alias {
                    "while scanning an alias"
                } else {
                    "while scanning an anchor"
                },
                start_mark,
                "did not find expected alphabetic or numeric character",
            );
        }

        let data = if alias {
            TokenData::AnchorAlias { name }
        } else {
            TokenData::Anchor { name }
        };
        Ok(Token {
            data,
            start_mark,
            end_mark,
        })
    }

    pub(super) fn scan_tag(&mut self) -> Result<Token, ScanError> {
        let mut handle;
        let mut suffix;
        let start_mark = self.reader.mark();

        self.reader.cache(2)?;
        if self.reader.check_at('<', 1) {
            // Verbatim tag: `!<uri>`.
            handle = String::new();
            self.reader.skip();
            self.reader.skip();
            suffix = self.scan_tag_uri(true, false, None, start_mark)?;
            if !self.reader.check('>') {
                return self.scanner_error(
                    "while scanning a tag",
                    start_mark,
                    "did not find the expected '>'",
                );
            }
            self.reader.skip();
        } else {
            handle = self.scan_tag_handle(false, start_mark)?;
            if handle.len() > 1 && handle.starts_with('!') && handle.ends_with('!') {
                suffix = self.scan_tag_uri(false, false, None, start_mark)?;
            } else {
                // `!suffix`, or a lone `!`: what was read as the handle is
                // really the start of the suffix.
                suffix = self.scan_tag_uri(false, false, Some(&handle), start_mark)?;
                handle = String::from("!");
                if suffix.is_empty() {
                    core::mem::swap(&mut handle, &mut suffix);
                }
            }
        }

        self.reader.cache(1)?;
        if !is_blankz(self.reader.peek(0))
            && !(self.indentation.in_flow() && self.reader.check(','))
        {
            return self.scanner_error(
                "while scanning a tag",
                start_mark,
                "did not find expected whitespace or line break",
            );
        }

        let end_mark = self.reader.mark();
        Ok(Token {
            data: TokenData::Tag { handle, suffix },
            start_mark,
            end_mark,
        })
    }

    fn scan_tag_handle(&mut self, directive: bool, start_mark: Mark) -> Result<String, ScanError> {
        let mut string = String::new();
        self.reader.cache(1)?;
        if !self.reader.check('!') {
            return self.scanner_error(
                if directive {
                    "while scanning a tag directive"
                } else {
                    "while scanning a tag"
                },
                start_mark,
                "did not find expected '!'",
            );
        }

        self.reader.read_into(&mut string);
        self.reader.cache(1)?;
        while is_alpha(self.reader.peek(0)) {
            self.reader.read_into(&mut string);
            self.reader.cache(1)?;
        }
        if self.reader.check('!') {
            self.reader.read_into(&mut string);
        } else if directive && string != "!" {
            // A named handle in a %TAG directive must be closed by `!`.
            return self.scanner_error(
                "while parsing a tag directive",
                start_mark,
                "did not find expected '!'",
            );
        }
        Ok(string)
    }

    /// Scan a tag URI. `head` is a tag handle that turned out to be the
    /// beginning of the URI; its leading `!` is dropped.
    fn scan_tag_uri(
        &mut self,
        flow_indicators: bool,
        directive: bool,
        head: Option<&str>,
        start_mark: Mark,
    ) -> Result<String, ScanError> {
        let head = head.unwrap_or("");
        let mut length = head.len();
        let mut string = String::new();
        if length > 1 {
            string.push_str(&head[1..]);
        }

        self.reader.cache(1)?;
        while is_uri_char(self.reader.peek(0), flow_indicators) {
            if self.reader.check('%') {
                self.scan_uri_escapes(directive, start_mark, &mut string)?;
            } else {
                self.reader.read_into(&mut string);
            }
            length += 1;
            self.reader.cache(1)?;
        }

        if length == 0 {
            return self.scanner_error(
                if directive {
                    "while parsing a %TAG directive"
                } else {
                    "while parsing a tag"
                },
                start_mark,
                "did not find expected tag URI",
            );
        }
        Ok(string)
    }

    /// Decode a run of `%HH` escapes forming one UTF-8 encoded character.
    fn scan_uri_escapes(
        &mut self,
        directive: bool,
        start_mark: Mark,
        string: &mut String,
    ) -> Result<(), ScanError> {
        let context = if directive {
            "while parsing a %TAG directive"
        } else {
            "while parsing a tag"
        };
        let mut octets = Vec::with_capacity(4);
        let mut width = 0;
        loop {
            self.reader.cache(3)?;
            let (Some(high), Some(low)) = (self.reader.peek(1), self.reader.peek(2)) else {
                return self.scanner_error(context, start_mark, "did not find URI escaped octet");
            };
            if !(self.reader.check('%') && is_hex(high) && is_hex(low)) {
                return self.scanner_error(context, start_mark, "did not find URI escaped octet");
            }
            let octet = ((as_hex(high) << 4) + as_hex(low)) as u8;

            if width == 0 {
                width = match octet {
                    _ if octet & 0x80 == 0x00 => 1,
                    _ if octet & 0xE0 == 0xC0 => 2,
                    _ if octet & 0xF0 == 0xE0 => 3,
                    _ if octet & 0xF8 == 0xF0 => 4,
                    _ => {
                        return self.scanner_error(
                            context,
                            start_mark,
                            "found an incorrect leading UTF-8 octet",
                        );
                    }
                };
            } else if octet & 0xC0 != 0x80 {
                return self.scanner_error(
                    context,
                    start_mark,
                    "found an incorrect trailing UTF-8 octet",
                );
            }
            octets.push(octet);
            self.reader.skip();
            self.reader.skip();
            self.reader.skip();
            if octets.len() == width {
                break;
            }
        }

        match core::str::from_utf8(&octets) {
            Ok(decoded) => {
                string.push_str(decoded);
                Ok(())
            }
            Err(_) => self.scanner_error(
                context,
                start_mark,
                "found an incorrect UTF-8 sequence",
            ),
        }
    }
}
