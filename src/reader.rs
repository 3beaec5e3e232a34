use std::collections::VecDeque;
use std::io::BufRead;

use crate::chars::{is_allowed, is_break};
use crate::{Encoding, EncodingError, Mark};

const BOM_UTF8: [u8; 3] = [0xef, 0xbb, 0xbf];
const BOM_UTF16LE: [u8; 2] = [0xff, 0xfe];
const BOM_UTF16BE: [u8; 2] = [0xfe, 0xff];

/// Decoded characters that have not been consumed by the scanner yet.
///
/// `end` is the position just past the last decoded character, so that a
/// disallowed character can be reported where it occurs in the stream rather
/// than where the scanner currently is.
#[derive(Default)]
struct Lookahead {
    chars: VecDeque<char>,
    offset: usize,
    end: Mark,
    after_cr: bool,
}

impl Lookahead {
    fn push(&mut self, ch: char, width: usize) -> Result<(), EncodingError> {
        if !is_allowed(ch) {
            return Err(EncodingError::InvalidCharacter {
                value: ch,
                mark: self.end,
            });
        }
        self.chars.push_back(ch);
        self.offset += width;
        self.end.index += 1;
        if ch == '\n' && self.after_cr {
            // Second half of a CRLF pair; the line was counted at the CR.
        } else if is_break(ch) {
            self.end.line += 1;
            self.end.column = 0;
        } else {
            self.end.column += 1;
        }
        self.after_cr = ch == '\r';
        Ok(())
    }
}

/// The character source of a [`Scanner`](crate::Scanner).
///
/// The reader decodes the input lazily: [`Reader::cache`] makes sure a given
/// number of characters is available for lookahead, and the remaining
/// methods inspect or consume the buffered characters while keeping the
/// current [`Mark`] up to date.
pub(crate) struct Reader<'r> {
    input: Option<Box<dyn BufRead + 'r>>,
    encoding: Encoding,
    lookahead: Lookahead,
    mark: Mark,
    eof: bool,
}

impl<'r> Default for Reader<'r> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> Reader<'r> {
    pub fn new() -> Self {
        Reader {
            input: None,
            encoding: Encoding::Any,
            lookahead: Lookahead::default(),
            mark: Mark::default(),
            eof: false,
        }
    }

    pub fn set_input(&mut self, input: impl BufRead + 'r) {
        self.input = Some(Box::new(input));
    }

    pub fn set_encoding(&mut self, encoding: Encoding) {
        self.encoding = encoding;
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// The position of the next unconsumed character.
    pub fn mark(&self) -> Mark {
        self.mark
    }

    /// Move the mark to the start of the next line, unless it already is at
    /// the start of a line. Used when the stream ends without a final line
    /// break.
    pub fn finish_line(&mut self) {
        if self.mark.column != 0 {
            self.mark.column = 0;
            self.mark.line += 1;
        }
    }

    /// Look at the character `offset` positions ahead. Returns `None` at the
    /// end of input, or when fewer than `offset + 1` characters were cached.
    pub fn peek(&self, offset: usize) -> Option<char> {
        self.lookahead.chars.get(offset).copied()
    }

    pub fn check(&self, ch: char) -> bool {
        self.peek(0) == Some(ch)
    }

    pub fn check_at(&self, ch: char, offset: usize) -> bool {
        self.peek(offset) == Some(ch)
    }

    pub fn is_eof(&self) -> bool {
        self.lookahead.chars.is_empty()
    }

    /// Consume one character that is not a line break.
    pub fn skip(&mut self) {
        if self.lookahead.chars.pop_front().is_some() {
            self.mark.index += 1;
            self.mark.column += 1;
        }
    }

    /// Consume one line break, treating CRLF as a single break.
    pub fn skip_line(&mut self) {
        if self.check('\r') && self.check_at('\n', 1) {
            self.lookahead.chars.drain(0..2);
            self.mark.index += 2;
            self.mark.column = 0;
            self.mark.line += 1;
        } else if is_break(self.peek(0)) {
            self.lookahead.chars.pop_front();
            self.mark.index += 1;
            self.mark.column = 0;
            self.mark.line += 1;
        }
    }

    /// Consume one character and append it to `string`.
    pub fn read_into(&mut self, string: &mut String) {
        if let Some(ch) = self.lookahead.chars.pop_front() {
            string.push(ch);
            self.mark.index += 1;
            self.mark.column += 1;
        }
    }

    /// Consume one line break and append its normalized form to `string`.
    ///
    /// CR, LF, CRLF and NEL become `\n`. The line and paragraph separators
    /// are kept as they are.
    pub fn read_line_into(&mut self, string: &mut String) {
        if self.check('\r') && self.check_at('\n', 1) {
            string.push('\n');
            self.lookahead.chars.drain(0..2);
            self.mark.index += 2;
        } else {
            match self.peek(0) {
                Some(ch @ ('\u{2028}' | '\u{2029}')) => string.push(ch),
                Some('\r' | '\n' | '\u{0085}') => string.push('\n'),
                _ => return,
            }
            self.lookahead.chars.pop_front();
            self.mark.index += 1;
        }
        self.mark.column = 0;
        self.mark.line += 1;
    }

    /// Make sure at least `length` characters are buffered, unless the input
    /// ends first.
    pub fn cache(&mut self, length: usize) -> Result<(), EncodingError> {
        if self.lookahead.chars.len() >= length || self.eof {
            return Ok(());
        }
        let Some(input) = self.input.as_deref_mut() else {
            self.eof = true;
            return Ok(());
        };

        if self.encoding == Encoding::Any {
            self.encoding = determine_encoding(input)?;
        }

        while self.lookahead.chars.len() < length {
            let more = match self.encoding {
                Encoding::Any | Encoding::Utf8 => read_utf8_buffered(input, &mut self.lookahead)?,
                Encoding::Utf16Le => read_utf16_buffered::<false>(input, &mut self.lookahead)?,
                Encoding::Utf16Be => read_utf16_buffered::<true>(input, &mut self.lookahead)?,
            };
            if !more {
                self.eof = true;
                break;
            }
        }

        if self.lookahead.offset >= usize::MAX / 2 {
            return Err(EncodingError::TooLong {
                offset: self.lookahead.offset,
            });
        }
        Ok(())
    }
}

fn determine_encoding(input: &mut dyn BufRead) -> Result<Encoding, EncodingError> {
    let initial_bytes = fill_buf(input)?;
    if initial_bytes.starts_with(&BOM_UTF8) {
        input.consume(BOM_UTF8.len());
        Ok(Encoding::Utf8)
    } else if initial_bytes.starts_with(&BOM_UTF16LE) {
        input.consume(BOM_UTF16LE.len());
        Ok(Encoding::Utf16Le)
    } else if initial_bytes.starts_with(&BOM_UTF16BE) {
        input.consume(BOM_UTF16BE.len());
        Ok(Encoding::Utf16Be)
    } else {
        Ok(Encoding::Utf8)
    }
}

fn fill_buf(input: &mut dyn BufRead) -> Result<&[u8], EncodingError> {
    loop {
        match input.fill_buf() {
            Ok(_) => break,
            Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        }
    }
    Ok(input.fill_buf()?)
}

fn read_utf8_buffered(
    input: &mut dyn BufRead,
    out: &mut Lookahead,
) -> Result<bool, EncodingError> {
    let available = fill_buf(input)?;
    if available.is_empty() {
        return Ok(false);
    }

    match core::str::from_utf8(available) {
        Ok(valid) => {
            let used = valid.len();
            for ch in valid.chars() {
                out.push(ch, ch.len_utf8())?;
            }
            input.consume(used);
            Ok(true)
        }
        Err(err) => {
            let valid_bytes = err.valid_up_to();
            if let Ok(valid) = core::str::from_utf8(&available[..valid_bytes]) {
                for ch in valid.chars() {
                    out.push(ch, ch.len_utf8())?;
                }
            }

            if err.error_len().is_some() {
                return Err(EncodingError::InvalidUtf8 {
                    value: available[valid_bytes],
                    mark: out.end,
                });
            }

            if valid_bytes != 0 {
                // The tail of the buffer is an incomplete sequence; leave it
                // for the next call.
                input.consume(valid_bytes);
            } else {
                // The buffer starts with an incomplete sequence, so read the
                // whole character unbuffered.
                let initial = available[0];
                read_utf8_char_unbuffered(input, out, initial)?;
            }
            Ok(true)
        }
    }
}

fn read_utf8_char_unbuffered(
    input: &mut dyn BufRead,
    out: &mut Lookahead,
    initial: u8,
) -> Result<(), EncodingError> {
    let width = utf8_char_width(initial);
    let invalid = EncodingError::InvalidUtf8 {
        value: initial,
        mark: out.end,
    };
    if width == 0 {
        return Err(invalid);
    }
    let mut buffer = [0; 4];
    input.read_exact(&mut buffer[..width])?;
    match core::str::from_utf8(&buffer[..width])
        .ok()
        .and_then(|valid| valid.chars().next())
    {
        Some(ch) => out.push(ch, width),
        None => Err(invalid),
    }
}

fn read_utf16_buffered<const BIG_ENDIAN: bool>(
    input: &mut dyn BufRead,
    out: &mut Lookahead,
) -> Result<bool, EncodingError> {
    let available = fill_buf(input)?;
    if available.is_empty() {
        return Ok(false);
    }

    let units = available
        .chunks_exact(2)
        .map(|chunk| decode_unit::<BIG_ENDIAN>([chunk[0], chunk[1]]));

    let mut used = 0;
    for ch in core::char::decode_utf16(units) {
        let Ok(ch) = ch else {
            // Either a corrupt stream or a surrogate pair split across the
            // buffer boundary. The unbuffered path tells them apart.
            break;
        };
        let width = ch.len_utf16() * 2;
        out.push(ch, width)?;
        used += width;
    }

    if used != 0 {
        input.consume(used);
    } else {
        read_utf16_char_unbuffered::<BIG_ENDIAN>(input, out)?;
    }
    Ok(true)
}

fn read_utf16_char_unbuffered<const BIG_ENDIAN: bool>(
    input: &mut dyn BufRead,
    out: &mut Lookahead,
) -> Result<(), EncodingError> {
    let mut buffer = [0; 2];
    input.read_exact(&mut buffer)?;
    let first = decode_unit::<BIG_ENDIAN>(buffer);

    let (decoded, width) = if is_utf16_surrogate(first) {
        input.read_exact(&mut buffer)?;
        let second = decode_unit::<BIG_ENDIAN>(buffer);
        (core::char::decode_utf16([first, second]).next(), 4)
    } else {
        (core::char::decode_utf16([first]).next(), 2)
    };

    match decoded {
        Some(Ok(ch)) => out.push(ch, width),
        Some(Err(err)) => Err(EncodingError::InvalidUtf16 {
            value: err.unpaired_surrogate(),
            mark: out.end,
        }),
        None => Err(EncodingError::InvalidUtf16 {
            value: first,
            mark: out.end,
        }),
    }
}

fn decode_unit<const BIG_ENDIAN: bool>(bytes: [u8; 2]) -> u16 {
    if BIG_ENDIAN {
        u16::from_be_bytes(bytes)
    } else {
        u16::from_le_bytes(bytes)
    }
}

fn utf8_char_width(initial: u8) -> usize {
    if initial & 0x80 == 0 {
        1
    } else if initial & 0xE0 == 0xC0 {
        2
    } else if initial & 0xF0 == 0xE0 {
        3
    } else if initial & 0xF8 == 0xF0 {
        4
    } else {
        0
    }
}

fn is_utf16_surrogate(value: u16) -> bool {
    matches!(value, 0xD800..=0xDFFF)
}
