#![doc = include_str!("../README.md")]
#![doc(html_root_url = "https://docs.rs/yaml-scanner/0.1.0")]
#![warn(clippy::pedantic)]
#![allow(
    clippy::cast_lossless,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::struct_excessive_bools,
    clippy::too_many_lines,
    clippy::match_wildcard_for_single_variants
)]
#![deny(unsafe_code)]

mod chars;
mod error;
mod indent;
mod queue;
mod reader;
mod scanner;
mod simple_key;
mod token;

pub use crate::error::*;
pub use crate::scanner::{Scanner, MAX_NUMBER_LENGTH};
pub use crate::simple_key::MAX_SIMPLE_KEY_LENGTH;
pub use crate::token::*;

/// A position in the input stream.
///
/// All fields are zero-based. `index` counts characters, with a CRLF line
/// break counting as two.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub struct Mark {
    /// The position index.
    pub index: u64,
    /// The position line.
    pub line: u64,
    /// The position column.
    pub column: u64,
}

/// The stream encoding.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[non_exhaustive]
pub enum Encoding {
    /// Let the scanner detect the encoding.
    #[default]
    Any = 0,
    /// The default UTF-8 encoding.
    Utf8 = 1,
    /// The UTF-16-LE encoding with BOM.
    Utf16Le = 2,
    /// The UTF-16-BE encoding with BOM.
    Utf16Be = 3,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mark(index: u64, line: u64, column: u64) -> Mark {
        Mark {
            index,
            line,
            column,
        }
    }

    fn token(data: TokenData, start_mark: Mark, end_mark: Mark) -> Token {
        Token {
            data,
            start_mark,
            end_mark,
        }
    }

    fn plain(text: &str) -> TokenData {
        TokenData::PlainScalar {
            text: String::from(text),
        }
    }

    #[test]
    fn scanner_marks() {
        const INPUT: &str = "b:
c: true";
        let mut scanner = Scanner::new();
        let mut read_in = INPUT.as_bytes();
        scanner.set_input(&mut read_in);
        let events = scanner.collect::<Result<Vec<_>, _>>().unwrap();
        let expected = &[
            token(TokenData::StreamStart, mark(0, 0, 0), mark(0, 0, 0)),
            token(TokenData::BlockMappingStart, mark(0, 0, 0), mark(0, 0, 0)),
            token(TokenData::Key, mark(0, 0, 0), mark(0, 0, 0)),
            token(plain("b"), mark(0, 0, 0), mark(1, 0, 1)),
            token(TokenData::Value, mark(1, 0, 1), mark(2, 0, 2)),
            token(TokenData::Key, mark(3, 1, 0), mark(3, 1, 0)),
            token(plain("c"), mark(3, 1, 0), mark(4, 1, 1)),
            token(TokenData::Value, mark(4, 1, 1), mark(5, 1, 2)),
            token(plain("true"), mark(6, 1, 3), mark(10, 1, 7)),
            token(TokenData::BlockEnd, mark(10, 2, 0), mark(10, 2, 0)),
            token(TokenData::StreamEnd, mark(10, 2, 0), mark(10, 2, 0)),
        ];
        assert_eq!(
            events,
            expected,
            "diff:\n{}",
            zip_longest(
                format!("{events:#?}").lines(),
                format!("{expected:#?}").lines()
            )
            .map(|(a, b)| {
                let a = a.unwrap_or_default();
                let b = b.unwrap_or_default();
                format!("{a:<40} {b}")
            })
            .collect::<Vec<_>>()
            .join("\n")
        );
    }

    #[test]
    fn scalar_marks_span_the_quotes() {
        let mut scanner = Scanner::new();
        scanner.set_input_string("- 'a'\n- \"bc\"\n");
        let tokens = scanner.collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(tokens[3].start_mark, mark(2, 0, 2));
        assert_eq!(tokens[3].end_mark, mark(5, 0, 5));
        assert_eq!(tokens[5].start_mark, mark(8, 1, 2));
        assert_eq!(tokens[5].end_mark, mark(12, 1, 6));
    }

    #[test]
    fn encoding_is_known_after_the_first_token() {
        let mut scanner = Scanner::new();
        scanner.set_input(&[0xfe, 0xff, 0, b'a'][..]);
        assert_eq!(scanner.encoding(), Encoding::Any);
        assert_eq!(Scanner::scan(&mut scanner).unwrap().data, TokenData::StreamStart);
        assert_eq!(scanner.encoding(), Encoding::Utf16Be);
        assert_eq!(Scanner::scan(&mut scanner).unwrap().data, plain("a"));
    }

    fn zip_longest<A: Iterator, B: Iterator>(
        a: A,
        b: B,
    ) -> impl Iterator<Item = (Option<A::Item>, Option<B::Item>)> {
        let mut a = a.map(Some).collect::<Vec<_>>();
        let mut b = b.map(Some).collect::<Vec<_>>();
        let len = a.len().max(b.len());
        a.resize_with(len, || None);
        b.resize_with(len, || None);
        a.into_iter()
            .zip(b)
            .take_while(|(a, b)| a.is_some() || b.is_some())
    }
}
