#![allow(dead_code)]

use yaml_scanner::{ScanError, Scanner, TokenData};

/// Scan `input` and return the token kinds, dropping the marks.
pub fn scan(input: &str) -> Result<Vec<TokenData>, ScanError> {
    let mut scanner = Scanner::new();
    scanner.set_input_string(input);
    scanner.map(|token| token.map(|token| token.data)).collect()
}

/// Scan `input` and return the first error.
pub fn scan_error(input: &str) -> ScanError {
    match scan(input) {
        Ok(tokens) => panic!("expected an error, got {tokens:#?}"),
        Err(err) => err,
    }
}

/// The text of every scalar token in `input`.
pub fn scalars(input: &str) -> Vec<String> {
    scan(input)
        .unwrap()
        .iter()
        .filter_map(TokenData::scalar_text)
        .map(String::from)
        .collect()
}

pub fn plain(text: &str) -> TokenData {
    TokenData::PlainScalar {
        text: String::from(text),
    }
}

pub fn single_quoted(text: &str) -> TokenData {
    TokenData::SingleQuotedScalar {
        text: String::from(text),
    }
}

pub fn double_quoted(text: &str) -> TokenData {
    TokenData::DoubleQuotedScalar {
        text: String::from(text),
    }
}

pub fn literal(text: &str) -> TokenData {
    TokenData::LiteralScalar {
        text: String::from(text),
    }
}

pub fn folded(text: &str) -> TokenData {
    TokenData::FoldedScalar {
        text: String::from(text),
    }
}

pub fn anchor(name: &str) -> TokenData {
    TokenData::Anchor {
        name: String::from(name),
    }
}

pub fn alias(name: &str) -> TokenData {
    TokenData::AnchorAlias {
        name: String::from(name),
    }
}

pub fn tag(handle: &str, suffix: &str) -> TokenData {
    TokenData::Tag {
        handle: String::from(handle),
        suffix: String::from(suffix),
    }
}

pub fn tag_directive(handle: &str, prefix: &str) -> TokenData {
    TokenData::TagDirective {
        handle: String::from(handle),
        prefix: String::from(prefix),
    }
}
