//! Character classes used by the reader and the scanner.
//!
//! Most predicates take `impl Into<Option<char>>` so they can be applied
//! directly to the result of a lookahead, where `None` means end of input.

pub(crate) fn is_alpha(ch: impl Into<Option<char>>) -> bool {
    let Some(ch) = ch.into() else {
        return false;
    };
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'
}

pub(crate) fn is_digit(ch: impl Into<Option<char>>) -> bool {
    ch.into().map_or(false, |ch| ch.is_ascii_digit())
}

pub(crate) fn as_digit(ch: char) -> u32 {
    ch.to_digit(10).unwrap_or(0)
}

pub(crate) fn is_hex(ch: impl Into<Option<char>>) -> bool {
    ch.into().map_or(false, |ch| ch.is_ascii_hexdigit())
}

pub(crate) fn as_hex(ch: char) -> u32 {
    ch.to_digit(16).unwrap_or(0)
}

pub(crate) fn is_bom(ch: impl Into<Option<char>>) -> bool {
    ch.into() == Some('\u{feff}')
}

pub(crate) fn is_space(ch: impl Into<Option<char>>) -> bool {
    ch.into() == Some(' ')
}

pub(crate) fn is_tab(ch: impl Into<Option<char>>) -> bool {
    ch.into() == Some('\t')
}

pub(crate) fn is_blank(ch: impl Into<Option<char>>) -> bool {
    let ch = ch.into();
    is_space(ch) || is_tab(ch)
}

pub(crate) fn is_break(ch: impl Into<Option<char>>) -> bool {
    matches!(
        ch.into(),
        Some('\r' | '\n' | '\u{0085}' | '\u{2028}' | '\u{2029}')
    )
}

pub(crate) fn is_breakz(ch: impl Into<Option<char>>) -> bool {
    let ch = ch.into();
    is_break(ch) || ch.is_none()
}

pub(crate) fn is_blankz(ch: impl Into<Option<char>>) -> bool {
    let ch = ch.into();
    is_blank(ch) || is_breakz(ch)
}

/// Characters allowed in a YAML stream (the `c-printable` production).
pub(crate) fn is_allowed(ch: char) -> bool {
    matches!(ch,
        '\x09' | '\x0A' | '\x0D'
        | '\x20'..='\x7E'
        | '\u{0085}'
        | '\u{00A0}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

/// Characters that may appear in a tag or `%TAG` prefix URI, besides
/// alphanumerics.
pub(crate) fn is_uri_char(ch: impl Into<Option<char>>, flow_indicators: bool) -> bool {
    let Some(ch) = ch.into() else {
        return false;
    };
    is_alpha(ch)
        || matches!(
            ch,
            ';' | '/' | '?' | ':' | '@' | '&' | '=' | '+' | '$' | '.' | '%' | '!' | '~' | '*'
                | '\'' | '(' | ')'
        )
        || flow_indicators && matches!(ch, ',' | '[' | ']')
}

pub(crate) fn is_flow_indicator(ch: impl Into<Option<char>>) -> bool {
    matches!(ch.into(), Some(',' | '[' | ']' | '{' | '}'))
}
