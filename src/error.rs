use crate::Mark;

/// Errors raised while decoding the input into characters.
#[derive(Debug, thiserror::Error)]
pub enum EncodingError {
    #[error("{}:{}: invalid UTF-8 octet {value:#04x}", mark.line, mark.column)]
    InvalidUtf8 { value: u8, mark: Mark },
    #[error("{}:{}: invalid UTF-16 unpaired surrogate {value:#06x}", mark.line, mark.column)]
    InvalidUtf16 { value: u16, mark: Mark },
    #[error("{}:{}: control characters are not allowed (found {value:?})", mark.line, mark.column)]
    InvalidCharacter { value: char, mark: Mark },
    #[error("input is too long")]
    TooLong { offset: usize },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors raised while scanning tokens.
///
/// A `Problem` carries two marks: `context_mark` points at the construct
/// being scanned (a quoted scalar, a directive, a simple key) and
/// `problem_mark` at the position where scanning failed.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("{}:{}: {} {} ({}:{})", problem_mark.line, problem_mark.column, problem, context, context_mark.line, context_mark.column)]
    Problem {
        context: &'static str,
        context_mark: Mark,
        problem: &'static str,
        problem_mark: Mark,
    },
    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

impl ScanError {
    /// The position where scanning failed.
    pub fn mark(&self) -> Option<Mark> {
        match self {
            ScanError::Problem { problem_mark, .. } => Some(*problem_mark),
            ScanError::Encoding(
                EncodingError::InvalidUtf8 { mark, .. }
                | EncodingError::InvalidUtf16 { mark, .. }
                | EncodingError::InvalidCharacter { mark, .. },
            ) => Some(*mark),
            ScanError::Encoding(EncodingError::TooLong { .. } | EncodingError::Io(_)) => None,
        }
    }
}
