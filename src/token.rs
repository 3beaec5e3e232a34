use crate::Mark;

/// The token structure.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct Token {
    /// The token type.
    pub data: TokenData,
    /// The beginning of the token.
    pub start_mark: Mark,
    /// The end of the token.
    pub end_mark: Mark,
}

/// The token type and its payload.
///
/// Comparing `TokenData` values compares the token kinds and their payloads
/// only, independent of where the tokens were found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenData {
    /// A STREAM-START token.
    StreamStart,
    /// A STREAM-END token.
    StreamEnd,
    /// A VERSION-DIRECTIVE token.
    VersionDirective {
        /// The major version number.
        major: i32,
        /// The minor version number.
        minor: i32,
    },
    /// A TAG-DIRECTIVE token.
    TagDirective {
        /// The tag handle.
        handle: String,
        /// The tag prefix.
        prefix: String,
    },
    /// A DOCUMENT-START token.
    DocumentStart,
    /// A DOCUMENT-END token.
    DocumentEnd,
    /// A BLOCK-SEQUENCE-START token.
    BlockSequenceStart,
    /// A BLOCK-MAPPING-START token.
    BlockMappingStart,
    /// A BLOCK-END token.
    BlockEnd,
    /// A FLOW-SEQUENCE-START token.
    FlowSequenceStart,
    /// A FLOW-SEQUENCE-END token.
    FlowSequenceEnd,
    /// A FLOW-MAPPING-START token.
    FlowMappingStart,
    /// A FLOW-MAPPING-END token.
    FlowMappingEnd,
    /// A BLOCK-ENTRY token.
    BlockEntry,
    /// A FLOW-ENTRY token.
    FlowEntry,
    /// A KEY token.
    Key,
    /// A VALUE token.
    Value,
    /// An ALIAS token.
    AnchorAlias {
        /// The name of the referenced anchor.
        name: String,
    },
    /// An ANCHOR token.
    Anchor {
        /// The anchor name.
        name: String,
    },
    /// A TAG token.
    Tag {
        /// The tag handle.
        handle: String,
        /// The tag suffix.
        suffix: String,
    },
    /// A plain SCALAR token.
    PlainScalar {
        /// The scalar value.
        text: String,
    },
    /// A single-quoted SCALAR token.
    SingleQuotedScalar {
        /// The scalar value.
        text: String,
    },
    /// A double-quoted SCALAR token.
    DoubleQuotedScalar {
        /// The scalar value.
        text: String,
    },
    /// A literal block SCALAR token.
    LiteralScalar {
        /// The scalar value.
        text: String,
    },
    /// A folded block SCALAR token.
    FoldedScalar {
        /// The scalar value.
        text: String,
    },
}

impl TokenData {
    pub fn is_stream_end(&self) -> bool {
        matches!(self, TokenData::StreamEnd)
    }

    /// Returns true for tokens that open a block collection and therefore
    /// require a matching [`TokenData::BlockEnd`].
    pub fn is_block_collection_start(&self) -> bool {
        matches!(
            self,
            TokenData::BlockSequenceStart | TokenData::BlockMappingStart
        )
    }

    /// The value of a scalar token of any style.
    pub fn scalar_text(&self) -> Option<&str> {
        match self {
            TokenData::PlainScalar { text }
            | TokenData::SingleQuotedScalar { text }
            | TokenData::DoubleQuotedScalar { text }
            | TokenData::LiteralScalar { text }
            | TokenData::FoldedScalar { text } => Some(text),
            _ => None,
        }
    }

    pub(crate) fn scalar(style: ScalarStyle, text: String) -> Self {
        match style {
            ScalarStyle::Plain => TokenData::PlainScalar { text },
            ScalarStyle::SingleQuoted => TokenData::SingleQuotedScalar { text },
            ScalarStyle::DoubleQuoted => TokenData::DoubleQuotedScalar { text },
            ScalarStyle::Literal => TokenData::LiteralScalar { text },
            ScalarStyle::Folded => TokenData::FoldedScalar { text },
        }
    }
}

/// Scalar styles.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[non_exhaustive]
pub enum ScalarStyle {
    /// The plain scalar style.
    Plain,
    /// The single-quoted scalar style.
    SingleQuoted,
    /// The double-quoted scalar style.
    DoubleQuoted,
    /// The literal scalar style.
    Literal,
    /// The folded scalar style.
    Folded,
}
