use std::collections::VecDeque;

use crate::Token;

/// Tokens that were scanned but not handed out yet.
///
/// Tokens are addressed by their absolute number in the stream, which stays
/// valid while earlier tokens are dequeued. This is what lets a simple key
/// remember where a KEY token has to be inserted once its `:` shows up.
#[derive(Debug, Default)]
pub(crate) struct TokenQueue {
    tokens: VecDeque<Token>,
    /// The number of tokens dequeued so far.
    tokens_parsed: usize,
}

impl TokenQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The number of the token at the head of the queue.
    pub fn head_number(&self) -> usize {
        self.tokens_parsed
    }

    /// The number the next pushed token will get.
    pub fn next_number(&self) -> usize {
        self.tokens_parsed + self.tokens.len()
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push_back(token);
    }

    /// Insert `token` so that it gets number `number`, shifting the tokens
    /// queued after it.
    pub fn insert(&mut self, number: usize, token: Token) {
        debug_assert!(number >= self.tokens_parsed, "token was already dequeued");
        let index = number.saturating_sub(self.tokens_parsed);
        self.tokens.insert(index.min(self.tokens.len()), token);
    }

    pub fn pop(&mut self) -> Option<Token> {
        let token = self.tokens.pop_front()?;
        self.tokens_parsed += 1;
        Some(token)
    }
}
