use tracing::debug;

use crate::{Mark, ScanError};

/// How far past its start, in characters, a simple key may extend before
/// the candidate expires.
pub const MAX_SIMPLE_KEY_LENGTH: u64 = 1024;

/// This structure holds information about a potential simple key.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct SimpleKey {
    /// Is a simple key possible?
    pub possible: bool,
    /// Is a simple key required?
    pub required: bool,
    /// The number of the token.
    pub token_number: usize,
    /// The position mark.
    pub mark: Mark,
}

impl SimpleKey {
    fn is_stale(&self, position: Mark) -> bool {
        self.possible
            && (self.mark.line < position.line
                || self.mark.index + MAX_SIMPLE_KEY_LENGTH < position.index)
    }
}

fn could_not_find_colon(key: &SimpleKey, position: Mark) -> ScanError {
    ScanError::Problem {
        context: "while scanning a simple key",
        context_mark: key.mark,
        problem: "could not find expected ':'",
        problem_mark: position,
    }
}

/// One simple key candidate per flow level; the last slot belongs to the
/// innermost level.
#[derive(Debug, Default)]
pub(crate) struct SimpleKeys {
    slots: Vec<SimpleKey>,
}

impl SimpleKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an empty slot for a newly entered flow level (or for the stream
    /// itself).
    pub fn push_level(&mut self) {
        self.slots.push(SimpleKey::default());
    }

    pub fn pop_level(&mut self) {
        let _ = self.slots.pop();
    }

    /// Replace the candidate of the current level.
    pub fn save(&mut self, key: SimpleKey, position: Mark) -> Result<(), ScanError> {
        self.remove(position)?;
        if let Some(slot) = self.slots.last_mut() {
            *slot = key;
        }
        Ok(())
    }

    /// Drop the candidate of the current level. Dropping a required
    /// candidate is an error.
    pub fn remove(&mut self, position: Mark) -> Result<(), ScanError> {
        let Some(slot) = self.slots.last_mut() else {
            return Ok(());
        };
        if slot.possible && slot.required {
            return Err(could_not_find_colon(slot, position));
        }
        slot.possible = false;
        Ok(())
    }

    /// Take the candidate of the current level if it is still possible; the
    /// `:` at `position` resolves it.
    pub fn take_possible(&mut self) -> Option<SimpleKey> {
        let slot = self.slots.last_mut()?;
        if !slot.possible {
            return None;
        }
        slot.possible = false;
        Some(*slot)
    }

    /// Expire candidates that can no longer be followed by their `:`: the
    /// scanner moved to a later line, or too far past the candidate's start.
    pub fn expire_stale(&mut self, position: Mark) -> Result<(), ScanError> {
        for slot in &mut self.slots {
            if slot.is_stale(position) {
                if slot.required {
                    return Err(could_not_find_colon(slot, position));
                }
                debug!(
                    line = slot.mark.line,
                    column = slot.mark.column,
                    "simple key candidate expired"
                );
                slot.possible = false;
            }
        }
        Ok(())
    }

    /// Whether a live candidate points at token `token_number`. Such a token
    /// cannot be handed out yet, since a KEY token may still be inserted
    /// before it.
    pub fn is_pending(&self, token_number: usize) -> bool {
        self.slots
            .iter()
            .any(|slot| slot.possible && slot.token_number == token_number)
    }
}
