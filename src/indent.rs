/// Indentation levels of the open block collections, and the flow nesting
/// depth.
///
/// Block collections have no closing indicator, so the scanner opens one
/// when content appears at a deeper column than the current level, and
/// closes levels lazily when content appears at a shallower column. Inside
/// flow collections indentation carries no structure and both operations
/// are no-ops.
#[derive(Debug)]
pub(crate) struct Indentation {
    /// The current indentation level, `-1` at the stream level.
    indent: i64,
    /// The enclosing indentation levels.
    indents: Vec<i64>,
    flow_level: usize,
}

impl Default for Indentation {
    fn default() -> Self {
        Self::new()
    }
}

impl Indentation {
    pub fn new() -> Self {
        Indentation {
            indent: -1,
            indents: Vec::new(),
            flow_level: 0,
        }
    }

    pub fn current(&self) -> i64 {
        self.indent
    }

    pub fn in_flow(&self) -> bool {
        self.flow_level != 0
    }

    /// Push `column` as the new level if it is deeper than the current one.
    /// Returns true if a level was pushed, in which case the caller opens a
    /// block collection.
    pub fn increase_indent(&mut self, column: i64) -> bool {
        if self.in_flow() || self.indent >= column {
            return false;
        }
        self.indents.push(self.indent);
        self.indent = column;
        true
    }

    /// Pop every level deeper than `column`, returning how many were popped.
    /// Each popped level closes one block collection.
    pub fn unwind_to(&mut self, column: i64) -> usize {
        if self.in_flow() {
            return 0;
        }
        let mut closed = 0;
        while self.indent > column {
            self.indent = self.indents.pop().unwrap_or(-1);
            closed += 1;
        }
        closed
    }

    pub fn enter_flow(&mut self) {
        self.flow_level += 1;
    }

    pub fn leave_flow(&mut self) {
        self.flow_level = self.flow_level.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increase_requires_a_deeper_column() {
        let mut indentation = Indentation::new();
        assert!(indentation.increase_indent(0));
        assert!(!indentation.increase_indent(0));
        assert!(indentation.increase_indent(2));
        assert!(indentation.increase_indent(4));
        assert_eq!(indentation.current(), 4);
    }

    #[test]
    fn unwind_pops_every_deeper_level() {
        let mut indentation = Indentation::new();
        indentation.increase_indent(0);
        indentation.increase_indent(2);
        indentation.increase_indent(4);
        assert_eq!(indentation.unwind_to(4), 0);
        assert_eq!(indentation.unwind_to(1), 2);
        assert_eq!(indentation.current(), 0);
        assert_eq!(indentation.unwind_to(-1), 1);
        assert_eq!(indentation.current(), -1);
        assert_eq!(indentation.unwind_to(-1), 0);
    }

    #[test]
    fn flow_context_ignores_indentation() {
        let mut indentation = Indentation::new();
        indentation.increase_indent(2);
        indentation.enter_flow();
        assert!(!indentation.increase_indent(6));
        assert_eq!(indentation.unwind_to(0), 0);
        indentation.leave_flow();
        assert!(!indentation.in_flow());
        assert_eq!(indentation.unwind_to(0), 1);
    }
}
