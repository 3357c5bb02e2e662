//! Parser configuration.

/// Default bound on grammar nesting (statements, assignment expressions, unary chains).
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Tunables for a single [`Parser`](crate::parser::Parser).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Maximum recursion depth before failing with
    /// [`ParseError::DepthLimitExceeded`](crate::error::ParseError::DepthLimitExceeded).
    pub max_depth: usize,
}

impl ParserConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
