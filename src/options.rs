/// Bracket segments allowed per key unless configured otherwise.
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// What to do with a bracketed key that reaches `&` or the end of input
/// without an `=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValuelessBrackets {
    /// Fail with `Error::UnterminatedBracket`.
    #[default]
    Reject,
    /// Commit an empty string, so `users[]` becomes `{users: [""]}`.
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    pub max_depth: usize,
    pub valueless_brackets: ValuelessBrackets,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_valueless_brackets(mut self, valueless_brackets: ValuelessBrackets) -> Self {
        self.valueless_brackets = valueless_brackets;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            valueless_brackets: ValuelessBrackets::default(),
        }
    }
}
