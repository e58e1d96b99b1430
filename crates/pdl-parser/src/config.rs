//! Parser configuration: recursion limits, loaded from `[parser]` in `pdl.toml`.

use serde::{Deserialize, Serialize};

/// Default limit for templates nested inside interpolations.
pub const DEFAULT_MAX_TEMPLATE_DEPTH: usize = 8;

/// Default limit for nested parentheses, lambdas and lets.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 64;

/// Limits applied while parsing untrusted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserConfig {
    /// How many templates may be nested through `{{ ... }}` interpolations.
    pub max_template_depth: usize,
    /// How deeply grouped expressions, lambdas and lets may nest.
    pub max_nesting_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_template_depth: DEFAULT_MAX_TEMPLATE_DEPTH,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

impl ParserConfig {
    /// Create a config with the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the template nesting limit.
    pub fn with_max_template_depth(mut self, depth: usize) -> Self {
        self.max_template_depth = depth;
        self
    }

    /// Override the expression nesting limit.
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }
}
