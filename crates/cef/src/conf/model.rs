//! Model: ParserConfig.

use serde::{Deserialize, Serialize};

use crate::parser::{Locale, ParseOptions, MAX_LINE_SIZE};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Reject events that break a schema constraint
    pub validate: bool,
    /// Store empty values of known keys as null
    pub allow_nulls: bool,
    /// Month names for textual timestamps (`en`, `fr`, `de_DE`, ...)
    pub locale: Locale,
    /// Lines longer than this many bytes are rejected
    pub max_line_size: usize,
    /// Only emit extensions that appeared in the input
    pub populated_only: bool,
    /// Merge custom (non-schema) extensions into the emitted map
    pub include_custom: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            validate: false,
            allow_nulls: false,
            locale: Locale::English,
            max_line_size: MAX_LINE_SIZE,
            populated_only: true,
            include_custom: true,
        }
    }
}

impl ParserConfig {
    /// Check configuration values are sane
    pub fn validate(&self) -> Result<(), String> {
        if self.max_line_size == 0 {
            return Err("max_line_size must be > 0".to_string());
        }
        Ok(())
    }

    /// Per-call options derived from this configuration
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            validate: self.validate,
            allow_nulls: self.allow_nulls,
            locale: self.locale,
        }
    }
}
