//! CEF: line-level entry point tying tokenizer, coercion and validation together.

use std::fmt;
use bytes::Bytes;
use tracing::debug;

use crate::conf::ParserConfig;
use super::coerce::apply_extensions;
use super::locale::Locale;
use super::model::{CefEvent, CefHeader, ParseError};
use super::tokenizer::{parse_version, split_extensions, split_header};
use super::traits::{EventValidator, LogParser};
use super::validate::SchemaValidator;
use super::MAX_LINE_SIZE;

/// Per-call switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseOptions {
    /// Run the validator after coercion and reject on any violation
    pub validate: bool,
    /// Store empty values of known keys as null instead of coercing them
    pub allow_nulls: bool,
    /// Month names used by textual timestamps
    pub locale: Locale,
}

impl ParseOptions {
    pub fn validated() -> Self {
        Self {
            validate: true,
            ..Self::default()
        }
    }

    pub fn with_allow_nulls(mut self, allow_nulls: bool) -> Self {
        self.allow_nulls = allow_nulls;
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }
}

/// Parses single CEF lines into [`CefEvent`]s.
///
/// Stateless apart from its validator and defaults; one instance can be
/// shared across threads.
pub struct CefParser {
    validator: Box<dyn EventValidator>,
    defaults: ParseOptions,
    max_line_size: usize,
}

impl CefParser {
    /// Parser backed by the schema validator.
    pub fn new() -> Self {
        Self::with_validator(SchemaValidator)
    }

    /// Parser using a caller-provided validator in place of the schema one.
    pub fn with_validator(validator: impl EventValidator + 'static) -> Self {
        Self {
            validator: Box::new(validator),
            defaults: ParseOptions::default(),
            max_line_size: MAX_LINE_SIZE,
        }
    }

    pub fn from_config(config: &ParserConfig) -> Self {
        Self {
            defaults: config.parse_options(),
            max_line_size: config.max_line_size,
            ..Self::new()
        }
    }

    /// Options applied by [`LogParser::parse`].
    pub fn defaults(&self) -> &ParseOptions {
        &self.defaults
    }

    pub fn parse_str(&self, line: &str, options: &ParseOptions) -> Result<CefEvent, ParseError> {
        self.check_size(line.len())?;
        self.parse_line(line, Bytes::copy_from_slice(line.as_bytes()), options)
    }

    /// Byte input is decoded as UTF-8, invalid sequences replaced.
    pub fn parse_bytes(&self, raw: &[u8], options: &ParseOptions) -> Result<CefEvent, ParseError> {
        self.check_size(raw.len())?;
        let text = String::from_utf8_lossy(raw);
        self.parse_line(&text, Bytes::copy_from_slice(raw), options)
    }

    fn check_size(&self, len: usize) -> Result<(), ParseError> {
        if len > self.max_line_size {
            debug!(len, max = self.max_line_size, "CEF message rejected: line too large");
            return Err(ParseError::LineTooLarge(len, self.max_line_size));
        }
        Ok(())
    }

    fn parse_line(&self, line: &str, raw: Bytes, options: &ParseOptions) -> Result<CefEvent, ParseError> {
        let tokens = split_header(line).inspect_err(|e| debug!("CEF message rejected: {}", e))?;
        let [version, vendor, product, device_version, class_id, name, severity] = tokens.header;

        let header = CefHeader {
            version: parse_version(version).inspect_err(|e| debug!("CEF message rejected: {}", e))?,
            device_vendor: vendor.to_string(),
            device_product: product.to_string(),
            device_version: device_version.to_string(),
            device_event_class_id: class_id.to_string(),
            name: name.to_string(),
            severity: severity.to_string(),
        };

        let mut event = CefEvent::new(header, raw);
        apply_extensions(
            &mut event,
            split_extensions(tokens.extension),
            options.allow_nulls,
            options.locale,
        )?;

        if options.validate {
            let violations = self.validator.validate(&event);
            if !violations.is_empty() {
                for violation in &violations {
                    debug!(field = %violation.field, "CEF message failed validation: {}", violation.message);
                }
                return Err(ParseError::ValidationFailed(violations));
            }
        }

        Ok(event)
    }
}

impl Default for CefParser {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CefParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CefParser")
            .field("defaults", &self.defaults)
            .field("max_line_size", &self.max_line_size)
            .finish_non_exhaustive()
    }
}

impl LogParser for CefParser {
    fn parse(&self, raw: &[u8]) -> Result<CefEvent, ParseError> {
        self.parse_bytes(raw, &self.defaults)
    }
}
