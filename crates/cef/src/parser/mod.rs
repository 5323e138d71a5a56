/// CEF parsing module
///
/// Turns raw Common Event Format lines into typed, optionally validated
/// events.
///
/// # Architecture
///
/// - `traits.rs`: `LogParser` and `EventValidator` seams
/// - `cef.rs`: Line-level entry point and per-call options
/// - `tokenizer.rs`: Header and extension splitting
/// - `schema.rs`: Static extension field table
/// - `coerce.rs`: Raw string to typed value conversion
/// - `timestamp.rs`: Epoch and textual timestamp parsing
/// - `locale.rs`: Month names per locale
/// - `mac.rs`: MAC address value type
/// - `validate.rs`: Schema constraint checks
/// - `model.rs`: Event, header, value and error types
///
/// # Safety Guarantees
///
/// - Line size limits (prevent DoS)
/// - Binary safety (invalid UTF-8 is replaced, never rejected)
/// - No host name resolution for address fields

pub mod traits;
pub mod cef;
pub mod tokenizer;
pub mod schema;
pub mod coerce;
pub mod timestamp;
pub mod locale;
pub mod mac;
pub mod validate;
pub mod model;
mod serde_utils;

// Re-export commonly used types
pub use traits::{EventValidator, LogParser};
pub use cef::{CefParser, ParseOptions};
pub use locale::Locale;
pub use mac::MacAddress;
pub use model::{CefEvent, CefHeader, ConstraintViolation, ExtensionValue, ParseError};
pub use validate::SchemaValidator;

// Constants
pub const MAX_LINE_SIZE: usize = 1_048_576; // 1MB
