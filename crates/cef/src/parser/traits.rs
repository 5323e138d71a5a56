pub use super::model::{CefEvent, ConstraintViolation, ParseError};

pub trait LogParser: Send + Sync {
    /// parse a raw CEF line into a typed event
    fn parse(&self, raw: &[u8]) -> Result<CefEvent, ParseError>;
}

/// Constraint check run after coercion. An empty result accepts the event.
pub trait EventValidator: Send + Sync {
    fn validate(&self, event: &CefEvent) -> Vec<ConstraintViolation>;
}

impl<F> EventValidator for F
where
    F: Fn(&CefEvent) -> Vec<ConstraintViolation> + Send + Sync,
{
    fn validate(&self, event: &CefEvent) -> Vec<ConstraintViolation> {
        self(event)
    }
}
