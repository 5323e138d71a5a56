//! Validate: schema constraint checks over a parsed event.
//!
//! Null extensions always pass. Only populated keys are inspected.

use tracing::trace;

use super::model::{CefEvent, ConstraintViolation, ExtensionValue};
use super::schema::{self, Constraint};
use super::traits::EventValidator;

/// Enforces the length, range and enumeration constraints declared in the
/// extension schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidator;

impl SchemaValidator {
    pub fn new() -> Self {
        Self
    }

    fn check(constraint: &Constraint, field: &str, value: &ExtensionValue, out: &mut Vec<ConstraintViolation>) {
        match *constraint {
            Constraint::None => {}
            Constraint::MaxLength(max) => {
                if let Some(s) = value.as_str() {
                    check_length(field, s, max, out);
                }
            }
            Constraint::Range { min, max } => {
                let Some(v) = value.as_i64() else { return };
                if let Some(min) = min.filter(|min| v < *min) {
                    out.push(ConstraintViolation::new(
                        field,
                        format!("must be greater than or equal to {}", min),
                    ));
                }
                if let Some(max) = max.filter(|max| v > *max) {
                    out.push(ConstraintViolation::new(
                        field,
                        format!("must be less than or equal to {}", max),
                    ));
                }
            }
            Constraint::OneOf { values, max_len } => {
                let Some(s) = value.as_str() else { return };
                check_length(field, s, max_len, out);
                if !values.iter().any(|allowed| allowed.eq_ignore_ascii_case(s)) {
                    out.push(ConstraintViolation::new(
                        field,
                        format!("must be one of {}", values.join(", ")),
                    ));
                }
            }
        }
    }
}

fn check_length(field: &str, s: &str, max: usize, out: &mut Vec<ConstraintViolation>) {
    if s.chars().count() > max {
        out.push(ConstraintViolation::new(
            field,
            format!("length must be at most {}", max),
        ));
    }
}

impl EventValidator for SchemaValidator {
    fn validate(&self, event: &CefEvent) -> Vec<ConstraintViolation> {
        let mut violations = Vec::new();

        for key in event.populated_keys() {
            let (Some(spec), Some(value)) = (schema::lookup(key), event.get(key)) else {
                continue;
            };
            Self::check(&spec.constraint, key, value, &mut violations);
        }

        trace!(violations = violations.len(), "Schema validation complete");
        violations
    }
}
