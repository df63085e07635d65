//! Field-level validation support.
//!
//! Validation failures are reported per field so clients can highlight the
//! offending inputs, rather than as a single opaque message.

use serde::Serialize;

/// A single validation problem, tied to the input field that caused it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldIssue {
    /// JSON field name as the client sent it.
    pub field: &'static str,
    /// Human-readable description of the problem.
    pub message: String,
}

impl FieldIssue {
    pub(crate) fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Check an optional free-text field against a maximum length.
pub(crate) fn check_max_len(
    issues: &mut Vec<FieldIssue>,
    field: &'static str,
    value: Option<&str>,
    max: usize,
) {
    if let Some(v) = value
        && v.chars().count() > max
    {
        issues.push(FieldIssue::new(
            field,
            format!("must be at most {max} characters"),
        ));
    }
}

/// Check a required text field against an inclusive length range.
pub(crate) fn check_len_range(
    issues: &mut Vec<FieldIssue>,
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) {
    let len = value.chars().count();
    if len < min || len > max {
        issues.push(FieldIssue::new(
            field,
            format!("must be between {min} and {max} characters"),
        ));
    }
}

/// Check an integer field is not negative.
pub(crate) fn check_non_negative(issues: &mut Vec<FieldIssue>, field: &'static str, value: i64) {
    if value < 0 {
        issues.push(FieldIssue::new(field, "must be zero or greater"));
    }
}
