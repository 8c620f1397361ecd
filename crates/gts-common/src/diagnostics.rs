//! Diagnostic types and message lookup.
//!
//! The inference engine itself only reports informational redundancy notices
//! (union/intersection simplification); user-facing errors belong to the
//! validator. Both go through the same `Diagnostic` value so a host can merge
//! them into one stream.

use serde::Serialize;

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
    Suggestion = 2,
    Message = 3,
}

/// A diagnostic attached to a syntax node (by arena index).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Index of the node the diagnostic is reported on, `u32::MAX` if detached.
    pub node: u32,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
}

impl Diagnostic {
    /// Node index used for diagnostics that are not anchored to a node.
    pub const DETACHED: u32 = u32::MAX;

    /// Create a diagnostic from a message definition and its arguments.
    #[must_use]
    pub fn from_message(node: u32, message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            node,
            message_text: format_message(message.message, args),
            category: message.category,
            code: message.code,
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

/// Format a diagnostic message by replacing {0}, {1}, etc. with arguments.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

/// A diagnostic message definition with code, category, and message template.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

pub mod diagnostic_codes {
    pub const UNI_REDUNDANT_SUBTYPE: u32 = 9001;
    pub const INTER_REDUNDANT_SUPERTYPE: u32 = 9002;
    pub const ENM_INVALID_USE_OF_NUM_OR_STR_BASED_ENUM: u32 = 9003;
}

pub mod diagnostic_messages {
    use super::{DiagnosticCategory, DiagnosticMessage, diagnostic_codes};

    pub const UNI_REDUNDANT_SUBTYPE: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::UNI_REDUNDANT_SUBTYPE,
        category: DiagnosticCategory::Warning,
        message: "Type {0} is redundant in the union since it is a subtype of {1}.",
    };

    pub const INTER_REDUNDANT_SUPERTYPE: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::INTER_REDUNDANT_SUPERTYPE,
        category: DiagnosticCategory::Warning,
        message: "Type {0} is redundant in the intersection since it is a supertype of {1}.",
    };

    pub const ENM_INVALID_USE_OF_NUM_OR_STR_BASED_ENUM: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::ENM_INVALID_USE_OF_NUM_OR_STR_BASED_ENUM,
        category: DiagnosticCategory::Error,
        message: "A number-based or string-based enum may only be used to access its literals or the static getter 'literals'.",
    };
}

/// All known diagnostic messages.
pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    diagnostic_messages::UNI_REDUNDANT_SUBTYPE,
    diagnostic_messages::INTER_REDUNDANT_SUPERTYPE,
    diagnostic_messages::ENM_INVALID_USE_OF_NUM_OR_STR_BASED_ENUM,
];

/// Look up a diagnostic message definition by code.
#[must_use]
pub fn get_diagnostic_message(code: u32) -> Option<&'static DiagnosticMessage> {
    DIAGNOSTIC_MESSAGES.iter().find(|m| m.code == code)
}

/// Get the category for a diagnostic code.
#[must_use]
pub fn get_diagnostic_category(code: u32) -> Option<DiagnosticCategory> {
    get_diagnostic_message(code).map(|m| m.category)
}

#[cfg(test)]
#[path = "../tests/diagnostics_tests.rs"]
mod tests;
