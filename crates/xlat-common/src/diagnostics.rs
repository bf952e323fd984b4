//! Diagnostic types and message lookup for the translator.
//!
//! Diagnostics produced by bridge synthesis name the class they belong to
//! (`subject`) instead of a source span: the hierarchy model handed to this
//! subsystem is already resolved and carries no positions.

use serde::Serialize;

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
    Suggestion = 2,
    Message = 3,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

pub mod diagnostic_codes {
    pub const INVALID_HIERARCHY: u32 = 9000;
    pub const AMBIGUOUS_DEFAULT_METHODS: u32 = 9001;
    pub const MISSING_IMPLEMENTATION: u32 = 9002;
    pub const NATIVE_CONTRACT_VIOLATION: u32 = 9003;
    pub const CONFLICTING_METHOD_CANDIDATE: u32 = 9004;
}

pub mod diagnostic_messages {
    pub const INVALID_HIERARCHY: &str = "Invalid class hierarchy: {0}";
    pub const AMBIGUOUS_DEFAULT_METHODS: &str =
        "Class '{0}' inherits unrelated default implementations of '{1}' from {2}; it must override the method.";
    pub const MISSING_IMPLEMENTATION: &str =
        "Class '{0}' is concrete but has no implementation of '{1}' declared in '{2}'.";
    pub const NATIVE_CONTRACT_VIOLATION: &str =
        "Native-backed type '{0}' cannot implement '{1}' required by '{2}': the native representation does not expose it.";
    pub const CONFLICTING_METHOD_CANDIDATE: &str = "'{0}' provides a default for '{1}'.";
}

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    DiagnosticMessage {
        code: diagnostic_codes::INVALID_HIERARCHY,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::INVALID_HIERARCHY,
    },
    DiagnosticMessage {
        code: diagnostic_codes::AMBIGUOUS_DEFAULT_METHODS,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::AMBIGUOUS_DEFAULT_METHODS,
    },
    DiagnosticMessage {
        code: diagnostic_codes::MISSING_IMPLEMENTATION,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::MISSING_IMPLEMENTATION,
    },
    DiagnosticMessage {
        code: diagnostic_codes::NATIVE_CONTRACT_VIOLATION,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::NATIVE_CONTRACT_VIOLATION,
    },
    DiagnosticMessage {
        code: diagnostic_codes::CONFLICTING_METHOD_CANDIDATE,
        category: DiagnosticCategory::Message,
        message: diagnostic_messages::CONFLICTING_METHOD_CANDIDATE,
    },
];

/// Related information for a diagnostic (e.g., each conflicting default).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticRelatedInformation {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub subject: String,
    pub message_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: u32,
    /// Input the hierarchy was loaded from, empty when built in memory.
    pub file: String,
    /// Fully qualified name of the type the diagnostic is about.
    pub subject: String,
    pub message_text: String,
    pub related_information: Vec<DiagnosticRelatedInformation>,
}

impl Diagnostic {
    pub fn error(subject: impl Into<String>, message: impl Into<String>, code: u32) -> Self {
        Self {
            category: DiagnosticCategory::Error,
            message_text: message.into(),
            code,
            file: String::new(),
            subject: subject.into(),
            related_information: Vec::new(),
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = file.into();
        self
    }

    pub fn with_related(
        mut self,
        subject: impl Into<String>,
        message: impl Into<String>,
        code: u32,
    ) -> Self {
        self.related_information.push(DiagnosticRelatedInformation {
            category: DiagnosticCategory::Message,
            code,
            subject: subject.into(),
            message_text: message.into(),
        });
        self
    }
}

pub fn get_message_template(code: u32) -> Option<&'static str> {
    DIAGNOSTIC_MESSAGES
        .iter()
        .find(|m| m.code == code)
        .map(|m| m.message)
}

pub fn format_message(message: &str, args: &[&str]) -> String {
    let mut result = message.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

#[cfg(test)]
#[path = "tests/diagnostics_tests.rs"]
mod tests;
