//! Synthesis errors and their diagnostics.

use thiserror::Error;
use xlat_common::diagnostic_codes;
use xlat_common::{Diagnostic, diagnostic_messages, format_message};

/// Two or more unrelated interfaces contribute a default for the same erased
/// slot and nothing more specific (class method or sub-interface) overrides
/// them. The class must declare its own override.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("class '{class}' inherits unrelated defaults for '{method}' from {}", .interfaces.join(", "))]
pub struct DispatchAmbiguityError {
    pub class: String,
    /// Erased shape, `name(P1, P2)`.
    pub method: String,
    /// Owners of the conflicting defaults, in declaration order.
    pub interfaces: Vec<String>,
    /// `Interface.name(P)` for every conflicting default.
    pub candidates: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SynthesisError {
    #[error(transparent)]
    DispatchAmbiguity(#[from] DispatchAmbiguityError),

    #[error("concrete class '{class}' does not implement '{method}' declared in '{declared_in}'")]
    MissingImplementation {
        class: String,
        method: String,
        declared_in: String,
    },

    #[error("native-backed type '{class}' cannot provide '{method}' required by '{required_by}'")]
    NativeContractViolation {
        class: String,
        method: String,
        required_by: String,
    },
}

impl SynthesisError {
    pub fn class(&self) -> &str {
        match self {
            SynthesisError::DispatchAmbiguity(err) => &err.class,
            SynthesisError::MissingImplementation { class, .. }
            | SynthesisError::NativeContractViolation { class, .. } => class,
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            SynthesisError::DispatchAmbiguity(_) => diagnostic_codes::AMBIGUOUS_DEFAULT_METHODS,
            SynthesisError::MissingImplementation { .. } => {
                diagnostic_codes::MISSING_IMPLEMENTATION
            }
            SynthesisError::NativeContractViolation { .. } => {
                diagnostic_codes::NATIVE_CONTRACT_VIOLATION
            }
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            SynthesisError::DispatchAmbiguity(err) => {
                let interfaces = err
                    .interfaces
                    .iter()
                    .map(|i| format!("'{i}'"))
                    .collect::<Vec<_>>()
                    .join(" and ");
                let message = format_message(
                    diagnostic_messages::AMBIGUOUS_DEFAULT_METHODS,
                    &[err.class.as_str(), err.method.as_str(), interfaces.as_str()],
                );
                err.interfaces.iter().zip(&err.candidates).fold(
                    Diagnostic::error(err.class.as_str(), message, self.code()),
                    |diagnostic, (interface, candidate)| {
                        diagnostic.with_related(
                            interface,
                            format_message(
                                diagnostic_messages::CONFLICTING_METHOD_CANDIDATE,
                                &[interface.as_str(), candidate.as_str()],
                            ),
                            diagnostic_codes::CONFLICTING_METHOD_CANDIDATE,
                        )
                    },
                )
            }
            SynthesisError::MissingImplementation {
                class,
                method,
                declared_in,
            } => Diagnostic::error(
                class.as_str(),
                format_message(
                    diagnostic_messages::MISSING_IMPLEMENTATION,
                    &[class.as_str(), method.as_str(), declared_in.as_str()],
                ),
                self.code(),
            ),
            SynthesisError::NativeContractViolation {
                class,
                method,
                required_by,
            } => Diagnostic::error(
                class.as_str(),
                format_message(
                    diagnostic_messages::NATIVE_CONTRACT_VIOLATION,
                    &[class.as_str(), method.as_str(), required_by.as_str()],
                ),
                self.code(),
            ),
        }
    }
}

/// Every error found while synthesizing one class.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("bridge synthesis failed for '{class}' ({} error(s))", .errors.len())]
pub struct ClassErrors {
    pub class: String,
    pub errors: Vec<SynthesisError>,
}

impl ClassErrors {
    /// The first ambiguity, for callers that only care about dispatch.
    pub fn ambiguity(&self) -> Option<&DispatchAmbiguityError> {
        self.errors.iter().find_map(|e| match e {
            SynthesisError::DispatchAmbiguity(err) => Some(err),
            _ => None,
        })
    }
}

#[cfg(test)]
#[path = "tests/error_tests.rs"]
mod tests;
