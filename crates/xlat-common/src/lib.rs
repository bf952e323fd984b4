//! Common types and utilities for the xlat translator.
//!
//! This crate provides foundational types used across all xlat crates:
//! - String interning (`Atom`, `Interner`)
//! - Diagnostics (`Diagnostic`, `DiagnosticCategory`, codes and message templates)
//! - Translator limits and well-known names

// String interning for type and member names
pub mod interner;
pub use interner::{Atom, Interner};

// Compile-time diagnostics surfaced to the driver
pub mod diagnostics;
pub use diagnostics::{
    Diagnostic, DiagnosticCategory, DiagnosticMessage, DiagnosticRelatedInformation,
    diagnostic_codes, diagnostic_messages, format_message, get_message_template,
};

// Centralized limits and well-known names
pub mod limits;
