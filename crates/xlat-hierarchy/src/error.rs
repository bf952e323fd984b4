use thiserror::Error;

/// Malformed hierarchy input.
///
/// These are contract violations of the front end that produced the model,
/// not recoverable conditions: the builder refuses to freeze the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    #[error("type '{name}' is declared more than once")]
    DuplicateType { name: String },

    #[error("'{referenced_by}' refers to unknown type '{name}'")]
    UnknownType { referenced_by: String, name: String },

    #[error("class '{class}' extends '{superclass}', which is not a class")]
    SuperclassNotClass { class: String, superclass: String },

    #[error("'{ty}' implements '{interface}', which is not an interface")]
    InterfaceExpected { ty: String, interface: String },

    #[error("interface '{interface}' cannot have a superclass")]
    InterfaceWithSuperclass { interface: String },

    #[error("type '{ty}' is part of an inheritance cycle")]
    InheritanceCycle { ty: String },

    #[error("type '{ty}' exceeds the maximum hierarchy depth")]
    HierarchyTooDeep { ty: String },

    #[error("'{ty}' passes {found} type arguments to '{supertype}', which declares {expected}")]
    TypeArgumentCount {
        ty: String,
        supertype: String,
        expected: usize,
        found: usize,
    },

    #[error("'{ty}' declares '{signature}' more than once after erasure")]
    DuplicateMethod { ty: String, signature: String },

    #[error("invalid modifiers on '{ty}.{method}': {reason}")]
    InvalidModifiers {
        ty: String,
        method: String,
        reason: &'static str,
    },

    #[error("'{ty}.{method}' declares {found} erased parameter types for {expected} parameters")]
    ErasedArityMismatch {
        ty: String,
        method: String,
        expected: usize,
        found: usize,
    },

    #[error("invalid type expression '{expr}': {reason}")]
    InvalidTypeExpression { expr: String, reason: String },
}
