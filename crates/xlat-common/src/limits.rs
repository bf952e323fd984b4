//! Centralized limits and well-known names for the translator.

/// Maximum depth of a superclass chain or interface inheritance path.
///
/// The hierarchy is validated acyclic before freezing, so this only guards
/// against pathological generated inputs. Exceeding it is reported as an
/// invalid hierarchy rather than overflowing the stack while computing
/// generic views.
pub const MAX_HIERARCHY_DEPTH: usize = 1024;

/// Maximum nesting of type arguments accepted by the type-expression parser.
pub const MAX_TYPE_ARGUMENT_DEPTH: usize = 64;

/// Erasure bound of an unbounded type variable.
pub const DEFAULT_ROOT_TYPE: &str = "Object";
