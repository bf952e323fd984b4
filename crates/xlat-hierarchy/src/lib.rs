//! Hierarchy Model for the xlat translator.
//!
//! An arena of every class and interface of the translated program together
//! with their method signatures, in both generic and erased form. The model
//! is assembled through [`HierarchyBuilder`], validated, and then frozen into
//! an immutable [`Hierarchy`] that downstream passes share across threads.
//!
//! Types and methods refer to each other through [`TypeId`] / [`MethodId`]
//! handles into the arena, never through owning references, so diamond-shaped
//! interface graphs need no reference cycles.

pub mod types;
pub use types::{
    MethodFlags, MethodId, MethodSignature, Supertype, TypeId, TypeKind, TypeNode, TypeParam,
    TypeRef,
};

pub mod type_expr;
pub use type_expr::{TypeExpr, parse_type_expr, parse_type_param};

pub mod decl;
pub use decl::{MethodDecl, TypeDecl};

pub mod error;
pub use error::HierarchyError;

pub mod builder;
pub use builder::HierarchyBuilder;

pub mod hierarchy;
pub use hierarchy::Hierarchy;

pub mod view;
pub use view::{GenericView, SupertypeViews};
