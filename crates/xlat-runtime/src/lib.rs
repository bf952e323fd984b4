//! Identity Dispatch Shim.
//!
//! Every value in the target environment must answer the universal identity
//! protocol (`equals`, `hashCode`, `toString`, `getClass`), whether it is a
//! translated object or a value that never knew about the source type system.
//! The shim classifies a [`Value`] once into a [`Representation`] tag and
//! dispatches through a fixed table indexed by that tag.
//!
//! Shared mutable state (the identity-hash assignment table) and the class
//! registry live in an explicit [`RuntimeContext`].

pub mod error;
pub use error::RuntimeError;

pub mod value;
pub use value::{ArrayValue, NativeFunction, NativeObject, TranslatedObject, Value};

pub mod representation;
pub use representation::Representation;

pub mod registry;
pub use registry::{
    ClassDescriptor, ClassRegistry, IdentityOverrides, InternedClassRegistry, WellKnownClass,
};

pub mod identity_hash;
pub use identity_hash::IdentityHashTable;

pub mod context;
pub use context::RuntimeContext;

pub mod natives;

pub mod dispatch;
pub use dispatch::{identity_equals, identity_get_class, identity_hash_code, identity_to_string};
