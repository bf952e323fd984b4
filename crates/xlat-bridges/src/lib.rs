//! Bridge Synthesizer.
//!
//! Erasure merges method signatures that differ before erasure, and interface
//! default methods and covariant overrides add more ways for a virtual call to
//! land on the wrong slot of a prototype-based target. For every class this
//! crate computes the minimal set of synthetic *bridge* methods that route each
//! erased call shape an ancestor exposes to the class's effective
//! implementation:
//!
//! - [`erasure`]: erasure keys, the unit of dispatch in the target.
//! - [`resolve`]: effective-implementation resolution per erasure group
//!   (own declaration > superclass chain > most specific interface default).
//! - [`synthesizer`]: bridge emission, inherited-bridge reuse, per-class caching
//!   and parallel batch synthesis.
//!
//! Synthesis only reads the frozen [`xlat_hierarchy::Hierarchy`].

pub mod erasure;
pub use erasure::ErasureKey;

pub mod bridge;
pub use bridge::{BridgeMethod, BridgeRecord, ClassBridges, Coercion};

pub mod error;
pub use error::{ClassErrors, DispatchAmbiguityError, SynthesisError};

pub mod options;
pub use options::SynthesisOptions;

pub mod resolve;
pub use resolve::{ClassContext, ErasureGroup, Resolution};

pub mod synthesizer;
pub use synthesizer::{BatchOutcome, BridgeSynthesizer, SynthesisResult, synthesize_bridges};
