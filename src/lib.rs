//! xlat: bridge synthesis and identity dispatch for a translator that lowers
//! an erased-generics class language onto a prototype-based dynamic target.
//!
//! The workspace crates are re-exported here:
//!
//! - [`hierarchy`]: the frozen class/interface model.
//! - [`bridges`]: per-class bridge synthesis.
//! - [`runtime`]: the identity dispatch shim.
//!
//! The functions in this module tie the compile-time and run-time halves
//! together: [`install_classes`] registers every type of a hierarchy with a
//! runtime class registry, and [`resolve_call`] models the target's
//! prototype lookup for a virtual call once bridges are installed.

pub use xlat_bridges as bridges;
pub use xlat_common as common;
pub use xlat_hierarchy as hierarchy;
pub use xlat_runtime as runtime;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};
use xlat_bridges::{BridgeSynthesizer, ErasureKey};
use xlat_hierarchy::{Hierarchy, MethodId, TypeId};
use xlat_runtime::{ClassDescriptor, IdentityOverrides, InternedClassRegistry};

/// Register every type of `hierarchy` and return its descriptors.
///
/// A class overrides `equals`/`hashCode` at run time when it declares or
/// inherits the override; interfaces never do.
pub fn install_classes(
    hierarchy: &Hierarchy,
    registry: &InternedClassRegistry,
) -> FxHashMap<TypeId, ClassDescriptor> {
    let mut installed = FxHashMap::default();
    for node in hierarchy.types() {
        let mut overrides = IdentityOverrides::empty();
        if node.is_class() {
            overrides.set(IdentityOverrides::EQUALS, hierarchy.inherits_equals(node.id));
            overrides.set(
                IdentityOverrides::HASH_CODE,
                hierarchy.inherits_hash_code(node.id),
            );
        }
        let name = hierarchy.resolve(node.name);
        let descriptor = registry.register(name, overrides);
        trace!(class = name, descriptor = descriptor.0, ?overrides, "installed class");
        installed.insert(node.id, descriptor);
    }
    debug!(types = installed.len(), "installed hierarchy into registry");
    installed
}

/// Erasure key for `name(params...)`, or `None` if a name was never
/// interned by the hierarchy.
pub fn erasure_key(hierarchy: &Hierarchy, name: &str, params: &[&str]) -> Option<ErasureKey> {
    Some(ErasureKey {
        name: hierarchy.atom(name)?,
        params: params
            .iter()
            .map(|p| hierarchy.atom(p))
            .collect::<Option<_>>()?,
    })
}

/// The method a call shaped `key` on an instance of `receiver` executes.
///
/// Walks the prototype chain nearest first. A concrete declaration with the
/// key answers; a bridge with the key re-dispatches on its delegate's key
/// from the receiver; abstract declarations have no slot. Interface defaults
/// are copied onto the prototype and answer last. Classes whose synthesis
/// failed contribute no bridges.
pub fn resolve_call(
    synthesizer: &BridgeSynthesizer<'_>,
    receiver: TypeId,
    key: &ErasureKey,
) -> Option<MethodId> {
    let hierarchy = synthesizer.hierarchy();
    for class in hierarchy.superclass_chain(receiver) {
        let declared = hierarchy
            .methods_of(class)
            .find(|m| !m.is_abstract() && ErasureKey::of(m) == *key);
        if let Some(method) = declared {
            return Some(method.id);
        }
        if let Ok(bridges) = synthesizer.synthesize(class) {
            if let Some(bridge) = bridges.find(key) {
                if bridge.delegate_key != *key {
                    return resolve_call(synthesizer, receiver, &bridge.delegate_key);
                }
            }
        }
    }
    hierarchy
        .all_interfaces(receiver)
        .into_iter()
        .flat_map(|interface| hierarchy.methods_of(interface))
        .find(|m| m.is_default() && ErasureKey::of(m) == *key)
        .map(|m| m.id)
}
