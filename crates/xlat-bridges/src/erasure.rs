//! Erasure keys.

use smallvec::SmallVec;
use xlat_common::Atom;
use xlat_hierarchy::{Hierarchy, MethodSignature};

/// `(name, erased parameter types)`: the shape a call site dispatches on once
/// generics are gone. Return types are not part of the key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ErasureKey {
    pub name: Atom,
    pub params: SmallVec<[Atom; 4]>,
}

impl ErasureKey {
    pub fn of(signature: &MethodSignature) -> Self {
        ErasureKey {
            name: signature.name,
            params: signature.erased_params.clone(),
        }
    }

    pub fn display(&self, hierarchy: &Hierarchy) -> String {
        hierarchy.erasure_display(self.name, &self.params)
    }

    /// Resolved names, used to order bridges independently of interning order.
    pub(crate) fn sort_key<'h>(&self, hierarchy: &'h Hierarchy) -> (&'h str, Vec<&'h str>) {
        (
            hierarchy.resolve(self.name),
            self.params.iter().map(|&p| hierarchy.resolve(p)).collect(),
        )
    }
}
