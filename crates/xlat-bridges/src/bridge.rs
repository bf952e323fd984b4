//! Bridge method records.

use crate::erasure::ErasureKey;
use serde::Serialize;
use smallvec::SmallVec;
use xlat_common::Atom;
use xlat_hierarchy::{Hierarchy, MethodFlags, MethodId, TypeId};

/// Conversion applied to one value crossing a bridge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Coercion {
    Identity,
    /// Checked downcast. Arguments arriving under the bridge's wider erased
    /// type, and results coming back under a type-variable bound, are cast
    /// to the narrower type on the other side.
    Cast { from: Atom, to: Atom },
    /// Widening: always safe, needs no runtime check. Covers arguments passed
    /// to a type-variable parameter and covariant results.
    Widen { from: Atom, to: Atom },
}

impl Coercion {
    pub fn is_identity(&self) -> bool {
        matches!(self, Coercion::Identity)
    }

    fn display(&self, hierarchy: &Hierarchy) -> Option<String> {
        match *self {
            Coercion::Identity => None,
            Coercion::Cast { from, to } => Some(format!(
                "cast {} -> {}",
                hierarchy.resolve(from),
                hierarchy.resolve(to)
            )),
            Coercion::Widen { from, to } => Some(format!(
                "widen {} -> {}",
                hierarchy.resolve(from),
                hierarchy.resolve(to)
            )),
        }
    }
}

/// A synthetic method installed on `owner`'s prototype under `target`'s
/// erased shape whose body forwards to `delegate`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BridgeMethod {
    pub owner: TypeId,
    pub target: ErasureKey,
    pub target_return: Atom,
    /// Ancestor member whose erased slot the bridge fills.
    pub target_method: MethodId,
    pub delegate: MethodId,
    pub delegate_key: ErasureKey,
    /// One entry per parameter, from the bridge's type to the delegate's.
    pub param_coercions: SmallVec<[Coercion; 4]>,
    /// From the delegate's erased return type to `target_return`.
    pub return_coercion: Coercion,
}

impl BridgeMethod {
    pub fn flags(&self) -> MethodFlags {
        MethodFlags::BRIDGE
    }

    /// Resolved, serializable form handed to code generation.
    pub fn to_record(&self, hierarchy: &Hierarchy) -> BridgeRecord {
        BridgeRecord {
            owner: hierarchy.type_name(self.owner).to_string(),
            name: hierarchy.resolve(self.target.name).to_string(),
            params: self
                .target
                .params
                .iter()
                .map(|&p| hierarchy.resolve(p).to_string())
                .collect(),
            returns: hierarchy.resolve(self.target_return).to_string(),
            bridges: hierarchy.method_display(self.target_method),
            delegate: hierarchy.method_display(self.delegate),
            coercions: self
                .param_coercions
                .iter()
                .chain(std::iter::once(&self.return_coercion))
                .filter_map(|c| c.display(hierarchy))
                .collect(),
        }
    }

    /// `Owner.name(P) -> Delegate.name(Q)`
    pub fn display(&self, hierarchy: &Hierarchy) -> String {
        format!(
            "{}.{} -> {}",
            hierarchy.type_name(self.owner),
            self.target.display(hierarchy),
            hierarchy.method_display(self.delegate)
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeRecord {
    pub owner: String,
    pub name: String,
    pub params: Vec<String>,
    pub returns: String,
    pub bridges: String,
    pub delegate: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub coercions: Vec<String>,
}

/// The bridge set of one class, in deterministic order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassBridges {
    pub bridges: Vec<BridgeMethod>,
}

impl ClassBridges {
    pub fn is_empty(&self) -> bool {
        self.bridges.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bridges.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BridgeMethod> {
        self.bridges.iter()
    }

    /// The bridge occupying `key` on the class's prototype, if any.
    pub fn find(&self, key: &ErasureKey) -> Option<&BridgeMethod> {
        self.bridges.iter().find(|b| &b.target == key)
    }
}

impl<'a> IntoIterator for &'a ClassBridges {
    type Item = &'a BridgeMethod;
    type IntoIter = std::slice::Iter<'a, BridgeMethod>;

    fn into_iter(self) -> Self::IntoIter {
        self.bridges.iter()
    }
}
