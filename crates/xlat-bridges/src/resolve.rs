//! Effective-implementation resolution.
//!
//! Every method visible to a class is grouped by [`ErasureKey`]. For each
//! group the resolver decides which method a call through that erased shape
//! must reach on an instance of the class:
//!
//! 1. a method the class declares with exactly that shape;
//! 2. otherwise the nearest method on the superclass chain that overrides a
//!    member of the group, judged on signatures seen through the class's
//!    generic views (`C2 extends C1<String>` sees `C1.get(T)` as
//!    `get(String)`). A class-side match hides interface defaults even when
//!    it is abstract;
//! 3. otherwise the most specific interface default. Defaults declared on a
//!    super-interface of another candidate lose to it; two or more remaining
//!    unrelated defaults are ambiguous.

use crate::erasure::ErasureKey;
use indexmap::IndexMap;
use smallvec::SmallVec;
use xlat_hierarchy::{Hierarchy, MethodId, SupertypeViews, TypeId};

/// All methods visible to a class under one erased shape, nearest first:
/// the class, its superclasses, then interfaces in breadth-first order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErasureGroup {
    pub key: ErasureKey,
    pub members: SmallVec<[MethodId; 4]>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// The class itself declares the slot.
    Declared(MethodId),
    /// Nearest class-chain override (possibly abstract) or the single most
    /// specific interface default.
    Implemented(MethodId),
    /// Only abstract interface declarations remain; the first one is kept.
    Unimplemented(MethodId),
    /// Unrelated interface defaults, in interface order.
    Ambiguous(SmallVec<[MethodId; 2]>),
}

/// Per-class state shared by every group resolution.
pub struct ClassContext<'h> {
    hierarchy: &'h Hierarchy,
    class: TypeId,
    views: SupertypeViews,
    chain: Vec<TypeId>,
    interfaces: Vec<TypeId>,
}

impl<'h> ClassContext<'h> {
    pub fn new(hierarchy: &'h Hierarchy, class: TypeId) -> Self {
        ClassContext {
            hierarchy,
            class,
            views: hierarchy.views_from(class),
            chain: hierarchy.superclass_chain(class).collect(),
            interfaces: hierarchy.all_interfaces(class),
        }
    }

    pub fn class(&self) -> TypeId {
        self.class
    }

    pub fn hierarchy(&self) -> &'h Hierarchy {
        self.hierarchy
    }

    /// Superclasses nearest first, excluding the class itself.
    pub fn superclasses(&self) -> &[TypeId] {
        &self.chain[1..]
    }

    pub fn groups(&self) -> Vec<ErasureGroup> {
        let mut groups: IndexMap<ErasureKey, SmallVec<[MethodId; 4]>> = IndexMap::new();
        for &ty in self.chain.iter().chain(&self.interfaces) {
            for method in self.hierarchy.methods_of(ty) {
                groups
                    .entry(ErasureKey::of(method))
                    .or_default()
                    .push(method.id);
            }
        }
        groups
            .into_iter()
            .map(|(key, members)| ErasureGroup { key, members })
            .collect()
    }

    /// Method declared on `ty` with exactly the erased shape `key`.
    pub fn declared_on(&self, ty: TypeId, key: &ErasureKey) -> Option<MethodId> {
        self.hierarchy
            .methods_of(ty)
            .find(|m| m.has_erasure(key.name, &key.params))
            .map(|m| m.id)
    }

    /// Whether `method` overrides `member` from the class's point of view.
    fn overrides(&self, method: MethodId, member: MethodId) -> bool {
        if method == member {
            return true;
        }
        let a = self.hierarchy.method(method);
        let b = self.hierarchy.method(member);
        if a.name != b.name || a.arity() != b.arity() {
            return false;
        }
        a.erased_params == b.erased_params
            || self.views.params_of(self.hierarchy, method)
                == self.views.params_of(self.hierarchy, member)
    }

    fn overrides_any(&self, method: MethodId, group: &ErasureGroup) -> bool {
        group.members.iter().any(|&m| self.overrides(method, m))
    }

    pub fn resolve(&self, group: &ErasureGroup) -> Resolution {
        if let Some(own) = self.declared_on(self.class, &group.key) {
            return Resolution::Declared(own);
        }

        for &level in &self.chain {
            let mut matches = self
                .hierarchy
                .methods_of(level)
                .filter(|m| self.overrides_any(m.id, group))
                .map(|m| m.id)
                .peekable();
            let Some(first) = matches.peek().copied() else {
                continue;
            };
            let exact = matches.find(|&m| {
                let method = self.hierarchy.method(m);
                method.has_erasure(group.key.name, &group.key.params)
            });
            return Resolution::Implemented(exact.unwrap_or(first));
        }

        self.resolve_interfaces(group)
    }

    fn resolve_interfaces(&self, group: &ErasureGroup) -> Resolution {
        let candidates: SmallVec<[MethodId; 4]> = self
            .interfaces
            .iter()
            .flat_map(|&iface| self.hierarchy.methods_of(iface))
            .filter(|m| self.overrides_any(m.id, group))
            .map(|m| m.id)
            .collect();

        let owner = |m: MethodId| self.hierarchy.method(m).owner;
        let most_specific: SmallVec<[MethodId; 4]> = candidates
            .iter()
            .copied()
            .filter(|&m| {
                !candidates.iter().any(|&other| {
                    owner(other) != owner(m) && self.hierarchy.is_subtype_of(owner(other), owner(m))
                })
            })
            .collect();

        let mut defaults: SmallVec<[MethodId; 2]> = SmallVec::new();
        for &m in &most_specific {
            if self.hierarchy.method(m).is_default()
                && !defaults.iter().any(|&d| owner(d) == owner(m))
            {
                defaults.push(m);
            }
        }

        match defaults.len() {
            0 => Resolution::Unimplemented(
                most_specific.first().copied().unwrap_or(group.members[0]),
            ),
            1 => Resolution::Implemented(defaults[0]),
            _ => Resolution::Ambiguous(defaults),
        }
    }
}

#[cfg(test)]
#[path = "tests/resolve_tests.rs"]
mod tests;
