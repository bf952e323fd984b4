//! Generic views: supertype members as seen from a subtype.
//!
//! `class C2 extends C1<String>` sees `C1<T>.get(T)` as `get(String)`. A view
//! maps the type parameters of one supertype to types written in terms of the
//! viewing class, obtained by substituting type arguments along every
//! supertype edge. Members reached through a raw supertype (a generic type
//! referenced without arguments) are seen erased, and so is everything above
//! a raw supertype.

use crate::hierarchy::Hierarchy;
use crate::types::{MethodId, TypeId, TypeRef};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::collections::VecDeque;
use xlat_common::Atom;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenericView {
    /// Type parameter substitution. Parameters without an entry stay as
    /// variables (the viewing class's own parameters).
    Parameterized(FxHashMap<Atom, TypeRef>),
    /// Reached through a raw type: only erased signatures are visible.
    Raw,
}

impl GenericView {
    fn identity() -> Self {
        GenericView::Parameterized(FxHashMap::default())
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, GenericView::Raw)
    }

    /// Substitute this view into a type written in the viewed type's terms.
    pub fn apply(&self, ty: &TypeRef) -> Option<TypeRef> {
        let GenericView::Parameterized(map) = self else {
            return None;
        };
        Some(substitute(map, ty))
    }
}

fn substitute(map: &FxHashMap<Atom, TypeRef>, ty: &TypeRef) -> TypeRef {
    match ty {
        TypeRef::Var(name) => map.get(name).cloned().unwrap_or(TypeRef::Var(*name)),
        TypeRef::Named { name, args } => TypeRef::Named {
            name: *name,
            args: args.iter().map(|a| substitute(map, a)).collect(),
        },
        TypeRef::Array(component) => TypeRef::Array(Box::new(substitute(map, component))),
    }
}

/// Views of every supertype (and the type itself) from one viewing type.
#[derive(Clone, Debug)]
pub struct SupertypeViews {
    origin: TypeId,
    views: FxHashMap<TypeId, GenericView>,
}

impl SupertypeViews {
    pub(crate) fn compute(hierarchy: &Hierarchy, origin: TypeId) -> Self {
        let mut views = FxHashMap::default();
        views.insert(origin, GenericView::identity());

        let mut queue = VecDeque::from([origin]);
        while let Some(current) = queue.pop_front() {
            let current_view = views[&current].clone();
            for supertype in hierarchy.type_node(current).supertypes() {
                if views.contains_key(&supertype.id) {
                    // First path wins; well-formed programs agree on all paths.
                    continue;
                }
                let params = &hierarchy.type_node(supertype.id).type_params;
                let view = match &current_view {
                    GenericView::Raw => GenericView::Raw,
                    GenericView::Parameterized(_) if supertype.args.is_empty() => {
                        if params.is_empty() {
                            GenericView::identity()
                        } else {
                            GenericView::Raw
                        }
                    }
                    GenericView::Parameterized(map) => GenericView::Parameterized(
                        params
                            .iter()
                            .zip(&supertype.args)
                            .map(|(param, arg)| (param.name, substitute(map, arg)))
                            .collect(),
                    ),
                };
                views.insert(supertype.id, view);
                queue.push_back(supertype.id);
            }
        }

        SupertypeViews { origin, views }
    }

    pub fn origin(&self) -> TypeId {
        self.origin
    }

    pub fn get(&self, id: TypeId) -> Option<&GenericView> {
        self.views.get(&id)
    }

    /// Parameter types of `method` as seen from the origin. Falls back to the
    /// erased types for raw views and for owners outside the origin's
    /// supertype closure.
    pub fn params_of(&self, hierarchy: &Hierarchy, method: MethodId) -> SmallVec<[TypeRef; 4]> {
        let signature = hierarchy.method(method);
        match self.views.get(&signature.owner) {
            Some(GenericView::Parameterized(map)) => signature
                .generic_params
                .iter()
                .map(|p| substitute(map, p))
                .collect(),
            _ => signature
                .erased_params
                .iter()
                .map(|&p| TypeRef::named(p))
                .collect(),
        }
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
