//! The frozen hierarchy arena and its supertype queries.

use crate::types::{MethodId, MethodSignature, TypeId, TypeNode, TypeRef};
use crate::view::SupertypeViews;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;
use xlat_common::{Atom, Interner};

/// Immutable class/interface graph shared by every synthesis task.
///
/// All [`TypeNode`]s and [`MethodSignature`]s live in two vectors indexed by
/// their handles; nothing is mutated after [`crate::HierarchyBuilder::freeze`].
#[derive(Debug, Clone)]
pub struct Hierarchy {
    interner: Interner,
    types: Vec<TypeNode>,
    methods: Vec<MethodSignature>,
    by_name: FxHashMap<Atom, TypeId>,
    root_type: Atom,
}

impl Hierarchy {
    pub(crate) fn from_parts(
        interner: Interner,
        types: Vec<TypeNode>,
        methods: Vec<MethodSignature>,
        by_name: FxHashMap<Atom, TypeId>,
        root_type: Atom,
    ) -> Self {
        Hierarchy {
            interner,
            types,
            methods,
            by_name,
            root_type,
        }
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    #[inline]
    pub fn resolve(&self, atom: Atom) -> &str {
        self.interner.resolve(atom)
    }

    /// Atom of an already-interned name.
    pub fn atom(&self, name: &str) -> Option<Atom> {
        self.interner.lookup(name)
    }

    pub fn root_type(&self) -> Atom {
        self.root_type
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Panics on a handle that does not belong to this hierarchy.
    #[inline]
    pub fn type_node(&self, id: TypeId) -> &TypeNode {
        &self.types[id.index()]
    }

    #[inline]
    pub fn method(&self, id: MethodId) -> &MethodSignature {
        &self.methods[id.index()]
    }

    pub fn type_name(&self, id: TypeId) -> &str {
        self.resolve(self.type_node(id).name)
    }

    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.atom(name)
            .and_then(|atom| self.by_name.get(&atom).copied())
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeNode> {
        self.types.iter()
    }

    pub fn classes(&self) -> impl Iterator<Item = &TypeNode> {
        self.types.iter().filter(|t| t.is_class())
    }

    pub fn methods_of(&self, id: TypeId) -> impl Iterator<Item = &MethodSignature> {
        self.type_node(id)
            .methods
            .iter()
            .map(move |&m| self.method(m))
    }

    /// The type itself followed by its superclasses, nearest first.
    pub fn superclass_chain(&self, id: TypeId) -> SuperclassChain<'_> {
        SuperclassChain {
            hierarchy: self,
            next: Some(id),
        }
    }

    /// Every interface reachable from `id` (excluding `id` itself), in a
    /// deterministic breadth-first order: interfaces of the type itself first,
    /// then those of each superclass, each followed by their super-interfaces.
    pub fn all_interfaces(&self, id: TypeId) -> Vec<TypeId> {
        let mut seen = FxHashSet::default();
        let mut result = Vec::new();
        let mut queue: VecDeque<TypeId> = VecDeque::new();

        for class in self.superclass_chain(id) {
            queue.extend(self.type_node(class).interfaces.iter().map(|s| s.id));
        }
        while let Some(next) = queue.pop_front() {
            if next == id || !seen.insert(next) {
                continue;
            }
            result.push(next);
            queue.extend(self.type_node(next).interfaces.iter().map(|s| s.id));
        }
        result
    }

    /// Reflexive, transitive subtype test over supertype edges.
    pub fn is_subtype_of(&self, sub: TypeId, sup: TypeId) -> bool {
        if sub == sup {
            return true;
        }
        let mut seen = FxHashSet::default();
        let mut stack = vec![sub];
        while let Some(next) = stack.pop() {
            if !seen.insert(next) {
                continue;
            }
            for supertype in self.type_node(next).supertypes() {
                if supertype.id == sup {
                    return true;
                }
                stack.push(supertype.id);
            }
        }
        false
    }

    /// Whether instances of the class see an overriding `equals`, declared on
    /// the class or inherited from a superclass.
    pub fn inherits_equals(&self, id: TypeId) -> bool {
        self.superclass_chain(id)
            .any(|c| self.type_node(c).declares_equals)
    }

    pub fn inherits_hash_code(&self, id: TypeId) -> bool {
        self.superclass_chain(id)
            .any(|c| self.type_node(c).declares_hash_code)
    }

    /// Generic views of every supertype of `id`, as seen from `id`.
    pub fn views_from(&self, id: TypeId) -> SupertypeViews {
        SupertypeViews::compute(self, id)
    }

    /// `name(P1, P2)` for an erased shape.
    pub fn erasure_display(&self, name: Atom, params: &[Atom]) -> String {
        let params: Vec<&str> = params.iter().map(|&p| self.resolve(p)).collect();
        format!("{}({})", self.resolve(name), params.join(", "))
    }

    /// `Owner.name(P1, P2)` using the erased parameter types.
    pub fn method_display(&self, id: MethodId) -> String {
        let method = self.method(id);
        format!(
            "{}.{}",
            self.type_name(method.owner),
            self.erasure_display(method.name, &method.erased_params)
        )
    }

    pub fn type_ref_display(&self, ty: &TypeRef) -> String {
        match ty {
            TypeRef::Named { name, args } if args.is_empty() => self.resolve(*name).to_string(),
            TypeRef::Named { name, args } => {
                let args: Vec<String> = args.iter().map(|a| self.type_ref_display(a)).collect();
                format!("{}<{}>", self.resolve(*name), args.join(", "))
            }
            TypeRef::Var(name) => self.resolve(*name).to_string(),
            TypeRef::Array(component) => format!("{}[]", self.type_ref_display(component)),
        }
    }
}

pub struct SuperclassChain<'a> {
    hierarchy: &'a Hierarchy,
    next: Option<TypeId>,
}

impl Iterator for SuperclassChain<'_> {
    type Item = TypeId;

    fn next(&mut self) -> Option<TypeId> {
        let current = self.next?;
        self.next = self
            .hierarchy
            .type_node(current)
            .superclass
            .as_ref()
            .map(|s| s.id);
        Some(current)
    }
}
