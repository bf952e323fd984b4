//! Core data of the hierarchy arena.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use xlat_common::Atom;

/// Handle of a class or interface in the hierarchy arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeId(pub u32);

impl TypeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle of a method signature in the hierarchy arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MethodId(pub u32);

impl MethodId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    #[default]
    Class,
    Interface,
}

bitflags! {
    /// Modifiers of a method signature.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MethodFlags: u8 {
        const ABSTRACT = 1 << 0;
        /// Interface method with a body.
        const DEFAULT = 1 << 1;
        /// Synthesized bridge. Never set on front-end declarations.
        const BRIDGE = 1 << 2;
    }
}

/// A generic (pre-erasure) type as written in a signature or supertype clause.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// A class, interface or external type, optionally parameterized.
    Named { name: Atom, args: Vec<TypeRef> },
    /// A type variable of the declaring class or interface.
    Var(Atom),
    Array(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: Atom) -> Self {
        TypeRef::Named {
            name,
            args: Vec::new(),
        }
    }

    pub fn is_var(&self) -> bool {
        matches!(self, TypeRef::Var(_))
    }
}

/// A declared type parameter with its erasure bound.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeParam {
    pub name: Atom,
    /// Erased bound (`Object` unless declared `T extends Bound`).
    pub bound: Atom,
}

/// A supertype reference: the supertype plus the type arguments it is
/// instantiated with. Empty `args` on a generic supertype means a raw type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Supertype {
    pub id: TypeId,
    pub args: Vec<TypeRef>,
}

/// One class or interface. Immutable once the hierarchy is frozen.
#[derive(Clone, Debug)]
pub struct TypeNode {
    pub id: TypeId,
    pub name: Atom,
    pub kind: TypeKind,
    pub type_params: Vec<TypeParam>,
    /// Always `None` for interfaces.
    pub superclass: Option<Supertype>,
    /// Directly implemented (classes) or extended (interfaces) interfaces, in
    /// declaration order.
    pub interfaces: Vec<Supertype>,
    pub is_abstract: bool,
    /// Instances are target-environment values rather than translated objects.
    pub native_backed: bool,
    pub declares_equals: bool,
    pub declares_hash_code: bool,
    /// Member names the native representation answers to. Only meaningful
    /// when `native_backed` is set.
    pub native_protocol: Vec<Atom>,
    /// Methods declared directly on this type, in declaration order.
    pub methods: Vec<MethodId>,
}

impl TypeNode {
    #[inline]
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    #[inline]
    pub fn is_class(&self) -> bool {
        self.kind == TypeKind::Class
    }

    /// Concrete classes must end up with an implementation for every method
    /// they are responsible for.
    #[inline]
    pub fn is_concrete_class(&self) -> bool {
        self.is_class() && !self.is_abstract
    }

    pub fn type_param(&self, name: Atom) -> Option<&TypeParam> {
        self.type_params.iter().find(|p| p.name == name)
    }

    /// All direct supertypes: superclass first, then interfaces.
    pub fn supertypes(&self) -> impl Iterator<Item = &Supertype> {
        self.superclass.iter().chain(self.interfaces.iter())
    }
}

/// A method as declared on its owner, with both erased and generic shapes.
#[derive(Clone, Debug)]
pub struct MethodSignature {
    pub id: MethodId,
    pub owner: TypeId,
    pub name: Atom,
    pub erased_params: SmallVec<[Atom; 4]>,
    pub erased_return: Atom,
    pub generic_params: SmallVec<[TypeRef; 4]>,
    pub generic_return: TypeRef,
    pub flags: MethodFlags,
}

impl MethodSignature {
    #[inline]
    pub fn is_abstract(&self) -> bool {
        self.flags.contains(MethodFlags::ABSTRACT)
    }

    #[inline]
    pub fn is_default(&self) -> bool {
        self.flags.contains(MethodFlags::DEFAULT)
    }

    #[inline]
    pub fn is_bridge(&self) -> bool {
        self.flags.contains(MethodFlags::BRIDGE)
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.erased_params.len()
    }

    /// Same name and same erased parameter types.
    pub fn has_erasure(&self, name: Atom, erased_params: &[Atom]) -> bool {
        self.name == name && self.erased_params.as_slice() == erased_params
    }
}
