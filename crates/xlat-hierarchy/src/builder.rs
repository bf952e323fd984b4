//! Hierarchy construction and validation.
//!
//! The builder collects declarations in any order (supertypes may be declared
//! after their subtypes) and resolves everything in [`HierarchyBuilder::freeze`]:
//!
//! 1. assign a [`TypeId`] to every declared name,
//! 2. resolve type parameters, supertype clauses and method signatures,
//!    computing erasures where the front end did not supply them,
//! 3. validate supertype kinds, type-argument arity, method modifiers and
//!    duplicate erasures,
//! 4. reject inheritance cycles and over-deep chains.
//!
//! A frozen [`Hierarchy`] is immutable.

use crate::decl::{MethodDecl, TypeDecl};
use crate::error::HierarchyError;
use crate::hierarchy::Hierarchy;
use crate::type_expr::{TypeExpr, parse_type_expr, parse_type_param};
use crate::types::{
    MethodFlags, MethodId, MethodSignature, Supertype, TypeId, TypeKind, TypeNode, TypeParam,
    TypeRef,
};
use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use xlat_common::limits::{DEFAULT_ROOT_TYPE, MAX_HIERARCHY_DEPTH};
use xlat_common::{Atom, Interner};

pub struct HierarchyBuilder {
    decls: IndexMap<String, TypeDecl>,
    root_type: String,
}

impl HierarchyBuilder {
    pub fn new() -> Self {
        HierarchyBuilder {
            decls: IndexMap::new(),
            root_type: DEFAULT_ROOT_TYPE.to_string(),
        }
    }

    /// Override the erasure bound of unbounded type variables.
    pub fn with_root_type(mut self, root_type: impl Into<String>) -> Self {
        self.root_type = root_type.into();
        self
    }

    pub fn add_type(&mut self, decl: TypeDecl) -> Result<&mut Self, HierarchyError> {
        if self.decls.contains_key(&decl.name) {
            return Err(HierarchyError::DuplicateType { name: decl.name });
        }
        self.decls.insert(decl.name.clone(), decl);
        Ok(self)
    }

    pub fn add_types(
        &mut self,
        decls: impl IntoIterator<Item = TypeDecl>,
    ) -> Result<&mut Self, HierarchyError> {
        for decl in decls {
            self.add_type(decl)?;
        }
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    pub fn freeze(self) -> Result<Hierarchy, HierarchyError> {
        let _span = tracing::debug_span!("freeze_hierarchy", types = self.decls.len()).entered();

        let mut interner = Interner::new();
        let root = interner.intern(&self.root_type);

        let mut by_name: FxHashMap<Atom, TypeId> = FxHashMap::default();
        for (index, name) in self.decls.keys().enumerate() {
            let atom = interner.intern(name);
            by_name.insert(atom, TypeId(index as u32));
        }

        let mut resolver = Resolver {
            interner,
            root,
            by_name: &by_name,
            decls: &self.decls,
            methods: Vec::new(),
        };

        let mut types = Vec::with_capacity(self.decls.len());
        for (index, decl) in self.decls.values().enumerate() {
            types.push(resolver.resolve_type(TypeId(index as u32), decl)?);
        }

        let Resolver {
            interner, methods, ..
        } = resolver;

        check_acyclic(&types, &interner)?;

        tracing::debug!(
            types = types.len(),
            methods = methods.len(),
            "hierarchy frozen"
        );
        Ok(Hierarchy::from_parts(interner, types, methods, by_name, root))
    }
}

impl Default for HierarchyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Names visible while resolving one declaration.
struct Scope {
    /// (name, param) for the declaring type's parameters.
    type_vars: Vec<(String, TypeParam)>,
    /// (name, erased bound) for method-level parameters.
    method_vars: Vec<(String, Atom)>,
}

impl Scope {
    fn type_var(&self, name: &str) -> Option<&TypeParam> {
        self.type_vars
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| p)
    }

    fn method_var(&self, name: &str) -> Option<Atom> {
        self.method_vars
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, bound)| *bound)
    }

    fn bound_of(&self, name: &str) -> Option<Atom> {
        self.method_var(name)
            .or_else(|| self.type_var(name).map(|p| p.bound))
    }
}

struct Resolver<'a> {
    interner: Interner,
    root: Atom,
    by_name: &'a FxHashMap<Atom, TypeId>,
    decls: &'a IndexMap<String, TypeDecl>,
    methods: Vec<MethodSignature>,
}

impl<'a> Resolver<'a> {
    fn resolve_type(&mut self, id: TypeId, decl: &TypeDecl) -> Result<TypeNode, HierarchyError> {
        let name = self.interner.intern(&decl.name);

        let mut scope = Scope {
            type_vars: Vec::new(),
            method_vars: Vec::new(),
        };
        for src in &decl.type_params {
            let (param_name, bound) = parse_type_param(src)?;
            let bound = match bound {
                Some(expr) => self.erase(&expr, &scope),
                None => self.root,
            };
            let param = TypeParam {
                name: self.interner.intern(&param_name),
                bound,
            };
            scope.type_vars.push((param_name, param));
        }

        if decl.kind == TypeKind::Interface && decl.superclass.is_some() {
            return Err(HierarchyError::InterfaceWithSuperclass {
                interface: decl.name.clone(),
            });
        }

        let superclass = match &decl.superclass {
            Some(src) => {
                let supertype = self.resolve_supertype(decl, src, &scope)?;
                let super_decl = &self.decls[supertype.id.index()];
                if super_decl.kind != TypeKind::Class {
                    return Err(HierarchyError::SuperclassNotClass {
                        class: decl.name.clone(),
                        superclass: super_decl.name.clone(),
                    });
                }
                Some(supertype)
            }
            None => None,
        };

        let mut interfaces = Vec::with_capacity(decl.interfaces.len());
        for src in &decl.interfaces {
            let supertype = self.resolve_supertype(decl, src, &scope)?;
            let super_decl = &self.decls[supertype.id.index()];
            if super_decl.kind != TypeKind::Interface {
                return Err(HierarchyError::InterfaceExpected {
                    ty: decl.name.clone(),
                    interface: super_decl.name.clone(),
                });
            }
            interfaces.push(supertype);
        }

        let mut method_ids = Vec::with_capacity(decl.methods.len());
        let mut seen_erasures: FxHashSet<(Atom, SmallVec<[Atom; 4]>)> = FxHashSet::default();
        for method in &decl.methods {
            let signature = self.resolve_method(id, decl, method, &mut scope)?;
            if !seen_erasures.insert((signature.name, signature.erased_params.clone())) {
                return Err(HierarchyError::DuplicateMethod {
                    ty: decl.name.clone(),
                    signature: format!("{}({})", method.name, method.params.join(", ")),
                });
            }
            method_ids.push(signature.id);
            self.methods.push(signature);
        }

        let root = self.root;
        let declares_equals = decl.declares_equals
            || decl.methods.iter().zip(&method_ids).any(|(m, &mid)| {
                m.name == "equals" && self.methods[mid.index()].erased_params.as_slice() == [root]
            });
        let declares_hash_code = decl.declares_hash_code
            || decl
                .methods
                .iter()
                .any(|m| m.name == "hashCode" && m.params.is_empty());

        let native_protocol = decl
            .native_protocol
            .iter()
            .map(|member| self.interner.intern(member))
            .collect();

        Ok(TypeNode {
            id,
            name,
            kind: decl.kind,
            type_params: scope.type_vars.into_iter().map(|(_, p)| p).collect(),
            superclass,
            interfaces,
            is_abstract: decl.is_abstract || decl.kind == TypeKind::Interface,
            native_backed: decl.native_backed,
            declares_equals,
            declares_hash_code,
            native_protocol,
            methods: method_ids,
        })
    }

    fn resolve_supertype(
        &mut self,
        decl: &TypeDecl,
        src: &str,
        scope: &Scope,
    ) -> Result<Supertype, HierarchyError> {
        let expr = parse_type_expr(src)?;
        let TypeExpr::Named { name, args } = &expr else {
            return Err(HierarchyError::InvalidTypeExpression {
                expr: src.to_string(),
                reason: "a supertype cannot be an array".to_string(),
            });
        };
        let id = self
            .interner
            .lookup(name)
            .and_then(|atom| self.by_name.get(&atom).copied())
            .ok_or_else(|| HierarchyError::UnknownType {
                referenced_by: decl.name.clone(),
                name: name.clone(),
            })?;

        let expected = self.decls[id.index()].type_params.len();
        if !args.is_empty() && args.len() != expected {
            return Err(HierarchyError::TypeArgumentCount {
                ty: decl.name.clone(),
                supertype: name.clone(),
                expected,
                found: args.len(),
            });
        }

        let args = args.iter().map(|arg| self.resolve(arg, scope)).collect();
        Ok(Supertype { id, args })
    }

    fn resolve_method(
        &mut self,
        owner: TypeId,
        decl: &TypeDecl,
        method: &MethodDecl,
        scope: &mut Scope,
    ) -> Result<MethodSignature, HierarchyError> {
        let flags = method_flags(decl, method)?;

        scope.method_vars.clear();
        for src in &method.type_params {
            let (param_name, bound) = parse_type_param(src)?;
            let bound = match bound {
                Some(expr) => self.erase(&expr, scope),
                None => self.root,
            };
            scope.method_vars.push((param_name, bound));
        }

        let mut generic_params = SmallVec::with_capacity(method.params.len());
        let mut computed_erasure: SmallVec<[Atom; 4]> = SmallVec::with_capacity(method.params.len());
        for src in &method.params {
            let expr = parse_type_expr(src)?;
            generic_params.push(self.resolve(&expr, scope));
            computed_erasure.push(self.erase(&expr, scope));
        }

        let erased_params = match &method.erased_params {
            Some(given) => {
                if given.len() != method.params.len() {
                    return Err(HierarchyError::ErasedArityMismatch {
                        ty: decl.name.clone(),
                        method: method.name.clone(),
                        expected: method.params.len(),
                        found: given.len(),
                    });
                }
                given.iter().map(|name| self.interner.intern(name)).collect()
            }
            None => computed_erasure,
        };

        let return_expr = parse_type_expr(&method.returns)?;
        let generic_return = self.resolve(&return_expr, scope);
        let erased_return = match &method.erased_return {
            Some(given) => self.interner.intern(given),
            None => self.erase(&return_expr, scope),
        };
        scope.method_vars.clear();

        Ok(MethodSignature {
            id: MethodId(self.methods.len() as u32),
            owner,
            name: self.interner.intern(&method.name),
            erased_params,
            erased_return,
            generic_params,
            generic_return,
            flags,
        })
    }

    fn resolve(&mut self, expr: &TypeExpr, scope: &Scope) -> TypeRef {
        match expr {
            TypeExpr::Named { name, args } => {
                if args.is_empty() {
                    // Method-level variables are compared by erasure.
                    if let Some(bound) = scope.method_var(name) {
                        return TypeRef::named(bound);
                    }
                    if let Some(param) = scope.type_var(name) {
                        return TypeRef::Var(param.name);
                    }
                }
                TypeRef::Named {
                    name: self.interner.intern(name),
                    args: args.iter().map(|arg| self.resolve(arg, scope)).collect(),
                }
            }
            TypeExpr::Array(component) => TypeRef::Array(Box::new(self.resolve(component, scope))),
        }
    }

    fn erase(&mut self, expr: &TypeExpr, scope: &Scope) -> Atom {
        match expr {
            TypeExpr::Named { name, args } => {
                if args.is_empty() {
                    if let Some(bound) = scope.bound_of(name) {
                        return bound;
                    }
                }
                self.interner.intern(name)
            }
            TypeExpr::Array(component) => {
                let inner = self.erase(component, scope);
                let name = format!("{}[]", self.interner.resolve(inner));
                self.interner.intern(&name)
            }
        }
    }
}

fn method_flags(decl: &TypeDecl, method: &MethodDecl) -> Result<MethodFlags, HierarchyError> {
    let invalid = |reason| HierarchyError::InvalidModifiers {
        ty: decl.name.clone(),
        method: method.name.clone(),
        reason,
    };

    if method.is_abstract && method.default {
        return Err(invalid("a method cannot be both abstract and default"));
    }
    match decl.kind {
        TypeKind::Interface => Ok(if method.default {
            MethodFlags::DEFAULT
        } else {
            MethodFlags::ABSTRACT
        }),
        TypeKind::Class => {
            if method.default {
                return Err(invalid("default methods are only allowed in interfaces"));
            }
            if method.is_abstract && !decl.is_abstract {
                return Err(invalid("abstract method declared in a concrete class"));
            }
            Ok(if method.is_abstract {
                MethodFlags::ABSTRACT
            } else {
                MethodFlags::empty()
            })
        }
    }
}

/// Reject cycles through any supertype edge, and over-deep chains.
fn check_acyclic(types: &[TypeNode], interner: &Interner) -> Result<(), HierarchyError> {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Mark {
        Unvisited,
        InProgress,
        Done,
    }

    // Longest path to a root, filled in as nodes finish.
    let mut depth = vec![0usize; types.len()];
    let mut marks = vec![Mark::Unvisited; types.len()];

    for start in 0..types.len() {
        if marks[start] != Mark::Unvisited {
            continue;
        }
        // Iterative DFS: (node, next supertype index to visit)
        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
        marks[start] = Mark::InProgress;
        while let Some(top) = stack.last_mut() {
            let node = top.0;
            let supers: Vec<TypeId> = types[node].supertypes().map(|s| s.id).collect();
            if top.1 < supers.len() {
                let sup = supers[top.1].index();
                top.1 += 1;
                match marks[sup] {
                    Mark::InProgress => {
                        return Err(HierarchyError::InheritanceCycle {
                            ty: interner.resolve(types[sup].name).to_string(),
                        });
                    }
                    Mark::Unvisited => {
                        marks[sup] = Mark::InProgress;
                        stack.push((sup, 0));
                    }
                    Mark::Done => {}
                }
            } else {
                let d = supers
                    .iter()
                    .map(|s| depth[s.index()] + 1)
                    .max()
                    .unwrap_or(0);
                if d > MAX_HIERARCHY_DEPTH {
                    return Err(HierarchyError::HierarchyTooDeep {
                        ty: interner.resolve(types[node].name).to_string(),
                    });
                }
                depth[node] = d;
                marks[node] = Mark::Done;
                stack.pop();
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/builder_tests.rs"]
mod tests;
