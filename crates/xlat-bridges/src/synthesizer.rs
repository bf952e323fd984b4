//! Bridge emission and batch synthesis.

use crate::bridge::{BridgeMethod, ClassBridges, Coercion};
use crate::erasure::ErasureKey;
use crate::error::{ClassErrors, DispatchAmbiguityError, SynthesisError};
use crate::options::SynthesisOptions;
use crate::resolve::{ClassContext, ErasureGroup, Resolution};
use dashmap::DashMap;
use rayon::prelude::*;
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::{debug, info_span};
use xlat_common::{Atom, Diagnostic};
use xlat_hierarchy::{Hierarchy, MethodId, TypeId, TypeRef};

pub type SynthesisResult = Result<Arc<ClassBridges>, Arc<ClassErrors>>;

/// Computes bridge sets against one frozen hierarchy.
///
/// Results are cached per class so that a subclass can see which slots its
/// superclasses already bridge. The cache is concurrent: any number of
/// threads may call [`BridgeSynthesizer::synthesize`] at once, and a class
/// computed twice by racing threads yields identical results.
pub struct BridgeSynthesizer<'h> {
    hierarchy: &'h Hierarchy,
    options: SynthesisOptions,
    cache: DashMap<TypeId, SynthesisResult>,
}

impl<'h> BridgeSynthesizer<'h> {
    pub fn new(hierarchy: &'h Hierarchy) -> Self {
        Self::with_options(hierarchy, SynthesisOptions::default())
    }

    pub fn with_options(hierarchy: &'h Hierarchy, options: SynthesisOptions) -> Self {
        BridgeSynthesizer {
            hierarchy,
            options,
            cache: DashMap::new(),
        }
    }

    pub fn hierarchy(&self) -> &'h Hierarchy {
        self.hierarchy
    }

    pub fn options(&self) -> SynthesisOptions {
        self.options
    }

    /// Bridges `class` needs on its own prototype. Interfaces get none.
    pub fn synthesize(&self, class: TypeId) -> SynthesisResult {
        if !self.hierarchy.type_node(class).is_class() {
            return Ok(Arc::default());
        }
        let chain: Vec<TypeId> = self.hierarchy.superclass_chain(class).collect();

        // Root first, so every class is computed after its superclasses.
        let mut result: SynthesisResult = Ok(Arc::default());
        for &ty in chain.iter().rev() {
            let cached = self.cache.get(&ty).map(|entry| entry.value().clone());
            result = match cached {
                Some(done) => done,
                None => {
                    let computed = self.compute(ty);
                    self.cache.entry(ty).or_insert(computed).value().clone()
                }
            };
        }
        result
    }

    /// Synthesizes every class in parallel.
    pub fn synthesize_all(&self) -> BatchOutcome {
        let classes: Vec<TypeId> = self.hierarchy.classes().map(|c| c.id).collect();
        self.synthesize_classes(&classes)
    }

    /// Synthesizes the given types in parallel on the current rayon pool.
    pub fn synthesize_classes(&self, classes: &[TypeId]) -> BatchOutcome {
        let _span = info_span!("synthesize_batch", classes = classes.len()).entered();

        let mut results: Vec<(TypeId, SynthesisResult)> = classes
            .par_iter()
            .map(|&class| (class, self.synthesize(class)))
            .collect();
        results.sort_by(|a, b| {
            self.hierarchy
                .type_name(a.0)
                .cmp(self.hierarchy.type_name(b.0))
        });

        let mut outcome = BatchOutcome::default();
        for (class, result) in results {
            match result {
                Ok(bridges) => outcome.classes.push((class, bridges)),
                Err(errors) => outcome.errors.extend(errors.errors.iter().cloned()),
            }
        }
        debug!(
            bridges = outcome.bridge_count(),
            errors = outcome.errors.len(),
            "bridge synthesis finished"
        );
        outcome
    }

    fn compute(&self, class: TypeId) -> SynthesisResult {
        let hierarchy = self.hierarchy;
        let class_name = hierarchy.type_name(class);
        let _span = info_span!("synthesize_class", class = class_name).entered();

        let context = ClassContext::new(hierarchy, class);
        let node = hierarchy.type_node(class);
        let mut bridges = Vec::new();
        let mut errors = Vec::new();
        // One diamond can surface under several erased slots.
        let mut reported_diamonds: Vec<(Atom, SmallVec<[TypeId; 2]>)> = Vec::new();

        for group in context.groups() {
            match context.resolve(&group) {
                Resolution::Declared(_) => {}
                Resolution::Implemented(method) => {
                    let delegate = hierarchy.method(method);
                    if delegate.is_abstract() && node.is_concrete_class() {
                        errors.extend(self.missing(&context, &group, method));
                        continue;
                    }
                    let delegate_key = ErasureKey::of(delegate);
                    if delegate_key == group.key
                        || self.inherits_slot(&context, &group.key, &delegate_key)
                    {
                        continue;
                    }
                    let bridge = self.bridge(class, &group, method, delegate_key);
                    debug!(bridge = %bridge.display(hierarchy), "emitting bridge");
                    bridges.push(bridge);
                }
                Resolution::Unimplemented(method) => {
                    if node.is_concrete_class() {
                        errors.extend(self.missing(&context, &group, method));
                    }
                }
                Resolution::Ambiguous(defaults) => {
                    let mut owners: SmallVec<[TypeId; 2]> =
                        defaults.iter().map(|&d| hierarchy.method(d).owner).collect();
                    owners.sort_unstable();
                    let diamond = (group.key.name, owners);
                    if reported_diamonds.contains(&diamond) {
                        debug!(method = %group.key.display(hierarchy), "diamond already reported");
                        continue;
                    }
                    reported_diamonds.push(diamond);
                    let interfaces = defaults
                        .iter()
                        .map(|&d| hierarchy.type_name(hierarchy.method(d).owner).to_string())
                        .collect();
                    let candidates = defaults
                        .iter()
                        .map(|&d| hierarchy.method_display(d))
                        .collect();
                    debug!(method = %group.key.display(hierarchy), "ambiguous defaults");
                    errors.push(SynthesisError::from(DispatchAmbiguityError {
                        class: class_name.to_string(),
                        method: group.key.display(hierarchy),
                        interfaces,
                        candidates,
                    }));
                }
            }
        }

        if !errors.is_empty() {
            debug!(errors = errors.len(), "class rejected");
            return Err(Arc::new(ClassErrors {
                class: class_name.to_string(),
                errors,
            }));
        }

        bridges.sort_by(|a, b| a.target.sort_key(hierarchy).cmp(&b.target.sort_key(hierarchy)));
        debug!(bridges = bridges.len(), "class synthesized");
        Ok(Arc::new(ClassBridges { bridges }))
    }

    /// Whether the prototype a class inherits already routes `key` to a
    /// method with the delegate's erased shape. A superclass that failed
    /// synthesis contributes no bridges.
    fn inherits_slot(
        &self,
        context: &ClassContext<'_>,
        key: &ErasureKey,
        delegate_key: &ErasureKey,
    ) -> bool {
        for &ancestor in context.superclasses() {
            if context.declared_on(ancestor, key).is_some() {
                return false;
            }
            let inherited = self.cache.get(&ancestor).and_then(|entry| {
                entry
                    .value()
                    .as_ref()
                    .ok()
                    .and_then(|bridges| bridges.find(key).map(|b| b.delegate_key.clone()))
            });
            if let Some(existing) = inherited {
                return &existing == delegate_key;
            }
        }
        false
    }

    fn bridge(
        &self,
        class: TypeId,
        group: &ErasureGroup,
        delegate: MethodId,
        delegate_key: ErasureKey,
    ) -> BridgeMethod {
        let hierarchy = self.hierarchy;
        let target_method = group
            .members
            .iter()
            .copied()
            .find(|&m| hierarchy.method(m).owner != class)
            .unwrap_or(group.members[0]);
        let target_return = hierarchy.method(target_method).erased_return;
        let signature = hierarchy.method(delegate);

        let param_coercions = group
            .key
            .params
            .iter()
            .zip(&delegate_key.params)
            .zip(&signature.generic_params)
            .map(|((&from, &to), generic)| {
                if from == to {
                    Coercion::Identity
                } else if erases_to_bound(generic) || self.is_subtype(from, to) {
                    Coercion::Widen { from, to }
                } else {
                    Coercion::Cast { from, to }
                }
            })
            .collect();

        let from = signature.erased_return;
        let return_coercion = if from == target_return {
            Coercion::Identity
        } else if erases_to_bound(&signature.generic_return)
            && !self.is_subtype(from, target_return)
        {
            Coercion::Cast {
                from,
                to: target_return,
            }
        } else {
            Coercion::Widen {
                from,
                to: target_return,
            }
        };

        BridgeMethod {
            owner: class,
            target: group.key.clone(),
            target_return,
            target_method,
            delegate,
            delegate_key,
            param_coercions,
            return_coercion,
        }
    }

    /// Known widening between two erased types: anything to the root type,
    /// or a declared subtype to its supertype.
    fn is_subtype(&self, from: Atom, to: Atom) -> bool {
        let hierarchy = self.hierarchy;
        if to == hierarchy.root_type() {
            return true;
        }
        match (
            hierarchy.lookup(hierarchy.resolve(from)),
            hierarchy.lookup(hierarchy.resolve(to)),
        ) {
            (Some(from), Some(to)) => hierarchy.is_subtype_of(from, to),
            _ => false,
        }
    }

    fn missing(
        &self,
        context: &ClassContext<'_>,
        group: &ErasureGroup,
        method: MethodId,
    ) -> Option<SynthesisError> {
        let hierarchy = self.hierarchy;
        let node = hierarchy.type_node(context.class());
        let signature = hierarchy.method(method);
        let declared_in = hierarchy.type_node(signature.owner);

        if node.native_backed && declared_in.is_interface() {
            if node.native_protocol.contains(&signature.name) {
                return None;
            }
            return Some(SynthesisError::NativeContractViolation {
                class: hierarchy.type_name(node.id).to_string(),
                method: group.key.display(hierarchy),
                required_by: hierarchy.resolve(declared_in.name).to_string(),
            });
        }

        if !self.options.check_missing_implementations {
            return None;
        }
        Some(SynthesisError::MissingImplementation {
            class: hierarchy.type_name(node.id).to_string(),
            method: group.key.display(hierarchy),
            declared_in: hierarchy.resolve(declared_in.name).to_string(),
        })
    }
}

/// Whether a declared type erases to a type-variable bound. Values typed by
/// the variable are instances of the viewed argument, which is never wider
/// than the bound.
fn erases_to_bound(ty: &TypeRef) -> bool {
    match ty {
        TypeRef::Var(_) => true,
        TypeRef::Array(component) => erases_to_bound(component),
        TypeRef::Named { .. } => false,
    }
}

/// Convenience entry point for a single class.
pub fn synthesize_bridges(hierarchy: &Hierarchy, class: TypeId) -> SynthesisResult {
    BridgeSynthesizer::new(hierarchy).synthesize(class)
}

/// Result of [`BridgeSynthesizer::synthesize_all`], ordered by class name.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Classes that synthesized cleanly, including those needing no bridges.
    pub classes: Vec<(TypeId, Arc<ClassBridges>)>,
    pub errors: Vec<SynthesisError>,
}

impl BatchOutcome {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn bridge_count(&self) -> usize {
        self.classes.iter().map(|(_, b)| b.len()).sum()
    }

    pub fn bridges(&self) -> impl Iterator<Item = &BridgeMethod> {
        self.classes.iter().flat_map(|(_, b)| b.iter())
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.errors.iter().map(SynthesisError::to_diagnostic).collect()
    }
}

#[cfg(test)]
#[path = "tests/synthesizer_tests.rs"]
mod tests;
