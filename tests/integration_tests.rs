//! End-to-end tests: hierarchy in, bridges out, calls resolved through the
//! resulting prototype chain, and identity dispatch over installed classes.

use rayon::prelude::*;
use std::sync::Arc;
use xlat::bridges::{BridgeSynthesizer, SynthesisError};
use xlat::hierarchy::{Hierarchy, HierarchyBuilder, MethodDecl, TypeDecl};
use xlat::runtime::{
    ClassDescriptor, InternedClassRegistry, RuntimeContext, RuntimeError, TranslatedObject, Value,
    identity_equals, identity_get_class, identity_hash_code, identity_to_string,
};
use xlat::{erasure_key, install_classes, resolve_call};

fn build(decls: Vec<TypeDecl>) -> Hierarchy {
    let mut builder = HierarchyBuilder::new();
    builder.add_types(decls).unwrap();
    builder.freeze().unwrap()
}

/// Display of the method a call `name(params)` on `receiver` lands on.
fn call(hierarchy: &Hierarchy, receiver: &str, name: &str, params: &[&str]) -> Option<String> {
    let synthesizer = BridgeSynthesizer::new(hierarchy);
    let key = erasure_key(hierarchy, name, params).unwrap();
    resolve_call(&synthesizer, hierarchy.lookup(receiver).unwrap(), &key)
        .map(|m| hierarchy.method_display(m))
}

fn bridge_displays(hierarchy: &Hierarchy, class: &str) -> Vec<String> {
    BridgeSynthesizer::new(hierarchy)
        .synthesize(hierarchy.lookup(class).unwrap())
        .unwrap()
        .iter()
        .map(|b| b.display(hierarchy))
        .collect()
}

#[test]
fn test_own_declarations_cover_both_erasures() {
    // C2 extends raw C1<T> implements I1 and overrides get(Object) and get(String).
    let hierarchy = build(vec![
        TypeDecl::class("C1")
            .type_params(["T"])
            .method(MethodDecl::new("get", ["T"], "String")),
        TypeDecl::interface("I1").method(MethodDecl::new("get", ["String"], "String").default_body()),
        TypeDecl::class("C2")
            .extends("C1")
            .implements("I1")
            .method(MethodDecl::new("get", ["Object"], "String"))
            .method(MethodDecl::new("get", ["String"], "String")),
    ]);

    assert!(bridge_displays(&hierarchy, "C2").is_empty());
    assert_eq!(
        call(&hierarchy, "C2", "get", &["Object"]).as_deref(),
        Some("C2.get(Object)")
    );
    assert_eq!(
        call(&hierarchy, "C2", "get", &["String"]).as_deref(),
        Some("C2.get(String)")
    );
}

#[test]
fn test_distinct_erasures_are_not_unified() {
    // C1 is abstract with abstract get(Object); I1 has a default get(String);
    // C2 overrides only get(Object).
    let hierarchy = build(vec![
        TypeDecl::class("C1")
            .abstract_()
            .method(MethodDecl::new("get", ["Object"], "String").abstract_()),
        TypeDecl::interface("I1").method(MethodDecl::new("get", ["String"], "String").default_body()),
        TypeDecl::class("C2")
            .extends("C1")
            .implements("I1")
            .method(MethodDecl::new("get", ["Object"], "String")),
    ]);

    assert!(bridge_displays(&hierarchy, "C2").is_empty());
    assert_eq!(
        call(&hierarchy, "C2", "get", &["Object"]).as_deref(),
        Some("C2.get(Object)")
    );
    assert_eq!(
        call(&hierarchy, "C2", "get", &["String"]).as_deref(),
        Some("I1.get(String)")
    );
}

#[test]
fn test_generic_override_is_reached_through_the_erased_slot() {
    let hierarchy = build(vec![
        TypeDecl::class("C1")
            .type_params(["T"])
            .method(MethodDecl::new("get", ["T"], "String")),
        TypeDecl::class("C2")
            .extends("C1<String>")
            .method(MethodDecl::new("get", ["String"], "String")),
    ]);

    assert_eq!(
        bridge_displays(&hierarchy, "C2"),
        ["C2.get(Object) -> C2.get(String)"]
    );
    assert_eq!(
        call(&hierarchy, "C2", "get", &["Object"]).as_deref(),
        Some("C2.get(String)")
    );
    assert_eq!(
        call(&hierarchy, "C1", "get", &["Object"]).as_deref(),
        Some("C1.get(Object)")
    );
}

#[test]
fn test_interface_call_is_routed_to_inherited_generic_method() {
    let hierarchy = build(vec![
        TypeDecl::interface("I1").method(MethodDecl::new("get", ["String"], "String").default_body()),
        TypeDecl::class("C1")
            .type_params(["T"])
            .method(MethodDecl::new("get", ["T"], "String")),
        TypeDecl::class("C2").extends("C1<String>").implements("I1"),
        TypeDecl::class("C3").extends("C2"),
    ]);

    assert_eq!(
        bridge_displays(&hierarchy, "C2"),
        ["C2.get(String) -> C1.get(Object)"]
    );
    // The bridge lives on C2's prototype; C3 inherits it.
    assert!(bridge_displays(&hierarchy, "C3").is_empty());
    assert_eq!(
        call(&hierarchy, "C3", "get", &["String"]).as_deref(),
        Some("C1.get(Object)")
    );
}

#[test]
fn test_bridge_dispatches_virtually_to_subclass_override() {
    let hierarchy = build(vec![
        TypeDecl::class("C1")
            .type_params(["T"])
            .method(MethodDecl::new("get", ["T"], "String")),
        TypeDecl::class("C2")
            .extends("C1<String>")
            .method(MethodDecl::new("get", ["String"], "String")),
        TypeDecl::class("C3")
            .extends("C2")
            .method(MethodDecl::new("get", ["String"], "String")),
    ]);

    assert!(bridge_displays(&hierarchy, "C3").is_empty());
    assert_eq!(
        call(&hierarchy, "C3", "get", &["Object"]).as_deref(),
        Some("C3.get(String)")
    );
}

#[test]
fn test_unrelated_defaults_fail_the_class_only() {
    let hierarchy = build(vec![
        TypeDecl::interface("I1").method(MethodDecl::new("m", Vec::<String>::new(), "void").default_body()),
        TypeDecl::interface("I2").method(MethodDecl::new("m", Vec::<String>::new(), "void").default_body()),
        TypeDecl::class("Broken").implements("I1").implements("I2"),
        TypeDecl::class("Fine").implements("I1"),
    ]);

    let outcome = BridgeSynthesizer::new(&hierarchy).synthesize_all();
    assert_eq!(outcome.errors.len(), 1);
    let SynthesisError::DispatchAmbiguity(err) = &outcome.errors[0] else {
        panic!("expected an ambiguity, got {:?}", outcome.errors[0]);
    };
    assert_eq!(err.class, "Broken");
    assert_eq!(err.interfaces, ["I1", "I2"]);

    let names: Vec<&str> = outcome
        .classes
        .iter()
        .map(|(id, _)| hierarchy.type_name(*id))
        .collect();
    assert_eq!(names, ["Fine"]);
    assert_eq!(call(&hierarchy, "Fine", "m", &[]).as_deref(), Some("I1.m()"));
}

#[test]
fn test_parallel_synthesis_shares_cached_results() {
    let mut decls = vec![TypeDecl::class("Base")
        .type_params(["T"])
        .method(MethodDecl::new("get", ["T"], "T"))];
    for i in 0..32 {
        decls.push(
            TypeDecl::class(format!("Leaf{i}"))
                .extends("Base<String>")
                .method(MethodDecl::new("get", ["String"], "String")),
        );
    }
    let hierarchy = build(decls);
    let synthesizer = BridgeSynthesizer::new(&hierarchy);
    let classes: Vec<_> = hierarchy.classes().map(|c| c.id).collect();

    let first: Vec<_> = classes
        .par_iter()
        .map(|&c| synthesizer.synthesize(c).unwrap())
        .collect();
    let second: Vec<_> = classes
        .par_iter()
        .map(|&c| synthesizer.synthesize(c).unwrap())
        .collect();

    for (a, b) in first.iter().zip(&second) {
        assert!(Arc::ptr_eq(a, b));
    }
    assert_eq!(first.iter().map(|b| b.len()).sum::<usize>(), 32);
}

#[derive(Debug)]
struct Instance {
    class: ClassDescriptor,
    x: i32,
}

impl TranslatedObject for Instance {
    fn class(&self) -> ClassDescriptor {
        self.class
    }

    fn equals(&self, other: &Value) -> bool {
        match other {
            Value::Object(other) => other.class() == self.class && other.hash_code() == self.x,
            _ => false,
        }
    }

    fn hash_code(&self) -> i32 {
        self.x
    }

    fn stringify(&self) -> String {
        format!("Instance({})", self.x)
    }
}

fn runtime_hierarchy() -> Hierarchy {
    build(vec![
        TypeDecl::class("Point")
            .method(MethodDecl::new("equals", ["Object"], "boolean"))
            .method(MethodDecl::new("hashCode", Vec::<String>::new(), "int")),
        TypeDecl::class("Point3").extends("Point"),
        TypeDecl::class("Plain"),
        TypeDecl::interface("Shape"),
    ])
}

#[test]
fn test_installed_classes_drive_identity_dispatch() {
    let hierarchy = runtime_hierarchy();
    let registry = Arc::new(InternedClassRegistry::new());
    let installed = install_classes(&hierarchy, &registry);
    assert_eq!(installed.len(), 4);
    let cx = RuntimeContext::new(registry.clone());

    let point3 = installed[&hierarchy.lookup("Point3").unwrap()];
    let plain = installed[&hierarchy.lookup("Plain").unwrap()];

    let a = Value::object(Instance { class: point3, x: 7 });
    let b = Value::object(Instance { class: point3, x: 7 });
    assert!(identity_equals(&cx, &a, &b));
    assert_eq!(identity_hash_code(&cx, &a), 7);

    let p = Value::object(Instance { class: plain, x: 7 });
    let q = Value::object(Instance { class: plain, x: 7 });
    assert!(!identity_equals(&cx, &p, &q));
    assert!(identity_equals(&cx, &p, &p.clone()));
    let hash = identity_hash_code(&cx, &p);
    assert_eq!(identity_hash_code(&cx, &p), hash);
    assert_ne!(identity_hash_code(&cx, &q), hash);

    assert_eq!(identity_to_string(&cx, &p), "Instance(7)");
    let class = identity_get_class(&cx, &a).unwrap();
    assert_eq!(registry.name(class).as_deref(), Some("Point3"));
}

#[test]
fn test_reinstalling_is_stable() {
    let hierarchy = runtime_hierarchy();
    let registry = InternedClassRegistry::new();
    let first = install_classes(&hierarchy, &registry);
    let second = install_classes(&hierarchy, &registry);
    assert_eq!(first, second);
}

#[test]
fn test_native_values_classify_without_translated_classes() {
    let cx = RuntimeContext::default();

    let class = identity_get_class(&cx, &Value::Number(3.0)).unwrap();
    let name = identity_get_class(&cx, &Value::string("s")).unwrap();
    assert_ne!(class, name);
    assert_eq!(identity_to_string(&cx, &Value::Number(3.0)), "3");
    assert!(identity_equals(&cx, &Value::Number(f64::NAN), &Value::Number(f64::NAN)));
    assert_eq!(identity_hash_code(&cx, &Value::string("hello")), 99_162_322);

    assert_eq!(
        identity_get_class(&cx, &Value::Null),
        Err(RuntimeError::NullReference { value: "null" })
    );
}
