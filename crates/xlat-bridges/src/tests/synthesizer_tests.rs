use super::*;
use xlat_hierarchy::{HierarchyBuilder, MethodDecl, TypeDecl};

fn build(decls: Vec<TypeDecl>) -> Hierarchy {
    let mut builder = HierarchyBuilder::new();
    builder.add_types(decls).unwrap();
    builder.freeze().unwrap()
}

fn bridges_of(hierarchy: &Hierarchy, class: &str) -> Vec<String> {
    let synthesizer = BridgeSynthesizer::new(hierarchy);
    synthesizer
        .synthesize(hierarchy.lookup(class).unwrap())
        .unwrap()
        .iter()
        .map(|b| b.display(hierarchy))
        .collect()
}

fn errors_of(hierarchy: &Hierarchy, class: &str) -> Vec<SynthesisError> {
    BridgeSynthesizer::new(hierarchy)
        .synthesize(hierarchy.lookup(class).unwrap())
        .unwrap_err()
        .errors
        .clone()
}

/// `C1<T> { T get(T) }`, `C2 extends C1<String> { String get(String) }`
fn classic() -> Hierarchy {
    build(vec![
        TypeDecl::class("C1")
            .type_params(["T"])
            .method(MethodDecl::new("get", ["T"], "T")),
        TypeDecl::class("C2")
            .extends("C1<String>")
            .method(MethodDecl::new("get", ["String"], "String")),
        TypeDecl::class("C3").extends("C2"),
    ])
}

#[test]
fn test_specialized_override_gets_bridge_with_cast_and_widening() {
    let hierarchy = classic();
    let c2 = hierarchy.lookup("C2").unwrap();
    let result = BridgeSynthesizer::new(&hierarchy).synthesize(c2).unwrap();
    assert_eq!(result.len(), 1);

    let bridge = &result.bridges[0];
    assert_eq!(bridge.display(&hierarchy), "C2.get(Object) -> C2.get(String)");
    assert_eq!(bridge.flags(), xlat_hierarchy::MethodFlags::BRIDGE);

    let object = hierarchy.atom("Object").unwrap();
    let string = hierarchy.atom("String").unwrap();
    assert_eq!(
        bridge.param_coercions.as_slice(),
        [Coercion::Cast {
            from: object,
            to: string
        }]
    );
    assert_eq!(
        bridge.return_coercion,
        Coercion::Widen {
            from: string,
            to: object
        }
    );
    assert_eq!(bridge.target_return, object);
}

#[test]
fn test_bridge_record_is_resolved() {
    let hierarchy = classic();
    let c2 = hierarchy.lookup("C2").unwrap();
    let result = synthesize_bridges(&hierarchy, c2).unwrap();
    let record = result.bridges[0].to_record(&hierarchy);
    assert_eq!(record.owner, "C2");
    assert_eq!(record.name, "get");
    assert_eq!(record.params, ["Object"]);
    assert_eq!(record.returns, "Object");
    assert_eq!(record.bridges, "C1.get(Object)");
    assert_eq!(record.delegate, "C2.get(String)");
    assert_eq!(
        record.coercions,
        ["cast Object -> String", "widen String -> Object"]
    );
}

#[test]
fn test_subclass_reuses_inherited_bridge() {
    let hierarchy = classic();
    assert!(bridges_of(&hierarchy, "C3").is_empty());
    assert!(bridges_of(&hierarchy, "C1").is_empty());
}

#[test]
fn test_subclass_overriding_the_delegate_still_reuses_bridge() {
    let hierarchy = build(vec![
        TypeDecl::class("C1")
            .type_params(["T"])
            .method(MethodDecl::new("get", ["T"], "T")),
        TypeDecl::class("C2")
            .extends("C1<String>")
            .method(MethodDecl::new("get", ["String"], "String")),
        TypeDecl::class("C3")
            .extends("C2")
            .method(MethodDecl::new("get", ["String"], "String")),
    ]);
    assert!(bridges_of(&hierarchy, "C3").is_empty());
}

#[test]
fn test_synthesis_is_idempotent_and_cached() {
    let hierarchy = classic();
    let synthesizer = BridgeSynthesizer::new(&hierarchy);
    let c2 = hierarchy.lookup("C2").unwrap();
    let first = synthesizer.synthesize(c2).unwrap();
    let second = synthesizer.synthesize(c2).unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    let fresh = BridgeSynthesizer::new(&hierarchy).synthesize(c2).unwrap();
    assert_eq!(*first, *fresh);
}

#[test]
fn test_interfaces_get_no_bridges() {
    let hierarchy = build(vec![
        TypeDecl::interface("I1")
            .type_params(["T"])
            .method(MethodDecl::new("get", ["T"], "void")),
        TypeDecl::interface("I2")
            .implements("I1<String>")
            .method(MethodDecl::new("get", ["String"], "void").default_body()),
    ]);
    assert!(bridges_of(&hierarchy, "I2").is_empty());
}

#[test]
fn test_sub_interface_default_is_bridged_on_the_class() {
    let hierarchy = build(vec![
        TypeDecl::interface("I1")
            .type_params(["T"])
            .method(MethodDecl::new("get", ["T"], "void")),
        TypeDecl::interface("I2")
            .implements("I1<String>")
            .method(MethodDecl::new("get", ["String"], "void").default_body()),
        TypeDecl::class("C").implements("I2"),
    ]);
    assert_eq!(bridges_of(&hierarchy, "C"), ["C.get(Object) -> I2.get(String)"]);
}

#[test]
fn test_bridges_are_sorted_by_erased_shape() {
    let hierarchy = build(vec![
        TypeDecl::class("Base")
            .type_params(["K", "V"])
            .method(MethodDecl::new("put", ["K", "V"], "V"))
            .method(MethodDecl::new("get", ["K"], "V")),
        TypeDecl::class("Names")
            .extends("Base<String, Integer>")
            .method(MethodDecl::new("put", ["String", "Integer"], "Integer"))
            .method(MethodDecl::new("get", ["String"], "Integer")),
    ]);
    assert_eq!(
        bridges_of(&hierarchy, "Names"),
        [
            "Names.get(Object) -> Names.get(String)",
            "Names.put(Object, Object) -> Names.put(String, Integer)",
        ]
    );
}

#[test]
fn test_concrete_class_missing_implementation() {
    let hierarchy = build(vec![
        TypeDecl::interface("Task").method(MethodDecl::new("run", Vec::<String>::new(), "void")),
        TypeDecl::class("Job").implements("Task"),
    ]);
    assert_eq!(
        errors_of(&hierarchy, "Job"),
        [SynthesisError::MissingImplementation {
            class: "Job".to_string(),
            method: "run()".to_string(),
            declared_in: "Task".to_string(),
        }]
    );
}

#[test]
fn test_abstract_superclass_method_left_unimplemented() {
    let hierarchy = build(vec![
        TypeDecl::class("Shape")
            .abstract_()
            .method(MethodDecl::new("area", Vec::<String>::new(), "double").abstract_()),
        TypeDecl::class("Square").extends("Shape"),
    ]);
    let errors = errors_of(&hierarchy, "Square");
    assert!(matches!(
        &errors[0],
        SynthesisError::MissingImplementation { declared_in, .. } if declared_in == "Shape"
    ));
}

#[test]
fn test_missing_implementation_check_can_be_disabled() {
    let hierarchy = build(vec![
        TypeDecl::interface("Task").method(MethodDecl::new("run", Vec::<String>::new(), "void")),
        TypeDecl::class("Job").implements("Task"),
    ]);
    let options = SynthesisOptions {
        check_missing_implementations: false,
        ..SynthesisOptions::default()
    };
    let synthesizer = BridgeSynthesizer::with_options(&hierarchy, options);
    assert!(synthesizer.synthesize(hierarchy.lookup("Job").unwrap()).is_ok());
}

#[test]
fn test_native_backed_type_must_expose_interface_methods() {
    let hierarchy = build(vec![
        TypeDecl::interface("CharSequence")
            .method(MethodDecl::new("length", Vec::<String>::new(), "int"))
            .method(MethodDecl::new("chars", Vec::<String>::new(), "IntStream")),
        TypeDecl::class("JsString")
            .native_backed(["length"])
            .implements("CharSequence"),
    ]);
    assert_eq!(
        errors_of(&hierarchy, "JsString"),
        [SynthesisError::NativeContractViolation {
            class: "JsString".to_string(),
            method: "chars()".to_string(),
            required_by: "CharSequence".to_string(),
        }]
    );
}

#[test]
fn test_native_contract_is_checked_even_without_missing_checks() {
    let hierarchy = build(vec![
        TypeDecl::interface("CharSequence")
            .method(MethodDecl::new("chars", Vec::<String>::new(), "IntStream")),
        TypeDecl::class("JsString")
            .native_backed(Vec::<String>::new())
            .implements("CharSequence"),
    ]);
    let options = SynthesisOptions {
        check_missing_implementations: false,
    };
    let synthesizer = BridgeSynthesizer::with_options(&hierarchy, options);
    let errors = synthesizer
        .synthesize(hierarchy.lookup("JsString").unwrap())
        .unwrap_err();
    assert!(matches!(
        errors.errors.as_slice(),
        [SynthesisError::NativeContractViolation { .. }]
    ));
}

#[test]
fn test_native_protocol_satisfies_interface() {
    let hierarchy = build(vec![
        TypeDecl::interface("CharSequence")
            .method(MethodDecl::new("length", Vec::<String>::new(), "int")),
        TypeDecl::class("JsString")
            .native_backed(["length"])
            .implements("CharSequence"),
    ]);
    assert!(bridges_of(&hierarchy, "JsString").is_empty());
}

#[test]
fn test_all_errors_of_a_class_are_collected() {
    let hierarchy = build(vec![
        TypeDecl::interface("Left")
            .method(MethodDecl::new("name", Vec::<String>::new(), "String").default_body())
            .method(MethodDecl::new("run", Vec::<String>::new(), "void")),
        TypeDecl::interface("Right")
            .method(MethodDecl::new("name", Vec::<String>::new(), "String").default_body()),
        TypeDecl::class("C").implements("Left").implements("Right"),
    ]);
    let errors = errors_of(&hierarchy, "C");
    assert_eq!(errors.len(), 2);
    assert!(matches!(errors[0], SynthesisError::DispatchAmbiguity(_)));
    assert!(matches!(errors[1], SynthesisError::MissingImplementation { .. }));
}

#[test]
fn test_synthesize_all_orders_results_and_errors_by_class_name() {
    let hierarchy = build(vec![
        TypeDecl::interface("Left")
            .method(MethodDecl::new("name", Vec::<String>::new(), "String").default_body()),
        TypeDecl::interface("Right")
            .method(MethodDecl::new("name", Vec::<String>::new(), "String").default_body()),
        TypeDecl::class("Zed").implements("Left").implements("Right"),
        TypeDecl::class("Amb").implements("Right").implements("Left"),
        TypeDecl::class("C1")
            .type_params(["T"])
            .method(MethodDecl::new("get", ["T"], "T")),
        TypeDecl::class("C2")
            .extends("C1<String>")
            .method(MethodDecl::new("get", ["String"], "String")),
    ]);
    let outcome = BridgeSynthesizer::new(&hierarchy).synthesize_all();

    let classes: Vec<&str> = outcome
        .classes
        .iter()
        .map(|(id, _)| hierarchy.type_name(*id))
        .collect();
    assert_eq!(classes, ["C1", "C2"]);
    assert_eq!(outcome.bridge_count(), 1);

    let failed: Vec<&str> = outcome.errors.iter().map(|e| e.class()).collect();
    assert_eq!(failed, ["Amb", "Zed"]);
    assert!(outcome.has_errors());

    let diagnostics = outcome.diagnostics();
    assert_eq!(diagnostics[0].code, 9001);
    assert_eq!(diagnostics[0].related_information[0].subject, "Right");
}

#[test]
fn test_parallel_synthesis_matches_sequential() {
    let mut decls = vec![
        TypeDecl::class("Root")
            .type_params(["T"])
            .method(MethodDecl::new("accept", ["T"], "void")),
    ];
    for i in 0..64 {
        decls.push(
            TypeDecl::class(format!("Leaf{i}"))
                .extends("Root<String>")
                .method(MethodDecl::new("accept", ["String"], "void")),
        );
    }
    let hierarchy = build(decls);

    let parallel = BridgeSynthesizer::new(&hierarchy).synthesize_all();
    let sequential = BridgeSynthesizer::new(&hierarchy);
    for (class, bridges) in &parallel.classes {
        assert_eq!(**bridges, *sequential.synthesize(*class).unwrap());
    }
    assert_eq!(parallel.bridge_count(), 64);
}

#[test]
fn test_diamond_seen_under_two_erasures_is_reported_once() {
    // C implements I1, I2<String>; I1.m(String) and I2<T>.m(T) are both defaults
    let hierarchy = build(vec![
        TypeDecl::interface("I1").method(MethodDecl::new("m", ["String"], "void").default_body()),
        TypeDecl::interface("I2")
            .type_params(["T"])
            .method(MethodDecl::new("m", ["T"], "void").default_body()),
        TypeDecl::class("C").implements("I1").implements("I2<String>"),
    ]);
    let errors = errors_of(&hierarchy, "C");
    assert_eq!(errors.len(), 1);
    let SynthesisError::DispatchAmbiguity(err) = &errors[0] else {
        panic!("expected an ambiguity, got {:?}", errors[0]);
    };
    assert_eq!(err.interfaces, ["I1", "I2"]);
}

#[test]
fn test_distinct_methods_from_the_same_interfaces_are_reported_separately() {
    let hierarchy = build(vec![
        TypeDecl::interface("Left")
            .method(MethodDecl::new("name", Vec::<String>::new(), "String").default_body())
            .method(MethodDecl::new("size", Vec::<String>::new(), "int").default_body()),
        TypeDecl::interface("Right")
            .method(MethodDecl::new("name", Vec::<String>::new(), "String").default_body())
            .method(MethodDecl::new("size", Vec::<String>::new(), "int").default_body()),
        TypeDecl::class("C").implements("Left").implements("Right"),
    ]);
    assert_eq!(errors_of(&hierarchy, "C").len(), 2);
}
