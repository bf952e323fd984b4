use super::*;

#[test]
fn test_format_message_substitutes_positional_args() {
    let text = format_message(
        diagnostic_messages::AMBIGUOUS_DEFAULT_METHODS,
        &["C", "get(String)", "'I1', 'I2'"],
    );
    assert_eq!(
        text,
        "Class 'C' inherits unrelated default implementations of 'get(String)' from 'I1', 'I2'; it must override the method."
    );
}

#[test]
fn test_message_template_lookup() {
    assert_eq!(
        get_message_template(diagnostic_codes::MISSING_IMPLEMENTATION),
        Some(diagnostic_messages::MISSING_IMPLEMENTATION)
    );
    assert_eq!(get_message_template(1), None);
}

#[test]
fn test_error_with_related_information() {
    let diag = Diagnostic::error("C", "boom", diagnostic_codes::AMBIGUOUS_DEFAULT_METHODS)
        .with_file("hierarchy.json")
        .with_related("I1", "'I1' provides a default for 'get'.", 0);

    assert_eq!(diag.category, DiagnosticCategory::Error);
    assert_eq!(diag.file, "hierarchy.json");
    assert_eq!(diag.related_information.len(), 1);
    assert_eq!(
        diag.related_information[0].category,
        DiagnosticCategory::Message
    );
}

#[test]
fn test_diagnostic_serializes_to_json() {
    let diag = Diagnostic::error("C", "boom", 9002);
    let json = serde_json::to_value(&diag).unwrap();
    assert_eq!(json["code"], 9002);
    assert_eq!(json["subject"], "C");
    assert_eq!(json["category"], "Error");
}
