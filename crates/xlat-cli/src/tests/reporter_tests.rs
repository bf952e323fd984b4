use crate::driver::ClassReport;
use crate::reporter::Reporter;
use xlat_bridges::BridgeRecord;
use xlat_common::{Diagnostic, diagnostic_codes};

fn record() -> BridgeRecord {
    BridgeRecord {
        owner: "C2".to_string(),
        name: "get".to_string(),
        params: vec!["Object".to_string()],
        returns: "String".to_string(),
        bridges: "C1.get(Object)".to_string(),
        delegate: "C2.get(String)".to_string(),
        coercions: vec!["cast Object -> String".to_string()],
    }
}

#[test]
fn formats_diagnostic_with_file_subject_and_code() {
    let reporter = Reporter::new(false);
    let diagnostic = Diagnostic::error(
        "C",
        "Class 'C' inherits unrelated defaults",
        diagnostic_codes::AMBIGUOUS_DEFAULT_METHODS,
    )
    .with_file("in.json")
    .with_related(
        "I1",
        "'I1' provides a default for 'm()'.",
        diagnostic_codes::CONFLICTING_METHOD_CANDIDATE,
    );

    assert_eq!(
        reporter.format_diagnostic(&diagnostic),
        "in.json: C - error XL9001: Class 'C' inherits unrelated defaults\n  Related: I1 - 'I1' provides a default for 'm()'."
    );
}

#[test]
fn diagnostics_without_file_or_subject() {
    let reporter = Reporter::new(false);
    let diagnostic = Diagnostic::error("", "Invalid class hierarchy: x", 9000);
    assert_eq!(
        reporter.render(&[diagnostic]),
        "<input> - error XL9000: Invalid class hierarchy: x\n"
    );
}

#[test]
fn renders_bridges_grouped_by_class() {
    let reporter = Reporter::new(false);
    let classes = vec![
        ClassReport {
            class: "C1".to_string(),
            bridges: Vec::new(),
        },
        ClassReport {
            class: "C2".to_string(),
            bridges: vec![record()],
        },
    ];

    assert_eq!(
        reporter.render_bridges(&classes),
        "C2\n  get(Object): String -> C2.get(String) [cast Object -> String]\n1 bridge(s) in 1 of 2 class(es)\n"
    );
}

#[test]
fn identity_bridges_print_without_coercions() {
    let reporter = Reporter::new(false);
    let mut bridge = record();
    bridge.coercions.clear();
    let classes = vec![ClassReport {
        class: "C2".to_string(),
        bridges: vec![bridge],
    }];
    let text = reporter.render_bridges(&classes);
    assert!(text.contains("  get(Object): String -> C2.get(String)\n"));
}
