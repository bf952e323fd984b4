use colored::Colorize;
use xlat_common::{Diagnostic, DiagnosticCategory, DiagnosticRelatedInformation};

use crate::driver::ClassReport;

pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    pub fn render(&self, diagnostics: &[Diagnostic]) -> String {
        let mut out = String::new();
        for diagnostic in diagnostics {
            out.push_str(&self.format_diagnostic(diagnostic));
            out.push('\n');
        }
        out
    }

    pub fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let mut output = String::new();
        if diagnostic.file.is_empty() {
            output.push_str("<input>");
        } else {
            output.push_str(&diagnostic.file);
        }
        if !diagnostic.subject.is_empty() {
            output.push_str(": ");
            output.push_str(&self.format_subject(&diagnostic.subject));
        }

        output.push_str(" - ");
        output.push_str(&self.format_category(diagnostic.category));
        let code = self.format_code(diagnostic.code);
        if !code.is_empty() {
            output.push(' ');
            output.push_str(&code);
        }
        output.push_str(": ");
        output.push_str(&diagnostic.message_text);

        for related in &diagnostic.related_information {
            output.push('\n');
            output.push_str(&self.format_related(related));
        }
        output
    }

    /// One block per class that received bridges, then a summary line.
    pub fn render_bridges(&self, classes: &[ClassReport]) -> String {
        let mut out = String::new();
        let mut total = 0;
        let mut bridged_classes = 0;
        for report in classes.iter().filter(|c| !c.bridges.is_empty()) {
            bridged_classes += 1;
            out.push_str(&self.format_subject(&report.class));
            out.push('\n');
            for bridge in &report.bridges {
                total += 1;
                out.push_str(&format!(
                    "  {}({}): {} -> {}",
                    bridge.name,
                    bridge.params.join(", "),
                    bridge.returns,
                    bridge.delegate
                ));
                if !bridge.coercions.is_empty() {
                    let coercions = format!("[{}]", bridge.coercions.join(", "));
                    out.push(' ');
                    if self.color {
                        out.push_str(&coercions.dimmed().to_string());
                    } else {
                        out.push_str(&coercions);
                    }
                }
                out.push('\n');
            }
        }
        out.push_str(&format!(
            "{total} bridge(s) in {bridged_classes} of {} class(es)\n",
            classes.len()
        ));
        out
    }

    fn format_subject(&self, subject: &str) -> String {
        if self.color {
            subject.bold().to_string()
        } else {
            subject.to_string()
        }
    }

    fn format_related(&self, related: &DiagnosticRelatedInformation) -> String {
        let prefix = if self.color {
            "  Related".dimmed().to_string()
        } else {
            "  Related".to_string()
        };
        format!("{}: {} - {}", prefix, related.subject, related.message_text)
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let label = match category {
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Suggestion => "suggestion",
            DiagnosticCategory::Message => "message",
        };

        if !self.color {
            return label.to_string();
        }

        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            DiagnosticCategory::Warning => label.yellow().bold().to_string(),
            DiagnosticCategory::Suggestion => label.blue().bold().to_string(),
            DiagnosticCategory::Message => label.cyan().bold().to_string(),
        }
    }

    fn format_code(&self, code: u32) -> String {
        if code == 0 {
            return String::new();
        }

        let label = format!("XL{code}");
        if self.color {
            label.bright_blue().to_string()
        } else {
            label
        }
    }
}
