use anyhow::{Context, Result, bail};
use rustc_hash::FxHashSet;
use serde::Serialize;
use tracing::{debug, info_span};
use xlat_bridges::{BatchOutcome, BridgeRecord, BridgeSynthesizer};
use xlat_common::{Diagnostic, diagnostic_codes, diagnostic_messages, format_message};
use xlat_hierarchy::{Hierarchy, HierarchyBuilder, HierarchyError, TypeDecl, TypeId};

use crate::args::CliArgs;
use crate::config::{InputDocument, ResolvedOptions, load_document, resolve_options};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_INVALID_HIERARCHY: i32 = 1;
pub const EXIT_DIAGNOSTICS: i32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassReport {
    pub class: String,
    pub bridges: Vec<BridgeRecord>,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisReport {
    pub classes: Vec<ClassReport>,
    pub diagnostics: Vec<Diagnostic>,
}

impl SynthesisReport {
    fn invalid(error: &HierarchyError, file: &str) -> Self {
        let message = format_message(
            diagnostic_messages::INVALID_HIERARCHY,
            &[error.to_string().as_str()],
        );
        SynthesisReport {
            classes: Vec::new(),
            diagnostics: vec![
                Diagnostic::error("", message, diagnostic_codes::INVALID_HIERARCHY)
                    .with_file(file),
            ],
        }
    }

    fn from_outcome(hierarchy: &Hierarchy, outcome: &BatchOutcome, file: &str) -> Self {
        let classes = outcome
            .classes
            .iter()
            .map(|(class, bridges)| ClassReport {
                class: hierarchy.type_name(*class).to_string(),
                bridges: bridges.iter().map(|b| b.to_record(hierarchy)).collect(),
            })
            .collect();
        let diagnostics = outcome
            .diagnostics()
            .into_iter()
            .map(|d| d.with_file(file))
            .collect();
        SynthesisReport {
            classes,
            diagnostics,
        }
    }

    pub fn bridge_count(&self) -> usize {
        self.classes.iter().map(|c| c.bridges.len()).sum()
    }

    pub fn exit_code(&self) -> i32 {
        if self
            .diagnostics
            .iter()
            .any(|d| d.code == diagnostic_codes::INVALID_HIERARCHY)
        {
            EXIT_INVALID_HIERARCHY
        } else if self.diagnostics.is_empty() {
            EXIT_SUCCESS
        } else {
            EXIT_DIAGNOSTICS
        }
    }
}

pub fn run(args: &CliArgs) -> Result<SynthesisReport> {
    let document = load_document(&args.input)?;
    let options = resolve_options(args, &document.options);
    let file = args.input.display().to_string();
    synthesize_document(document, &options, &args.classes, args.jobs, &file)
}

/// Freeze the document's hierarchy and synthesize bridges for the selected
/// classes (all classes when `classes` is empty). An invalid hierarchy is
/// reported as a diagnostic; unknown class names and worker start-up
/// failures are errors.
pub fn synthesize_document(
    document: InputDocument,
    options: &ResolvedOptions,
    classes: &[String],
    jobs: Option<usize>,
    file: &str,
) -> Result<SynthesisReport> {
    let _span = info_span!("synthesize_document", file, types = document.types.len()).entered();

    let hierarchy = match build_hierarchy(document.types, &options.root_type) {
        Ok(hierarchy) => hierarchy,
        Err(err) => {
            debug!(error = %err, "hierarchy rejected");
            return Ok(SynthesisReport::invalid(&err, file));
        }
    };
    let selected = select_classes(&hierarchy, classes)?;
    let synthesizer = BridgeSynthesizer::with_options(&hierarchy, options.synthesis);

    let outcome = match jobs {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .context("failed to start synthesis workers")?;
            pool.install(|| synthesizer.synthesize_classes(&selected))
        }
        None => synthesizer.synthesize_classes(&selected),
    };

    Ok(SynthesisReport::from_outcome(&hierarchy, &outcome, file))
}

fn build_hierarchy(types: Vec<TypeDecl>, root_type: &str) -> Result<Hierarchy, HierarchyError> {
    let mut builder = HierarchyBuilder::new().with_root_type(root_type);
    builder.add_types(types)?;
    builder.freeze()
}

fn select_classes(hierarchy: &Hierarchy, names: &[String]) -> Result<Vec<TypeId>> {
    if names.is_empty() {
        return Ok(hierarchy.classes().map(|c| c.id).collect());
    }
    let mut seen = FxHashSet::default();
    let mut selected = Vec::with_capacity(names.len());
    for name in names {
        let Some(id) = hierarchy.lookup(name) else {
            bail!("unknown class '{name}'");
        };
        if !hierarchy.type_node(id).is_class() {
            bail!("'{name}' is an interface, not a class");
        }
        if seen.insert(id) {
            selected.push(id);
        }
    }
    Ok(selected)
}
