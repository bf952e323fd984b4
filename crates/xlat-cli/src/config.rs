use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use xlat_bridges::SynthesisOptions;
use xlat_common::limits::DEFAULT_ROOT_TYPE;
use xlat_hierarchy::TypeDecl;

use crate::args::CliArgs;

/// The JSON document the driver reads.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDocument {
    #[serde(default)]
    pub options: DocumentOptions,
    #[serde(default)]
    pub types: Vec<TypeDecl>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentOptions {
    #[serde(default)]
    pub root_type: Option<String>,
    #[serde(flatten)]
    pub synthesis: SynthesisOptions,
}

/// Options after applying command-line overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOptions {
    pub root_type: String,
    pub synthesis: SynthesisOptions,
}

pub fn load_document(path: &Path) -> Result<InputDocument> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_document(&source).with_context(|| format!("failed to parse {}", path.display()))
}

pub fn parse_document(source: &str) -> Result<InputDocument> {
    let document = serde_json::from_str(source)?;
    Ok(document)
}

pub fn resolve_options(args: &CliArgs, options: &DocumentOptions) -> ResolvedOptions {
    let root_type = args
        .root_type
        .clone()
        .or_else(|| options.root_type.clone())
        .unwrap_or_else(|| DEFAULT_ROOT_TYPE.to_string());

    let mut synthesis = options.synthesis;
    if args.no_check_missing {
        synthesis.check_missing_implementations = false;
    }

    ResolvedOptions {
        root_type,
        synthesis,
    }
}
