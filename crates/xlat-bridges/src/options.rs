use serde::{Deserialize, Serialize};

/// Checks the synthesizer performs besides bridge emission.
///
/// Native-backed types are always checked against their native protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SynthesisOptions {
    /// Report concrete classes left with an abstract slot.
    pub check_missing_implementations: bool,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        SynthesisOptions {
            check_missing_implementations: true,
        }
    }
}
