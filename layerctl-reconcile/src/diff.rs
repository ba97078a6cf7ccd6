//! Unified diff of a planned update, for `layerctl plan`.
//!
//! The function's configuration is rendered as text before and after the
//! planned change and compared line by line. Secret values are replaced by a
//! short SHA-256 fingerprint so a changed password still shows up as a change.

use sha2::{Digest, Sha256};
use similar::TextDiff;

use layerctl_core::{FunctionRecord, VariableCatalog};

use crate::operation::DesiredState;

/// A single function's planned diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDiff {
    pub function_name: String,
    pub unified_diff: String,
}

/// Diff `record` against the state `desired` would leave it in.
///
/// Returns `None` when the rendered configuration is identical.
pub fn diff_function(
    record: &FunctionRecord,
    desired: &DesiredState,
    catalog: &VariableCatalog,
) -> Option<FunctionDiff> {
    let before = render(
        record.layers.iter().map(|l| l.0.as_str()),
        record.variables.iter(),
        catalog,
    );
    let after = render(
        desired
            .layers
            .as_ref()
            .unwrap_or(&record.layers)
            .iter()
            .map(|l| l.0.as_str()),
        desired.variables.as_ref().unwrap_or(&record.variables).iter(),
        catalog,
    );
    if before == after {
        return None;
    }

    let old_header = format!("a/{}", record.name);
    let new_header = format!("b/{}", record.name);
    let unified = TextDiff::from_lines(&before, &after)
        .unified_diff()
        .header(&old_header, &new_header)
        .context_radius(3)
        .to_string();

    Some(FunctionDiff {
        function_name: record.name.to_string(),
        unified_diff: unified,
    })
}

fn render<'a>(
    layers: impl Iterator<Item = &'a str>,
    variables: impl Iterator<Item = (&'a String, &'a String)>,
    catalog: &VariableCatalog,
) -> String {
    let mut out = String::from("layers:\n");
    for layer in layers {
        out.push_str("  ");
        out.push_str(layer);
        out.push('\n');
    }
    out.push_str("variables:\n");
    for (name, value) in variables {
        let shown = if catalog.is_secret(name) {
            mask(value)
        } else {
            value.clone()
        };
        out.push_str(&format!("  {name}={shown}\n"));
    }
    out
}

/// `sha256:<first 8 hex chars>` of the value.
pub fn mask(value: &str) -> String {
    let mut h = Sha256::new();
    h.update(value.as_bytes());
    let digest = hex::encode(h.finalize());
    format!("sha256:{}", &digest[..8])
}
