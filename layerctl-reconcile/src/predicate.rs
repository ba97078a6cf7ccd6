//! Function selection.

use layerctl_core::{FunctionRecord, Selection};

/// `true` if the function's runtime is on the allow-list.
///
/// Functions without a runtime (container images) are never supported.
pub fn is_supported_runtime(record: &FunctionRecord, runtimes: &[String]) -> bool {
    record
        .runtime
        .as_deref()
        .is_some_and(|rt| runtimes.iter().any(|allowed| allowed == rt))
}

/// `true` if the function is selected: exact membership for a name set,
/// start-anchored match for a pattern.
pub fn matches(record: &FunctionRecord, selection: &Selection) -> bool {
    match selection {
        Selection::Names(names) => names.contains(&record.name),
        Selection::Pattern(pattern) => pattern.is_match(&record.name),
    }
}
