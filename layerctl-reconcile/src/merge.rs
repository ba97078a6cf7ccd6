//! Variable merge and strip.
//!
//! ## `merge(current, desired)`
//!
//! 1. Start from `current`.
//! 2. Overwrite with every `desired` entry.
//!
//! Nothing is removed: a managed name the run does not supply keeps its
//! current value, and protected names survive until a detach strips them.
//! Unmanaged names are never touched by either function.

use layerctl_core::{VariableCatalog, Variables};

/// Combine a function's variables with the add-on's desired set.
pub fn merge(current: &Variables, desired: &Variables, catalog: &VariableCatalog) -> Variables {
    let mut merged = current.clone();
    for (name, value) in desired {
        merged.insert(name.clone(), value.clone());
    }

    let kept: Variables = current
        .iter()
        .filter(|(name, _)| catalog.is_protected(name) && !desired.contains_key(*name))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    tracing::debug!(
        current = %joined_names(current),
        provided = %joined_names(desired),
        protected_kept = %joined_names(&kept),
        "merged variables"
    );
    merged
}

/// Remove every managed variable, protected or not. Absent names are ignored,
/// so stripping twice equals stripping once.
pub fn strip(current: &Variables, catalog: &VariableCatalog) -> Variables {
    current
        .iter()
        .filter(|(name, _)| !catalog.is_managed(name))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Names only; values may be secret.
fn joined_names(vars: &Variables) -> String {
    vars.keys().map(String::as_str).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use layerctl_core::{catalog, AddonSettings};

    use super::*;

    fn catalog() -> VariableCatalog {
        VariableCatalog::new(&AddonSettings::default(), "123").expect("catalog")
    }

    fn vars(pairs: &[(&str, &str)]) -> Variables {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn desired_wins_and_unmanaged_survive() {
        let current = vars(&[("DATABASE_URL", "pg://"), (catalog::TENANT_NAME, "old")]);
        let desired = vars(&[(catalog::TENANT_NAME, "new")]);
        let merged = merge(&current, &desired, &catalog());
        assert_eq!(merged, vars(&[("DATABASE_URL", "pg://"), (catalog::TENANT_NAME, "new")]));
    }

    #[test]
    fn protected_survive_when_not_supplied() {
        let current = vars(&[
            (catalog::ENVIRONMENT, "prod"),
            (catalog::SITE, "us-west-2"),
            (catalog::DISABLED_FLAG, "true"),
        ]);
        let merged = merge(&current, &Variables::new(), &catalog());
        assert_eq!(merged, current);
    }

    #[test]
    fn unsupplied_managed_values_are_kept() {
        let current = vars(&[
            (catalog::METRIC_ENDPOINT, "https://old"),
            (catalog::TENANT_NAME, "acme"),
            (catalog::PASSWORD, "old"),
            ("KEEP", "1"),
        ]);
        let merged = merge(&current, &vars(&[(catalog::NODE_OPTIONS, "x")]), &catalog());
        assert_eq!(merged.get(catalog::METRIC_ENDPOINT).map(String::as_str), Some("https://old"));
        assert_eq!(merged.get(catalog::TENANT_NAME).map(String::as_str), Some("acme"));
        assert_eq!(merged.get(catalog::PASSWORD).map(String::as_str), Some("old"));
        assert_eq!(merged.get("KEEP").map(String::as_str), Some("1"));
        assert_eq!(merged.get(catalog::NODE_OPTIONS).map(String::as_str), Some("x"));
    }

    #[test]
    fn strip_removes_protected_too() {
        let current = vars(&[
            (catalog::ENVIRONMENT, "prod"),
            (catalog::DISABLED_FLAG, "false"),
            (catalog::NODE_OPTIONS, "x"),
            ("KEEP", "1"),
        ]);
        assert_eq!(strip(&current, &catalog()), vars(&[("KEEP", "1")]));
    }

    #[test]
    fn strip_is_idempotent_and_tolerates_absent_names() {
        let current = vars(&[("KEEP", "1")]);
        let once = strip(&current, &catalog());
        assert_eq!(once, current);
        assert_eq!(strip(&once, &catalog()), once);
    }
}
