//! Domain types shared by every layerctl crate.
//!
//! Function and layer identities are newtypes; environment variables are an
//! ordered `BTreeMap` so that every rendering of a variable set is stable.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed Lambda function name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FunctionName(pub String);

impl fmt::Display for FunctionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for FunctionName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for FunctionName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A layer version ARN as attached to a function.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerArn(pub String);

impl LayerArn {
    /// `true` if the ARN contains the given layer-name fragment.
    pub fn contains(&self, fragment: &str) -> bool {
        self.0.contains(fragment)
    }
}

impl fmt::Display for LayerArn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for LayerArn {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for LayerArn {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Environment variables of a function, ordered by name.
pub type Variables = BTreeMap<String, String>;

// ---------------------------------------------------------------------------
// Function snapshot
// ---------------------------------------------------------------------------

/// Snapshot of one function as returned by the inventory listing.
///
/// Read-only to the reconciler, which only ever computes a *new* layer list
/// and variable map from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionRecord {
    pub name: FunctionName,
    pub arn: String,
    /// `None` for container-image functions, which report no runtime.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    #[serde(default)]
    pub layers: Vec<LayerArn>,
    #[serde(default)]
    pub variables: Variables,
}

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

/// The operation selected for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Attach,
    Detach,
    Enable,
    Disable,
    RefreshVariables,
    BumpVersion,
}

impl OperationKind {
    pub const ALL: [OperationKind; 6] = [
        OperationKind::Attach,
        OperationKind::Detach,
        OperationKind::Enable,
        OperationKind::Disable,
        OperationKind::RefreshVariables,
        OperationKind::BumpVersion,
    ];

    /// Name used in configuration files.
    pub fn config_name(self) -> &'static str {
        match self {
            OperationKind::Attach => "add-layer",
            OperationKind::Detach => "remove-layer",
            OperationKind::Enable => "enable-layer",
            OperationKind::Disable => "disable-layer",
            OperationKind::RefreshVariables => "update-env-variables",
            OperationKind::BumpVersion => "update-version",
        }
    }

    /// Operations that write `layer_arn` into the layer list.
    pub fn requires_layer_arn(self) -> bool {
        matches!(self, OperationKind::Attach | OperationKind::BumpVersion)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Attach => write!(f, "attach"),
            OperationKind::Detach => write!(f, "detach"),
            OperationKind::Enable => write!(f, "enable"),
            OperationKind::Disable => write!(f, "disable"),
            OperationKind::RefreshVariables => write!(f, "refresh-variables"),
            OperationKind::BumpVersion => write!(f, "bump-version"),
        }
    }
}

impl FromStr for OperationKind {
    type Err = String;

    /// Accepts both the configuration names (`add-layer`, ...) and the short
    /// names printed by `Display` (`attach`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OperationKind::ALL
            .into_iter()
            .find(|op| op.config_name() == s || op.to_string() == s)
            .ok_or_else(|| {
                let valid: Vec<_> = OperationKind::ALL.iter().map(|op| op.config_name()).collect();
                format!(
                    "invalid value '{s}' for 'operation'; valid values are [{}]",
                    valid.join(", ")
                )
            })
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// A function-name pattern, matched from the start of the name only.
///
/// `svc-.*` matches `svc-orders`; `svc` also matches `svc-orders` because the
/// end of the name is not anchored.
#[derive(Debug, Clone)]
pub struct FunctionPattern {
    source: String,
    regex: Regex,
}

impl FunctionPattern {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("^(?:{pattern})"))?;
        Ok(Self {
            source: pattern.to_owned(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, name: &FunctionName) -> bool {
        self.regex.is_match(&name.0)
    }
}

impl PartialEq for FunctionPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for FunctionPattern {}

/// Which functions a run applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Exact names.
    Names(BTreeSet<FunctionName>),
    /// Start-anchored name pattern.
    Pattern(FunctionPattern),
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::Names(names) => {
                let names: Vec<_> = names.iter().map(|n| n.0.as_str()).collect();
                write!(f, "names [{}]", names.join(", "))
            }
            Selection::Pattern(p) => write!(f, "pattern '{}'", p.as_str()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
