//! # layerctl-reconcile
//!
//! Selection, merge, and the per-operation state machine, driven over a
//! paginated function inventory.
//!
//! Call [`pipeline::run`] to reconcile every selected function, or
//! [`pipeline::plan`] to compute diffs without writing. The provider is
//! reached only through the traits in [`provider`].

pub mod diff;
pub mod error;
pub mod layers;
pub mod merge;
pub mod operation;
pub mod pages;
pub mod pipeline;
pub mod predicate;
pub mod provider;
pub mod reconciler;
pub mod snapshot;

pub use error::{ProviderError, ReconcileError};
pub use operation::{DesiredState, Plan, SkipReason};
pub use provider::{CallerIdentity, ConfigurationUpdater, FunctionInventory, FunctionPage, UpdateRequest};
pub use reconciler::{FunctionOutcome, FunctionReport, PlannedFunction, Reconciler, RunMode, RunReport};
pub use snapshot::SnapshotInventory;
