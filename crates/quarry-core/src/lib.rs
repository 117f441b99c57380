//! Quarry core: distributed batch reads over relational databases.
//!
//! The reusable machinery every dialect connector composes:
//!
//! - [`template`] rewrites a user import query containing the
//!   `$CONDITIONS` placeholder into probe and per-split queries.
//! - [`planner`] partitions a `[min, max]` key range into parallel scan
//!   sub-ranges.
//! - [`reconcile`] validates a user-declared schema against the schema
//!   discovered from a live query.
//! - [`classify`] maps driver errors into the {user, system, unknown}
//!   taxonomy, with per-dialect rule tables.
//! - [`source`] orchestrates the above into a run descriptor handed to
//!   the execution collaborator.
//!
//! Dialect connectors plug in through the [`row_source`] seam and are
//! otherwise thin: a connection config, a type registry, and a
//! [`classify::Dialect`] choice.

pub mod classify;
pub mod collab;
pub mod config;
pub mod planner;
pub mod reconcile;
pub mod row_source;
pub mod source;
pub mod template;

pub use classify::{Classifier, Dialect};
pub use collab::{
    CollectedFailures, ExecutionSink, FailureCollector, LineageRecorder, RunDescriptor,
    SplitAssignment,
};
pub use config::{ConfigField, SourceConfig};
pub use planner::{SplitPlan, SplitRange};
pub use row_source::{AcquireError, RowSource, RowSourceFactory};
pub use source::ConnectorSource;
