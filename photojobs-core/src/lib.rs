//! PhotoJobs core library — roster model, name synthesis, table reading, config.
//!
//! Public API surface:
//! - [`types`] — newtypes and record structs
//! - [`sanitize`] / [`naming`] / [`batch`] — pure naming helpers
//! - [`roster`] — CSV tables and header aliasing
//! - [`config`] — YAML job configuration
//! - [`error`] — [`CoreError`]

pub mod batch;
pub mod config;
pub mod error;
pub mod naming;
pub mod roster;
pub mod sanitize;
pub mod types;

pub use batch::classify_batch;
pub use config::{BatchSuffixes, GroupBy, JobConfig};
pub use error::CoreError;
pub use naming::construct_name;
pub use roster::{split_photo_refs, Field, HeaderAliases, Roster, Table};
pub use sanitize::sanitize;
pub use types::{BatchId, Columns, OutputRecord, PersonHint, RosterRecord, Sequence, Variant};
