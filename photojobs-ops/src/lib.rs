//! Side-effecting half of PhotoJobs: expansion, grouping, table and plan
//! writers, copy-and-verify, collaborators, and the workflows built on them.
//!
//! Collaborators that touch the outside world sit behind traits:
//! [`MetadataTagger`] (exiftool), [`Resampler`] (the `image` crate) and
//! [`AmbiguityResolver`] (prompts or configuration).

pub mod ambiguity;
pub mod apply;
pub mod error;
pub mod expand;
pub mod grouping;
pub mod resample;
pub mod summary;
pub mod tables;
pub mod tagger;
pub mod workflow;

pub use ambiguity::{AmbiguityResolver, Preconfigured};
pub use error::OpsError;
pub use expand::{build_rename_mapping, expand, expand_all, RenameMapping};
pub use grouping::{group_and_select, GroupKey};
pub use resample::{ImageResampler, Resampler};
pub use summary::{ItemOutcome, RunSummary};
pub use tagger::{ExifTool, MetadataTagger};
