//! Project synchronization.
//!
//! [`Syncer::plan_updates`] asks a [`CodeProvider`] for the current output of
//! every configured generator, compares it with what is on disk and stages an
//! [`UpdateItem`] for each file whose trimmed text differs.
//! [`apply_updates`] then writes the staged items in order.

mod apply;
mod plan;
mod provider;

pub use apply::{apply_updates, ApplyReport, WriteFailure};
pub use plan::{
    contents_match, read_existing, staged_paths, StatusRecord, SyncEvent, SyncOptions, SyncPlan,
    SyncStatus, Syncer, TargetError, TargetFailure, UnsafeFileName, UpdateItem, VersionPolicy,
};
pub use provider::{CodeProvider, FetchError};
