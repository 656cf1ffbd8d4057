//! Trait definitions for specgen service operations.
//!
//! Each model type implements the operations its endpoints support.

mod get;
mod list;
mod upload;

pub use get::Get;
pub use list::{List, DEFAULT_PAGE_SIZE};
pub use upload::Upload;
