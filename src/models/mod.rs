//! Service model types.

mod application;
mod generated;
mod organization;
mod version;

pub use application::*;
pub use generated::*;
pub use organization::*;
pub use version::*;
