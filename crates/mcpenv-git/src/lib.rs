//! Git synchronization for the shared config directory.

mod error;
mod repo;

pub use error::{Error, Result};
pub use repo::ConfigRepo;
