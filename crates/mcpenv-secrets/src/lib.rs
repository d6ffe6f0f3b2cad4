//! SOPS/age-backed secret store for mcp-env
//!
//! Implements the core's `SecretSource` contract by shelling out to the
//! `sops` binary with an age identity. Encryption never happens in-process.

pub mod age;
pub mod error;
pub mod store;
pub mod tools;

pub use age::{generate_key, public_key};
pub use error::{Error, Result};
pub use store::SopsStore;
pub use tools::{ToolStatus, check_binaries, install_hint};
