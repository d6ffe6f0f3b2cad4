//! Filesystem layer for mcp-env
//!
//! Knows where the config root and its files live, and provides atomic
//! writes so a crashed process never leaves a half-written document behind.

pub mod error;
pub mod io;
pub mod layout;

pub use error::{Error, Result};
pub use io::{read_text, write_atomic, write_text};
pub use layout::{AGE_KEY_ENV, DIR_ENV, LOCAL_CONFIG, Layout, MAIN_CONFIG};
