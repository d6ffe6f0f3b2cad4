//! Command implementations for mcpenv-cli

pub mod apply;
pub mod doctor;
pub mod init;
pub mod secret;
pub mod sync;

pub use apply::run_apply;
pub use doctor::run_doctor;
pub use init::run_init;
pub use secret::{run_secret_edit, run_secret_list, run_secret_set};
pub use sync::{run_pull, run_push, run_sync};
