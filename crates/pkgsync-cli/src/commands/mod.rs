//! Command implementations for pkgsync-cli

pub mod init;
pub mod status;
pub mod sync;
pub mod watch;

pub use init::run_init;
pub use status::run_status;
pub use sync::{run_pull, run_push};
pub use watch::run_watch;
