mod commands;
mod serve;
mod sync;

pub use commands::Commands;
pub use serve::run_serve;
pub use sync::{run_sync, run_sync_keys, run_sync_repos};
