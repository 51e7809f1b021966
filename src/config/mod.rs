mod mirror;

pub use mirror::{DEFAULT_CONFIG_FILE, MirrorConfig, expand_env};
