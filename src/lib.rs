//! # Mirrorgate
//!
//! Serves read-only mirrors of GitLab projects over SSH without handing out
//! shells.
//!
//! - [`keys`] writes an `authorized_keys` file that locks every user key to
//!   `mirrorgate serve <user-id>`.
//! - [`mirror`] clones or fetches the projects matching the configured path
//!   prefixes into a tree of bare mirrors.
//! - [`gateway`] checks the command an SSH client attempted against the
//!   remote's visibility and membership data, then execs `git-upload-pack`.
//!
//! ## Feature Flags
//!
//! - `cli` (default): Includes CLI module. Disable with `default-features = false`.

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod git;
pub mod keys;
pub mod mirror;
pub mod remote;
pub mod types;
