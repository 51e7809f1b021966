mod process;
#[cfg(test)]
pub(crate) mod testing;

pub use process::{GitCli, GitService, exec_service, mirror_name, repo_path};

use std::path::Path;

use crate::error::Result;

/// GitRunner performs the repository operations mirroring and serving need.
pub trait GitRunner {
    /// Returns true if `path` is a directory git accepts as a bare repository.
    fn is_bare_repository(&self, path: &Path) -> bool;

    fn set_origin(&self, repo: &Path, url: &str) -> Result<()>;

    fn fetch(&self, repo: &Path) -> Result<()>;

    /// Mirror-clones `url` into `dest`, which must not exist.
    fn clone_mirror(&self, url: &str, dest: &Path) -> Result<()>;
}
