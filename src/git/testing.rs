use std::cell::RefCell;
use std::fs;
use std::path::Path;

use super::GitRunner;
use crate::error::{Error, Result};

/// Treats a directory containing a `HEAD` file as a bare repository and
/// records every mutating call.
#[derive(Default)]
pub struct FakeGit {
    pub calls: RefCell<Vec<String>>,
    pub fail_fetch: bool,
}

impl FakeGit {
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Creates what the fake recognises as a bare repository.
    pub fn init_bare(path: &Path) {
        fs::create_dir_all(path).unwrap();
        fs::write(path.join("HEAD"), "ref: refs/heads/main\n").unwrap();
    }
}

impl GitRunner for FakeGit {
    fn is_bare_repository(&self, path: &Path) -> bool {
        path.is_dir() && path.join("HEAD").is_file()
    }

    fn set_origin(&self, repo: &Path, url: &str) -> Result<()> {
        self.calls
            .borrow_mut()
            .push(format!("set-url {} {url}", repo.display()));
        Ok(())
    }

    fn fetch(&self, repo: &Path) -> Result<()> {
        self.calls
            .borrow_mut()
            .push(format!("fetch {}", repo.display()));
        if self.fail_fetch {
            return Err(Error::Git {
                command: "git fetch".into(),
                stderr: "connection refused".into(),
            });
        }
        Ok(())
    }

    fn clone_mirror(&self, url: &str, dest: &Path) -> Result<()> {
        self.calls
            .borrow_mut()
            .push(format!("clone {url} {}", dest.display()));
        Self::init_bare(dest);
        Ok(())
    }
}
