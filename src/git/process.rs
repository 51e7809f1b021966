use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tracing::debug;

use super::GitRunner;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitService {
    UploadPack,
    ReceivePack,
}

impl GitService {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "git-upload-pack" => Some(Self::UploadPack),
            "git-receive-pack" => Some(Self::ReceivePack),
            _ => None,
        }
    }

    pub fn command_name(&self) -> &'static str {
        match self {
            Self::UploadPack => "git-upload-pack",
            Self::ReceivePack => "git-receive-pack",
        }
    }

    pub fn is_write(&self) -> bool {
        matches!(self, Self::ReceivePack)
    }
}

/// Runs the `git` executable with captured output.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: PathBuf,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new("git")
    }
}

impl GitCli {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command<I, S>(&self, git_dir: Option<&Path>, args: I) -> Command
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new(&self.program);
        if let Some(dir) = git_dir {
            cmd.arg("--git-dir").arg(dir);
        }
        cmd.args(args);
        cmd.env("GIT_TERMINAL_PROMPT", "0");
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd
    }

    fn run(&self, mut cmd: Command) -> Result<Output> {
        let described = describe(&cmd);
        debug!(command = %described, "running git");

        let output = cmd.output().map_err(|e| Error::Git {
            command: described.clone(),
            stderr: e.to_string(),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Git {
                command: described,
                stderr: format!("{} ({})", stderr.trim(), output.status),
            });
        }

        Ok(output)
    }
}

impl GitRunner for GitCli {
    fn is_bare_repository(&self, path: &Path) -> bool {
        if !path.is_dir() {
            return false;
        }
        let cmd = self.command(Some(path), ["rev-parse", "--is-bare-repository"]);
        self.run(cmd).is_ok()
    }

    fn set_origin(&self, repo: &Path, url: &str) -> Result<()> {
        let cmd = self.command(Some(repo), ["remote", "set-url", "origin", url]);
        self.run(cmd).map(drop)
    }

    fn fetch(&self, repo: &Path) -> Result<()> {
        let cmd = self.command(Some(repo), ["fetch"]);
        self.run(cmd).map(drop)
    }

    fn clone_mirror(&self, url: &str, dest: &Path) -> Result<()> {
        let mut cmd = self.command(None, ["clone", "--mirror", url]);
        cmd.arg(dest);
        self.run(cmd).map(drop)
    }
}

fn describe(cmd: &Command) -> String {
    std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(|s| s.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Replaces the current process with the service program serving
/// `repo_path`. Standard streams and the environment are inherited.
///
/// Only returns if the program could not be executed.
#[cfg(unix)]
pub fn exec_service(service: GitService, repo_path: &Path) -> Error {
    use std::os::unix::process::CommandExt;

    let err = Command::new(service.command_name()).arg(repo_path).exec();
    Error::Git {
        command: format!("{} {}", service.command_name(), repo_path.display()),
        stderr: err.to_string(),
    }
}

#[cfg(not(unix))]
pub fn exec_service(service: GitService, repo_path: &Path) -> Error {
    Error::Git {
        command: format!("{} {}", service.command_name(), repo_path.display()),
        stderr: "process replacement is only supported on unix".into(),
    }
}

/// Repository name of a project, relative to the mirror root and to the
/// remote's SSH endpoint. Carries exactly one `.git` suffix.
#[must_use]
pub fn mirror_name(project_path: &str) -> String {
    let path = project_path.trim_start_matches('/');
    if path.ends_with(".git") {
        path.to_string()
    } else {
        format!("{path}.git")
    }
}

/// Location of the mirror for `project_path` under `root`.
#[must_use]
pub fn repo_path(root: &Path, project_path: &str) -> PathBuf {
    root.join(mirror_name(project_path))
}
