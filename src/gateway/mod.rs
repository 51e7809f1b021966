//! Arbitrates one restricted SSH session.
//!
//! The SSH daemon runs `serve <user-id>` as the forced command of the key the
//! client authenticated with, so the user id is trusted as given. The command
//! the client asked for is checked against the remote service before the
//! transfer program takes over the session.

mod path;
pub mod shellwords;

pub use path::sanitize_project_path;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::error::{Error as CrateError, Result};
use crate::git::{GitRunner, GitService, exec_service, repo_path};
use crate::remote::RemoteDirectory;
use crate::types::Visibility;

/// Environment variable holding the command the client attempted to run.
pub const ORIGINAL_COMMAND_VAR: &str = "SSH_ORIGINAL_COMMAND";

/// Exit status for every denial.
pub const DENIED_EXIT_CODE: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Denial {
    #[error("user not active")]
    UserNotActive,

    #[error("interactive mode not supported")]
    Interactive,

    #[error("malformed command")]
    MalformedCommand,

    #[error("command not supported")]
    UnsupportedCommand,

    #[error("no repo specified")]
    NoRepository,

    #[error("Repository does not exist, please check the path.")]
    RepositoryMissing,

    #[error("not member of project")]
    NotMember,

    #[error("not authorized")]
    NotAuthorized,
}

/// An authorized request, ready to be handed to the transfer program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServeRequest {
    pub service: GitService,
    pub project_path: String,
    pub repo_path: PathBuf,
}

pub struct Gateway<'a, R: ?Sized, G> {
    remote: &'a R,
    git: &'a G,
    root: &'a Path,
}

impl<'a, R, G> Gateway<'a, R, G>
where
    R: RemoteDirectory + ?Sized,
    G: GitRunner,
{
    pub fn new(remote: &'a R, git: &'a G, root: &'a Path) -> Self {
        Self { remote, git, root }
    }

    /// Decides whether `user_id` may run `command_line`.
    pub fn authorize(&self, user_id: u64, command_line: &str) -> Result<ServeRequest> {
        let user = self
            .remote
            .get_user(user_id)?
            .ok_or(CrateError::UserNotFound(user_id))?;
        if !user.is_active() {
            return Err(Denial::UserNotActive.into());
        }

        let args = shellwords::split(command_line).map_err(|e| {
            debug!(error = %e, "Cannot tokenize command");
            Denial::MalformedCommand
        })?;
        let Some(command) = args.first() else {
            return Err(Denial::Interactive.into());
        };

        let service = match GitService::from_str(command) {
            Some(service) if !service.is_write() => service,
            _ => return Err(Denial::UnsupportedCommand.into()),
        };
        if args.len() != 2 {
            return Err(Denial::NoRepository.into());
        }

        let project_path = sanitize_project_path(&args[1]).ok_or(Denial::RepositoryMissing)?;
        let repo = repo_path(self.root, &project_path);
        if !self.git.is_bare_repository(&repo) {
            return Err(Denial::RepositoryMissing.into());
        }

        let project = self
            .remote
            .get_project(&project_path)?
            .ok_or_else(|| CrateError::ProjectNotFound(project_path.clone()))?;

        if project.visibility == Visibility::Private && !user.is_admin {
            let member = self
                .remote
                .get_project_member(project.id, user.id)?
                .ok_or(Denial::NotMember)?;
            if !member.access_level.can_read() {
                return Err(Denial::NotAuthorized.into());
            }
        }

        info!(user = %user.username, project = %project_path, "Access granted");
        Ok(ServeRequest {
            service,
            project_path,
            repo_path: std::path::absolute(&repo)?,
        })
    }
}

/// Replaces the current process with the transfer program for `request`.
/// Only returns on failure.
pub fn handoff(request: &ServeRequest) -> CrateError {
    exec_service(request.service, &request.repo_path)
}
