//! Read access to the users, keys, projects and memberships of the remote
//! hosting service.

mod gitlab;
pub mod pagination;
#[cfg(test)]
pub(crate) mod testing;

pub use gitlab::GitLabClient;

use crate::error::Result;
use crate::types::{ProjectMember, RemoteProject, RemoteUser, SshKey, UserKeys};

/// RemoteDirectory is the capability the sync passes and the gateway consume.
///
/// Listing operations return the complete collection, following pagination
/// cursors internally. Lookups return `Ok(None)` when the remote reports the
/// entity as absent.
pub trait RemoteDirectory {
    fn list_users(&self) -> Result<Vec<RemoteUser>>;
    fn list_keys_for_user(&self, user_id: u64) -> Result<Vec<SshKey>>;
    fn list_projects(&self) -> Result<Vec<RemoteProject>>;
    fn get_user(&self, user_id: u64) -> Result<Option<RemoteUser>>;
    fn get_project(&self, path: &str) -> Result<Option<RemoteProject>>;
    fn get_project_member(&self, project_id: u64, user_id: u64) -> Result<Option<ProjectMember>>;

    /// Lists every user with the keys registered for it.
    fn list_user_keys(&self) -> Result<Vec<UserKeys>> {
        self.list_users()?
            .into_iter()
            .map(|user| -> Result<UserKeys> {
                let keys = self.list_keys_for_user(user.id)?;
                Ok(UserKeys { user, keys })
            })
            .collect()
    }
}
