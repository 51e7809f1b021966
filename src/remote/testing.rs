use std::cell::RefCell;
use std::collections::HashMap;

use super::RemoteDirectory;
use crate::error::{Error, Result};
use crate::types::{
    AccessLevel, ProjectMember, RemoteProject, RemoteUser, SshKey, UserState, Visibility,
};

/// In-memory directory used by unit tests. Records every lookup it serves.
#[derive(Default)]
pub struct MemoryDirectory {
    pub users: Vec<RemoteUser>,
    pub keys: HashMap<u64, Vec<SshKey>>,
    pub projects: Vec<RemoteProject>,
    pub members: HashMap<(u64, u64), ProjectMember>,
    pub fail_listing: bool,
    pub calls: RefCell<Vec<String>>,
}

impl MemoryDirectory {
    pub fn with_user(mut self, id: u64, state: UserState, is_admin: bool) -> Self {
        self.users.push(RemoteUser {
            id,
            username: format!("user{id}"),
            state,
            is_admin,
        });
        self
    }

    pub fn with_key(mut self, user_id: u64, key: &str) -> Self {
        let keys = self.keys.entry(user_id).or_default();
        keys.push(SshKey {
            id: keys.len() as u64 + 1,
            title: format!("key {}", keys.len() + 1),
            key: key.to_string(),
        });
        self
    }

    pub fn with_project(mut self, id: u64, path: &str, visibility: Visibility) -> Self {
        self.projects.push(RemoteProject {
            id,
            path_with_namespace: path.to_string(),
            visibility,
        });
        self
    }

    pub fn with_member(mut self, project_id: u64, user_id: u64, level: AccessLevel) -> Self {
        self.members.insert(
            (project_id, user_id),
            ProjectMember {
                id: user_id,
                username: format!("user{user_id}"),
                access_level: level,
            },
        );
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

impl RemoteDirectory for MemoryDirectory {
    fn list_users(&self) -> Result<Vec<RemoteUser>> {
        self.record("list_users".into());
        if self.fail_listing {
            return Err(Error::RemoteApi("GET /users: 500 Internal Server Error".into()));
        }
        Ok(self.users.clone())
    }

    fn list_keys_for_user(&self, user_id: u64) -> Result<Vec<SshKey>> {
        self.record(format!("list_keys_for_user {user_id}"));
        Ok(self.keys.get(&user_id).cloned().unwrap_or_default())
    }

    fn list_projects(&self) -> Result<Vec<RemoteProject>> {
        self.record("list_projects".into());
        if self.fail_listing {
            return Err(Error::RemoteApi("GET /projects: 500 Internal Server Error".into()));
        }
        Ok(self.projects.clone())
    }

    fn get_user(&self, user_id: u64) -> Result<Option<RemoteUser>> {
        self.record(format!("get_user {user_id}"));
        Ok(self.users.iter().find(|u| u.id == user_id).cloned())
    }

    fn get_project(&self, path: &str) -> Result<Option<RemoteProject>> {
        self.record(format!("get_project {path}"));
        Ok(self
            .projects
            .iter()
            .find(|p| p.path_with_namespace == path)
            .cloned())
    }

    fn get_project_member(&self, project_id: u64, user_id: u64) -> Result<Option<ProjectMember>> {
        self.record(format!("get_project_member {project_id} {user_id}"));
        Ok(self.members.get(&(project_id, user_id)).cloned())
    }
}
