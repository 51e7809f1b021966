use serde::Deserialize;

use super::AccessLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserState {
    Active,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteUser {
    pub id: u64,
    pub username: String,
    pub state: UserState,
    #[serde(default)]
    pub is_admin: bool,
}

impl RemoteUser {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state == UserState::Active
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SshKey {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    pub key: String,
}

/// A user together with the public keys registered for it.
#[derive(Debug, Clone)]
pub struct UserKeys {
    pub user: RemoteUser,
    pub keys: Vec<SshKey>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    Internal,
    Private,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteProject {
    pub id: u64,
    pub path_with_namespace: String,
    pub visibility: Visibility,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectMember {
    pub id: u64,
    #[serde(default)]
    pub username: String,
    pub access_level: AccessLevel,
}
