use serde::Deserialize;

/// AccessLevel is a project role on the remote's ordered permission scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct AccessLevel(u32);

impl AccessLevel {
    pub const GUEST: AccessLevel = AccessLevel(10);
    pub const REPORTER: AccessLevel = AccessLevel(20);
    pub const DEVELOPER: AccessLevel = AccessLevel(30);
    pub const MAINTAINER: AccessLevel = AccessLevel(40);
    pub const OWNER: AccessLevel = AccessLevel(50);

    /// Lowest level allowed to fetch a private project.
    pub const READ_THRESHOLD: AccessLevel = Self::REPORTER;

    #[must_use]
    pub fn can_read(self) -> bool {
        self >= Self::READ_THRESHOLD
    }
}
