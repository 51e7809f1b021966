use std::fmt;

/// SSH options attached to every provisioned key.
pub const RESTRICTIONS: &[&str] = &[
    "no-port-forwarding",
    "no-X11-forwarding",
    "no-agent-forwarding",
    "no-pty",
];

/// One `authorized_keys` line binding a public key to the forced command
/// that serves its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedKeyEntry {
    pub user_id: u64,
    pub program: String,
    pub key: String,
}

impl AuthorizedKeyEntry {
    /// Builds an entry, rejecting key material that is empty or spans
    /// several lines.
    pub fn new(user_id: u64, program: &str, key: &str) -> Option<Self> {
        let key = key.trim();
        if key.is_empty() || key.contains(['\n', '\r']) {
            return None;
        }
        Some(Self {
            user_id,
            program: program.to_string(),
            key: key.to_string(),
        })
    }

    #[must_use]
    pub fn forced_command(&self) -> String {
        format!("{} serve {}", self.program, self.user_id)
    }
}

impl fmt::Display for AuthorizedKeyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},command=\"{}\" {}",
            RESTRICTIONS.join(","),
            self.forced_command(),
            self.key
        )
    }
}
