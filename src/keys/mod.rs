//! Turns remote users and their public keys into an `authorized_keys` file
//! whose every entry is locked to the `serve` forced command.

mod entry;

pub use entry::{AuthorizedKeyEntry, RESTRICTIONS};

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::error::Result;
use crate::remote::RemoteDirectory;
use crate::types::UserKeys;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct KeySyncSummary {
    pub users: usize,
    pub keys: usize,
    pub skipped: usize,
}

/// Builds the entries for every key of every user, users in id order.
pub fn build_entries(mut users: Vec<UserKeys>, program: &str) -> (Vec<AuthorizedKeyEntry>, usize) {
    users.sort_by_key(|u| u.user.id);

    let mut entries = Vec::new();
    let mut skipped = 0;
    for user_keys in &users {
        for key in &user_keys.keys {
            match AuthorizedKeyEntry::new(user_keys.user.id, program, &key.key) {
                Some(entry) => entries.push(entry),
                None => {
                    warn!(
                        user_id = user_keys.user.id,
                        key_id = key.id,
                        "Skipping malformed public key"
                    );
                    skipped += 1;
                }
            }
        }
    }
    (entries, skipped)
}

#[must_use]
pub fn render(entries: &[AuthorizedKeyEntry]) -> String {
    entries.iter().map(|e| format!("{e}\n")).collect()
}

/// Writes `content` to a temporary file next to `target` and renames it into
/// place. On failure the previous file is left as it was.
pub fn write_atomically(target: &Path, content: &str) -> Result<()> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(content.as_bytes())?;
    file.as_file().sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(file.path(), fs::Permissions::from_mode(0o600))?;
    }

    file.persist(target).map_err(|e| e.error)?;
    Ok(())
}

/// Regenerates the credential file at `target` from the remote user list.
pub fn sync_keys(
    remote: &(impl RemoteDirectory + ?Sized),
    program: &str,
    target: &Path,
) -> Result<KeySyncSummary> {
    let users = remote.list_user_keys()?;
    let user_count = users.len();

    let (entries, skipped) = build_entries(users, program);
    write_atomically(target, &render(&entries))?;

    let summary = KeySyncSummary {
        users: user_count,
        keys: entries.len(),
        skipped,
    };
    info!(
        users = summary.users,
        keys = summary.keys,
        skipped = summary.skipped,
        path = %target.display(),
        "Wrote authorized keys"
    );
    Ok(summary)
}
