use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Authorize the command in SSH_ORIGINAL_COMMAND for a user and serve it
    Serve {
        /// Remote id of the user the SSH key belongs to
        user_id: u64,
    },

    /// Regenerate authorized keys, then reconcile mirrors
    Sync,

    /// Regenerate the authorized keys file from the remote user list
    SyncKeys,

    /// Clone or fetch every mirrored project
    SyncRepos,
}

impl Commands {
    /// Default log directive. `serve` stays quiet because its stderr is shown
    /// to the SSH client.
    #[must_use]
    pub fn log_directive(&self) -> &'static str {
        match self {
            Self::Serve { .. } => "mirrorgate=warn",
            _ => "mirrorgate=info",
        }
    }
}
