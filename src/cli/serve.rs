use std::process::ExitCode;

use tracing::info;

use crate::config::MirrorConfig;
use crate::gateway::{DENIED_EXIT_CODE, Gateway, ORIGINAL_COMMAND_VAR, handoff};
use crate::git::GitCli;
use crate::remote::GitLabClient;

/// Runs the gateway for one SSH session. Does not return when access is
/// granted; the transfer program takes over the process.
pub fn run_serve(config: &MirrorConfig, user_id: u64) -> anyhow::Result<ExitCode> {
    let command_line = std::env::var(ORIGINAL_COMMAND_VAR).unwrap_or_default();
    let remote = GitLabClient::from_config(config)?;
    let git = GitCli::default();

    let gateway = Gateway::new(&remote, &git, &config.repository_root);
    let request = match gateway.authorize(user_id, &command_line) {
        Ok(request) => request,
        Err(err) => {
            let Some(denial) = err.denial() else {
                return Err(err.into());
            };
            info!(user_id, command = %command_line, %denial, "Access denied");
            eprintln!("{denial}");
            return Ok(ExitCode::from(DENIED_EXIT_CODE));
        }
    };

    Err(handoff(&request).into())
}
