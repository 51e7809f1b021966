use anyhow::Context;

use crate::config::MirrorConfig;
use crate::git::GitCli;
use crate::keys::sync_keys;
use crate::mirror::sync_repos;
use crate::remote::{GitLabClient, RemoteDirectory};

fn client(config: &MirrorConfig) -> anyhow::Result<GitLabClient> {
    GitLabClient::from_config(config).context("Failed to create GitLab client")
}

fn keys_pass(config: &MirrorConfig, remote: &dyn RemoteDirectory) -> anyhow::Result<()> {
    sync_keys(remote, &config.program, &config.authorized_keys).with_context(|| {
        format!(
            "Failed to provision {}",
            config.authorized_keys.display()
        )
    })?;
    Ok(())
}

fn repos_pass(config: &MirrorConfig, remote: &dyn RemoteDirectory) -> anyhow::Result<()> {
    sync_repos(
        remote,
        &GitCli::default(),
        &config.gitlab,
        &config.repository_root,
        &config.patterns,
    )
    .with_context(|| {
        format!(
            "Failed to reconcile mirrors in {}",
            config.repository_root.display()
        )
    })?;
    Ok(())
}

pub fn run_sync_keys(config: &MirrorConfig) -> anyhow::Result<()> {
    keys_pass(config, &client(config)?)
}

pub fn run_sync_repos(config: &MirrorConfig) -> anyhow::Result<()> {
    repos_pass(config, &client(config)?)
}

/// Refreshes credentials first, then mirrors, stopping at the first failure.
pub fn run_sync(config: &MirrorConfig) -> anyhow::Result<()> {
    let remote = client(config)?;
    keys_pass(config, &remote)?;
    repos_pass(config, &remote)
}
