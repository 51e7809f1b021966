//! Converges the local mirror tree toward the in-scope remote projects.

use std::fs;
use std::path::Path;

use tracing::{info, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::git::{GitRunner, mirror_name, repo_path};
use crate::remote::RemoteDirectory;
use crate::types::RemoteProject;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorAction {
    /// The mirror exists: point origin at the canonical URL and fetch.
    Update,
    /// The path is missing or not a bare repository: remove it and clone.
    Replace,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub updated: Vec<String>,
    pub replaced: Vec<String>,
    pub out_of_scope: usize,
}

/// A project is mirrored iff its path starts with one of `patterns`.
#[must_use]
pub fn is_mirrored(project_path: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|p| project_path.starts_with(p.as_str()))
}

/// Builds `ssh://git@<host>[:port]/<project>.git` from the service base URL.
pub fn origin_url(base: &Url, project_path: &str) -> Result<Url> {
    let host = base
        .host_str()
        .ok_or_else(|| Error::Config(format!("{base} has no host")))?;
    let port = base.port().map(|p| format!(":{p}")).unwrap_or_default();
    let path = mirror_name(project_path);

    Url::parse(&format!("ssh://git@{host}{port}/{path}"))
        .map_err(|e| Error::Config(format!("cannot build origin url for {project_path}: {e}")))
}

pub struct Reconciler<'a, G: GitRunner> {
    git: &'a G,
    base_url: &'a Url,
    root: &'a Path,
}

impl<'a, G: GitRunner> Reconciler<'a, G> {
    pub fn new(git: &'a G, base_url: &'a Url, root: &'a Path) -> Self {
        Self {
            git,
            base_url,
            root,
        }
    }

    #[must_use]
    pub fn classify(&self, repo: &Path) -> MirrorAction {
        if self.git.is_bare_repository(repo) {
            MirrorAction::Update
        } else {
            MirrorAction::Replace
        }
    }

    /// Brings the mirror of one project up to date.
    pub fn mirror_project(&self, project: &RemoteProject) -> Result<MirrorAction> {
        let origin = origin_url(self.base_url, &project.path_with_namespace)?;
        let repo = repo_path(self.root, &project.path_with_namespace);
        let action = self.classify(&repo);

        match action {
            MirrorAction::Update => {
                self.git.set_origin(&repo, origin.as_str())?;
                self.git.fetch(&repo)?;
            }
            MirrorAction::Replace => {
                remove_existing(&repo)?;
                if let Some(parent) = repo.parent() {
                    fs::create_dir_all(parent)?;
                }
                self.git.clone_mirror(origin.as_str(), &repo)?;
            }
        }

        Ok(action)
    }

    /// Mirrors every in-scope project, stopping at the first failure.
    pub fn reconcile(&self, projects: &[RemoteProject], patterns: &[String]) -> Result<SyncReport> {
        let mut report = SyncReport::default();

        for project in projects {
            if !is_mirrored(&project.path_with_namespace, patterns) {
                report.out_of_scope += 1;
                continue;
            }

            info!("{:04}: {}", project.id, project.path_with_namespace);
            match self.mirror_project(project)? {
                MirrorAction::Update => report.updated.push(project.path_with_namespace.clone()),
                MirrorAction::Replace => report.replaced.push(project.path_with_namespace.clone()),
            }
        }

        Ok(report)
    }
}

/// Fetches the project list and reconciles the mirror tree under `root`.
pub fn sync_repos<G: GitRunner>(
    remote: &(impl RemoteDirectory + ?Sized),
    git: &G,
    base_url: &Url,
    root: &Path,
    patterns: &[String],
) -> Result<SyncReport> {
    let projects = remote.list_projects()?;
    let report = Reconciler::new(git, base_url, root).reconcile(&projects, patterns)?;

    info!(
        updated = report.updated.len(),
        replaced = report.replaced.len(),
        out_of_scope = report.out_of_scope,
        "Reconciled mirrors"
    );
    Ok(report)
}

// An existing path that is not a bare repository is destroyed before the
// clone, whatever it contains.
fn remove_existing(path: &Path) -> Result<()> {
    let Ok(metadata) = fs::symlink_metadata(path) else {
        return Ok(());
    };

    warn!(path = %path.display(), "Removing invalid mirror before cloning");
    if metadata.is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        fs::remove_file(path)?;
    }
    Ok(())
}
