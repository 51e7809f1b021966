use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use url::Url;

use crate::error::{Error, Result};

pub const DEFAULT_CONFIG_FILE: &str = "mirrorgate.toml";

const DEFAULT_AUTHORIZED_KEYS: &str = ".ssh/authorized_keys";
const DEFAULT_PROGRAM: &str = "mirrorgate";

#[derive(Debug, Deserialize)]
struct RawConfig {
    gitlab: String,
    gitlab_api: Option<String>,
    gitlab_token: String,
    repository_path: String,
    #[serde(default)]
    repos: Vec<String>,
    authorized_keys: Option<String>,
    program: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MirrorConfig {
    /// Base URL of the hosting service, e.g. "https://gitlab.example.com".
    pub gitlab: Url,
    pub api_url: String,
    pub token: String,
    pub repository_root: PathBuf,
    /// Path prefixes of the projects to mirror.
    pub patterns: Vec<String>,
    pub authorized_keys: PathBuf,
    /// Program named in the forced command of every provisioned key.
    pub program: String,
}

impl MirrorConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;

        let gitlab = Url::parse(raw.gitlab.trim())
            .map_err(|e| Error::Config(format!("gitlab: invalid url: {e}")))?;
        if gitlab.host_str().is_none() {
            return Err(Error::Config("gitlab: url has no host".into()));
        }

        let api_url = match raw.gitlab_api.as_deref().map(str::trim) {
            Some(api) if !api.is_empty() => api.trim_end_matches('/').to_string(),
            _ => format!("{}/api/v4", raw.gitlab.trim().trim_end_matches('/')),
        };

        if raw.gitlab_token.trim().is_empty() {
            return Err(Error::Config("gitlab_token cannot be empty".into()));
        }

        let repository_root = expand_env(raw.repository_path.trim());
        if repository_root.is_empty() {
            return Err(Error::Config("repository_path cannot be empty".into()));
        }

        let authorized_keys = raw
            .authorized_keys
            .as_deref()
            .map_or_else(|| DEFAULT_AUTHORIZED_KEYS.to_string(), expand_env);

        let program = raw
            .program
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PROGRAM.to_string());
        if program.contains(['"', '\n', '\r']) {
            return Err(Error::Config(
                "program cannot contain quotes or line breaks".into(),
            ));
        }

        Ok(Self {
            gitlab,
            api_url,
            token: raw.gitlab_token.trim().to_string(),
            repository_root: PathBuf::from(repository_root),
            patterns: raw.repos,
            authorized_keys: PathBuf::from(authorized_keys),
            program,
        })
    }
}

/// Replaces `$VAR` and `${VAR}` with values from the environment. Unset
/// variables expand to the empty string.
#[must_use]
pub fn expand_env(input: &str) -> String {
    expand_with(input, |name| std::env::var(name).ok())
}

fn expand_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(braced) = after.strip_prefix('{') {
            if let Some(end) = braced.find('}') {
                out.push_str(&lookup(&braced[..end]).unwrap_or_default());
                rest = &braced[end + 1..];
                continue;
            }
            out.push('$');
            rest = after;
            continue;
        }

        let len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        if len == 0 {
            out.push('$');
        } else {
            out.push_str(&lookup(&after[..len]).unwrap_or_default());
        }
        rest = &after[len..];
    }

    out.push_str(rest);
    out
}
