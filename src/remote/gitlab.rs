use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::RemoteDirectory;
use super::pagination::{PER_PAGE, Page, collect_pages, next_page};
use crate::config::MirrorConfig;
use crate::error::{Error, Result};
use crate::types::{ProjectMember, RemoteProject, RemoteUser, SshKey};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const TOKEN_HEADER: &str = "PRIVATE-TOKEN";

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

/// Blocking client for the GitLab v4 REST API.
#[derive(Clone)]
pub struct GitLabClient {
    client: Client,
    api_url: String,
    token: String,
}

impl GitLabClient {
    pub fn new(api_url: &str, token: &str) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    pub fn from_config(config: &MirrorConfig) -> Result<Self> {
        Self::new(&config.api_url, &config.token)
    }

    fn send(&self, path: &str, query: &[(&str, u32)]) -> Result<Response> {
        let url = format!("{}{}", self.api_url, path);
        debug!(%url, ?query, "GitLab API request");
        let resp = self
            .client
            .get(&url)
            .header(TOKEN_HEADER, &self.token)
            .query(query)
            .send()?;
        Ok(resp)
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let resp = self.send(path, &[])?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::handle_response(path, resp).map(Some)
    }

    fn get_all<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        collect_pages(|page| {
            let resp = self.send(path, &[("page", page), ("per_page", PER_PAGE)])?;
            let cursor = next_page(resp.headers())?;
            let items = Self::handle_response(path, resp)?;
            Ok(Page {
                items,
                next_page: cursor,
            })
        })
    }

    fn handle_response<T: DeserializeOwned>(path: &str, resp: Response) -> Result<T> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json()?);
        }

        let detail = resp
            .json::<ApiErrorBody>()
            .ok()
            .and_then(|body| match body.message {
                Some(serde_json::Value::String(s)) => Some(s),
                Some(other) => Some(other.to_string()),
                None => body.error,
            })
            .unwrap_or_else(|| "no details provided".into());

        Err(Error::RemoteApi(format!("GET {path}: {status}: {detail}")))
    }
}

impl RemoteDirectory for GitLabClient {
    fn list_users(&self) -> Result<Vec<RemoteUser>> {
        self.get_all("/users")
    }

    fn list_keys_for_user(&self, user_id: u64) -> Result<Vec<SshKey>> {
        self.get_all(&format!("/users/{user_id}/keys"))
    }

    fn list_projects(&self) -> Result<Vec<RemoteProject>> {
        self.get_all("/projects")
    }

    fn get_user(&self, user_id: u64) -> Result<Option<RemoteUser>> {
        self.get(&format!("/users/{user_id}"))
    }

    fn get_project(&self, path: &str) -> Result<Option<RemoteProject>> {
        self.get(&format!("/projects/{}", urlencoding::encode(path)))
    }

    fn get_project_member(&self, project_id: u64, user_id: u64) -> Result<Option<ProjectMember>> {
        self.get(&format!("/projects/{project_id}/members/all/{user_id}"))
    }
}
