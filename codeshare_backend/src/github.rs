use crate::config::GithubConfig;
use anyhow::{Context, Result};
use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;

const GITHUB_API_BASE: &str = "https://api.github.com/";

/// Read-only client for the two proxied GitHub contents calls. One shared
/// reqwest client, one bounded timeout for both calls.
#[derive(Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(config: &GithubConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("Codeshare/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("failed to build GitHub HTTP client")?;
        Ok(Self {
            http,
            token: config.token.clone(),
        })
    }

    /// Root listing for a repository web URL. The URL is parsed locally;
    /// nothing is fetched for a malformed URL.
    pub async fn repo_root_contents(&self, repo_url: &str) -> Result<serde_json::Value> {
        let (owner, repo) = parse_repo_url(repo_url)
            .ok_or_else(|| InvalidRepoUrl(repo_url.to_string()))?;
        let api_url = format!("{GITHUB_API_BASE}repos/{owner}/{repo}/contents/");
        self.fetch_json(&api_url).await
    }

    /// Folder listing for an already-resolved contents API URL. Refuses
    /// anything outside the GitHub API host so the bearer token is never
    /// sent elsewhere.
    pub async fn folder_contents(&self, api_url: &str) -> Result<serde_json::Value> {
        if !api_url.starts_with(GITHUB_API_BASE) {
            return Err(InvalidApiUrl(api_url.to_string()).into());
        }
        self.fetch_json(api_url).await
    }

    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value> {
        let mut request = self.http.get(url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .context("failed to reach the GitHub API")?
            .error_for_status()
            .context("GitHub API returned an error status")?;
        response
            .json()
            .await
            .context("failed to decode GitHub API response")
    }
}

/// Repository URL not matching the `github.com/{owner}/{repo}` shape.
#[derive(Debug, thiserror::Error)]
#[error("invalid GitHub repository URL: {0}")]
pub struct InvalidRepoUrl(pub String);

/// Folder URL outside the GitHub API host.
#[derive(Debug, thiserror::Error)]
#[error("invalid GitHub API URL: {0}")]
pub struct InvalidApiUrl(pub String);

/// Extracts `(owner, repo)` from a GitHub web URL.
pub fn parse_repo_url(repo_url: &str) -> Option<(String, String)> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN
        .get_or_init(|| Regex::new(r"github\.com/([^/]+)/([^/]+)").expect("valid repo pattern"));
    let captures = pattern.captures(repo_url)?;
    Some((captures[1].to_string(), captures[2].to_string()))
}
