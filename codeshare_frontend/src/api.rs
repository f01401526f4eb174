use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client;
use reqwest::Url;

use crate::models::{
    CreatePostAck, CreatePostInput, FeedPage, PostResponse, PostView, RepoNode, RepoTreeResponse,
};

lazy_static::lazy_static! {
    static ref SHARED_CLIENT: Result<Client, String> = Client::builder()
        .timeout(Duration::from_secs(15))
        .build()
        .map_err(|err| err.to_string());
}

/// Shared client for direct asset fetches (screenshots, raw file content)
/// that bypass the backend.
pub fn get_shared_client() -> Result<&'static Client> {
    match &*SHARED_CLIENT {
        Ok(client) => Ok(client),
        Err(err) => Err(anyhow!("failed to build HTTP client: {err}")),
    }
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base = sanitize_base_url(base_url.into())?;
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            base_url: base,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) -> Result<()> {
        self.base_url = sanitize_base_url(base_url.into())?;
        Ok(())
    }

    pub fn list_posts(&self, cursor: Option<i64>) -> Result<FeedPage> {
        let mut url = self.url("/posts")?;
        if let Some(cursor) = cursor {
            url.query_pairs_mut()
                .append_pair("cursor", &cursor.to_string());
        }
        let response = self.client.get(url).send()?.error_for_status()?;
        Ok(response.json()?)
    }

    pub fn get_post(&self, post_id: i64) -> Result<PostView> {
        let url = self.url(&format!("/posts/{post_id}"))?;
        let response = self.client.get(url).send()?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            anyhow::bail!("Post not found.");
        }
        let wrapper: PostResponse = response.error_for_status()?.json()?;
        Ok(wrapper.post)
    }

    pub fn create_post(&self, input: &CreatePostInput) -> Result<CreatePostAck> {
        let url = self.url("/posts")?;
        let response = self.client.post(url).json(input).send()?;
        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .json::<serde_json::Value>()
                .ok()
                .and_then(|body| {
                    body.get("message")
                        .and_then(|m| m.as_str())
                        .map(str::to_string)
                })
                .unwrap_or_else(|| format!("request failed with status {status}"));
            anyhow::bail!(message);
        }
        Ok(response.json()?)
    }

    pub fn repo_tree(&self, repo_url: &str) -> Result<Vec<RepoNode>> {
        let mut url = self.url("/repo-tree")?;
        url.query_pairs_mut().append_pair("url", repo_url);
        let response = self.client.get(url).send()?.error_for_status()?;
        let wrapper: RepoTreeResponse = response.json()?;
        Ok(wrapper.tree)
    }

    pub fn repo_folder(&self, api_url: &str) -> Result<Vec<RepoNode>> {
        let mut url = self.url("/repo-folder")?;
        url.query_pairs_mut().append_pair("url", api_url);
        let response = self.client.get(url).send()?.error_for_status()?;
        Ok(response.json()?)
    }

    fn url(&self, path: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).context("invalid base URL")?;
        url.set_path(path.trim_start_matches('/'));
        Ok(url)
    }
}

fn sanitize_base_url(mut base: String) -> Result<String> {
    if !base.starts_with("http://") && !base.starts_with("https://") {
        base = format!("http://{base}");
    }
    // Remove trailing slash for consistency
    while base.ends_with('/') {
        base.pop();
    }
    // Validate once
    let _ = Url::parse(&base).context("invalid base URL")?;
    Ok(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn base_urls_are_normalised() {
        assert_eq!(
            sanitize_base_url("127.0.0.1:8080".into()).unwrap(),
            "http://127.0.0.1:8080"
        );
        assert_eq!(
            sanitize_base_url("http://localhost:8080///".into()).unwrap(),
            "http://localhost:8080"
        );
    }
}
