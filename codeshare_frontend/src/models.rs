use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalLink {
    #[serde(rename = "type")]
    pub platform: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: i64,
    pub username: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub screenshots: Vec<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub external_links: Vec<ExternalLink>,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPage {
    #[serde(default)]
    pub posts: Vec<PostView>,
    #[serde(default)]
    pub next_cursor: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostResponse {
    pub post: PostView,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostInput {
    pub username: String,
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub screenshots: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub external_links: Vec<ExternalLink>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePostAck {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

/// One entry of the GitHub contents API, as returned by the proxy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoNode {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub path: String,
    /// Contents API URL for this entry; directories are listed through it.
    pub url: String,
    /// Fully-resolved raw asset URL; present for files, absent for dirs.
    #[serde(default)]
    pub download_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Dir,
    /// Symlinks, submodules, and anything the API grows later.
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepoTreeResponse {
    #[serde(default)]
    pub tree: Vec<RepoNode>,
}
