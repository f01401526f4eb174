use serde::{Deserialize, Serialize};

/// One external profile link attached to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalLink {
    #[serde(rename = "type")]
    pub platform: String,
    pub url: String,
}

/// A stored code post. `id` is the SQLite rowid: opaque to clients but
/// monotonically orderable, which is what the feed cursor relies on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: i64,
    pub username: String,
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub screenshots: Vec<String>,
    pub github: Option<String>,
    pub code: Option<String>,
    pub external_links: Vec<ExternalLink>,
    pub created_at: String,
    pub updated_at: String,
}

/// Candidate post, validated but not yet inserted. Identifier and
/// timestamps are assigned by the repository at insertion time.
#[derive(Debug, Clone)]
pub struct NewPostRecord {
    pub username: String,
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub screenshots: Vec<String>,
    pub github: Option<String>,
    pub code: Option<String>,
    pub external_links: Vec<ExternalLink>,
}
