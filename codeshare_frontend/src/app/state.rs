use std::collections::BTreeMap;

use crate::models::{CreatePostInput, ExternalLink, PostView};

use super::explorer::RepoExplorer;

pub enum ViewState {
    Feed,
    Detail(DetailState),
    Compose,
}

#[derive(Default)]
pub struct FeedState {
    pub posts: Vec<PostView>,
    pub next_cursor: Option<i64>,
    pub loaded_once: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl FeedState {
    /// More pages exist until the server returns a short page.
    pub fn has_more(&self) -> bool {
        !self.loaded_once || self.next_cursor.is_some()
    }
}

pub struct DetailState {
    pub post_id: i64,
    pub post: Option<PostView>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub not_found: bool,
    pub screenshot_index: usize,
    pub explorer: Option<RepoExplorer>,
}

impl DetailState {
    pub fn new(post_id: i64) -> Self {
        Self {
            post_id,
            post: None,
            is_loading: true,
            error: None,
            not_found: false,
            screenshot_index: 0,
            explorer: None,
        }
    }
}

pub const LINK_PLATFORMS: &[&str] = &["X (Twitter)", "LinkedIn", "Facebook", "GitHub", "Instagram"];

/// Draft submission form. Field errors are keyed by the field names the
/// backend reports, so server-side rejections land next to the same inputs.
#[derive(Default)]
pub struct ComposeState {
    pub username: String,
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub screenshots: Vec<String>,
    pub uploading: bool,
    pub upload_error: Option<String>,
    pub github: String,
    pub code: String,
    pub links: BTreeMap<&'static str, String>,
    pub field_errors: BTreeMap<&'static str, String>,
    pub submitting: bool,
    pub submit_error: Option<String>,
    pub explorer: Option<RepoExplorer>,
}

impl ComposeState {
    pub fn toggle_technology(&mut self, name: &str) {
        if let Some(pos) = self.technologies.iter().position(|t| t == name) {
            self.technologies.remove(pos);
        } else {
            self.technologies.push(name.to_string());
        }
    }

    pub fn external_links(&self) -> Vec<ExternalLink> {
        LINK_PLATFORMS
            .iter()
            .filter_map(|platform| {
                let url = self.links.get(platform)?.trim();
                if url.is_empty() {
                    None
                } else {
                    Some(ExternalLink {
                        platform: platform.to_string(),
                        url: url.to_string(),
                    })
                }
            })
            .collect()
    }

    /// Mirrors the server-side rules so failures surface inline before a
    /// request is made. Returns the validated payload when clean.
    pub fn validate(&mut self) -> Option<CreatePostInput> {
        self.field_errors.clear();
        if self.username.trim().chars().count() < 2 {
            self.field_errors
                .insert("username", "Username must be at least 2 characters.".into());
        }
        if self.title.trim().chars().count() < 3 {
            self.field_errors
                .insert("title", "Title must be at least 3 characters.".into());
        }
        if self.description.trim().chars().count() < 10 {
            self.field_errors.insert(
                "description",
                "Description must be at least 10 characters.".into(),
            );
        }
        if self.technologies.is_empty() {
            self.field_errors
                .insert("technologies", "Select at least one technology.".into());
        }
        if self.screenshots.is_empty() {
            self.field_errors
                .insert("screenshots", "Select at least one image.".into());
        }
        let github = self.github.trim();
        if !github.is_empty() && !is_http_url(github) {
            self.field_errors
                .insert("github", "Invalid GitHub URL format.".into());
        }
        for link in self.external_links() {
            if !is_http_url(&link.url) {
                self.field_errors.insert(
                    "externalLinks",
                    "Each external link must have a valid URL.".into(),
                );
            }
        }
        if !self.field_errors.is_empty() {
            return None;
        }

        let code = self.code.trim();
        Some(CreatePostInput {
            username: self.username.trim().to_string(),
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            technologies: self.technologies.clone(),
            screenshots: self.screenshots.clone(),
            github: (!github.is_empty()).then(|| github.to_string()),
            code: (!code.is_empty()).then(|| code.to_string()),
            external_links: self.external_links(),
        })
    }
}

/// Decoded image bytes handed from a worker thread to the UI thread, which
/// turns them into a texture on first paint.
#[derive(Clone)]
pub struct LoadedImage {
    pub size: [usize; 2],
    pub pixels: Vec<u8>,
}

fn is_http_url(value: &str) -> bool {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    matches!(rest, Some(tail) if !tail.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn filled_form() -> ComposeState {
        let mut state = ComposeState {
            username: "ada".into(),
            title: "Nav Bar".into(),
            description: "A responsive nav bar example".into(),
            technologies: vec!["HTML5".into()],
            screenshots: vec!["https://x/1.png".into()],
            ..Default::default()
        };
        state.links.insert("GitHub", "https://github.com/ada".into());
        state
    }

    #[test]
    fn a_complete_form_produces_a_payload() {
        let mut state = filled_form();
        let payload = state.validate().expect("valid form");
        assert!(state.field_errors.is_empty());
        assert_eq!(payload.username, "ada");
        assert_eq!(payload.external_links.len(), 1);
        assert_eq!(payload.external_links[0].platform, "GitHub");
        assert!(payload.github.is_none());
    }

    #[test]
    fn missing_screenshots_reports_the_image_message() {
        let mut state = filled_form();
        state.screenshots.clear();
        assert!(state.validate().is_none());
        assert!(state
            .field_errors
            .get("screenshots")
            .is_some_and(|msg| msg.contains("image")));
    }

    #[test]
    fn malformed_urls_are_flagged_per_field() {
        let mut state = filled_form();
        state.github = "github.com/ada/navbar".into();
        state.links.insert("LinkedIn", "not a url".into());
        assert!(state.validate().is_none());
        assert!(state.field_errors.contains_key("github"));
        assert!(state.field_errors.contains_key("externalLinks"));
    }

    #[test]
    fn blank_link_inputs_are_ignored() {
        let mut state = filled_form();
        state.links.insert("Facebook", "   ".into());
        let payload = state.validate().expect("valid form");
        assert_eq!(payload.external_links.len(), 1);
    }

    #[test]
    fn technology_toggle_adds_and_removes() {
        let mut state = ComposeState::default();
        state.toggle_technology("Go");
        state.toggle_technology("Python");
        state.toggle_technology("Go");
        assert_eq!(state.technologies, vec!["Python".to_string()]);
    }
}
