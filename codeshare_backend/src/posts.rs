use crate::database::models::{ExternalLink, NewPostRecord, PostRecord};
use crate::database::repositories::PostRepository;
use crate::database::Database;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Fixed feed page size, known to both server and client. A full page means
/// "more may follow"; a short page is the termination signal.
pub const PAGE_SIZE: usize = 20;

#[derive(Clone)]
pub struct PostService {
    database: Database,
}

impl PostService {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    pub fn list_posts(&self, cursor: Option<i64>) -> Result<FeedPage> {
        self.database.with_repositories(|repos| {
            let posts = repos.posts().list_after(cursor, PAGE_SIZE)?;
            let next_cursor = if posts.len() == PAGE_SIZE {
                posts.last().map(|post| post.id)
            } else {
                None
            };
            Ok(FeedPage {
                posts: posts.into_iter().map(PostView::from_record).collect(),
                next_cursor,
            })
        })
    }

    pub fn get_post(&self, id: i64) -> Result<Option<PostView>> {
        self.database.with_repositories(|repos| {
            Ok(repos.posts().get(id)?.map(PostView::from_record))
        })
    }

    pub fn create_post(&self, input: CreatePostInput) -> Result<PostView> {
        validate(&input)?;
        let record = NewPostRecord {
            username: input.username.trim().to_string(),
            title: input.title.trim().to_string(),
            description: input.description.trim().to_string(),
            technologies: input.technologies,
            screenshots: input.screenshots,
            github: input.github.filter(|url| !url.trim().is_empty()),
            code: input.code.filter(|code| !code.trim().is_empty()),
            external_links: input.external_links,
        };
        let stored = self
            .database
            .with_repositories(|repos| repos.posts().insert(&record))?;
        Ok(PostView::from_record(stored))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: i64,
    pub username: String,
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub screenshots: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub external_links: Vec<ExternalLink>,
    pub created_at: String,
    pub updated_at: String,
}

impl PostView {
    fn from_record(record: PostRecord) -> Self {
        Self {
            id: record.id,
            username: record.username,
            title: record.title,
            description: record.description,
            technologies: record.technologies,
            screenshots: record.screenshots,
            github: record.github,
            code: record.code,
            external_links: record.external_links,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPage {
    pub posts: Vec<PostView>,
    pub next_cursor: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostInput {
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
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Shape/length failures of a submission, one entry per offending field.
/// Raised before the store is touched.
#[derive(Debug, thiserror::Error)]
#[error("validation failed: {}", summarize(.errors))]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

fn is_http_url(value: &str) -> bool {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    matches!(rest, Some(tail) if !tail.is_empty())
}

fn validate(input: &CreatePostInput) -> Result<(), ValidationError> {
    let mut errors = Vec::new();
    if input.username.trim().chars().count() < 2 {
        errors.push(FieldError {
            field: "username",
            message: "Username must be at least 2 characters.".into(),
        });
    }
    if input.title.trim().chars().count() < 3 {
        errors.push(FieldError {
            field: "title",
            message: "Title must be at least 3 characters.".into(),
        });
    }
    if input.description.trim().chars().count() < 10 {
        errors.push(FieldError {
            field: "description",
            message: "Description must be at least 10 characters.".into(),
        });
    }
    if input.technologies.is_empty() {
        errors.push(FieldError {
            field: "technologies",
            message: "Select at least one technology.".into(),
        });
    }
    if input.screenshots.is_empty() {
        errors.push(FieldError {
            field: "screenshots",
            message: "Select at least one image.".into(),
        });
    }
    if let Some(github) = input.github.as_deref() {
        if !github.trim().is_empty() && !is_http_url(github.trim()) {
            errors.push(FieldError {
                field: "github",
                message: "Invalid GitHub URL format.".into(),
            });
        }
    }
    for link in &input.external_links {
        if link.platform.trim().is_empty() {
            errors.push(FieldError {
                field: "externalLinks",
                message: "Each external link must name a platform.".into(),
            });
        }
        if !is_http_url(link.url.trim()) {
            errors.push(FieldError {
                field: "externalLinks",
                message: "Each external link must have a valid URL.".into(),
            });
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { errors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use rusqlite::Connection;

    fn setup_service() -> PostService {
        let conn = Connection::open_in_memory().expect("in-memory db");
        let db = Database::from_connection(conn, true);
        db.ensure_migrations().expect("migrations");
        PostService::new(db)
    }

    fn valid_input(title: &str) -> CreatePostInput {
        CreatePostInput {
            username: "ada".into(),
            title: title.into(),
            description: "A responsive nav bar example".into(),
            technologies: vec!["HTML5".into()],
            screenshots: vec!["https://x/1.png".into()],
            ..Default::default()
        }
    }

    fn store_count(service: &PostService) -> i64 {
        service
            .database
            .with_repositories(|repos| repos.posts().count())
            .unwrap()
    }

    #[test]
    fn create_post_persists_exactly_one_document() {
        let service = setup_service();
        let created = service.create_post(valid_input("Nav Bar")).expect("create post");
        assert_eq!(store_count(&service), 1);

        let fetched = service
            .get_post(created.id)
            .expect("fetch post")
            .expect("post exists");
        assert_eq!(fetched.title, "Nav Bar");
        assert_eq!(fetched.username, "ada");
        assert_eq!(fetched.technologies, vec!["HTML5"]);
        assert_eq!(fetched.screenshots, vec!["https://x/1.png"]);
    }

    #[test]
    fn missing_screenshots_is_rejected_before_the_store() {
        let service = setup_service();
        let mut input = valid_input("Nav Bar");
        input.screenshots.clear();

        let err = service.create_post(input).unwrap_err();
        let validation = err
            .downcast_ref::<ValidationError>()
            .expect("validation error");
        assert!(validation
            .errors
            .iter()
            .any(|e| e.field == "screenshots" && e.message.contains("image")));
        assert_eq!(store_count(&service), 0);
    }

    #[test]
    fn short_fields_collect_per_field_messages() {
        let service = setup_service();
        let input = CreatePostInput {
            username: "a".into(),
            title: "ab".into(),
            description: "too short".into(),
            ..Default::default()
        };
        let err = service.create_post(input).unwrap_err();
        let validation = err.downcast_ref::<ValidationError>().unwrap();
        let fields: Vec<_> = validation.errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["username", "title", "description", "technologies", "screenshots"]
        );
        assert_eq!(store_count(&service), 0);
    }

    #[test]
    fn malformed_optional_urls_are_rejected() {
        let service = setup_service();
        let mut input = valid_input("Nav Bar");
        input.github = Some("github.com/ada/navbar".into());
        input.external_links = vec![ExternalLink {
            platform: "".into(),
            url: "not-a-url".into(),
        }];
        let err = service.create_post(input).unwrap_err();
        let validation = err.downcast_ref::<ValidationError>().unwrap();
        let fields: Vec<_> = validation.errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["github", "externalLinks", "externalLinks"]);
    }

    #[test]
    fn empty_optional_fields_are_dropped() {
        let service = setup_service();
        let mut input = valid_input("Nav Bar");
        input.github = Some("".into());
        input.code = Some("  ".into());
        let created = service.create_post(input).expect("create post");
        assert!(created.github.is_none());
        assert!(created.code.is_none());
    }

    #[test]
    fn feed_pages_follow_the_cursor_without_gaps_or_duplicates() {
        let service = setup_service();
        for i in 0..45 {
            service
                .create_post(valid_input(&format!("post {i}")))
                .expect("create post");
        }

        let mut seen = Vec::new();
        let mut cursor = None;
        loop {
            let page = service.list_posts(cursor).expect("list posts");
            assert!(page.posts.len() <= PAGE_SIZE);
            if let Some(c) = cursor {
                assert!(page.posts.iter().all(|p| p.id > c));
            }
            assert!(page.posts.windows(2).all(|w| w[0].id < w[1].id));
            seen.extend(page.posts.iter().map(|p| p.id));
            match page.next_cursor {
                Some(next) => {
                    assert_eq!(page.posts.len(), PAGE_SIZE);
                    assert_eq!(Some(next), page.posts.last().map(|p| p.id));
                    cursor = Some(next);
                }
                None => break,
            }
        }

        assert_eq!(seen.len(), 45);
        let mut deduped = seen.clone();
        deduped.dedup();
        assert_eq!(deduped, seen);
    }

    #[test]
    fn exact_page_boundary_yields_one_trailing_empty_page() {
        let service = setup_service();
        for i in 0..PAGE_SIZE {
            service
                .create_post(valid_input(&format!("post {i}")))
                .expect("create post");
        }
        let first = service.list_posts(None).expect("first page");
        assert_eq!(first.posts.len(), PAGE_SIZE);
        let cursor = first.next_cursor.expect("full page issues a cursor");

        let second = service.list_posts(Some(cursor)).expect("second page");
        assert!(second.posts.is_empty());
        assert!(second.next_cursor.is_none());
    }
}
