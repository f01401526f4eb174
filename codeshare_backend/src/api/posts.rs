use super::{ApiError, ApiResult, AppState};
use crate::posts::{CreatePostInput, FeedPage, PostService, PostView};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub(crate) struct ListPostsParams {
    #[serde(default)]
    cursor: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PostResponse {
    post: PostView,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreatePostResponse {
    success: bool,
    message: &'static str,
}

/// The first page is requested either without a cursor or with an empty one
/// (the web client sends `?cursor=`).
fn parse_cursor(raw: Option<&str>) -> Result<Option<i64>, ApiError> {
    match raw {
        None => Ok(None),
        Some(value) if value.is_empty() => Ok(None),
        Some(value) => value
            .parse::<i64>()
            .map(Some)
            .map_err(|_| ApiError::BadRequest("invalid cursor".into())),
    }
}

pub(crate) async fn list_posts(
    State(state): State<AppState>,
    Query(params): Query<ListPostsParams>,
) -> ApiResult<FeedPage> {
    let cursor = parse_cursor(params.cursor.as_deref())?;
    let service = PostService::new(state.database.clone());
    let page = service.list_posts(cursor)?;
    Ok(Json(page))
}

pub(crate) async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<PostResponse> {
    let id: i64 = id
        .parse()
        .map_err(|_| ApiError::BadRequest("invalid post id".into()))?;
    let service = PostService::new(state.database.clone());
    match service.get_post(id)? {
        Some(post) => Ok(Json(PostResponse { post })),
        None => Err(ApiError::NotFound("Post not found.".into())),
    }
}

pub(crate) async fn create_post(
    State(state): State<AppState>,
    Json(payload): Json<CreatePostInput>,
) -> ApiResult<CreatePostResponse> {
    let service = PostService::new(state.database.clone());
    let post = service.create_post(payload)?;
    tracing::info!(post_id = post.id, "code post created");
    Ok(Json(CreatePostResponse {
        success: true,
        message: "Code post created successfully.",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_parsing_treats_empty_as_first_page() {
        assert_eq!(parse_cursor(None).unwrap(), None);
        assert_eq!(parse_cursor(Some("")).unwrap(), None);
        assert_eq!(parse_cursor(Some("42")).unwrap(), Some(42));
        assert!(parse_cursor(Some("not-an-id")).is_err());
    }
}
