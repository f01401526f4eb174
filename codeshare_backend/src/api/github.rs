use super::{ApiError, ApiResult, AppState};
use crate::github::{InvalidApiUrl, InvalidRepoUrl};
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub(crate) struct ProxyParams {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RepoTreeResponse {
    tree: serde_json::Value,
}

fn map_proxy_error(err: anyhow::Error) -> ApiError {
    if err.downcast_ref::<InvalidRepoUrl>().is_some() {
        return ApiError::BadRequest("Invalid GitHub URL".into());
    }
    if err.downcast_ref::<InvalidApiUrl>().is_some() {
        return ApiError::BadRequest("Invalid GitHub API URL".into());
    }
    ApiError::Upstream(err)
}

/// Lists the root contents of a repository given its web URL.
pub(crate) async fn repo_tree(
    State(state): State<AppState>,
    Query(params): Query<ProxyParams>,
) -> ApiResult<RepoTreeResponse> {
    let repo_url = params
        .url
        .filter(|url| !url.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing URL parameter".into()))?;
    let tree = state
        .github
        .repo_root_contents(&repo_url)
        .await
        .map_err(map_proxy_error)?;
    Ok(Json(RepoTreeResponse { tree }))
}

/// Proxies a folder-listing call for an already-resolved contents API URL.
pub(crate) async fn repo_folder(
    State(state): State<AppState>,
    Query(params): Query<ProxyParams>,
) -> ApiResult<serde_json::Value> {
    let api_url = params
        .url
        .filter(|url| !url.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing url parameter".into()))?;
    let body = state
        .github
        .folder_contents(&api_url)
        .await
        .map_err(map_proxy_error)?;
    Ok(Json(body))
}
