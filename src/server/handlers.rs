//! JSON API handlers
//!
//! Every handler re-reads the content directory on a blocking thread.

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use std::sync::Arc;

use super::error::ApiError;
use super::AppState;
use crate::config::Theme;
use crate::content::{ContentError, Post, PostMetadata, RenderedPost};
use crate::search::{self, TagIndex};

const POST_NOT_FOUND: &str = "Post not found";

/// Raw query pairs; repeated keys are kept so the first one can win
type QueryPairs = Query<Vec<(String, String)>>;

/// First value given for `key`
fn first_param(pairs: Vec<(String, String)>, key: &str) -> Option<String> {
    pairs.into_iter().find(|(k, _)| k == key).map(|(_, v)| v)
}

/// Slug from the path, or 404 when it cannot be decoded
fn slug_param(slug: Result<Path<String>, PathRejection>) -> Result<String, ApiError> {
    match slug {
        Ok(Path(slug)) => Ok(slug),
        Err(e) => {
            tracing::debug!("Rejected post path: {}", e);
            Err(ApiError::NotFound(POST_NOT_FOUND))
        }
    }
}

/// Run a loader call off the async reactor
async fn blocking<T, F>(f: F) -> anyhow::Result<Result<T, ContentError>>
where
    F: FnOnce() -> Result<T, ContentError> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(f).await?)
}

async fn all_posts(state: &Arc<AppState>) -> anyhow::Result<Vec<PostMetadata>> {
    let state = Arc::clone(state);
    Ok(blocking(move || state.blog.loader().load_all()).await??)
}

async fn one_post(state: &Arc<AppState>, slug: String) -> Result<Post, ApiError> {
    let state = Arc::clone(state);
    match blocking(move || state.blog.loader().load_one(&slug)).await {
        Ok(Ok(post)) => Ok(post),
        Ok(Err(ContentError::NotFound { .. })) => Err(ApiError::NotFound(POST_NOT_FOUND)),
        Ok(Err(e)) => Err(ApiError::internal("Failed to fetch post", e)),
        Err(e) => Err(ApiError::internal("Failed to fetch post", e)),
    }
}

/// GET /posts
pub(crate) async fn list_posts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PostMetadata>>, ApiError> {
    let posts = all_posts(&state)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch posts", e))?;
    Ok(Json(posts))
}

/// GET /posts/tag?tag=
pub(crate) async fn posts_by_tag(
    State(state): State<Arc<AppState>>,
    Query(params): QueryPairs,
) -> Result<Json<Vec<PostMetadata>>, ApiError> {
    let Some(tag) = first_param(params, "tag").filter(|t| !t.is_empty()) else {
        return Err(ApiError::BadRequest("Tag parameter is required"));
    };

    let posts = all_posts(&state)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch posts by tag", e))?;
    let filtered = search::filter_by_tag(&tag, &posts)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(filtered))
}

/// GET /posts/:slug
pub(crate) async fn get_post(
    State(state): State<Arc<AppState>>,
    slug: Result<Path<String>, PathRejection>,
) -> Result<Json<Post>, ApiError> {
    let slug = slug_param(slug)?;
    Ok(Json(one_post(&state, slug).await?))
}

/// GET /posts/:slug/render?theme=
pub(crate) async fn render_post(
    State(state): State<Arc<AppState>>,
    slug: Result<Path<String>, PathRejection>,
    Query(params): QueryPairs,
) -> Result<Json<RenderedPost>, ApiError> {
    let slug = slug_param(slug)?;
    let theme = match first_param(params, "theme").as_deref() {
        Some(name) => name
            .parse::<Theme>()
            .map_err(|_| ApiError::BadRequest("Unknown theme"))?,
        None => state.blog.config.theme,
    };

    let post = one_post(&state, slug).await?;
    let renderer_state = Arc::clone(&state);
    let rendered = tokio::task::spawn_blocking(move || {
        let rendered = renderer_state.renderer.render(&post.content, theme);
        RenderedPost {
            meta: post.meta,
            html: rendered.html,
            toc: rendered.outline,
            theme,
        }
    })
    .await
    .map_err(|e| ApiError::internal("Failed to render post", e))?;

    Ok(Json(rendered))
}

/// GET /search?q=
pub(crate) async fn search_posts(
    State(state): State<Arc<AppState>>,
    Query(params): QueryPairs,
) -> Result<Json<Vec<PostMetadata>>, ApiError> {
    let query = first_param(params, "q").unwrap_or_default();
    if query.trim().is_empty() {
        return Ok(Json(Vec::new()));
    }

    let posts = all_posts(&state)
        .await
        .map_err(|e| ApiError::internal("Failed to search posts", e))?;
    let results = search::search(&query, &posts)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(results))
}

/// GET /tags
pub(crate) async fn list_tags(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TagIndex>, ApiError> {
    let posts = all_posts(&state)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch tags", e))?;
    Ok(Json(search::tag_counts(&posts)))
}
