//! Blog post handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::{IntoParams, ToSchema};

use super::{
    ApiErrorResponse, bad_request, db_error, error_response, non_blank, parse_sort_order,
    require_fields,
};
use crate::api::{AppState, is_admin};
use crate::db::{
    BlogCategory, BlogPost, BlogPostQuery, BlogPostRepository, DEFAULT_AUTHOR, Database, PageSort,
};

// =============================================================================
// DTOs
// =============================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BlogPostResponse {
    #[schema(example = "a1b2c3d4")]
    pub id: String,
    #[schema(example = "Choosing the right stream after Class 10")]
    pub title: String,
    #[schema(example = "A short guide for students and parents")]
    pub excerpt: String,
    pub content: String,
    #[schema(example = "Gyan Rich")]
    pub author: String,
    #[schema(example = "Career")]
    pub category: String,
    pub published: bool,
    /// Image reference, e.g. `/api/v1/images/<file>`
    pub image: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<BlogPost> for BlogPostResponse {
    fn from(p: BlogPost) -> Self {
        Self {
            id: p.id,
            title: p.title,
            excerpt: p.excerpt,
            content: p.content,
            author: p.author,
            category: p.category.to_string(),
            published: p.published,
            image: p.image,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Body for creating or fully replacing a post.
///
/// `title`, `excerpt` and `content` are required; they are optional here so a
/// missing field yields a 400 naming it rather than a deserialization error.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct BlogPostRequest {
    #[schema(example = "Choosing the right stream after Class 10")]
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    #[schema(example = "Gyan Rich")]
    pub author: Option<String>,
    #[schema(example = "Career")]
    pub category: Option<String>,
    pub published: Option<bool>,
    pub image: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PatchBlogPostRequest {
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub published: Option<bool>,
    /// `null` leaves the image unchanged; an empty string removes it
    pub image: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListPostsQuery {
    /// Include drafts (admin only)
    pub all: Option<bool>,
    /// Filter by category
    #[param(example = "Career")]
    pub category: Option<String>,
    /// Maximum number of items to return
    #[param(example = 20)]
    pub limit: Option<usize>,
    /// Number of items to skip
    #[param(example = 0)]
    pub offset: Option<usize>,
    /// Field to sort by (title, category, created_at, updated_at)
    #[param(example = "created_at")]
    pub sort: Option<String>,
    /// Sort order (asc, desc)
    #[param(example = "desc")]
    pub order: Option<String>,
}

fn parse_category(raw: Option<&str>) -> Result<Option<BlogCategory>, ApiErrorResponse> {
    match raw.map(str::trim).filter(|c| !c.is_empty()) {
        Some(c) => c.parse().map(Some).map_err(bad_request),
        None => Ok(None),
    }
}

impl BlogPostRequest {
    fn validate(&self) -> Result<(), ApiErrorResponse> {
        require_fields(&[
            ("title", self.title.as_deref()),
            ("excerpt", self.excerpt.as_deref()),
            ("content", self.content.as_deref()),
        ])
    }

    /// Build the stored post, applying defaults for optional fields.
    fn into_post(self, id: String) -> Result<BlogPost, ApiErrorResponse> {
        self.validate()?;
        let category = parse_category(self.category.as_deref())?.unwrap_or_default();

        Ok(BlogPost {
            id,
            title: self.title.unwrap_or_default().trim().to_string(),
            excerpt: self.excerpt.unwrap_or_default().trim().to_string(),
            content: self.content.unwrap_or_default(),
            author: non_blank(self.author).unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
            category,
            published: self.published.unwrap_or(false),
            image: non_blank(self.image),
            created_at: String::new(),
            updated_at: String::new(),
        })
    }
}

impl PatchBlogPostRequest {
    fn merge_into(self, target: &mut BlogPost) -> Result<(), ApiErrorResponse> {
        for (name, value) in [
            ("title", &self.title),
            ("excerpt", &self.excerpt),
            ("content", &self.content),
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(bad_request(format!("Field '{name}' cannot be empty")));
            }
        }

        if let Some(title) = self.title {
            target.title = title.trim().to_string();
        }
        if let Some(excerpt) = self.excerpt {
            target.excerpt = excerpt.trim().to_string();
        }
        if let Some(content) = self.content {
            target.content = content;
        }
        if let Some(author) = non_blank(self.author) {
            target.author = author;
        }
        if let Some(category) = parse_category(self.category.as_deref())? {
            target.category = category;
        }
        if let Some(published) = self.published {
            target.published = published;
        }
        if let Some(image) = self.image {
            target.image = non_blank(Some(image));
        }
        Ok(())
    }
}

fn post_not_found() -> ApiErrorResponse {
    error_response(StatusCode::NOT_FOUND, "Post not found")
}

// =============================================================================
// Handlers
// =============================================================================

#[utoipa::path(
    get,
    path = "/api/v1/blog",
    tag = "blog",
    params(ListPostsQuery),
    responses(
        (status = 200, description = "Posts, newest first", body = Vec<BlogPostResponse>),
        (status = 400, description = "Unknown category", body = super::ErrorResponse),
        (status = 401, description = "Drafts requested without an admin session", body = super::ErrorResponse),
        (status = 500, description = "Internal server error", body = super::ErrorResponse)
    )
)]
#[instrument(skip(state, headers))]
pub async fn list_posts<D: Database>(
    State(state): State<AppState<D>>,
    headers: HeaderMap,
    Query(query): Query<ListPostsQuery>,
) -> Result<Json<Vec<BlogPostResponse>>, ApiErrorResponse> {
    let include_drafts = query.all.unwrap_or(false);
    if include_drafts && !is_admin(&state, &headers).await {
        return Err(error_response(StatusCode::UNAUTHORIZED, "Unauthorized"));
    }

    let db_query = BlogPostQuery {
        page: PageSort {
            limit: query.limit,
            offset: query.offset,
            sort_by: query.sort.clone(),
            sort_order: parse_sort_order(query.order.as_deref()),
        },
        published: if include_drafts { None } else { Some(true) },
        category: parse_category(query.category.as_deref())?,
    };

    let result = state
        .db()
        .blog_posts()
        .list(Some(&db_query))
        .await
        .map_err(|e| db_error(e, "Post", "Failed to fetch blog posts"))?;

    Ok(Json(
        result
            .items
            .into_iter()
            .map(BlogPostResponse::from)
            .collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/blog/{id}",
    tag = "blog",
    params(("id" = String, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post found", body = BlogPostResponse),
        (status = 404, description = "Post not found or not published", body = super::ErrorResponse),
        (status = 500, description = "Internal server error", body = super::ErrorResponse)
    )
)]
#[instrument(skip(state, headers))]
pub async fn get_post<D: Database>(
    State(state): State<AppState<D>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<BlogPostResponse>, ApiErrorResponse> {
    let post = state
        .db()
        .blog_posts()
        .get(&id)
        .await
        .map_err(|e| db_error(e, "Post", "Failed to fetch blog post"))?;

    // Drafts are invisible outside the admin surface.
    if !post.published && !is_admin(&state, &headers).await {
        return Err(post_not_found());
    }

    Ok(Json(BlogPostResponse::from(post)))
}

#[utoipa::path(
    post,
    path = "/api/v1/blog",
    tag = "blog",
    request_body = BlogPostRequest,
    responses(
        (status = 201, description = "Post created", body = BlogPostResponse),
        (status = 400, description = "Missing required fields", body = super::ErrorResponse),
        (status = 401, description = "Admin session required", body = super::ErrorResponse),
        (status = 500, description = "Internal server error", body = super::ErrorResponse)
    )
)]
#[instrument(skip(state, req))]
pub async fn create_post<D: Database>(
    State(state): State<AppState<D>>,
    Json(req): Json<BlogPostRequest>,
) -> Result<(StatusCode, Json<BlogPostResponse>), ApiErrorResponse> {
    // Repository generates the ID and timestamps
    let post = req.into_post(String::new())?;

    let created = state
        .db()
        .blog_posts()
        .create(&post)
        .await
        .map_err(|e| db_error(e, "Post", "Failed to create blog post"))?;

    info!(id = %created.id, published = created.published, "created blog post");
    Ok((StatusCode::CREATED, Json(BlogPostResponse::from(created))))
}

#[utoipa::path(
    put,
    path = "/api/v1/blog/{id}",
    tag = "blog",
    params(("id" = String, Path, description = "Post ID")),
    request_body = BlogPostRequest,
    responses(
        (status = 200, description = "Post replaced", body = BlogPostResponse),
        (status = 400, description = "Missing required fields", body = super::ErrorResponse),
        (status = 401, description = "Admin session required", body = super::ErrorResponse),
        (status = 404, description = "Post not found", body = super::ErrorResponse),
        (status = 500, description = "Internal server error", body = super::ErrorResponse)
    )
)]
#[instrument(skip(state, req))]
pub async fn update_post<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
    Json(req): Json<BlogPostRequest>,
) -> Result<Json<BlogPostResponse>, ApiErrorResponse> {
    let post = req.into_post(id)?;

    let updated = state
        .db()
        .blog_posts()
        .update(&post)
        .await
        .map_err(|e| db_error(e, "Post", "Failed to update blog post"))?;

    Ok(Json(BlogPostResponse::from(updated)))
}

#[utoipa::path(
    patch,
    path = "/api/v1/blog/{id}",
    tag = "blog",
    params(("id" = String, Path, description = "Post ID")),
    request_body = PatchBlogPostRequest,
    responses(
        (status = 200, description = "Post updated", body = BlogPostResponse),
        (status = 400, description = "Invalid field value", body = super::ErrorResponse),
        (status = 401, description = "Admin session required", body = super::ErrorResponse),
        (status = 404, description = "Post not found", body = super::ErrorResponse),
        (status = 500, description = "Internal server error", body = super::ErrorResponse)
    )
)]
#[instrument(skip(state, req))]
pub async fn patch_post<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
    Json(req): Json<PatchBlogPostRequest>,
) -> Result<Json<BlogPostResponse>, ApiErrorResponse> {
    let mut post = state
        .db()
        .blog_posts()
        .get(&id)
        .await
        .map_err(|e| db_error(e, "Post", "Failed to fetch blog post"))?;

    req.merge_into(&mut post)?;

    let updated = state
        .db()
        .blog_posts()
        .update(&post)
        .await
        .map_err(|e| db_error(e, "Post", "Failed to update blog post"))?;

    Ok(Json(BlogPostResponse::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/blog/{id}",
    tag = "blog",
    params(("id" = String, Path, description = "Post ID")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 401, description = "Admin session required", body = super::ErrorResponse),
        (status = 404, description = "Post not found", body = super::ErrorResponse),
        (status = 500, description = "Internal server error", body = super::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_post<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiErrorResponse> {
    state
        .db()
        .blog_posts()
        .delete(&id)
        .await
        .map_err(|e| db_error(e, "Post", "Failed to delete blog post"))?;

    info!(%id, "deleted blog post");
    Ok(StatusCode::NO_CONTENT)
}
