use serde::{Deserialize, Serialize};
use serde_json::json;
use tabled::builder::Builder;
use tabled::{Table, Tabled};

use crate::cli::api_client::ApiClient;
use crate::cli::commands::{PageParams, require_force};
use crate::cli::error::CliResult;
use crate::cli::utils::{apply_table_style, or_dash, truncate_with_ellipsis, yes_no};

#[derive(Debug, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub author: String,
    pub category: String,
    pub published: bool,
    pub image: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Default, Serialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub published: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Tabled)]
pub(crate) struct PostDisplay {
    #[tabled(rename = "ID")]
    pub(crate) id: String,
    #[tabled(rename = "Title")]
    pub(crate) title: String,
    #[tabled(rename = "Category")]
    pub(crate) category: String,
    #[tabled(rename = "Published")]
    pub(crate) published: String,
    #[tabled(rename = "Created")]
    pub(crate) created_at: String,
}

impl From<&BlogPost> for PostDisplay {
    fn from(post: &BlogPost) -> Self {
        Self {
            id: post.id.clone(),
            title: truncate_with_ellipsis(&post.title, 50),
            category: post.category.clone(),
            published: yes_no(post.published).to_string(),
            created_at: post.created_at.clone(),
        }
    }
}

/// List posts. Drafts are included only with `all` (admin session required).
pub async fn list_posts(
    api_client: &ApiClient,
    all: bool,
    category: Option<&str>,
    page: PageParams<'_>,
    format: &str,
) -> CliResult<String> {
    let mut request = api_client.get("/api/v1/blog");
    if all {
        request = request.query(&[("all", "true")]);
    }
    if let Some(c) = category {
        request = request.query(&[("category", c)]);
    }
    let request = page.apply(request);

    let posts: Vec<BlogPost> = ApiClient::handle_response(request.send().await?).await?;

    match format {
        "json" => Ok(serde_json::to_string_pretty(&posts)?),
        _ => Ok(format_table(&posts)),
    }
}

pub(crate) fn format_table(posts: &[BlogPost]) -> String {
    if posts.is_empty() {
        return "No posts found.".to_string();
    }

    let rows: Vec<PostDisplay> = posts.iter().map(|p| p.into()).collect();
    let mut table = Table::new(rows);
    apply_table_style(&mut table);
    table.to_string()
}

/// Get a single post by ID
pub async fn get_post(api_client: &ApiClient, id: &str, format: &str) -> CliResult<String> {
    let response = api_client.get(&format!("/api/v1/blog/{}", id)).send().await?;
    let post: BlogPost = ApiClient::handle_response(response).await?;

    match format {
        "json" => Ok(serde_json::to_string_pretty(&post)?),
        _ => {
            let mut builder = Builder::default();
            builder.push_record(["Field", "Value"]);
            builder.push_record(["ID", &post.id]);
            builder.push_record(["Title", &post.title]);
            builder.push_record(["Author", &post.author]);
            builder.push_record(["Category", &post.category]);
            builder.push_record(["Published", yes_no(post.published)]);
            builder.push_record(["Image", &or_dash(post.image.as_deref().unwrap_or(""))]);
            builder.push_record(["Excerpt", &truncate_with_ellipsis(&post.excerpt, 120)]);
            builder.push_record(["Content", &truncate_with_ellipsis(&post.content, 200)]);
            builder.push_record(["Created", &post.created_at]);
            builder.push_record(["Updated", &post.updated_at]);

            let mut table = builder.build();
            apply_table_style(&mut table);
            Ok(table.to_string())
        }
    }
}

/// Create a new post
pub async fn create_post(api_client: &ApiClient, request: CreatePostRequest) -> CliResult<String> {
    let response = api_client.post("/api/v1/blog").json(&request).send().await?;

    let post: BlogPost = ApiClient::handle_response(response).await?;
    Ok(format!("✓ Created post: {} ({})", post.title, post.id))
}

/// Publish or unpublish a post
pub async fn set_published(api_client: &ApiClient, id: &str, published: bool) -> CliResult<String> {
    let response = api_client
        .patch(&format!("/api/v1/blog/{}", id))
        .json(&json!({ "published": published }))
        .send()
        .await?;

    let post: BlogPost = ApiClient::handle_response(response).await?;
    let verb = if post.published { "Published" } else { "Unpublished" };
    Ok(format!("✓ {} post: {} ({})", verb, post.title, post.id))
}

/// Delete a post (requires --force flag for safety)
pub async fn delete_post(api_client: &ApiClient, id: &str, force: bool) -> CliResult<String> {
    require_force(force)?;

    let response = api_client
        .delete(&format!("/api/v1/blog/{}", id))
        .send()
        .await?;
    ApiClient::expect_success(response).await?;
    Ok(format!("✓ Deleted post: {}", id))
}
