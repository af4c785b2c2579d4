//! Image upload and retrieval handlers.

use axum::{
    Json,
    body::Body,
    extract::{Multipart, Path, State},
    http::{StatusCode, header},
    response::Response,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};
use utoipa::ToSchema;

use super::{ApiErrorResponse, bad_request, db_error, error_response};
use crate::api::AppState;
use crate::db::utils::current_timestamp;
use crate::db::{Database, Image, ImageRepository};

/// Largest accepted image.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Request body limit for the upload route; leaves room for multipart framing.
pub const UPLOAD_BODY_LIMIT: usize = MAX_IMAGE_BYTES + 1024 * 1024;

const UPLOAD_FIELD: &str = "file";
const IMAGE_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    /// Reference to store on a blog post
    #[schema(example = "/api/v1/images/1727712000000-k3j9x2-cover.png")]
    pub image_url: String,
    #[schema(example = "1727712000000-k3j9x2-cover.png")]
    pub file_name: String,
}

/// Reduce a client-supplied file name to `[A-Za-z0-9.-]`, with whitespace
/// runs collapsed to a single `-`.
pub fn sanitize_file_name(original: &str) -> String {
    // Strip any path components and reserved names first.
    let base = sanitize_filename::sanitize(original);

    let mut out = String::with_capacity(base.len());
    let mut in_whitespace = false;
    for c in base.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push('-');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
            out.push(c);
        }
    }

    if out.is_empty() || out.chars().all(|c| c == '.' || c == '-') {
        "image".to_string()
    } else {
        out
    }
}

fn random_suffix() -> String {
    let mut bytes = [0u8; 6];
    if getrandom::fill(&mut bytes).is_err() {
        let nanos = chrono::Utc::now().timestamp_subsec_nanos();
        bytes.copy_from_slice(&nanos.to_be_bytes().repeat(2)[..6]);
    }
    bytes
        .iter()
        .map(|b| BASE36[(*b as usize) % BASE36.len()] as char)
        .collect()
}

/// `<unix-millis>-<6 base36 chars>-<sanitized original name>`
pub fn generate_file_name(original: &str) -> String {
    format!(
        "{}-{}-{}",
        chrono::Utc::now().timestamp_millis(),
        random_suffix(),
        sanitize_file_name(original)
    )
}

/// Resolve the declared MIME type, guessing from the file name when absent.
fn resolve_mime(declared: Option<&str>, file_name: &str) -> String {
    match declared.map(str::trim).filter(|m| !m.is_empty()) {
        Some(m) => m.to_ascii_lowercase(),
        None => mime_guess::from_path(file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string(),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/images",
    tag = "images",
    request_body(content_type = "multipart/form-data", description = "Image in the `file` field"),
    responses(
        (status = 201, description = "Image stored", body = UploadResponse),
        (status = 400, description = "Missing file, not an image, or larger than 5MB", body = super::ErrorResponse),
        (status = 401, description = "Admin session required", body = super::ErrorResponse),
        (status = 413, description = "Request body too large", body = super::ErrorResponse),
        (status = 500, description = "Internal server error", body = super::ErrorResponse)
    )
)]
#[instrument(skip(state, multipart))]
pub async fn upload_image<D: Database>(
    State(state): State<AppState<D>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiErrorResponse> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| error_response(e.status(), e.body_text()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let original_name = field.file_name().unwrap_or("image").to_string();
        let mime_type = resolve_mime(field.content_type(), &original_name);
        if !mime_type.starts_with("image/") {
            return Err(bad_request("File must be an image"));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| error_response(e.status(), e.body_text()))?;
        if data.is_empty() {
            return Err(bad_request("No file provided"));
        }
        if data.len() > MAX_IMAGE_BYTES {
            return Err(bad_request("File size must be less than 5MB"));
        }

        let image = Image {
            file_name: generate_file_name(&original_name),
            mime_type,
            size: data.len(),
            data: data.to_vec(),
            created_at: current_timestamp(),
        };

        state
            .db()
            .images()
            .store(&image)
            .await
            .map_err(|e| db_error(e, "Image", "Failed to upload image"))?;

        info!(file_name = %image.file_name, size = image.size, mime = %image.mime_type, "stored image");
        return Ok((
            StatusCode::CREATED,
            Json(UploadResponse {
                image_url: format!("/api/v1/images/{}", image.file_name),
                file_name: image.file_name,
            }),
        ));
    }

    Err(bad_request("No file provided"))
}

#[utoipa::path(
    get,
    path = "/api/v1/images/{file_name}",
    tag = "images",
    params(("file_name" = String, Path, description = "Generated image file name")),
    responses(
        (status = 200, description = "Raw image bytes with their stored content type"),
        (status = 404, description = "Image not found", body = super::ErrorResponse),
        (status = 500, description = "Internal server error", body = super::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_image<D: Database>(
    State(state): State<AppState<D>>,
    Path(file_name): Path<String>,
) -> Result<Response, ApiErrorResponse> {
    let image = state
        .db()
        .images()
        .get(&file_name)
        .await
        .map_err(|e| db_error(e, "Image", "Failed to fetch image"))?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, &image.mime_type)
        .header(header::CONTENT_LENGTH, image.data.len())
        .header(header::CACHE_CONTROL, IMAGE_CACHE_CONTROL)
        .body(Body::from(image.data))
        .map_err(|e| {
            error!(error = %e, "failed to build image response");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch image")
        })
}
