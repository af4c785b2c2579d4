//! School registration handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;

use super::{ApiErrorResponse, ListRecordsQuery, db_error, non_blank, require_fields};
use crate::api::AppState;
use crate::db::{Database, RecordQuery, School, SchoolRepository};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SchoolResponse {
    #[schema(example = "a1b2c3d4")]
    pub id: String,
    #[schema(example = "Sunrise Public School")]
    pub name: String,
    #[schema(example = "office@sunrise.example")]
    pub email: String,
    pub phone: String,
    pub address: String,
    pub website: String,
    #[schema(example = "active")]
    pub status: String,
    pub created_at: String,
}

impl From<School> for SchoolResponse {
    fn from(s: School) -> Self {
        Self {
            id: s.id,
            name: s.name,
            email: s.email,
            phone: s.phone,
            address: s.address,
            website: s.website,
            status: s.status,
            created_at: s.created_at,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateSchoolRequest {
    #[schema(example = "Sunrise Public School")]
    pub name: Option<String>,
    #[schema(example = "office@sunrise.example")]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PatchSchoolRequest {
    #[schema(example = "inactive")]
    pub status: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
}

impl PatchSchoolRequest {
    fn merge_into(self, target: &mut School) {
        if let Some(status) = non_blank(self.status) {
            target.status = status;
        }
        if let Some(name) = non_blank(self.name) {
            target.name = name;
        }
        if let Some(email) = non_blank(self.email) {
            target.email = email;
        }
        if let Some(phone) = self.phone {
            target.phone = phone.trim().to_string();
        }
        if let Some(address) = self.address {
            target.address = address.trim().to_string();
        }
        if let Some(website) = self.website {
            target.website = website.trim().to_string();
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/schools",
    tag = "schools",
    request_body = CreateSchoolRequest,
    responses(
        (status = 201, description = "School registered", body = SchoolResponse),
        (status = 400, description = "Missing required fields", body = super::ErrorResponse),
        (status = 500, description = "Internal server error", body = super::ErrorResponse)
    )
)]
#[instrument(skip(state, req))]
pub async fn create_school<D: Database>(
    State(state): State<AppState<D>>,
    Json(req): Json<CreateSchoolRequest>,
) -> Result<(StatusCode, Json<SchoolResponse>), ApiErrorResponse> {
    require_fields(&[("name", req.name.as_deref()), ("email", req.email.as_deref())])?;

    let school = School {
        id: String::new(),
        name: non_blank(req.name).unwrap_or_default(),
        email: non_blank(req.email).unwrap_or_default(),
        phone: non_blank(req.phone).unwrap_or_default(),
        address: non_blank(req.address).unwrap_or_default(),
        website: non_blank(req.website).unwrap_or_default(),
        status: String::new(),
        created_at: String::new(),
    };

    let created = state
        .db()
        .schools()
        .create(&school)
        .await
        .map_err(|e| db_error(e, "School", "Failed to create school"))?;

    info!(id = %created.id, "registered school");
    Ok((StatusCode::CREATED, Json(SchoolResponse::from(created))))
}

#[utoipa::path(
    get,
    path = "/api/v1/schools",
    tag = "schools",
    params(ListRecordsQuery),
    responses(
        (status = 200, description = "Schools, newest first", body = Vec<SchoolResponse>),
        (status = 401, description = "Admin session required", body = super::ErrorResponse),
        (status = 500, description = "Internal server error", body = super::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_schools<D: Database>(
    State(state): State<AppState<D>>,
    Query(query): Query<ListRecordsQuery>,
) -> Result<Json<Vec<SchoolResponse>>, ApiErrorResponse> {
    let db_query = RecordQuery::from(query);

    let result = state
        .db()
        .schools()
        .list(Some(&db_query))
        .await
        .map_err(|e| db_error(e, "School", "Failed to fetch schools"))?;

    Ok(Json(
        result.items.into_iter().map(SchoolResponse::from).collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/schools/{id}",
    tag = "schools",
    params(("id" = String, Path, description = "School ID")),
    responses(
        (status = 200, description = "School found", body = SchoolResponse),
        (status = 401, description = "Admin session required", body = super::ErrorResponse),
        (status = 404, description = "School not found", body = super::ErrorResponse),
        (status = 500, description = "Internal server error", body = super::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_school<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
) -> Result<Json<SchoolResponse>, ApiErrorResponse> {
    let school = state
        .db()
        .schools()
        .get(&id)
        .await
        .map_err(|e| db_error(e, "School", "Failed to fetch school"))?;

    Ok(Json(SchoolResponse::from(school)))
}

#[utoipa::path(
    patch,
    path = "/api/v1/schools/{id}",
    tag = "schools",
    params(("id" = String, Path, description = "School ID")),
    request_body = PatchSchoolRequest,
    responses(
        (status = 200, description = "School updated", body = SchoolResponse),
        (status = 401, description = "Admin session required", body = super::ErrorResponse),
        (status = 404, description = "School not found", body = super::ErrorResponse),
        (status = 500, description = "Internal server error", body = super::ErrorResponse)
    )
)]
#[instrument(skip(state, req))]
pub async fn patch_school<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
    Json(req): Json<PatchSchoolRequest>,
) -> Result<Json<SchoolResponse>, ApiErrorResponse> {
    let mut school = state
        .db()
        .schools()
        .get(&id)
        .await
        .map_err(|e| db_error(e, "School", "Failed to fetch school"))?;

    req.merge_into(&mut school);

    let updated = state
        .db()
        .schools()
        .update(&school)
        .await
        .map_err(|e| db_error(e, "School", "Failed to update school"))?;

    Ok(Json(SchoolResponse::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/schools/{id}",
    tag = "schools",
    params(("id" = String, Path, description = "School ID")),
    responses(
        (status = 204, description = "School deleted"),
        (status = 401, description = "Admin session required", body = super::ErrorResponse),
        (status = 404, description = "School not found", body = super::ErrorResponse),
        (status = 500, description = "Internal server error", body = super::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_school<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiErrorResponse> {
    state
        .db()
        .schools()
        .delete(&id)
        .await
        .map_err(|e| db_error(e, "School", "Failed to delete school"))?;

    Ok(StatusCode::NO_CONTENT)
}
