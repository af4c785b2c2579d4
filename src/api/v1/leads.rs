//! Lead (contact form) handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::{IntoParams, ToSchema};

use super::{ApiErrorResponse, bad_request, db_error, non_blank, parse_sort_order, require_fields};
use crate::api::AppState;
use crate::db::{Database, Lead, LeadRepository, PageSort, RecordQuery};

// =============================================================================
// DTOs
// =============================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LeadResponse {
    #[schema(example = "a1b2c3d4")]
    pub id: String,
    #[schema(example = "Asha Verma")]
    pub name: String,
    #[schema(example = "asha@example.com")]
    pub email: String,
    #[schema(example = "+91 98765 43210")]
    pub phone: String,
    pub school_name: String,
    pub message: String,
    #[schema(example = "new")]
    pub status: String,
    pub created_at: String,
}

impl From<Lead> for LeadResponse {
    fn from(l: Lead) -> Self {
        Self {
            id: l.id,
            name: l.name,
            email: l.email,
            phone: l.phone,
            school_name: l.school_name,
            message: l.message,
            status: l.status,
            created_at: l.created_at,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateLeadRequest {
    #[schema(example = "Asha Verma")]
    pub name: Option<String>,
    #[schema(example = "asha@example.com")]
    pub email: Option<String>,
    #[schema(example = "+91 98765 43210")]
    pub phone: Option<String>,
    #[serde(alias = "schoolName")]
    pub school_name: Option<String>,
    pub message: Option<String>,
}

/// Admin follow-up on a lead.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PatchLeadRequest {
    #[schema(example = "contacted")]
    pub status: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub school_name: Option<String>,
    pub message: Option<String>,
}

impl PatchLeadRequest {
    fn merge_into(self, target: &mut Lead) -> Result<(), ApiErrorResponse> {
        if self.status.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return Err(bad_request("Field 'status' cannot be empty"));
        }
        if let Some(status) = non_blank(self.status) {
            target.status = status;
        }
        if let Some(name) = non_blank(self.name) {
            target.name = name;
        }
        if let Some(email) = non_blank(self.email) {
            target.email = email;
        }
        if let Some(phone) = non_blank(self.phone) {
            target.phone = phone;
        }
        if let Some(school_name) = self.school_name {
            target.school_name = school_name.trim().to_string();
        }
        if let Some(message) = self.message {
            target.message = message;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListRecordsQuery {
    /// Filter by status
    #[param(example = "new")]
    pub status: Option<String>,
    /// Maximum number of items to return
    #[param(example = 50)]
    pub limit: Option<usize>,
    /// Number of items to skip
    #[param(example = 0)]
    pub offset: Option<usize>,
    /// Field to sort by (name, email, status, created_at)
    #[param(example = "created_at")]
    pub sort: Option<String>,
    /// Sort order (asc, desc)
    #[param(example = "desc")]
    pub order: Option<String>,
}

impl From<ListRecordsQuery> for RecordQuery {
    fn from(query: ListRecordsQuery) -> Self {
        RecordQuery {
            page: PageSort {
                limit: query.limit,
                offset: query.offset,
                sort_by: query.sort,
                sort_order: parse_sort_order(query.order.as_deref()),
            },
            status: non_blank(query.status),
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

#[utoipa::path(
    post,
    path = "/api/v1/leads",
    tag = "leads",
    request_body = CreateLeadRequest,
    responses(
        (status = 201, description = "Lead recorded", body = LeadResponse),
        (status = 400, description = "Missing required fields", body = super::ErrorResponse),
        (status = 500, description = "Internal server error", body = super::ErrorResponse)
    )
)]
#[instrument(skip(state, req))]
pub async fn create_lead<D: Database>(
    State(state): State<AppState<D>>,
    Json(req): Json<CreateLeadRequest>,
) -> Result<(StatusCode, Json<LeadResponse>), ApiErrorResponse> {
    require_fields(&[
        ("name", req.name.as_deref()),
        ("email", req.email.as_deref()),
        ("phone", req.phone.as_deref()),
    ])?;

    // Repository generates the ID, timestamp and initial status
    let lead = Lead {
        id: String::new(),
        name: non_blank(req.name).unwrap_or_default(),
        email: non_blank(req.email).unwrap_or_default(),
        phone: non_blank(req.phone).unwrap_or_default(),
        school_name: non_blank(req.school_name).unwrap_or_default(),
        message: req.message.unwrap_or_default(),
        status: String::new(),
        created_at: String::new(),
    };

    let created = state
        .db()
        .leads()
        .create(&lead)
        .await
        .map_err(|e| db_error(e, "Lead", "Failed to create lead"))?;

    info!(id = %created.id, "recorded lead");
    Ok((StatusCode::CREATED, Json(LeadResponse::from(created))))
}

#[utoipa::path(
    get,
    path = "/api/v1/leads",
    tag = "leads",
    params(ListRecordsQuery),
    responses(
        (status = 200, description = "Leads, newest first", body = Vec<LeadResponse>),
        (status = 401, description = "Admin session required", body = super::ErrorResponse),
        (status = 500, description = "Internal server error", body = super::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_leads<D: Database>(
    State(state): State<AppState<D>>,
    Query(query): Query<ListRecordsQuery>,
) -> Result<Json<Vec<LeadResponse>>, ApiErrorResponse> {
    let db_query = RecordQuery::from(query);

    let result = state
        .db()
        .leads()
        .list(Some(&db_query))
        .await
        .map_err(|e| db_error(e, "Lead", "Failed to fetch leads"))?;

    Ok(Json(
        result.items.into_iter().map(LeadResponse::from).collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/leads/{id}",
    tag = "leads",
    params(("id" = String, Path, description = "Lead ID")),
    responses(
        (status = 200, description = "Lead found", body = LeadResponse),
        (status = 401, description = "Admin session required", body = super::ErrorResponse),
        (status = 404, description = "Lead not found", body = super::ErrorResponse),
        (status = 500, description = "Internal server error", body = super::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_lead<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
) -> Result<Json<LeadResponse>, ApiErrorResponse> {
    let lead = state
        .db()
        .leads()
        .get(&id)
        .await
        .map_err(|e| db_error(e, "Lead", "Failed to fetch lead"))?;

    Ok(Json(LeadResponse::from(lead)))
}

#[utoipa::path(
    patch,
    path = "/api/v1/leads/{id}",
    tag = "leads",
    params(("id" = String, Path, description = "Lead ID")),
    request_body = PatchLeadRequest,
    responses(
        (status = 200, description = "Lead updated", body = LeadResponse),
        (status = 400, description = "Invalid field value", body = super::ErrorResponse),
        (status = 401, description = "Admin session required", body = super::ErrorResponse),
        (status = 404, description = "Lead not found", body = super::ErrorResponse),
        (status = 500, description = "Internal server error", body = super::ErrorResponse)
    )
)]
#[instrument(skip(state, req))]
pub async fn patch_lead<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
    Json(req): Json<PatchLeadRequest>,
) -> Result<Json<LeadResponse>, ApiErrorResponse> {
    let mut lead = state
        .db()
        .leads()
        .get(&id)
        .await
        .map_err(|e| db_error(e, "Lead", "Failed to fetch lead"))?;

    req.merge_into(&mut lead)?;

    let updated = state
        .db()
        .leads()
        .update(&lead)
        .await
        .map_err(|e| db_error(e, "Lead", "Failed to update lead"))?;

    Ok(Json(LeadResponse::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/leads/{id}",
    tag = "leads",
    params(("id" = String, Path, description = "Lead ID")),
    responses(
        (status = 204, description = "Lead deleted"),
        (status = 401, description = "Admin session required", body = super::ErrorResponse),
        (status = 404, description = "Lead not found", body = super::ErrorResponse),
        (status = 500, description = "Internal server error", body = super::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_lead<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiErrorResponse> {
    state
        .db()
        .leads()
        .delete(&id)
        .await
        .map_err(|e| db_error(e, "Lead", "Failed to delete lead"))?;

    Ok(StatusCode::NO_CONTENT)
}
