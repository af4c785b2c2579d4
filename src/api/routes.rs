//! API route configuration.

use std::path::Path;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{delete, get, patch, post, put};
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use super::state::AppState;
use super::v1::{
    self, BlogPostRequest, BlogPostResponse, CreateLeadRequest, CreateSchoolRequest,
    ErrorResponse, HealthResponse, LeadResponse, LoginRequest, PatchBlogPostRequest,
    PatchLeadRequest, PatchSchoolRequest, SchoolResponse, SessionResponse, UploadResponse,
    VoiceAgentResponse,
};
use super::{guard_admin_pages, require_admin};
use crate::db::Database;

/// Build routes with generic database type.
///
/// This macro reduces boilerplate when registering handlers that are generic
/// over the Database trait. It applies the turbofish operator automatically.
macro_rules! routes {
    ($D:ty => {
        $($method:ident $path:literal => $($handler:ident)::+),* $(,)?
    }) => {{
        let router = Router::new();
        $(
            let router = router.route($path, $method($($handler)::+::<$D>));
        )*
        router
    }};
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Gyan Rich API",
        version = "0.3.0",
        description = "Blog, intake forms, image store and voice agent configuration for the Gyan Rich site",
        license(name = "MIT")
    ),
    paths(
        v1::health,
        v1::list_posts,
        v1::get_post,
        v1::create_post,
        v1::update_post,
        v1::patch_post,
        v1::delete_post,
        v1::create_lead,
        v1::list_leads,
        v1::get_lead,
        v1::patch_lead,
        v1::delete_lead,
        v1::create_school,
        v1::list_schools,
        v1::get_school,
        v1::patch_school,
        v1::delete_school,
        v1::upload_image,
        v1::get_image,
        v1::voice_agent_config,
        v1::login,
        v1::logout,
        v1::session_status,
    ),
    components(
        schemas(
            HealthResponse,
            BlogPostResponse,
            BlogPostRequest,
            PatchBlogPostRequest,
            LeadResponse,
            CreateLeadRequest,
            PatchLeadRequest,
            SchoolResponse,
            CreateSchoolRequest,
            PatchSchoolRequest,
            UploadResponse,
            VoiceAgentResponse,
            LoginRequest,
            SessionResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "system", description = "System health and status endpoints"),
        (name = "blog", description = "Blog posts; writes require an admin session"),
        (name = "leads", description = "Contact form submissions"),
        (name = "schools", description = "School registrations"),
        (name = "images", description = "Image upload and delivery"),
        (name = "voice", description = "Voice agent configuration"),
        (name = "admin", description = "Admin session management")
    )
)]
pub struct ApiDoc;

/// Create the API router with OpenAPI documentation.
///
/// When `public_dir` is set, unmatched paths are served from it, and pages
/// under `/admin` require a session.
pub fn create_router<D: Database>(
    state: AppState<D>,
    enable_docs: bool,
    public_dir: Option<&Path>,
) -> Router {
    // System routes (non-generic)
    let system_routes = Router::new().route("/health", get(v1::health));

    // Open to site visitors
    let public_routes = routes!(D => {
        get "/api/v1/blog" => v1::list_posts,
        get "/api/v1/blog/{id}" => v1::get_post,
        post "/api/v1/leads" => v1::create_lead,
        post "/api/v1/schools" => v1::create_school,
        get "/api/v1/images/{file_name}" => v1::get_image,
        get "/api/v1/voice-agent" => v1::voice_agent_config,
        post "/api/v1/admin/login" => v1::login,
        post "/api/v1/admin/logout" => v1::logout,
        get "/api/v1/admin/session" => v1::session_status,
    });

    let upload_route = Router::new().route(
        "/api/v1/images",
        post(v1::upload_image::<D>).layer(DefaultBodyLimit::max(v1::UPLOAD_BODY_LIMIT)),
    );

    // Admin session required
    let admin_routes = routes!(D => {
        post "/api/v1/blog" => v1::create_post,
        put "/api/v1/blog/{id}" => v1::update_post,
        patch "/api/v1/blog/{id}" => v1::patch_post,
        delete "/api/v1/blog/{id}" => v1::delete_post,
        get "/api/v1/leads" => v1::list_leads,
        get "/api/v1/leads/{id}" => v1::get_lead,
        patch "/api/v1/leads/{id}" => v1::patch_lead,
        delete "/api/v1/leads/{id}" => v1::delete_lead,
        get "/api/v1/schools" => v1::list_schools,
        get "/api/v1/schools/{id}" => v1::get_school,
        patch "/api/v1/schools/{id}" => v1::patch_school,
        delete "/api/v1/schools/{id}" => v1::delete_school,
    })
    .merge(upload_route)
    .route_layer(middleware::from_fn_with_state(
        state.clone(),
        require_admin::<D>,
    ));

    let mut router = system_routes.merge(public_routes).merge(admin_routes);

    if enable_docs {
        router = router.merge(Scalar::with_url("/docs", ApiDoc::openapi()));
    }

    if let Some(dir) = public_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(middleware::from_fn_with_state(
            state.clone(),
            guard_admin_pages::<D>,
        ))
        .with_state(state)
}
