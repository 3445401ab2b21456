use axum::{
    Router,
    extract::{FromRef, Request, State},
    http::HeaderName,
    middleware::{self, Next},
    response::{IntoResponse, Response},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod backend;
pub mod config;
pub mod gate;
pub mod handlers;
pub mod models;
pub mod session;

// Route groups mirror the gate's public/protected classification.
pub mod routes;
use routes::{protected, public};

use gate::{Decision, GateInput};
use session::SessionEvidence;

// --- Public Re-exports ---

pub use backend::{BackendState, HttpBackendClient, MockBackend};
pub use config::AppConfig;

/// ApiDoc
///
/// OpenAPI document for the page contexts and the session API. Served from under the public
/// `/api/auth/` prefix so it stays reachable without a session.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::landing, handlers::login, handlers::signup, handlers::forgot_password,
        handlers::verify_otp, handlers::create_session, handlers::destroy_session,
        handlers::select_role, handlers::role_selection, handlers::parent_questionnaire,
        handlers::school_dashboard, handlers::dashboard, handlers::dashboard_section
    ),
    components(
        schemas(
            models::UserInfo, models::SelectableRole, models::CreateSessionRequest,
            models::SessionResponse, models::RoleSelectionRequest, models::RoleSelectionResponse,
            models::PageView, models::SchoolSummary, models::SchoolProfile,
            models::QuestionnairePage, models::SchoolDashboardPage,
        )
    ),
    tags(
        (name = "schoolnet-web", description = "SchoolNet parent/school matchmaking web API")
    )
)]
struct ApiDoc;

/// AppState
///
/// Shared, cheaply cloneable container for everything handlers need.
#[derive(Clone)]
pub struct AppState {
    /// Client for the schoolnet-be REST API.
    pub backend: BackendState,
    /// The loaded, immutable environment configuration.
    pub config: AppConfig,
}

impl FromRef<AppState> for BackendState {
    fn from_ref(app_state: &AppState) -> BackendState {
        app_state.backend.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// access_gate
///
/// Runs `gate::evaluate` for every request that is not a static asset, then either hands
/// the request on or answers with the gate's redirect. Only the cookies are consulted.
async fn access_gate(State(config): State<AppConfig>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    if gate::is_asset_path(&path) {
        return next.run(request).await;
    }

    let evidence = SessionEvidence::from_headers(request.headers(), &config);
    let input = GateInput {
        path: &path,
        token: evidence.token(),
        role: evidence.role(),
    };

    match gate::evaluate(&input) {
        Decision::Pass => next.run(request).await,
        Decision::Redirect(redirect) => {
            tracing::debug!(path = %path, location = %redirect.location(), "access gate redirect");
            redirect.into_response()
        }
    }
}

/// create_router
///
/// Assembles the routes, the access gate and the observability layers.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/api/auth/docs").url("/api/auth/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(protected::protected_routes())
        // Static files; `is_asset_path` lets these past the gate untouched.
        .nest_service("/public", ServeDir::new(&state.config.assets_dir))
        // The gate wraps every route and the fallback, so unknown paths are gated as well.
        .layer(middleware::from_fn_with_state(state.clone(), access_gate))
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span for `TraceLayer` carrying the method, URI and `x-request-id`, so every log line of
/// one request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
