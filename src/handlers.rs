use crate::{
    AppState,
    backend::{BackendError, BackendState},
    config::AppConfig,
    gate::Role,
    models::{
        CreateSessionRequest, LoginQuery, PageView, QuestionnairePage, RoleSelectionRequest,
        RoleSelectionResponse, SchoolDashboardPage, SessionResponse,
    },
    session::{self, AuthSession},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
};

/// Backend failures surface as 401 when the token was refused, 502 otherwise.
fn backend_status(err: BackendError) -> StatusCode {
    match err {
        BackendError::Unauthorized => {
            tracing::warn!("backend rejected session token");
            StatusCode::UNAUTHORIZED
        }
        other => {
            tracing::error!("backend call failed: {}", other);
            StatusCode::BAD_GATEWAY
        }
    }
}

// --- Public Pages ---

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Page context", body = PageView))
)]
pub async fn landing() -> Json<PageView> {
    Json(PageView::named("landing"))
}

/// login
///
/// [Public Route] The sign-in page. Echoes `callbackUrl` so the identity provider can send
/// the visitor back where the gate stopped them.
#[utoipa::path(
    get,
    path = "/login",
    params(LoginQuery),
    responses((status = 200, description = "Page context", body = PageView))
)]
pub async fn login(Query(query): Query<LoginQuery>) -> Json<PageView> {
    Json(PageView {
        callback_url: query.callback_url,
        ..PageView::named("login")
    })
}

#[utoipa::path(
    get,
    path = "/signup",
    responses((status = 200, description = "Page context", body = PageView))
)]
pub async fn signup() -> Json<PageView> {
    Json(PageView::named("signup"))
}

#[utoipa::path(
    get,
    path = "/forgot-pwd",
    responses((status = 200, description = "Page context", body = PageView))
)]
pub async fn forgot_password() -> Json<PageView> {
    Json(PageView::named("forgot-pwd"))
}

#[utoipa::path(
    get,
    path = "/verify-otp",
    responses((status = 200, description = "Page context", body = PageView))
)]
pub async fn verify_otp() -> Json<PageView> {
    Json(PageView::named("verify-otp"))
}

// --- Session API ---

/// create_session
///
/// [Public Route] Receives the evidence the identity provider issued at sign-in and stores it
/// in the session cookies. The response points at the landing page for the account's role.
#[utoipa::path(
    post,
    path = "/api/auth/session",
    request_body = CreateSessionRequest,
    responses(
        (status = 200, description = "Session cookies set", body = SessionResponse),
        (status = 400, description = "Empty or unusable token")
    )
)]
pub async fn create_session(
    State(config): State<AppConfig>,
    Json(payload): Json<CreateSessionRequest>,
) -> Result<(HeaderMap, Json<SessionResponse>), StatusCode> {
    if !session::is_cookie_value(&payload.token) {
        tracing::warn!("rejected session token that is not a plain cookie value");
        return Err(StatusCode::BAD_REQUEST);
    }

    let mut headers = HeaderMap::new();
    let token_cookie = session::set_cookie(&config.token_cookie, &payload.token, &config, true)
        .map_err(|_| StatusCode::BAD_REQUEST)?;
    let user_info_cookie = session::set_cookie(
        &config.user_info_cookie,
        &payload.user_info.to_cookie_value(),
        &config,
        false,
    )
    .map_err(|_| StatusCode::BAD_REQUEST)?;
    headers.append(header::SET_COOKIE, token_cookie);
    headers.append(header::SET_COOKIE, user_info_cookie);

    let role = payload.user_info.role();
    tracing::info!(role = ?role, "session established");

    Ok((
        headers,
        Json(SessionResponse {
            redirect_to: role.landing_path().to_string(),
        }),
    ))
}

/// destroy_session
///
/// [Public Route] Logout. Expires both session cookies; idempotent.
#[utoipa::path(
    delete,
    path = "/api/auth/session",
    responses((status = 204, description = "Session cookies cleared"))
)]
pub async fn destroy_session(
    State(config): State<AppConfig>,
) -> Result<(StatusCode, HeaderMap), StatusCode> {
    let mut headers = HeaderMap::new();
    for name in [&config.token_cookie, &config.user_info_cookie] {
        let cookie =
            session::clear_cookie(name, &config).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
        headers.append(header::SET_COOKIE, cookie);
    }
    Ok((StatusCode::NO_CONTENT, headers))
}

/// select_role
///
/// [Public Route, session required] Records the role an account picked on the
/// role-selection page with the backend and rewrites the user-info cookie so the gate
/// routes the account accordingly from the next request on.
///
/// A role can only be picked once: accounts that already hold `parent` or `school` get 409.
#[utoipa::path(
    post,
    path = "/api/auth/role",
    request_body = RoleSelectionRequest,
    responses(
        (status = 200, description = "Role recorded", body = RoleSelectionResponse),
        (status = 401, description = "No session"),
        (status = 409, description = "Role already chosen"),
        (status = 502, description = "Backend failure")
    )
)]
pub async fn select_role(
    AuthSession { token, user_info }: AuthSession,
    State(state): State<AppState>,
    Json(payload): Json<RoleSelectionRequest>,
) -> Result<(HeaderMap, Json<RoleSelectionResponse>), StatusCode> {
    if matches!(user_info.role(), Role::Parent | Role::School) {
        return Err(StatusCode::CONFLICT);
    }

    let updated = state
        .backend
        .update_role(&token, payload.role)
        .await
        .map_err(backend_status)?;

    // Keep the display fields already in the cookie; take the role the backend confirmed.
    let mut user_info = user_info;
    user_info.role = updated
        .role
        .or_else(|| Some(payload.role.as_str().to_string()));
    let role = user_info.role();

    let cookie = session::set_cookie(
        &state.config.user_info_cookie,
        &user_info.to_cookie_value(),
        &state.config,
        false,
    )
    .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    let mut headers = HeaderMap::new();
    headers.append(header::SET_COOKIE, cookie);

    tracing::info!(role = ?role, "role selected");

    Ok((
        headers,
        Json(RoleSelectionResponse {
            role: payload.role,
            redirect_to: role.landing_path().to_string(),
        }),
    ))
}

// --- Protected Pages ---

#[utoipa::path(
    get,
    path = "/role-selection",
    responses((status = 200, description = "Page context", body = PageView))
)]
pub async fn role_selection() -> Json<PageView> {
    Json(PageView::named("role-selection"))
}

/// parent_questionnaire
///
/// [Protected Route, parent] The matchmaking questionnaire, with the school directory
/// fetched from the backend.
#[utoipa::path(
    get,
    path = "/parentquestionnaire",
    responses(
        (status = 200, description = "Questionnaire and schools", body = QuestionnairePage),
        (status = 502, description = "Backend failure")
    )
)]
pub async fn parent_questionnaire(
    auth: AuthSession,
    State(backend): State<BackendState>,
) -> Result<Json<QuestionnairePage>, StatusCode> {
    let schools = backend
        .list_schools(&auth.token)
        .await
        .map_err(backend_status)?;

    Ok(Json(QuestionnairePage {
        page: "parentquestionnaire".to_string(),
        schools,
    }))
}

/// school_dashboard
///
/// [Protected Route, school] The school's own dashboard.
#[utoipa::path(
    get,
    path = "/school-dashboard",
    responses(
        (status = 200, description = "School dashboard", body = SchoolDashboardPage),
        (status = 502, description = "Backend failure")
    )
)]
pub async fn school_dashboard(
    auth: AuthSession,
    State(backend): State<BackendState>,
) -> Result<Json<SchoolDashboardPage>, StatusCode> {
    let profile = backend
        .get_school_profile(&auth.token)
        .await
        .map_err(backend_status)?;

    Ok(Json(SchoolDashboardPage {
        page: "school-dashboard".to_string(),
        profile,
    }))
}

#[utoipa::path(
    get,
    path = "/dashboard",
    responses((status = 200, description = "Page context", body = PageView))
)]
pub async fn dashboard() -> Json<PageView> {
    Json(PageView::named("dashboard"))
}

#[utoipa::path(
    get,
    path = "/dashboard/{section}",
    params(("section" = String, Path, description = "Dashboard sub-page, e.g. my-list")),
    responses((status = 200, description = "Page context", body = PageView))
)]
pub async fn dashboard_section(Path(section): Path<String>) -> Json<PageView> {
    Json(PageView {
        section: Some(section),
        ..PageView::named("dashboard")
    })
}
