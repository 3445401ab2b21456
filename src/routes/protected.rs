use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Protected Router Module
///
/// Pages the gate admits only to signed-in accounts, and only the page matching the
/// account's role:
/// - no role yet: `/role-selection`
/// - parent: `/parentquestionnaire`
/// - school: `/school-dashboard`
///
/// `/dashboard` is where a parent leaving role selection is sent.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/role-selection", get(handlers::role_selection))
        // GET /parentquestionnaire
        // Proxies the school directory from schoolnet-be with the visitor's bearer token.
        .route("/parentquestionnaire", get(handlers::parent_questionnaire))
        // GET /school-dashboard
        // Proxies the school's own profile from schoolnet-be.
        .route("/school-dashboard", get(handlers::school_dashboard))
        .route("/dashboard", get(handlers::dashboard))
        .route("/dashboard/{section}", get(handlers::dashboard_section))
}
