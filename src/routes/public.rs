use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints reachable with no session evidence at all. Every path here must be covered by
/// `gate::PUBLIC_ROUTES`, otherwise anonymous visitors would be bounced to `/login`.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /
        // Landing page.
        .route("/", get(handlers::landing))
        // GET /login?callbackUrl=...
        // Sign-in page; the gate sends unauthenticated visitors here.
        .route("/login", get(handlers::login))
        .route("/signup", get(handlers::signup))
        .route("/forgot-pwd", get(handlers::forgot_password))
        .route("/verify-otp", get(handlers::verify_otp))
        // POST /api/auth/session   (sign-in hand-off from the identity provider)
        // DELETE /api/auth/session (logout)
        .route(
            "/api/auth/session",
            post(handlers::create_session).delete(handlers::destroy_session),
        )
        // POST /api/auth/role
        // Role selection. Public to the gate (an account without a role must reach it),
        // but the handler itself requires a session token.
        .route("/api/auth/role", post(handlers::select_role))
}
