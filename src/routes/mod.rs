//! Router Module Index
//!
//! Splits the application's routes the same way the access gate classifies paths. The gate
//! middleware wraps both routers, so the split here documents intent; enforcement lives in
//! `gate::evaluate`.

/// Routes matched by the gate's public route table (sign-in pages and `/api/auth/*`).
pub mod public;

/// Routes the gate only admits with a session token and the matching role.
pub mod protected;
