use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::gate::Role;

// --- Session Schemas ---

/// UserInfo
///
/// The record carried (URL-encoded JSON) in the user-info cookie. Only `role` drives routing;
/// the remaining fields are display data handed through to the view layer. Unknown fields
/// in the cookie are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default, PartialEq, Eq)]
#[ts(export)]
pub struct UserInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    // "user" until the account picks a side, then "parent" or "school".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl UserInfo {
    pub fn role(&self) -> Role {
        Role::from_claim(self.role.as_deref())
    }
}

/// SelectableRole
///
/// The roles an account may pick on the role-selection page.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum SelectableRole {
    Parent,
    School,
}

impl SelectableRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectableRole::Parent => "parent",
            SelectableRole::School => "school",
        }
    }
}

impl From<SelectableRole> for Role {
    fn from(role: SelectableRole) -> Self {
        match role {
            SelectableRole::Parent => Role::Parent,
            SelectableRole::School => Role::School,
        }
    }
}

/// CreateSessionRequest
///
/// Session evidence handed over by the identity provider after a successful sign-in
/// (POST /api/auth/session).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateSessionRequest {
    pub token: String,
    #[serde(default)]
    pub user_info: UserInfo,
}

/// SessionResponse
///
/// Tells the client where to go once the session cookies are in place.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SessionResponse {
    pub redirect_to: String,
}

/// RoleSelectionRequest
///
/// Input payload for POST /api/auth/role.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct RoleSelectionRequest {
    pub role: SelectableRole,
}

/// RoleSelectionResponse
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RoleSelectionResponse {
    pub role: SelectableRole,
    /// Landing page for the newly chosen role.
    pub redirect_to: String,
}

// --- Page Contexts (Output) ---

/// LoginQuery
///
/// Query parameters accepted by GET /login.
#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LoginQuery {
    #[serde(rename = "callbackUrl")]
    pub callback_url: Option<String>,
}

/// PageView
///
/// The context a page endpoint returns to the client-side renderer.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PageView {
    pub page: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
}

impl PageView {
    pub fn named(page: &str) -> Self {
        Self {
            page: page.to_string(),
            ..Default::default()
        }
    }
}

/// SchoolSummary
///
/// One entry of the backend's school directory, as listed to parents.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default, PartialEq)]
#[ts(export)]
pub struct SchoolSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub curriculum: Option<String>,
}

/// SchoolProfile
///
/// The signed-in school's own profile.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default, PartialEq)]
#[ts(export)]
pub struct SchoolProfile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// QuestionnairePage
///
/// GET /parentquestionnaire: the questionnaire shell plus the schools a parent can rank.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct QuestionnairePage {
    pub page: String,
    pub schools: Vec<SchoolSummary>,
}

/// SchoolDashboardPage
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SchoolDashboardPage {
    pub page: String,
    pub profile: SchoolProfile,
}
