use axum::response::{IntoResponse, Redirect as HttpRedirect, Response};

// --- Landing Routes ---

pub const LOGIN: &str = "/login";
pub const ROLE_SELECTION: &str = "/role-selection";
pub const PARENT_QUESTIONNAIRE: &str = "/parentquestionnaire";
pub const SCHOOL_DASHBOARD: &str = "/school-dashboard";
pub const DASHBOARD: &str = "/dashboard";

/// Query parameter the identity provider reads to send the user back after sign-in.
pub const CALLBACK_URL_PARAM: &str = "callbackUrl";

// --- Route Table ---

/// RouteRule
///
/// A single public-route matcher. The table below is evaluated in order, first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRule {
    /// Matches the route itself or anything below it (`route` or `route/...`).
    PathOrSubPath(&'static str),
    /// Matches any path beginning with the given prefix.
    Prefix(&'static str),
}

impl RouteRule {
    pub fn matches(&self, path: &str) -> bool {
        match *self {
            RouteRule::PathOrSubPath(route) => {
                path == route
                    || path
                        .strip_prefix(route)
                        .is_some_and(|rest| rest.starts_with('/'))
            }
            RouteRule::Prefix(prefix) => path.starts_with(prefix),
        }
    }
}

/// Routes reachable without any session evidence.
pub const PUBLIC_ROUTES: &[RouteRule] = &[
    RouteRule::PathOrSubPath("/"),
    RouteRule::PathOrSubPath(LOGIN),
    RouteRule::PathOrSubPath("/signup"),
    RouteRule::PathOrSubPath("/forgot-pwd"),
    RouteRule::PathOrSubPath("/verify-otp"),
    RouteRule::Prefix("/api/auth/"),
];

/// Path prefixes (after the leading `/`) that never reach the gate at all.
pub const ASSET_PREFIXES: &[&str] = &["_next/static", "_next/image", "favicon.ico", "public/"];

pub fn is_public(path: &str) -> bool {
    PUBLIC_ROUTES.iter().any(|rule| rule.matches(path))
}

/// is_asset_path
///
/// The pipeline filter: static bundles, optimised images, the favicon and everything under
/// `/public/` are served without evaluating the gate.
pub fn is_asset_path(path: &str) -> bool {
    let rest = path.strip_prefix('/').unwrap_or(path);
    ASSET_PREFIXES.iter().any(|prefix| rest.starts_with(prefix))
}

// --- Role ---

/// Role
///
/// The account role claim carried in the user-info cookie.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Role {
    /// No role chosen yet (claim absent, empty, or `"user"`).
    #[default]
    Unset,
    Parent,
    School,
    /// A claim this application does not recognise.
    Unknown(String),
}

impl Role {
    pub fn from_claim(claim: Option<&str>) -> Self {
        match claim {
            None | Some("") | Some("user") => Role::Unset,
            Some("parent") => Role::Parent,
            Some("school") => Role::School,
            Some(other) => Role::Unknown(other.to_string()),
        }
    }

    pub fn as_claim(&self) -> Option<&str> {
        match self {
            Role::Unset => None,
            Role::Parent => Some("parent"),
            Role::School => Some("school"),
            Role::Unknown(claim) => Some(claim.as_str()),
        }
    }

    /// Where an account with this role belongs when it is not somewhere else it may be.
    pub fn landing_path(&self) -> &'static str {
        match self {
            Role::Parent => PARENT_QUESTIONNAIRE,
            Role::School => SCHOOL_DASHBOARD,
            Role::Unset | Role::Unknown(_) => ROLE_SELECTION,
        }
    }
}

// --- Decision ---

/// GateInput
///
/// Everything the gate is allowed to look at for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateInput<'a> {
    pub path: &'a str,
    pub token: Option<&'a str>,
    pub role: Role,
}

/// The fixed set of places the gate may send a visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Login,
    RoleSelection,
    ParentQuestionnaire,
    SchoolDashboard,
    Dashboard,
}

impl Target {
    pub fn path(&self) -> &'static str {
        match self {
            Target::Login => LOGIN,
            Target::RoleSelection => ROLE_SELECTION,
            Target::ParentQuestionnaire => PARENT_QUESTIONNAIRE,
            Target::SchoolDashboard => SCHOOL_DASHBOARD,
            Target::Dashboard => DASHBOARD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub target: Target,
    /// Only populated for `Target::Login`.
    pub callback_url: Option<String>,
}

impl Redirect {
    pub fn to(target: Target) -> Self {
        Self {
            target,
            callback_url: None,
        }
    }

    pub fn to_login(requested_path: &str) -> Self {
        Self {
            target: Target::Login,
            callback_url: Some(requested_path.to_string()),
        }
    }

    /// The `Location` header value, with the callback URL component-encoded.
    pub fn location(&self) -> String {
        match &self.callback_url {
            Some(callback) => format!(
                "{}?{}={}",
                self.target.path(),
                CALLBACK_URL_PARAM,
                urlencoding::encode(callback)
            ),
            None => self.target.path().to_string(),
        }
    }
}

impl IntoResponse for Redirect {
    fn into_response(self) -> Response {
        HttpRedirect::temporary(&self.location()).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Pass,
    Redirect(Redirect),
}

/// evaluate
///
/// Decides the fate of one request from its path, bearer token and role claim.
/// Pure and total: the same input always yields the same decision and nothing is read from
/// or written to anywhere else.
pub fn evaluate(input: &GateInput<'_>) -> Decision {
    let path = input.path;

    if is_public(path) {
        return Decision::Pass;
    }

    if input.token.is_none_or(str::is_empty) {
        return Decision::Redirect(Redirect::to_login(path));
    }

    match &input.role {
        // Unrecognised claims get no more access than an account that has not chosen yet.
        Role::Unset | Role::Unknown(_) => stay_on(path, Target::RoleSelection),
        // A parent who already chose is sent on from role selection to the dashboard.
        Role::Parent if path == ROLE_SELECTION => {
            Decision::Redirect(Redirect::to(Target::Dashboard))
        }
        Role::Parent => stay_on(path, Target::ParentQuestionnaire),
        Role::School => stay_on(path, Target::SchoolDashboard),
    }
}

fn stay_on(path: &str, target: Target) -> Decision {
    if path == target.path() {
        Decision::Pass
    } else {
        Decision::Redirect(Redirect::to(target))
    }
}
