use schoolnet_web::gate::{
    self, Decision, GateInput, Redirect, Role, RouteRule, Target, is_asset_path, is_public,
};

// --- Helpers ---

fn decide(path: &str, token: Option<&str>, role: Role) -> Decision {
    gate::evaluate(&GateInput { path, token, role })
}

fn redirect_to(target: Target) -> Decision {
    Decision::Redirect(Redirect::to(target))
}

const PROTECTED_PATHS: &[&str] = &[
    "/dashboard",
    "/dashboard/my-list",
    "/role-selection",
    "/parentquestionnaire",
    "/school-dashboard",
    "/messages",
    "/api/schools",
    "/loginx",
];

// --- Route Table ---

#[test]
fn test_public_routes_match_exact_and_sub_paths() {
    for path in [
        "/",
        "/login",
        "/login/sso",
        "/signup",
        "/signup/school",
        "/forgot-pwd",
        "/verify-otp",
        "/verify-otp/resend",
        "/api/auth/session",
        "/api/auth/callback/google",
    ] {
        assert!(is_public(path), "{path} should be public");
    }
}

#[test]
fn test_public_routes_do_not_match_lookalike_prefixes() {
    // Sharing a prefix is not enough; the next character must be a slash.
    for path in ["/loginx", "/signups", "/forgot-pwd2", "/api/auth", "/api/authx/session"] {
        assert!(!is_public(path), "{path} should be protected");
    }
}

#[test]
fn test_root_rule_only_matches_root() {
    let root = RouteRule::PathOrSubPath("/");
    assert!(root.matches("/"));
    assert!(!root.matches("/dashboard"));
}

#[test]
fn test_asset_paths_bypass_gate() {
    assert!(is_asset_path("/_next/static/chunks/main.js"));
    assert!(is_asset_path("/_next/image"));
    assert!(is_asset_path("/favicon.ico"));
    assert!(is_asset_path("/public/logo.png"));

    assert!(!is_asset_path("/public"));
    assert!(!is_asset_path("/dashboard"));
    assert!(!is_asset_path("/static/app.js"));
}

// --- Role ---

#[test]
fn test_role_from_claim() {
    assert_eq!(Role::from_claim(None), Role::Unset);
    assert_eq!(Role::from_claim(Some("")), Role::Unset);
    assert_eq!(Role::from_claim(Some("user")), Role::Unset);
    assert_eq!(Role::from_claim(Some("parent")), Role::Parent);
    assert_eq!(Role::from_claim(Some("school")), Role::School);
    assert_eq!(
        Role::from_claim(Some("admin")),
        Role::Unknown("admin".to_string())
    );
    // Claims are case-sensitive.
    assert_eq!(
        Role::from_claim(Some("Parent")),
        Role::Unknown("Parent".to_string())
    );
}

#[test]
fn test_role_as_claim() {
    assert_eq!(Role::Unset.as_claim(), None);
    assert_eq!(Role::Parent.as_claim(), Some("parent"));
    assert_eq!(Role::School.as_claim(), Some("school"));
    for claim in ["parent", "school", "admin"] {
        assert_eq!(Role::from_claim(Some(claim)).as_claim(), Some(claim));
    }
}

#[test]
fn test_role_landing_paths() {
    assert_eq!(Role::Unset.landing_path(), "/role-selection");
    assert_eq!(Role::Parent.landing_path(), "/parentquestionnaire");
    assert_eq!(Role::School.landing_path(), "/school-dashboard");
    assert_eq!(Role::Unknown("x".into()).landing_path(), "/role-selection");
}

// --- Public Pass ---

#[test]
fn test_public_paths_pass_regardless_of_session() {
    let sessions = [
        (None, Role::Unset),
        (Some("abc"), Role::Unset),
        (Some("abc"), Role::Parent),
        (Some("abc"), Role::School),
        (Some("abc"), Role::Unknown("admin".into())),
    ];
    for path in ["/", "/login", "/signup", "/forgot-pwd", "/verify-otp", "/api/auth/role"] {
        for (token, role) in sessions.iter().cloned() {
            assert_eq!(decide(path, token, role), Decision::Pass, "{path}");
        }
    }
}

// --- Unauthenticated ---

#[test]
fn test_missing_token_redirects_to_login_with_callback() {
    for &path in PROTECTED_PATHS {
        let decision = decide(path, None, Role::Unset);
        assert_eq!(decision, Decision::Redirect(Redirect::to_login(path)));
    }
}

#[test]
fn test_login_redirect_location_is_encoded() {
    let Decision::Redirect(redirect) = decide("/dashboard/my-list", None, Role::Unset) else {
        panic!("expected redirect");
    };
    assert_eq!(redirect.target, Target::Login);
    assert_eq!(redirect.location(), "/login?callbackUrl=%2Fdashboard%2Fmy-list");
}

#[test]
fn test_empty_token_counts_as_missing() {
    assert_eq!(
        decide("/school-dashboard", Some(""), Role::School),
        Decision::Redirect(Redirect::to_login("/school-dashboard"))
    );
}

#[test]
fn test_role_is_ignored_without_token() {
    assert_eq!(
        decide("/parentquestionnaire", None, Role::Parent),
        Decision::Redirect(Redirect::to_login("/parentquestionnaire"))
    );
}

// --- Role Pending ---

#[test]
fn test_pending_role_is_sent_to_role_selection() {
    assert_eq!(
        decide("/school-dashboard", Some("abc"), Role::Unset),
        redirect_to(Target::RoleSelection)
    );
    assert_eq!(
        decide("/dashboard", Some("abc"), Role::Unset),
        redirect_to(Target::RoleSelection)
    );
    assert_eq!(
        decide("/role-selection", Some("abc"), Role::Unset),
        Decision::Pass
    );
}

#[test]
fn test_unknown_role_is_treated_as_pending() {
    let admin = || Role::Unknown("admin".to_string());
    assert_eq!(
        decide("/dashboard", Some("abc"), admin()),
        redirect_to(Target::RoleSelection)
    );
    // No redirect loop: the pending page itself is reachable.
    assert_eq!(decide("/role-selection", Some("abc"), admin()), Decision::Pass);
}

#[test]
fn test_role_selection_sub_path_is_not_role_selection() {
    assert_eq!(
        decide("/role-selection/parent", Some("abc"), Role::Unset),
        redirect_to(Target::RoleSelection)
    );
}

// --- Parent ---

#[test]
fn test_parent_is_held_on_questionnaire() {
    assert_eq!(
        decide("/parentquestionnaire", Some("abc"), Role::Parent),
        Decision::Pass
    );
    for path in ["/school-dashboard", "/dashboard", "/dashboard/my-list", "/messages"] {
        assert_eq!(
            decide(path, Some("abc"), Role::Parent),
            redirect_to(Target::ParentQuestionnaire),
            "{path}"
        );
    }
}

#[test]
fn test_parent_leaving_role_selection_goes_to_dashboard() {
    assert_eq!(
        decide("/role-selection", Some("abc"), Role::Parent),
        redirect_to(Target::Dashboard)
    );
}

// --- School ---

#[test]
fn test_school_is_held_on_school_dashboard() {
    assert_eq!(
        decide("/school-dashboard", Some("abc"), Role::School),
        Decision::Pass
    );
    for path in ["/parentquestionnaire", "/dashboard", "/role-selection"] {
        assert_eq!(
            decide(path, Some("abc"), Role::School),
            redirect_to(Target::SchoolDashboard),
            "{path}"
        );
    }
}

// --- Totality & Purity ---

#[test]
fn test_every_redirect_targets_a_known_landing_route() {
    let allowed = [
        "/login",
        "/role-selection",
        "/parentquestionnaire",
        "/school-dashboard",
        "/dashboard",
    ];
    let roles = [
        Role::Unset,
        Role::Parent,
        Role::School,
        Role::Unknown("admin".into()),
    ];
    for &path in PROTECTED_PATHS {
        for token in [None, Some("abc")] {
            for role in roles.iter().cloned() {
                if let Decision::Redirect(redirect) = decide(path, token, role) {
                    assert!(allowed.contains(&redirect.target.path()));
                    assert_eq!(
                        redirect.callback_url.is_some(),
                        redirect.target == Target::Login
                    );
                }
            }
        }
    }
}

#[test]
fn test_decision_is_deterministic() {
    let input = GateInput {
        path: "/dashboard/my-list",
        token: Some("abc"),
        role: Role::Parent,
    };
    let first = gate::evaluate(&input);
    for _ in 0..10 {
        assert_eq!(gate::evaluate(&input), first);
    }
}
