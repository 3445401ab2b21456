use schoolnet_web::{AppConfig, config::Env};
use serial_test::serial;
use std::{env, panic};

// --- Setup/Teardown Utilities ---

const CONFIG_VARS: &[&str] = &[
    "APP_ENV",
    "BIND_ADDR",
    "SCHOOLNET_BE_URL",
    "BACKEND_TIMEOUT_SECS",
    "TOKEN_COOKIE",
    "USER_INFO_COOKIE",
    "SESSION_MAX_AGE_SECS",
    "ASSETS_DIR",
];

/// Runs `test` with a clean slate of config variables and restores the originals afterwards.
fn run_with_env<T, R>(test: T) -> R
where
    T: FnOnce() -> R + panic::UnwindSafe,
{
    let originals: Vec<(&str, Option<String>)> = CONFIG_VARS
        .iter()
        .map(|&var| (var, env::var(var).ok()))
        .collect();

    unsafe {
        for var in CONFIG_VARS {
            env::remove_var(var);
        }
    }

    let result = panic::catch_unwind(test);

    for (key, original_value) in originals.into_iter().rev() {
        unsafe {
            if let Some(val) = original_value {
                env::set_var(key, val);
            } else {
                env::remove_var(key);
            }
        }
    }

    match result {
        Ok(value) => value,
        Err(e) => panic::resume_unwind(e),
    }
}

// --- Tests ---

#[test]
#[serial]
fn test_app_config_production_fail_fast() {
    let result = run_with_env(|| {
        panic::catch_unwind(|| {
            unsafe {
                env::set_var("APP_ENV", "production");
            }
            // SCHOOLNET_BE_URL is missing
            AppConfig::load()
        })
    });

    assert!(
        result.is_err(),
        "Production config loading should panic without a backend URL"
    );
}

#[test]
#[serial]
fn test_app_config_local_env_defaults() {
    let config = run_with_env(|| {
        unsafe {
            env::set_var("APP_ENV", "local");
        }
        AppConfig::load()
    });

    assert_eq!(config.env, Env::Local);
    assert_eq!(config.bind_addr, "0.0.0.0:3000");
    assert_eq!(config.backend_url, "http://localhost:8080/api");
    assert_eq!(config.token_cookie, "token");
    assert_eq!(config.user_info_cookie, "user_info");
    assert_eq!(config.backend_timeout_secs, 10);
    assert!(!config.secure_cookies());
}

#[test]
#[serial]
fn test_app_config_production_overrides() {
    let config = run_with_env(|| {
        unsafe {
            env::set_var("APP_ENV", "production");
            env::set_var("SCHOOLNET_BE_URL", "https://api.schoolnet.example/v1/");
            env::set_var("TOKEN_COOKIE", "sn_token");
            env::set_var("SESSION_MAX_AGE_SECS", "3600");
            env::set_var("BACKEND_TIMEOUT_SECS", "not-a-number");
        }
        AppConfig::load()
    });

    assert_eq!(config.env, Env::Production);
    // Trailing slash trimmed so paths can be appended directly.
    assert_eq!(config.backend_url, "https://api.schoolnet.example/v1");
    assert_eq!(config.token_cookie, "sn_token");
    assert_eq!(config.session_max_age_secs, 3600);
    // Unparsable numbers fall back to the default.
    assert_eq!(config.backend_timeout_secs, 10);
    assert!(config.secure_cookies());
}

#[test]
#[serial]
fn test_unknown_app_env_is_local() {
    let config = run_with_env(|| {
        unsafe {
            env::set_var("APP_ENV", "staging");
        }
        AppConfig::load()
    });

    assert_eq!(config.env, Env::Local);
}
