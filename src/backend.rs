use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

use crate::models::{SchoolProfile, SchoolSummary, SelectableRole, UserInfo};

/// BackendError
///
/// Failure modes of a call to schoolnet-be.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("backend unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    /// The backend rejected the bearer token (401/403).
    #[error("backend rejected the session token")]
    Unauthorized,
    #[error("backend responded with status {0}")]
    Status(u16),
    #[error("backend response could not be decoded: {0}")]
    Decode(String),
}

// 1. BackendApi Contract
/// BackendApi
///
/// The calls this application makes to schoolnet-be on behalf of a signed-in visitor.
/// Every call carries the visitor's token as `Authorization: Bearer <token>`.
#[async_trait]
pub trait BackendApi: Send + Sync {
    /// Records the role the account picked on the role-selection page and returns the
    /// updated user record.
    async fn update_role(
        &self,
        token: &str,
        role: SelectableRole,
    ) -> Result<UserInfo, BackendError>;

    /// The school directory shown to parents.
    async fn list_schools(&self, token: &str) -> Result<Vec<SchoolSummary>, BackendError>;

    /// The profile of the school account the token belongs to.
    async fn get_school_profile(&self, token: &str) -> Result<SchoolProfile, BackendError>;
}

// 2. The Real Implementation
/// HttpBackendClient
#[derive(Clone)]
pub struct HttpBackendClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Checks the status, then decodes the JSON body.
    async fn read_json<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, BackendError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(BackendError::Unauthorized);
        }
        if !status.is_success() {
            return Err(BackendError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| BackendError::Decode(e.to_string()))
    }
}

#[async_trait]
impl BackendApi for HttpBackendClient {
    async fn update_role(
        &self,
        token: &str,
        role: SelectableRole,
    ) -> Result<UserInfo, BackendError> {
        let response = self
            .client
            .put(self.url("/users/role"))
            .bearer_auth(token)
            .json(&serde_json::json!({ "role": role }))
            .send()
            .await?;

        Self::read_json(response).await
    }

    async fn list_schools(&self, token: &str) -> Result<Vec<SchoolSummary>, BackendError> {
        let response = self
            .client
            .get(self.url("/schools"))
            .bearer_auth(token)
            .send()
            .await?;

        Self::read_json(response).await
    }

    async fn get_school_profile(&self, token: &str) -> Result<SchoolProfile, BackendError> {
        let response = self
            .client
            .get(self.url("/schools/me"))
            .bearer_auth(token)
            .send()
            .await?;

        Self::read_json(response).await
    }
}

// 3. The Mock Implementation (For Tests)
/// MockBackend
///
/// Deterministic stand-in for schoolnet-be so handlers can be exercised without a network.
#[derive(Clone, Default)]
pub struct MockBackend {
    /// When true, every call fails with `BackendError::Status(503)`.
    pub should_fail: bool,
    pub schools: Vec<SchoolSummary>,
    pub school_profile: SchoolProfile,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    pub fn with_schools(schools: Vec<SchoolSummary>) -> Self {
        Self {
            schools,
            ..Self::default()
        }
    }

    fn check(&self) -> Result<(), BackendError> {
        if self.should_fail {
            return Err(BackendError::Status(503));
        }
        Ok(())
    }
}

#[async_trait]
impl BackendApi for MockBackend {
    async fn update_role(
        &self,
        _token: &str,
        role: SelectableRole,
    ) -> Result<UserInfo, BackendError> {
        self.check()?;
        Ok(UserInfo {
            role: Some(role.as_str().to_string()),
            ..UserInfo::default()
        })
    }

    async fn list_schools(&self, _token: &str) -> Result<Vec<SchoolSummary>, BackendError> {
        self.check()?;
        Ok(self.schools.clone())
    }

    async fn get_school_profile(&self, _token: &str) -> Result<SchoolProfile, BackendError> {
        self.check()?;
        Ok(self.school_profile.clone())
    }
}

/// BackendState
///
/// The shared handle to the backend client held in `AppState`.
pub type BackendState = Arc<dyn BackendApi>;
