use crate::domain::models::auth::{IdentitySession, Principal, Role};
use crate::domain::ports::IdentityProvider;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

/// GoTrue-style identity provider client. Credentials live entirely on
/// the provider side; this service only exchanges passwords for token
/// pairs and resolves bearer tokens back into a role/branch metadata
/// blob.
pub struct HttpIdentityProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpIdentityProvider {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
        }
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    user: IdentityUser,
}

#[derive(Deserialize)]
struct IdentityUser {
    id: String,
    email: String,
    #[serde(default)]
    user_metadata: serde_json::Value,
}

impl IdentityUser {
    /// Fails closed: an identity without a parsable role in its metadata
    /// is rejected rather than granted a fallback role.
    fn into_principal(self) -> Result<Principal, AppError> {
        let role = self
            .user_metadata
            .get("role")
            .and_then(|v| v.as_str())
            .and_then(Role::parse)
            .ok_or_else(|| AppError::Unauthenticated("Identity has no role assigned".to_string()))?;

        let branch_id = self
            .user_metadata
            .get("branch_id")
            .and_then(|v| v.as_str())
            .map(str::to_string);
        let member_id = self
            .user_metadata
            .get("member_id")
            .and_then(|v| v.as_str())
            .map(str::to_string);

        Ok(Principal {
            id: self.id,
            email: self.email,
            role,
            branch_id,
            member_id,
        })
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<IdentitySession, AppError> {
        let res = self.client
            .post(format!("{}/token?grant_type=password", self.base_url))
            .header("apikey", &self.api_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| {
                error!("Identity provider connection error: {}", e);
                AppError::Upstream(format!("Identity provider unreachable: {}", e))
            })?;

        if !res.status().is_success() {
            return Err(AppError::Unauthenticated("Invalid credentials".to_string()));
        }

        let token: TokenResponse = res.json().await
            .map_err(|e| AppError::Upstream(format!("Malformed identity response: {}", e)))?;

        Ok(IdentitySession {
            principal: token.user.into_principal()?,
            access_token: token.access_token,
            refresh_token: token.refresh_token,
        })
    }

    async fn validate(&self, bearer_token: &str) -> Result<Principal, AppError> {
        let res = self.client
            .get(format!("{}/user", self.base_url))
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", bearer_token))
            .send()
            .await
            .map_err(|e| {
                // Fail closed: an unreachable provider never authenticates.
                error!("Identity provider connection error: {}", e);
                AppError::Unauthenticated("Authentication failed".to_string())
            })?;

        if !res.status().is_success() {
            return Err(AppError::Unauthenticated("Invalid or expired token".to_string()));
        }

        let user: IdentityUser = res.json().await
            .map_err(|_| AppError::Unauthenticated("Authentication failed".to_string()))?;

        user.into_principal()
    }

    async fn refresh(&self, refresh_token: &str) -> Result<IdentitySession, AppError> {
        let res = self.client
            .post(format!("{}/token?grant_type=refresh_token", self.base_url))
            .header("apikey", &self.api_key)
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await
            .map_err(|e| {
                error!("Identity provider connection error: {}", e);
                AppError::Upstream(format!("Identity provider unreachable: {}", e))
            })?;

        if !res.status().is_success() {
            return Err(AppError::Unauthenticated("Could not refresh session".to_string()));
        }

        let token: TokenResponse = res.json().await
            .map_err(|e| AppError::Upstream(format!("Malformed identity response: {}", e)))?;

        Ok(IdentitySession {
            principal: token.user.into_principal()?,
            access_token: token.access_token,
            refresh_token: token.refresh_token,
        })
    }

    async fn sign_out(&self, bearer_token: &str) -> Result<(), AppError> {
        let res = self.client
            .post(format!("{}/logout", self.base_url))
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", bearer_token))
            .send()
            .await
            .map_err(|e| {
                error!("Identity provider connection error: {}", e);
                AppError::Upstream(format!("Identity provider unreachable: {}", e))
            })?;

        if !res.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Identity provider sign-out failed with status {}",
                res.status()
            )));
        }
        Ok(())
    }
}
