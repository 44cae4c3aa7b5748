use std::time::{Duration, Instant};

use async_trait::async_trait;
use cirrus_config::Credentials;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::error::ClientError;

/// Abstraction over bearer-token acquisition; enables test injection.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn token(&self) -> Result<String, ClientError>;
}

// ── Service Principal ─────────────────────────────────────────────────────────

/// OAuth2 client-credentials flow against the login endpoint. Tokens are
/// cached until shortly before expiry.
pub struct ServicePrincipalTokenProvider {
    tenant_id: String,
    client_id: String,
    client_secret: String,
    login_base: String,
    client: reqwest::Client,
    cache: Mutex<Option<(String, Instant)>>,
}

impl ServicePrincipalTokenProvider {
    pub fn new(credentials: &Credentials, login_base: String, client: reqwest::Client) -> Self {
        Self {
            tenant_id: credentials.tenant_id.clone(),
            client_id: credentials.client_id.clone(),
            client_secret: credentials.client_secret.clone(),
            login_base,
            client,
            cache: Mutex::new(None),
        }
    }
}

#[async_trait]
impl TokenProvider for ServicePrincipalTokenProvider {
    async fn token(&self) -> Result<String, ClientError> {
        {
            let guard = self.cache.lock().await;
            if let Some((tok, expiry)) = guard.as_ref() {
                if Instant::now() < *expiry {
                    return Ok(tok.clone());
                }
            }
        }

        let url = format!("{}/{}/oauth2/v2.0/token", self.login_base, self.tenant_id);
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("scope", "https://management.azure.com/.default"),
        ];
        let resp: Value = self
            .client
            .post(&url)
            .form(&params)
            .send()
            .await
            .map_err(|e| ClientError::Token(format!("token request: {}", e)))?
            .json()
            .await
            .map_err(|e| ClientError::Token(format!("token decode: {}", e)))?;

        let tok = resp["access_token"]
            .as_str()
            .ok_or_else(|| ClientError::Token(format!("no access_token in response: {}", resp)))?
            .to_string();
        let expires_in = resp["expires_in"].as_u64().unwrap_or(3600);
        let expiry = Instant::now() + Duration::from_secs(expires_in.saturating_sub(60));

        *self.cache.lock().await = Some((tok.clone(), expiry));
        Ok(tok)
    }
}

// ── Static (tests) ────────────────────────────────────────────────────────────

pub struct StaticToken(pub String);

#[async_trait]
impl TokenProvider for StaticToken {
    async fn token(&self) -> Result<String, ClientError> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cirrus_domain::SubscriptionId;
    use serde_json::json;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn credentials() -> Credentials {
        Credentials {
            tenant_id: "test-tenant".into(),
            client_id: "test-client".into(),
            client_secret: "test-secret".into(),
            subscription_id: SubscriptionId::new("test-sub"),
        }
    }

    #[tokio::test]
    async fn acquires_and_caches_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/test-tenant/oauth2/v2.0/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "tok-abc",
                "expires_in": 3600,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider =
            ServicePrincipalTokenProvider::new(&credentials(), server.uri(), reqwest::Client::new());

        assert_eq!(provider.token().await.unwrap(), "tok-abc");
        // second call must come from the cache; wiremock enforces expect(1)
        assert_eq!(provider.token().await.unwrap(), "tok-abc");
    }

    #[tokio::test]
    async fn missing_access_token_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/test-tenant/oauth2/v2.0/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error": "invalid_client"
            })))
            .mount(&server)
            .await;

        let provider =
            ServicePrincipalTokenProvider::new(&credentials(), server.uri(), reqwest::Client::new());
        let err = provider.token().await.unwrap_err();
        assert!(matches!(err, ClientError::Token(_)), "got: {err}");
    }

    #[tokio::test]
    async fn static_token_passthrough() {
        let provider = StaticToken("fixed".into());
        assert_eq!(provider.token().await.unwrap(), "fixed");
    }
}
