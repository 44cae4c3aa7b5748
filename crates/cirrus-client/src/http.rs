use cirrus_config::Credentials;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::auth::{ServicePrincipalTokenProvider, StaticToken, TokenProvider};
use crate::endpoint::Endpoints;
use crate::error::ClientError;
use crate::paging::DEFAULT_MAX_PAGES;
use crate::poll::PollOptions;

/// Response wrapper: the HTTP status the operation settled on plus the
/// decoded body.
#[derive(Debug, Clone)]
pub struct Response<T> {
    pub status: u16,
    pub body: T,
}

/// One authenticated connection to the management plane. Constructed once
/// per process and shared by reference across service clients.
pub struct ArmConnection {
    client: reqwest::Client,
    token: Box<dyn TokenProvider>,
    endpoints: Endpoints,
    poll: PollOptions,
    max_pages: usize,
}

impl ArmConnection {
    /// Connect with service-principal credentials against the public cloud.
    pub fn new(credentials: &Credentials) -> Self {
        let client = reqwest::Client::new();
        let endpoints = Endpoints::default();
        let token = Box::new(ServicePrincipalTokenProvider::new(
            credentials,
            endpoints.login.clone(),
            client.clone(),
        ));
        Self {
            client,
            token,
            endpoints,
            poll: PollOptions::default(),
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    /// Connect with an explicit token provider and endpoints.
    pub fn with_token_provider(token: Box<dyn TokenProvider>, endpoints: Endpoints) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
            endpoints,
            poll: PollOptions::default(),
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    /// Connect with a fixed bearer token. Used by tests pointing at a mock
    /// server.
    pub fn with_static_token(token: &str, endpoints: Endpoints) -> Self {
        Self::with_token_provider(Box::new(StaticToken(token.to_string())), endpoints)
    }

    pub fn poll_options(mut self, poll: PollOptions) -> Self {
        self.poll = poll;
        self
    }

    /// Cap on pages fetched per continuation loop.
    pub fn max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub(crate) fn page_limit(&self) -> usize {
        self.max_pages
    }

    /// Absolute management-plane URL for a path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoints.management, path)
    }

    async fn bearer(&self) -> Result<String, ClientError> {
        self.token.token().await
    }

    // ── GET ───────────────────────────────────────────────────────────────────

    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<Response<T>, ClientError> {
        let token = self.bearer().await?;
        debug!(url, "GET");
        let resp = self
            .client
            .get(url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| ClientError::Transport { verb: "GET", url: url.to_string(), source: e })?;

        let status = resp.status().as_u16();
        if !(200..300).contains(&status) {
            let body: Value = resp.json().await.unwrap_or(Value::Null);
            return Err(ClientError::api(status, &body));
        }
        let body: T = resp
            .json()
            .await
            .map_err(|e| ClientError::Decode { url: url.to_string(), source: e })?;
        Ok(Response { status, body })
    }

    /// GET returning the raw status and JSON body, without treating non-2xx
    /// as an error. Used by the operation poller and existence probes.
    pub async fn get_raw(&self, url: &str) -> Result<(u16, Value), ClientError> {
        let token = self.bearer().await?;
        debug!(url, "GET (raw)");
        let resp = self
            .client
            .get(url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| ClientError::Transport { verb: "GET", url: url.to_string(), source: e })?;
        let status = resp.status().as_u16();
        let body: Value = resp.json().await.unwrap_or(Value::Null);
        Ok((status, body))
    }

    /// HEAD existence probe: 204/2xx → true, 404 → false.
    pub async fn head(&self, url: &str) -> Result<bool, ClientError> {
        let token = self.bearer().await?;
        debug!(url, "HEAD");
        let resp = self
            .client
            .head(url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| ClientError::Transport { verb: "HEAD", url: url.to_string(), source: e })?;
        let status = resp.status().as_u16();
        if status == 404 {
            return Ok(false);
        }
        if (200..300).contains(&status) {
            return Ok(true);
        }
        Err(ClientError::api(status, &Value::Null))
    }

    // ── PUT ───────────────────────────────────────────────────────────────────

    /// PUT a resource and wait for it to reach its terminal state.
    ///
    /// 200/201 complete synchronously. 202 carries an `Azure-AsyncOperation`
    /// or `Location` header; the operation URL is polled to completion, then
    /// the resource is re-read so the caller always gets the final
    /// representation.
    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<Response<T>, ClientError> {
        let token = self.bearer().await?;
        debug!(url, "PUT");
        let resp = self
            .client
            .put(url)
            .bearer_auth(&token)
            .json(body)
            .send()
            .await
            .map_err(|e| ClientError::Transport { verb: "PUT", url: url.to_string(), source: e })?;

        let status = resp.status().as_u16();
        let async_op = operation_url(&resp);

        if status == 200 || status == 201 {
            let body: T = resp
                .json()
                .await
                .map_err(|e| ClientError::Decode { url: url.to_string(), source: e })?;
            return Ok(Response { status, body });
        }

        if status == 202 {
            if let Some(op_url) = async_op {
                self.wait_for_operation(&op_url).await?;
            }
            // Re-read the resource for its final representation.
            return self.get(url).await;
        }

        let body: Value = resp.json().await.unwrap_or(Value::Null);
        Err(ClientError::api(status, &body))
    }

    // ── POST ──────────────────────────────────────────────────────────────────

    /// POST an action and wait for it to settle. A 202 with an operation
    /// header is polled to completion and reported as 200.
    pub async fn post<B: Serialize>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<Response<Value>, ClientError> {
        let token = self.bearer().await?;
        debug!(url, "POST");
        let resp = self
            .client
            .post(url)
            .bearer_auth(&token)
            .json(body)
            .send()
            .await
            .map_err(|e| ClientError::Transport { verb: "POST", url: url.to_string(), source: e })?;

        let status = resp.status().as_u16();
        let async_op = operation_url(&resp);

        if status == 202 {
            let body = match async_op {
                Some(op_url) => self.wait_for_operation(&op_url).await?,
                None => resp.json().await.unwrap_or(Value::Null),
            };
            return Ok(Response { status: 200, body });
        }

        let body: Value = resp.json().await.unwrap_or(Value::Null);
        if !(200..300).contains(&status) {
            return Err(ClientError::api(status, &body));
        }
        Ok(Response { status, body })
    }

    // ── DELETE ────────────────────────────────────────────────────────────────

    /// DELETE a resource. 404 means already gone and is success; a 202 with
    /// an operation header is polled to completion.
    pub async fn delete(&self, url: &str) -> Result<Response<()>, ClientError> {
        let token = self.bearer().await?;
        debug!(url, "DELETE");
        let resp = self
            .client
            .delete(url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| ClientError::Transport { verb: "DELETE", url: url.to_string(), source: e })?;

        let status = resp.status().as_u16();
        if status == 202 {
            if let Some(op_url) = operation_url(&resp) {
                self.wait_for_operation(&op_url).await?;
            }
            return Ok(Response { status: 200, body: () });
        }

        if status == 404 || status == 204 || (200..300).contains(&status) {
            return Ok(Response { status, body: () });
        }

        let body: Value = resp.json().await.unwrap_or(Value::Null);
        Err(ClientError::api(status, &body))
    }

    // ── Async operation polling ───────────────────────────────────────────────

    /// Poll an async operation URL until it completes or the bound elapses.
    ///
    /// The operation body carries a `status` field; `Succeeded` yields the
    /// final body, `Failed`/`Canceled` the parsed error detail.
    pub async fn wait_for_operation(&self, op_url: &str) -> Result<Value, ClientError> {
        let opts = self.poll.clone();
        crate::poll::poll_until(&opts, op_url, || async move {
            let (_, body) = self.get_raw(op_url).await?;
            match body["status"].as_str().unwrap_or("Unknown") {
                "Succeeded" => Ok(Some(body)),
                s @ ("Failed" | "Canceled") => {
                    let (code, message) = crate::error::parse_arm_error(&body);
                    Err(ClientError::OperationFailed {
                        status: s.to_string(),
                        detail: format!("{}: {}", code, message),
                    })
                }
                _ => Ok(None),
            }
        })
        .await
    }
}

/// Async-operation URL from a 202 response, preferring `Azure-AsyncOperation`
/// over `Location`.
fn operation_url(resp: &reqwest::Response) -> Option<String> {
    resp.headers()
        .get("Azure-AsyncOperation")
        .or_else(|| resp.headers().get("Location"))
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}
