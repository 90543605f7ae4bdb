use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;

use super::routes::{Endpoint, Route};
use crate::error::MediaError;

/// Per-request timeouts. Connection setup is bounded separately in [`AzureClient::new`].
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(20);
pub const STATUS_TIMEOUT: Duration = Duration::from_secs(30);
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(120);

/// HTTP client bound to one Azure OpenAI resource and API key.
pub struct AzureClient {
    /// Sent as `api-key`, and as a bearer token on routes that need one.
    api_key: String,
    /// Shared connection pool.
    client: Client,
    /// Resource, deployment and API version every URL is built from.
    endpoint: Endpoint,
}

impl AzureClient {
    pub fn new(endpoint: Endpoint, api_key: String) -> Result<Self, MediaError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            api_key,
            client,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Attach the key headers. `route` decides whether a bearer header is added.
    fn authorize(&self, req: RequestBuilder, route: Option<Route>) -> RequestBuilder {
        let req = req.header("api-key", &self.api_key);
        match route {
            Some(r) if r.uses_bearer() => req.bearer_auth(&self.api_key),
            _ => req,
        }
    }

    /// POST a JSON body with credentials. Connection failures map to
    /// [`MediaError::Connection`]; the caller inspects the status.
    pub async fn post_json(
        &self,
        url: &str,
        body: &Value,
        route: Option<Route>,
        timeout: Duration,
    ) -> Result<Response, MediaError> {
        let req = self
            .client
            .post(url)
            .header("content-type", "application/json")
            .json(body)
            .timeout(timeout);
        self.authorize(req, route)
            .send()
            .await
            .map_err(|source| MediaError::Connection {
                url: url.to_string(),
                source,
            })
    }

    /// Authenticated GET.
    pub async fn get(
        &self,
        url: &str,
        route: Option<Route>,
        timeout: Duration,
    ) -> Result<Response, reqwest::Error> {
        let req = self.client.get(url).timeout(timeout);
        self.authorize(req, route).send().await
    }

    /// GET without credentials, for pre-signed result URLs.
    pub async fn get_anonymous(&self, url: &str, timeout: Duration) -> Result<Response, reqwest::Error> {
        self.client.get(url).timeout(timeout).send().await
    }
}

/// Pull a readable message out of a provider error body, falling back to the raw text.
pub fn provider_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
