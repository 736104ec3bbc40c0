pub mod config;
pub mod schemas;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use crate::error::GenerationError;
use crate::generator::backend::config::GenBackendConfig;
use crate::generator::backend::schemas::{
    Generate360Body, Generate360Response, GenerateBody, GenerateResponse, JobStatusResponse,
};

/// Transport to the generation backend.
#[async_trait]
pub trait GenBackend: Send + Sync {
    async fn generate(&self, body: &GenerateBody) -> Result<GenerateResponse, GenerationError>;

    async fn generate_360(&self, body: &Generate360Body) -> Result<Generate360Response, GenerationError>;

    async fn job_status(&self, job_id: &str) -> Result<JobStatusResponse, GenerationError>;
}

/// [`GenBackend`] over HTTP/JSON.
pub struct HttpBackend {
    client: Client,
    config: GenBackendConfig,
}

impl HttpBackend {
    pub fn new(config: GenBackendConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GenBackendConfig {
        &self.config
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, GenerationError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self.config.endpoint(path);
        debug!(%url, "POST");

        let response = self.authorized(self.client.post(&url)).json(body).send().await?;
        read_json(response).await
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl GenBackend for HttpBackend {
    async fn generate(&self, body: &GenerateBody) -> Result<GenerateResponse, GenerationError> {
        self.post_json("/generate", body).await
    }

    async fn generate_360(&self, body: &Generate360Body) -> Result<Generate360Response, GenerationError> {
        self.post_json("/generate-360", body).await
    }

    async fn job_status(&self, job_id: &str) -> Result<JobStatusResponse, GenerationError> {
        let url = self
            .config
            .job_status_url(job_id)
            .map_err(|err| GenerationError::Transport(format!("{err:#}")))?;
        debug!(%url, "GET");

        let response = self.authorized(self.client.get(url)).send().await?;
        read_json(response).await
    }
}

/// Maps non-success codes and 2xx error payloads to [`GenerationError::Server`],
/// and bodies that do not decode as `R` to [`GenerationError::Parse`].
async fn read_json<R: DeserializeOwned>(response: Response) -> Result<R, GenerationError> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        return Err(GenerationError::Server {
            status: status.as_u16(),
            body: server_message(&text),
        });
    }

    let value: Value = serde_json::from_str(&text)?;
    if is_error_payload(&value) {
        return Err(GenerationError::Server {
            status: status.as_u16(),
            body: message_of(&value).unwrap_or_else(|| text.trim().to_string()),
        });
    }

    Ok(serde_json::from_value(value)?)
}

/// `{"success": false, ...}` envelopes and bodies carrying `error` or `detail`.
fn is_error_payload(value: &Value) -> bool {
    let failed = value.get("success").and_then(Value::as_bool) == Some(false);
    let has = |key: &str| value.get(key).is_some_and(|v| !v.is_null());
    failed || has("error") || has("detail")
}

fn message_of(value: &Value) -> Option<String> {
    ["detail", "error", "message"]
        .iter()
        .filter_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|msg| !msg.is_empty())
        .map(str::to_string)
}

/// Pulls FastAPI's `detail` out of an error body when there is one.
fn server_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| message_of(&v))
        .unwrap_or_else(|| body.trim().to_string())
}
