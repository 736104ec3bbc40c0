use std::env;
use std::str::FromStr;
use std::time::Duration;
use anyhow::{anyhow, Context};
use reqwest::Url;

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_JOB_STATUS_PATH: &str = "/api/v1/job/{id}";

#[derive(Debug, Clone, PartialEq)]
pub struct GenBackendConfig {
    pub base_url: String,
    /// Path of the job status endpoint, `{id}` is replaced by the job id.
    pub job_status_path: String,
    pub poll_interval: Duration,
    pub max_polls: u32,
    pub request_timeout: Duration,
    /// Bearer token sent with every request when the backend requires login.
    pub auth_token: Option<String>,
}

impl Default for GenBackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            job_status_path: DEFAULT_JOB_STATUS_PATH.to_string(),
            poll_interval: Duration::from_secs(2),
            max_polls: 300,
            request_timeout: Duration::from_secs(600),
            auth_token: None,
        }
    }
}

impl GenBackendConfig {
    /// Reads `.env` if present, then the `ANGLEPHOTO_*` environment variables.
    pub fn load() -> anyhow::Result<Self> {
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                return Err(err).context("failed to read .env");
            }
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let base_url = lookup("ANGLEPHOTO_BACKEND_URL").unwrap_or(defaults.base_url);
        let job_status_path =
            lookup("ANGLEPHOTO_JOB_STATUS_PATH").unwrap_or(defaults.job_status_path);

        let poll_interval = parse_var(&lookup, "ANGLEPHOTO_POLL_INTERVAL_MS")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.poll_interval);
        let max_polls = parse_var(&lookup, "ANGLEPHOTO_MAX_POLLS")?.unwrap_or(defaults.max_polls);
        let request_timeout = parse_var(&lookup, "ANGLEPHOTO_REQUEST_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);
        let auth_token = lookup("ANGLEPHOTO_AUTH_TOKEN")
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty());

        if max_polls == 0 {
            anyhow::bail!("ANGLEPHOTO_MAX_POLLS must be at least 1");
        }
        if !job_status_path.contains("{id}") {
            anyhow::bail!("ANGLEPHOTO_JOB_STATUS_PATH must contain an {{id}} placeholder");
        }
        let base_url = base_url.trim_end_matches('/').to_string();
        parse_base(&base_url).context("ANGLEPHOTO_BACKEND_URL is not a usable URL")?;

        Ok(Self {
            base_url,
            job_status_path,
            poll_interval,
            max_polls,
            request_timeout,
            auth_token,
        })
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Substitutes `job_id` into the status path. The id is percent-encoded as a
    /// single path segment.
    pub fn job_status_url(&self, job_id: &str) -> anyhow::Result<Url> {
        let mut url = parse_base(&self.base_url)?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| anyhow!("{} cannot carry a path", self.base_url))?;
            segments.pop_if_empty();
            for part in self.job_status_path.split('/').filter(|p| !p.is_empty()) {
                segments.push(&part.replace("{id}", job_id));
            }
        }
        Ok(url)
    }
}

fn parse_base(base_url: &str) -> anyhow::Result<Url> {
    let url = Url::parse(base_url).with_context(|| format!("invalid backend URL {base_url:?}"))?;
    if url.cannot_be_a_base() {
        anyhow::bail!("{base_url} cannot carry a path");
    }
    Ok(url)
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|raw| raw.trim().parse::<T>().with_context(|| format!("{key} must be a number, got {raw:?}")))
        .transpose()
}
