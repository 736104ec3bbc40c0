use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use backend::config::GenBackendConfig;
use backend::schemas::{non_empty, Generate360Body, Generate360Response, GenerateBody, GenerateResponse};
use backend::{GenBackend, HttpBackend};
use crate::error::{GenerationError, RequestKind};
use crate::events::{EventSender, GenEvent, ImageState, VideoState};
use crate::job::JobStatus;
use crate::request::{ImageRequest, VideoRequest};

pub mod backend;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollSettings {
    pub interval: Duration,
    pub max_polls: u32,
}

impl PollSettings {
    pub fn new(interval: Duration, max_polls: u32) -> Self {
        Self {
            interval,
            max_polls: max_polls.max(1),
        }
    }
}

impl From<&GenBackendConfig> for PollSettings {
    fn from(conf: &GenBackendConfig) -> Self {
        Self::new(conf.poll_interval, conf.max_polls)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageResult {
    /// Data URL of the rendered image, or plain text if the backend answered with text.
    pub image: String,
    pub constructed_prompt: String,
    pub completed_at: DateTime<Utc>,
}

impl ImageResult {
    fn from_response(resp: GenerateResponse) -> Result<Self, GenerationError> {
        Ok(Self {
            image: non_empty(resp.result, "a generated image")?,
            constructed_prompt: resp.constructed_prompt,
            completed_at: Utc::now(),
        })
    }

    pub fn is_data_url(&self) -> bool {
        self.image.starts_with("data:image")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoResult {
    pub video_url: String,
    /// Set when the video came out of a polled job rather than a direct answer.
    pub job_id: Option<String>,
    pub completed_at: DateTime<Utc>,
}

impl VideoResult {
    fn new(video_url: String, job_id: Option<String>) -> Self {
        Self {
            video_url,
            job_id,
            completed_at: Utc::now(),
        }
    }
}

/// Drives single-image and 360° video generation against a [`GenBackend`].
///
/// Each path allows one request at a time and reports its transitions as
/// [`GenEvent`]s. The two paths are independent and may run concurrently.
/// A cancelled operation returns `Ok(None)` and emits nothing further.
pub struct Generator {
    backend: Arc<dyn GenBackend>,
    events: EventSender,
    poll: PollSettings,
    image_in_flight: AtomicBool,
    video_in_flight: AtomicBool,
}

impl Generator {
    pub fn new(backend: Arc<dyn GenBackend>, poll: PollSettings, events: EventSender) -> Self {
        Self {
            backend,
            events,
            poll,
            image_in_flight: AtomicBool::new(false),
            video_in_flight: AtomicBool::new(false),
        }
    }

    pub fn from_config(conf: GenBackendConfig, events: EventSender) -> anyhow::Result<Self> {
        let poll = PollSettings::from(&conf);
        let backend = HttpBackend::new(conf)?;
        Ok(Self::new(Arc::new(backend), poll, events))
    }

    pub fn is_in_flight(&self, kind: RequestKind) -> bool {
        self.flag(kind).load(Ordering::Acquire)
    }

    pub async fn generate_image(
        &self,
        request: &ImageRequest,
        cancel: &CancellationToken,
    ) -> Result<Option<ImageResult>, GenerationError> {
        let _flight = FlightGuard::acquire(self.flag(RequestKind::Image), RequestKind::Image)?;

        let body = GenerateBody::from(request);
        info!(
            azimuth = body.azimuth,
            elevation = body.elevation,
            distance = body.distance,
            bg_style = body.bg_style.id(),
            with_image = body.image.is_some(),
            "Requesting single image"
        );
        self.emit(cancel, GenEvent::Image(ImageState::Requesting));

        let Some(response) = until_cancelled(cancel, self.backend.generate(&body)).await else {
            debug!("Single image request cancelled");
            return Ok(None);
        };
        if cancel.is_cancelled() {
            return Ok(None);
        }

        match response.and_then(ImageResult::from_response) {
            Ok(result) => {
                info!(prompt = %result.constructed_prompt, "Single image ready");
                self.emit(cancel, GenEvent::Image(ImageState::Succeeded {
                    result: result.image.clone(),
                    constructed_prompt: result.constructed_prompt.clone(),
                }));
                Ok(Some(result))
            }
            Err(err) => {
                warn!(error = %err, "Single image request failed");
                self.emit(cancel, GenEvent::Image(ImageState::Failed(err.clone())));
                Err(err)
            }
        }
    }

    pub async fn generate_video(
        &self,
        request: &VideoRequest,
        cancel: &CancellationToken,
    ) -> Result<Option<VideoResult>, GenerationError> {
        let _flight = FlightGuard::acquire(self.flag(RequestKind::Video), RequestKind::Video)?;

        let outcome = self.run_video(request, cancel).await;
        if cancel.is_cancelled() {
            debug!("Video request cancelled");
            return Ok(None);
        }

        match outcome {
            Ok(Some(result)) => {
                info!(url = %result.video_url, "Video ready");
                self.emit(cancel, GenEvent::Video(VideoState::Succeeded {
                    video_url: result.video_url.clone(),
                }));
                Ok(Some(result))
            }
            Ok(None) => Ok(None),
            Err(err) => {
                warn!(error = %err, "Video request failed");
                self.emit(cancel, GenEvent::Video(VideoState::Failed(err.clone())));
                Err(err)
            }
        }
    }

    async fn run_video(
        &self,
        request: &VideoRequest,
        cancel: &CancellationToken,
    ) -> Result<Option<VideoResult>, GenerationError> {
        let body = Generate360Body::from(request);
        info!(
            duration = body.duration,
            fps = body.fps,
            frames = request.frame_count(),
            elevation = body.elevation,
            distance = body.distance,
            bg_style = body.bg_style.id(),
            "Submitting 360° video"
        );
        self.emit(cancel, GenEvent::Video(VideoState::Submitting));

        let Some(response) = until_cancelled(cancel, self.backend.generate_360(&body)).await else {
            return Ok(None);
        };

        let handle = match response? {
            Generate360Response::Immediate { video_url, .. } => {
                let video_url = non_empty(Some(video_url), "a video_url")?;
                return Ok(Some(VideoResult::new(video_url, None)));
            }
            Generate360Response::Job(handle) | Generate360Response::Envelope { data: handle } => handle,
        };

        info!(job_id = %handle.job_id, "Video job accepted, polling for completion");
        Ok(self
            .poll_job(&handle.job_id, cancel)
            .await?
            .map(|url| VideoResult::new(url, Some(handle.job_id))))
    }

    /// Queries the job until it reaches a terminal status. Queries are strictly
    /// sequential and separated by the poll interval.
    async fn poll_job(
        &self,
        job_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<String>, GenerationError> {
        for attempt in 1..=self.poll.max_polls {
            let Some(response) = until_cancelled(cancel, self.backend.job_status(job_id)).await else {
                return Ok(None);
            };
            let body = response?.into_body();
            debug!(job_id, attempt, status = %body.status, "Job status");

            match body.status {
                JobStatus::Completed => {
                    return non_empty(body.result, "a result for the completed job").map(Some);
                }
                JobStatus::Failed => {
                    let message = body
                        .message
                        .filter(|m| !m.trim().is_empty())
                        .unwrap_or_else(|| "backend gave no reason".to_string());
                    return Err(GenerationError::JobFailed(message));
                }
                JobStatus::Pending | JobStatus::Processing => {
                    self.emit(cancel, GenEvent::Video(VideoState::Polling {
                        job_id: job_id.to_string(),
                        attempt,
                        status: body.status,
                    }));

                    if attempt < self.poll.max_polls {
                        let slept = until_cancelled(cancel, tokio::time::sleep(self.poll.interval)).await;
                        if slept.is_none() {
                            return Ok(None);
                        }
                    }
                }
            }
        }

        warn!(job_id, attempts = self.poll.max_polls, "Giving up on video job");
        Err(GenerationError::Timeout { attempts: self.poll.max_polls })
    }

    fn flag(&self, kind: RequestKind) -> &AtomicBool {
        match kind {
            RequestKind::Image => &self.image_in_flight,
            RequestKind::Video => &self.video_in_flight,
        }
    }

    fn emit(&self, cancel: &CancellationToken, event: GenEvent) {
        if cancel.is_cancelled() {
            return;
        }
        let _ = self.events.send(event);
    }
}

async fn until_cancelled<F: Future>(cancel: &CancellationToken, fut: F) -> Option<F::Output> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        out = fut => Some(out),
    }
}

/// Holds a path's in-flight flag and releases it on drop, including when the
/// request future is dropped mid-way.
struct FlightGuard<'a>(&'a AtomicBool);

impl<'a> FlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool, kind: RequestKind) -> Result<Self, GenerationError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Self(flag))
            .map_err(|_| GenerationError::InFlight(kind))
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
