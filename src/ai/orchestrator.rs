//! Single in-flight AI edit cycle: idle → processing → succeeded/failed.
//!
//! Submission is split so a UI thread never blocks: [`AiEditOrchestrator::begin`]
//! checks the guards and serializes the canvas, the returned [`PendingEdit`] runs on
//! any executor, and [`AiEditOrchestrator::finish`] applies the outcome. `submit`
//! chains all three for callers that can simply await.
use std::sync::Arc;
use std::time::Duration;

use futures::future::{AbortHandle, Abortable};
use log::{error, info, warn};

use super::client::ImageEditService;
use super::types::{EditOptions, EditParams, HealthResponse};
use crate::element::Bitmap;
use crate::error::{AiEditError, ApiError};
use crate::serializer::{CanvasSerializer, strip_data_url};
use crate::state::EditorContext;

pub const DEFAULT_EDIT_TIMEOUT: Duration = Duration::from_secs(120);

/// Where the orchestrator is in its cycle. `Succeeded` and `Failed` are idle states
/// that remember the last outcome; both accept a new submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditStatus {
    #[default]
    Idle,
    Processing,
    Succeeded,
    Failed,
}

/// Request that has passed every guard and is ready to go over the wire
#[derive(Debug)]
pub struct PendingEdit<S> {
    service: Arc<S>,
    image: String,
    params: EditParams,
    timeout: Duration,
    registration: futures::future::AbortRegistration,
}

impl<S: ImageEditService> PendingEdit<S> {
    pub fn params(&self) -> &EditParams {
        &self.params
    }

    /// Await the service response, bounded by the timeout and the abort handle
    pub async fn run(self) -> Result<String, AiEditError> {
        let request = self.service.edit_base64(self.image, self.params);
        let abortable = Abortable::new(request, self.registration);
        match tokio::time::timeout(self.timeout, abortable).await {
            Err(_) => Err(ApiError::Timeout(self.timeout).into()),
            Ok(Err(_aborted)) => Err(ApiError::Cancelled.into()),
            Ok(Ok(result)) => result.map_err(AiEditError::from),
        }
    }
}

#[derive(Debug)]
pub struct AiEditOrchestrator<S> {
    service: Arc<S>,
    serializer: CanvasSerializer,
    timeout: Duration,
    status: EditStatus,
    available: bool,
    last_error: Option<String>,
    abort_handle: Option<AbortHandle>,
}

impl<S: ImageEditService> AiEditOrchestrator<S> {
    pub fn new(service: S) -> Self {
        Self {
            service: Arc::new(service),
            serializer: CanvasSerializer::default(),
            timeout: DEFAULT_EDIT_TIMEOUT,
            status: EditStatus::Idle,
            available: false,
            last_error: None,
            abort_handle: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_serializer(mut self, serializer: CanvasSerializer) -> Self {
        self.serializer = serializer;
        self
    }

    pub fn service(&self) -> &Arc<S> {
        &self.service
    }

    pub fn status(&self) -> EditStatus {
        self.status
    }

    pub fn is_processing(&self) -> bool {
        self.status == EditStatus::Processing
    }

    /// Whether the last health check reported the service healthy
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// User-visible message of the last failure, cleared by the next submission
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub async fn check_health(&mut self) -> bool {
        let result = self.service.health().await;
        self.record_health(result)
    }

    /// Record a health check result; any error means unavailable
    pub fn record_health(&mut self, result: Result<HealthResponse, ApiError>) -> bool {
        self.available = match result {
            Ok(health) => health.is_healthy(),
            Err(err) => {
                warn!("⚠️ Edit service unavailable: {}", err);
                false
            }
        };
        self.available
    }

    /// Check the guards, serialize the canvas and enter `Processing`.
    ///
    /// Re-entry while processing is rejected with [`AiEditError::Busy`] and leaves the
    /// in-flight request untouched.
    pub fn begin(&mut self, prompt: &str, options: &EditOptions, editor: &EditorContext) -> Result<PendingEdit<S>, AiEditError> {
        if self.is_processing() {
            warn!("⚠️ Ignoring edit submission while another is in progress");
            return Err(AiEditError::Busy);
        }
        if !self.available {
            return Err(self.reject(AiEditError::Unavailable));
        }
        let params = options.to_params(prompt);
        if params.prompt.is_empty() {
            return Err(self.reject(AiEditError::EmptyPrompt));
        }

        let image = match self.serializer.submission_base64(&editor.snapshot()) {
            Ok(image) => image,
            Err(err) => return Err(self.reject(AiEditError::Serialize(err))),
        };

        let (abort_handle, registration) = AbortHandle::new_pair();
        self.abort_handle = Some(abort_handle);
        self.status = EditStatus::Processing;
        self.last_error = None;
        info!("🤖 AI edit started: {:?}", params.prompt);

        Ok(PendingEdit {
            service: Arc::clone(&self.service),
            image,
            params,
            timeout: self.timeout,
            registration,
        })
    }

    /// Apply the outcome of a [`PendingEdit`]. On success the whole canvas is replaced
    /// by the returned image; on any failure the canvas is left exactly as it was.
    pub fn finish(&mut self, result: Result<String, AiEditError>, editor: &mut EditorContext) -> Result<(), AiEditError> {
        self.abort_handle = None;
        let bitmap = result.and_then(|image| Bitmap::decode_base64(strip_data_url(&image)).map_err(AiEditError::Decode));

        match bitmap {
            Ok(bitmap) => {
                editor.replace_with_image(bitmap);
                self.status = EditStatus::Succeeded;
                self.last_error = None;
                info!("✅ AI edit applied");
                Ok(())
            }
            Err(err) => {
                error!("❌ AI edit failed: {}", err);
                self.status = EditStatus::Failed;
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Run a whole edit cycle against `editor`
    pub async fn submit(&mut self, prompt: &str, options: &EditOptions, editor: &mut EditorContext) -> Result<(), AiEditError> {
        let pending = self.begin(prompt, options, editor)?;
        let result = pending.run().await;
        self.finish(result, editor)
    }

    /// Abort the in-flight request, if any. Its outcome then arrives as
    /// [`ApiError::Cancelled`].
    pub fn cancel(&mut self) -> bool {
        match self.abort_handle.take() {
            Some(handle) => {
                info!("🛑 Cancelling AI edit");
                handle.abort();
                true
            }
            None => false,
        }
    }

    fn reject(&mut self, err: AiEditError) -> AiEditError {
        warn!("⚠️ AI edit rejected: {}", err);
        self.last_error = Some(err.to_string());
        err
    }
}
