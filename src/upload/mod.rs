// src/upload/mod.rs
// Upload Module - single-flight submission with progress reporting

mod http;
mod types;
mod wire;

pub use http::HttpTransport;
pub use types::{
    guess_mime_type, ErrorKind, TransportError, TransportResponse, UploadError, UploadOutcome,
    UploadProgress, UploadRequest,
};
pub use wire::{decode_body, resolve_response};

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use tracing::Instrument;
use uuid::Uuid;

/// Channel a transport reports cumulative progress on
pub type ProgressSender = mpsc::UnboundedSender<UploadProgress>;

/// Something that can carry one upload to the backend
#[async_trait]
pub trait UploadTransport: Send + Sync {
    /// Send the file as a multipart body and return the raw response.
    /// Progress may be reported at any cadence while the transfer runs.
    async fn send(
        &self,
        request: &UploadRequest,
        progress: ProgressSender,
    ) -> Result<TransportResponse, TransportError>;

    /// Get transport name
    fn name(&self) -> &str;
}

/// Drives one submission at a time against a transport.
pub struct UploadController {
    transport: Box<dyn UploadTransport + Send + Sync>,
    in_flight: AtomicBool,
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl UploadController {
    pub fn new(transport: Box<dyn UploadTransport + Send + Sync>) -> Self {
        tracing::info!("Upload controller using transport '{}'", transport.name());
        Self {
            transport,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Submit `file`, calling `on_progress` for every progress event in arrival
    /// order. The returned outcome is terminal: `on_progress` is never called
    /// after it.
    pub async fn submit<F>(&self, file: Option<&UploadRequest>, mut on_progress: F) -> UploadOutcome
    where
        F: FnMut(UploadProgress),
    {
        let Some(request) = file else {
            tracing::warn!("Upload rejected: no file selected");
            return UploadError::Validation.into();
        };

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("Upload rejected: another upload is in flight");
            return UploadError::Busy.into();
        }
        let _guard = InFlightGuard(&self.in_flight);

        let submission_id = Uuid::new_v4();
        let span = tracing::info_span!("upload", %submission_id, file = request.file_name());

        async {
            tracing::info!(
                "Uploading {} via {}",
                request.describe(),
                self.transport.name()
            );

            let (tx, mut rx) = mpsc::unbounded_channel();
            let send = self.transport.send(request, tx);
            tokio::pin!(send);

            let result = loop {
                tokio::select! {
                    biased;
                    Some(progress) = rx.recv() => {
                        tracing::debug!("Progress {}/{} bytes", progress.bytes_sent, progress.bytes_total);
                        on_progress(progress);
                    }
                    result = &mut send => break result,
                }
            };

            // Events queued before the response landed still belong to this upload.
            while let Ok(progress) = rx.try_recv() {
                on_progress(progress);
            }

            let outcome = match result {
                Ok(response) => resolve_response(&response),
                Err(e) => {
                    tracing::error!("Upload transport failed: {}", e);
                    UploadOutcome::Failure(e.into())
                }
            };

            match &outcome {
                UploadOutcome::Success { segments } => {
                    tracing::info!("Upload finished: {} segments", segments.len())
                }
                UploadOutcome::Failure(e) => tracing::warn!("Upload failed: {}", e),
            }

            outcome
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use std::time::Duration;

    /// Transport that replays a scripted response after scripted progress steps
    pub struct ScriptedTransport {
        pub calls: Arc<AtomicUsize>,
        pub progress_steps: Vec<u64>,
        pub response: Result<TransportResponse, fn() -> TransportError>,
        pub delay: Option<Duration>,
    }

    impl ScriptedTransport {
        pub fn responding(status: u16, body: &'static str) -> Self {
            Self {
                calls: Arc::new(AtomicUsize::new(0)),
                progress_steps: Vec::new(),
                response: Ok(TransportResponse::new(status, body)),
                delay: None,
            }
        }

        pub fn failing(error: fn() -> TransportError) -> Self {
            Self {
                calls: Arc::new(AtomicUsize::new(0)),
                progress_steps: Vec::new(),
                response: Err(error),
                delay: None,
            }
        }

        pub fn with_progress(mut self, steps: Vec<u64>) -> Self {
            self.progress_steps = steps;
            self
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }
    }

    #[async_trait]
    impl UploadTransport for ScriptedTransport {
        async fn send(
            &self,
            request: &UploadRequest,
            progress: ProgressSender,
        ) -> Result<TransportResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            for &sent in &self.progress_steps {
                let _ = progress.send(UploadProgress::new(sent, request.size()));
                tokio::task::yield_now().await;
            }
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            match &self.response {
                Ok(response) => Ok(response.clone()),
                Err(make_error) => Err(make_error()),
            }
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    pub const ONE_SEGMENT: &str = r#"{"success": true, "segments": [
        {"segment": 1, "start": 65, "end": 125, "labels": ["beach"], "ads": []}
    ]}"#;

    pub fn sample_request() -> UploadRequest {
        UploadRequest::new("clip.mp4", "video/mp4", vec![7u8; 1000])
    }
}
