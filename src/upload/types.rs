// src/upload/types.rs
// Upload request, progress and outcome types

use crate::format::format_file_size;
use crate::segment::SegmentResult;
use bytes::Bytes;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_MIME_TYPE: &str = "application/octet-stream";
pub(crate) const GENERIC_FAILURE: &str = "upload failed";

/// Where the file's bytes come from when the body is built
#[derive(Debug, Clone)]
pub(crate) enum FileSource {
    Memory(Bytes),
    /// Streamed from disk at send time, never held in memory as a whole
    Disk(PathBuf),
}

/// The file picked by the user. Consumed by exactly one submission.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    file_name: String,
    mime_type: String,
    size: u64,
    source: FileSource,
}

impl UploadRequest {
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        let bytes = bytes.into();
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            size: bytes.len() as u64,
            source: FileSource::Memory(bytes),
        }
    }

    /// Refer to a file on disk, guessing its MIME type from the extension.
    /// Only its metadata is read here; the content is streamed when sent.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", path.display()),
            ));
        }

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("video.mp4")
            .to_string();
        let mime_type = guess_mime_type(&file_name);

        tracing::debug!(
            "Selected {} ({} bytes, {})",
            path.display(),
            metadata.len(),
            mime_type
        );

        Ok(Self {
            file_name,
            mime_type: mime_type.to_string(),
            size: metadata.len(),
            source: FileSource::Disk(path.to_path_buf()),
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub(crate) fn source(&self) -> &FileSource {
        &self.source
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// `name (size)` as shown in status messages
    pub fn describe(&self) -> String {
        format!("{} ({})", self.file_name, format_file_size(self.size()))
    }
}

pub fn guess_mime_type(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "mkv" => "video/x-matroska",
        "webm" => "video/webm",
        _ => DEFAULT_MIME_TYPE,
    }
}

/// Cumulative transfer progress. `bytes_sent <= bytes_total` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UploadProgress {
    pub bytes_sent: u64,
    pub bytes_total: u64,
}

impl UploadProgress {
    pub fn new(bytes_sent: u64, bytes_total: u64) -> Self {
        Self {
            bytes_sent: bytes_sent.min(bytes_total),
            bytes_total,
        }
    }

    /// Percentage in `[0, 100]`, or `None` when the total is unknown.
    pub fn percent(&self) -> Option<f64> {
        if self.bytes_total == 0 {
            return None;
        }
        Some((self.bytes_sent as f64 / self.bytes_total as f64 * 100.0).clamp(0.0, 100.0))
    }
}

/// Error classes a submission can end with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Busy,
    Network,
    Backend,
    Parse,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum UploadError {
    #[error("no file selected")]
    Validation,

    #[error("an upload is already in progress")]
    Busy,

    /// The detail is for logs; the user only sees the generic text.
    #[error("network error")]
    Network(String),

    #[error("{message}")]
    Backend { status: Option<u16>, message: String },

    #[error("{0}")]
    Parse(String),
}

impl UploadError {
    pub fn http_status(status: u16) -> Self {
        UploadError::Backend {
            status: Some(status),
            message: format!("upload failed ({})", status),
        }
    }

    /// Explicit failure flag from the backend, with its text when it sent any.
    pub fn rejected(message: Option<String>) -> Self {
        let message = message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| GENERIC_FAILURE.to_string());
        UploadError::Backend {
            status: None,
            message,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            UploadError::Validation => ErrorKind::Validation,
            UploadError::Busy => ErrorKind::Busy,
            UploadError::Network(_) => ErrorKind::Network,
            UploadError::Backend { .. } => ErrorKind::Backend,
            UploadError::Parse(_) => ErrorKind::Parse,
        }
    }
}

/// Terminal result of one submission. No progress follows it.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    Success { segments: Vec<SegmentResult> },
    Failure(UploadError),
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Success { .. })
    }

    /// User-facing failure text, `None` on success.
    pub fn message(&self) -> Option<String> {
        match self {
            UploadOutcome::Success { .. } => None,
            UploadOutcome::Failure(e) => Some(e.to_string()),
        }
    }

    pub fn error(&self) -> Option<&UploadError> {
        match self {
            UploadOutcome::Success { .. } => None,
            UploadOutcome::Failure(e) => Some(e),
        }
    }
}

impl From<UploadError> for UploadOutcome {
    fn from(error: UploadError) -> Self {
        UploadOutcome::Failure(error)
    }
}

/// Errors reported by a transport adapter before any response arrived
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timeout")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("transfer failed: {0}")]
    Io(String),
}

impl From<TransportError> for UploadError {
    fn from(error: TransportError) -> Self {
        UploadError::Network(error.to_string())
    }
}

/// Raw response handed back by a transport
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Bytes,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
