// src/page/status.rs
// Status lines shown next to the upload form

use crate::format::format_file_size;
use crate::upload::{UploadError, UploadRequest};
use std::fmt;

pub const SELECT_FILE_PROMPT: &str = "Please select a video file";
pub const SUBMIT_LABEL: &str = "Upload & Process";
pub const PROCESSING_LABEL: &str = "Processing...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Muted,
    Info,
    Success,
    Danger,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Selected { name: String, size: u64 },
    Uploading { name: String, size: u64 },
    Complete,
    Failed(String),
    /// The transport never got a response
    Unreachable,
}

impl Status {
    pub fn selected(file: &UploadRequest) -> Self {
        Status::Selected {
            name: file.file_name().to_string(),
            size: file.size(),
        }
    }

    pub fn uploading(file: &UploadRequest) -> Self {
        Status::Uploading {
            name: file.file_name().to_string(),
            size: file.size(),
        }
    }

    pub fn from_error(error: &UploadError) -> Self {
        match error {
            UploadError::Network(_) => Status::Unreachable,
            other => Status::Failed(other.to_string()),
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Status::Selected { .. } => Tone::Muted,
            Status::Uploading { .. } => Tone::Info,
            Status::Complete => Tone::Success,
            Status::Failed(_) | Status::Unreachable => Tone::Danger,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Selected { name, size } => {
                write!(f, "Selected: {} ({})", name, format_file_size(*size))
            }
            Status::Uploading { name, size } => {
                write!(f, "Uploading {} ({})", name, format_file_size(*size))
            }
            Status::Complete => write!(f, "Upload complete! Video processed successfully."),
            Status::Failed(message) => write!(f, "Error: {}", message),
            Status::Unreachable => write!(f, "Network Error: Could not connect to server"),
        }
    }
}
