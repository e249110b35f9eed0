//! Client for a video processing backend: uploads one video, then renders the
//! scene segments (labels, preview frames, suggested ads) it sends back.

pub mod config;
pub mod console;
pub mod format;
pub mod page;
pub mod render;
pub mod segment;
pub mod upload;

pub use config::{ClientConfig, ConfigError};
pub use page::{Status, Tone, UploadPage};
pub use render::{SegmentList, SegmentRenderer};
pub use segment::{AdResult, SegmentResult};
pub use upload::{
    HttpTransport, UploadController, UploadError, UploadOutcome, UploadProgress, UploadRequest,
};
