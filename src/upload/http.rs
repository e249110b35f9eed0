// src/upload/http.rs
// reqwest multipart transport (the only real network path)

use super::types::{FileSource, TransportError, TransportResponse, UploadProgress, UploadRequest};
use super::{ProgressSender, UploadTransport};
use crate::config::{ClientConfig, ConfigError};
use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use reqwest::multipart;
use reqwest::{Body, Url};
use std::io;
use std::pin::Pin;
use std::time::Duration;
use tokio_util::io::ReaderStream;

pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Url,
    field_name: String,
    chunk_size: usize,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let endpoint = config.endpoint_url()?;

        let mut builder = reqwest::Client::builder();
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }
        let client = builder
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        tracing::info!(
            "HTTP transport initialized: endpoint={}, field={}, timeout={}s",
            endpoint,
            config.field_name,
            config.timeout_secs
        );

        Ok(Self {
            client,
            endpoint,
            field_name: config.field_name.clone(),
            chunk_size: config.chunk_size.max(1),
        })
    }
}

/// File content as a stream of chunks of at most `chunk_size` bytes
type ChunkStream = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send + Sync>>;

async fn open_chunks(source: &FileSource, chunk_size: usize) -> io::Result<ChunkStream> {
    match source {
        FileSource::Memory(data) => {
            let chunks: Vec<io::Result<Bytes>> = (0..data.len())
                .step_by(chunk_size)
                .map(|offset| Ok(data.slice(offset..(offset + chunk_size).min(data.len()))))
                .collect();
            Ok(Box::pin(futures::stream::iter(chunks)))
        }
        FileSource::Disk(path) => {
            let file = tokio::fs::File::open(path).await?;
            Ok(Box::pin(ReaderStream::with_capacity(file, chunk_size)))
        }
    }
}

/// Report cumulative bytes as each chunk is handed to the connection
fn with_progress(
    chunks: ChunkStream,
    total: u64,
    progress: ProgressSender,
) -> impl Stream<Item = io::Result<Bytes>> + Send + Sync + 'static {
    let mut sent = 0u64;
    chunks.map(move |chunk| {
        if let Ok(bytes) = &chunk {
            sent += bytes.len() as u64;
            let _ = progress.send(UploadProgress::new(sent, total));
        }
        chunk
    })
}

fn classify(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else if error.is_connect() {
        TransportError::Connect(error.to_string())
    } else {
        TransportError::Io(error.to_string())
    }
}

#[async_trait]
impl UploadTransport for HttpTransport {
    async fn send(
        &self,
        request: &UploadRequest,
        progress: ProgressSender,
    ) -> Result<TransportResponse, TransportError> {
        let chunks = open_chunks(request.source(), self.chunk_size)
            .await
            .map_err(|e| TransportError::Io(format!("cannot read {}: {}", request.file_name(), e)))?;
        let body = Body::wrap_stream(with_progress(chunks, request.size(), progress));

        let file_part = multipart::Part::stream_with_length(body, request.size())
            .file_name(request.file_name().to_string())
            .mime_str(request.mime_type())
            .map_err(|e| TransportError::Io(format!("invalid MIME type: {}", e)))?;

        let form = multipart::Form::new().part(self.field_name.clone(), file_part);

        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(classify)?;

        tracing::debug!("Backend responded: HTTP {} ({} bytes)", status, body.len());

        Ok(TransportResponse::new(status, body))
    }

    fn name(&self) -> &str {
        "HTTP multipart"
    }
}
