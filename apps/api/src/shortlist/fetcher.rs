//! Resume Fetcher — downloads a resume and turns it into plain text.

use std::time::Duration;

use bytes::{Bytes, BytesMut};
use reqwest::{Client, Url};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid resume URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("resume host returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("resume is larger than {limit} bytes")]
    TooLarge { limit: usize },

    #[error("unsupported resume format: {0}")]
    UnsupportedFormat(String),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),
}

/// Resume file formats recognised by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    Pdf,
    PlainText,
    /// Recognised so it can be reported clearly; there is no extractor for it.
    Docx,
}

impl ResumeFormat {
    /// Detects the format from the URL path's extension (query and fragment ignored).
    pub fn from_url(url: &Url) -> Option<Self> {
        let file_name = url.path_segments()?.last()?;
        let (_, extension) = file_name.rsplit_once('.')?;
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Some(ResumeFormat::Pdf),
            "txt" => Some(ResumeFormat::PlainText),
            "docx" => Some(ResumeFormat::Docx),
            _ => None,
        }
    }
}

pub fn parse_resume_url(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url.trim()).map_err(|e| FetchError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(FetchError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}

/// Largest resume body that will be downloaded.
pub const MAX_RESUME_BYTES: usize = 10 * 1024 * 1024;

/// Shared HTTP client for resume downloads. Cheap to clone.
#[derive(Clone)]
pub struct ResumeFetcher {
    client: Client,
    max_bytes: usize,
}

impl ResumeFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            max_bytes: MAX_RESUME_BYTES,
        })
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Downloads `url` and extracts its text.
    ///
    /// `fallback` is used when the extension is not recognised; `None` makes
    /// unrecognised extensions an [`FetchError::UnsupportedFormat`].
    pub async fn fetch_text(
        &self,
        url: &str,
        fallback: Option<ResumeFormat>,
    ) -> Result<String, FetchError> {
        let parsed = parse_resume_url(url)?;
        let format = ResumeFormat::from_url(&parsed)
            .or(fallback)
            .ok_or_else(|| FetchError::UnsupportedFormat(parsed.path().to_string()))?;

        if format == ResumeFormat::Docx {
            return Err(FetchError::UnsupportedFormat("docx".to_string()));
        }

        let body = self.fetch_bytes(parsed).await?;
        debug!("Fetched {} bytes of {:?} resume", body.len(), format);
        extract_text(format, body).await
    }

    /// Reads the body chunk by chunk and gives up once it exceeds `max_bytes`,
    /// whatever `Content-Length` claims.
    async fn fetch_bytes(&self, url: Url) -> Result<Bytes, FetchError> {
        let mut response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let limit = self.max_bytes;
        if response.content_length().is_some_and(|len| len > limit as u64) {
            return Err(FetchError::TooLarge { limit });
        }

        let mut body = BytesMut::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > limit {
                return Err(FetchError::TooLarge { limit });
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body.freeze())
    }
}

/// Extracts plain text from downloaded resume bytes.
/// PDF parsing is CPU-bound and runs on the blocking pool; a panicking parser is an error.
pub async fn extract_text(format: ResumeFormat, body: Bytes) -> Result<String, FetchError> {
    match format {
        ResumeFormat::PlainText => Ok(String::from_utf8_lossy(&body).into_owned()),
        ResumeFormat::Pdf => tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&body).map_err(|e| FetchError::Pdf(e.to_string()))
        })
        .await
        .map_err(|e| FetchError::Pdf(format!("extractor aborted: {e}")))?,
        ResumeFormat::Docx => Err(FetchError::UnsupportedFormat("docx".to_string())),
    }
}
