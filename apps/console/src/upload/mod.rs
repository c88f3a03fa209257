//! Resume upload: gate on PDF content type, hand the bytes to the backend
//! for text extraction, track the card state the terminal shows.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::api_client::RecruiterBackend;
use crate::errors::ClientError;
use crate::session::UploadedContext;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// A file the user picked, already read into memory.
#[derive(Debug, Clone)]
pub struct ResumeFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl ResumeFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Reads `path` and labels it with the content type implied by its extension.
    /// This is the picker's type check, not content sniffing.
    pub async fn from_path(path: &Path) -> Result<Self, UploadError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| UploadError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(file_name, content_type, bytes))
    }

    pub fn is_pdf(&self) -> bool {
        self.content_type.eq_ignore_ascii_case(PDF_CONTENT_TYPE)
    }
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Please upload a PDF file")]
    UnsupportedFileType { content_type: String },

    #[error("Could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("A resume is already being processed")]
    InProgress,

    #[error("{0}")]
    Backend(#[from] ClientError),
}

/// What the upload card shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadState {
    /// Drop zone.
    Empty,
    Uploading { file_name: String, size_bytes: usize },
    Loaded { file_name: String, size_bytes: usize },
}

pub struct UploadAdapter {
    backend: Arc<dyn RecruiterBackend>,
    state: Arc<watch::Sender<UploadState>>,
}

impl UploadAdapter {
    pub fn new(backend: Arc<dyn RecruiterBackend>) -> Self {
        let (state, _) = watch::channel(UploadState::Empty);
        Self {
            backend,
            state: Arc::new(state),
        }
    }

    pub fn state(&self) -> UploadState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<UploadState> {
        self.state.subscribe()
    }

    /// Gates the file and moves the card to `Uploading`. The caller drives
    /// the returned upload to completion, typically on a spawned task.
    ///
    /// Non-PDF files are rejected without a network call and leave the card
    /// as it was. Only one upload runs at a time.
    pub fn begin(&self, file: ResumeFile) -> Result<PendingUpload, UploadError> {
        if !file.is_pdf() {
            warn!(
                file_name = %file.file_name,
                content_type = %file.content_type,
                "rejected non-PDF upload"
            );
            return Err(UploadError::UnsupportedFileType {
                content_type: file.content_type,
            });
        }

        let size_bytes = file.bytes.len();
        let claimed = self.state.send_if_modified(|state| {
            if matches!(state, UploadState::Uploading { .. }) {
                return false;
            }
            *state = UploadState::Uploading {
                file_name: file.file_name.clone(),
                size_bytes,
            };
            true
        });
        if !claimed {
            info!(file_name = %file.file_name, "upload ignored: another is in progress");
            return Err(UploadError::InProgress);
        }

        Ok(PendingUpload {
            backend: Arc::clone(&self.backend),
            state: Arc::clone(&self.state),
            file,
            size_bytes,
            settled: false,
        })
    }

    /// `begin` followed by `complete`.
    pub async fn upload(&self, file: ResumeFile) -> Result<UploadedContext, UploadError> {
        self.begin(file)?.complete().await
    }
}

/// An accepted file whose extraction request has not finished. Dropping it
/// early returns the card to the drop zone.
pub struct PendingUpload {
    backend: Arc<dyn RecruiterBackend>,
    state: Arc<watch::Sender<UploadState>>,
    file: ResumeFile,
    size_bytes: usize,
    settled: bool,
}

impl PendingUpload {
    pub fn file_name(&self) -> &str {
        &self.file.file_name
    }

    /// A backend failure drops the file and returns the card to the drop zone.
    pub async fn complete(mut self) -> Result<UploadedContext, UploadError> {
        let result = self.backend.upload_resume(&self.file).await;
        self.settled = true;

        let file_name = self.file.file_name.clone();
        match result {
            Ok(response) => {
                info!(
                    file_name = %file_name,
                    extracted_chars = response.text.chars().count(),
                    "resume uploaded"
                );
                self.state.send_replace(UploadState::Loaded {
                    file_name: file_name.clone(),
                    size_bytes: self.size_bytes,
                });
                Ok(UploadedContext {
                    resume_text: response.text,
                    file_name,
                    size_bytes: self.size_bytes,
                })
            }
            Err(e) => {
                error!(file_name = %file_name, "upload error: {e}");
                self.state.send_replace(UploadState::Empty);
                Err(UploadError::Backend(e))
            }
        }
    }
}

impl Drop for PendingUpload {
    fn drop(&mut self) {
        if !self.settled {
            warn!(file_name = %self.file.file_name, "upload abandoned");
            self.state.send_replace(UploadState::Empty);
        }
    }
}
