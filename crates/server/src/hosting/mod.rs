//! External file hosting.
//!
//! Handlers only see [`FileHost`]; [`cloudinary::CloudinaryHost`] is the
//! production implementation.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

pub mod cloudinary;

#[derive(Clone, Debug)]
pub struct UploadRequest {
    /// Local spooled copy of the file.
    pub path: PathBuf,
    pub file_name: String,
    pub public_id: String,
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct HostedFile {
    pub public_id: String,
    pub secure_url: String,
    pub resource_type: String,
}

#[derive(Debug, Error)]
pub enum HostingError {
    #[error("missing hosting credential, set `{0}`")]
    MissingCredential(&'static str),
    #[error("unable to read spooled file: {0}")]
    Io(#[from] std::io::Error),
    #[error("file host is unreachable: {0}")]
    Http(#[from] reqwest::Error),
    #[error("file host rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
}

#[async_trait]
pub trait FileHost: Send + Sync + 'static {
    async fn upload(&self, request: UploadRequest) -> Result<HostedFile, HostingError>;

    async fn destroy(&self, file: &HostedFile) -> Result<(), HostingError>;
}
