use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use axum::extract::Multipart;
use chrono::Utc;
use tracing::{debug, warn};

use crate::error::{FormError, RequestError};
use crate::models::user::UserId;

pub const FILE_FIELD: &str = "pdf";
pub const USER_ID_FIELD: &str = "userId";
pub const RESOURCE_NAME_FIELD: &str = "resourceName";
pub const RESOURCE_CLASS_FIELD: &str = "resourceClass";

static SPOOL_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Uploaded file written to the temp directory.
///
/// The file is deleted when dropped unless [`SpooledFile::remove`] already did.
#[derive(Debug)]
pub struct SpooledFile {
    path: PathBuf,
    file_name: String,
    removed: bool,
}

impl SpooledFile {
    pub async fn create(dir: &Path, original_name: &str, content: &[u8]) -> io::Result<Self> {
        let file_name = Path::new(original_name)
            .file_name()
            .and_then(|name| name.to_str())
            .filter(|name| !name.is_empty())
            .unwrap_or("upload")
            .to_string();
        let sequence = SPOOL_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let path = dir.join(format!(
            "{}-{}-{}",
            Utc::now().timestamp_millis(),
            sequence,
            file_name
        ));
        tokio::fs::write(&path, content).await?;
        debug!("spooled {} bytes to {path:?}", content.len());
        Ok(Self {
            path,
            file_name,
            removed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name the client sent, without any directory part.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub async fn remove(mut self) -> io::Result<()> {
        tokio::fs::remove_file(&self.path).await?;
        self.removed = true;
        Ok(())
    }
}

impl Drop for SpooledFile {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        // drop cannot await; a single unlink is cheap enough to run inline
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("removed abandoned spool file {:?}", self.path),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!("unable to remove spool file {:?}: {e}", self.path),
        }
    }
}

#[derive(Debug)]
pub struct UploadForm {
    pub user_id: UserId,
    pub resource_name: String,
    pub resource_class: String,
    pub file: SpooledFile,
}

/// Reads the upload form, spooling the file field into `spool_dir`.
pub async fn read_upload_form(
    mut multipart: Multipart,
    spool_dir: &Path,
) -> Result<UploadForm, RequestError> {
    let mut user_id = None;
    let mut resource_name = None;
    let mut resource_class = None;
    let mut file = None;

    while let Some(field) = multipart.next_field().await.map_err(FormError::from)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            USER_ID_FIELD => user_id = Some(field.text().await.map_err(FormError::from)?),
            RESOURCE_NAME_FIELD => {
                resource_name = Some(field.text().await.map_err(FormError::from)?)
            }
            RESOURCE_CLASS_FIELD => {
                resource_class = Some(field.text().await.map_err(FormError::from)?)
            }
            FILE_FIELD => {
                let original_name = field.file_name().unwrap_or_default().to_string();
                let content = field.bytes().await.map_err(FormError::from)?;
                file = Some(SpooledFile::create(spool_dir, &original_name, &content).await?);
            }
            other => debug!("ignoring unexpected form field `{other}`"),
        }
    }

    let file = file.ok_or(FormError::MissingField(FILE_FIELD))?;
    let user_id = user_id.ok_or(FormError::MissingField(USER_ID_FIELD))?;
    let user_id = user_id
        .trim()
        .parse::<UserId>()
        .map_err(|_| FormError::InvalidField {
            field: USER_ID_FIELD,
            value: user_id.clone(),
        })?;
    Ok(UploadForm {
        user_id,
        resource_name: resource_name.ok_or(FormError::MissingField(RESOURCE_NAME_FIELD))?,
        resource_class: resource_class.ok_or(FormError::MissingField(RESOURCE_CLASS_FIELD))?,
        file,
    })
}
