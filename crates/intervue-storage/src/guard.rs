//! The upload guard.
//!
//! Checks run in a fixed order for a single-file operation:
//!
//! 1. count (exactly one attachment)
//! 2. extension against the whitelist
//! 3. declared MIME type against the allowed prefixes
//! 4. byte size against the limit
//!
//! An attachment that passes is written under a generated name inside the
//! configured directory with create-new semantics.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use metrics::{counter, histogram};
use serde::Serialize;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

use intervue_config::UploadConfig;
use intervue_core::{AppError, UploadRejection};

use crate::naming::generate_storage_name;

/// One file part received from a client. Every field except `bytes` is
/// client-controlled and untrusted.
#[derive(Clone)]
pub struct Attachment {
    /// Form field the file arrived under.
    pub field: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("field", &self.field)
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl Attachment {
    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Where and how an accepted attachment was stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct UploadDescriptor {
    /// Client-supplied name, kept for display only.
    pub original_name: Option<String>,
    pub storage_name: String,
    pub content_type: String,
    pub size: u64,
    #[serde(skip)]
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct UploadGuard {
    config: Arc<UploadConfig>,
}

impl UploadGuard {
    /// Builds the guard and creates the destination directory (with parents)
    /// if it is missing.
    pub fn new(config: UploadConfig) -> std::io::Result<Self> {
        std::fs::create_dir_all(&config.dir)?;
        info!(dir = %config.dir.display(), "Upload directory ready");

        Ok(Self {
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    pub fn dir(&self) -> &Path {
        &self.config.dir
    }

    pub fn max_bytes(&self) -> u64 {
        self.config.max_bytes
    }

    /// Returns the lowercased extension of `file_name` if it is whitelisted.
    pub fn validated_extension(&self, file_name: Option<&str>) -> Result<String, UploadRejection> {
        let extension = file_name
            .and_then(|name| Path::new(name).extension())
            .and_then(OsStr::to_str)
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if extension.is_empty() || !self.config.allowed_extensions.contains(&extension) {
            return Err(UploadRejection::InvalidExtension {
                extension,
                allowed: self.config.allowed_extensions.join(", "),
            });
        }

        Ok(extension)
    }

    /// Returns the normalized MIME type (parameters stripped, lowercased) if
    /// it starts with an allowed prefix.
    pub fn validated_content_type(
        &self,
        content_type: Option<&str>,
    ) -> Result<String, UploadRejection> {
        let essence = content_type
            .and_then(|value| value.split(';').next())
            .map(|value| value.trim().to_ascii_lowercase())
            .unwrap_or_default();

        let allowed = self
            .config
            .allowed_mime_prefixes
            .iter()
            .any(|prefix| essence.len() > prefix.len() && essence.starts_with(prefix.as_str()));

        if !allowed {
            return Err(UploadRejection::InvalidContentType {
                received: essence,
                allowed: self.config.allowed_mime_prefixes.join(", "),
            });
        }

        Ok(essence)
    }

    pub fn check_size(&self, len: u64) -> Result<(), UploadRejection> {
        if len > self.config.max_bytes {
            return Err(UploadRejection::TooLarge {
                max_bytes: self.config.max_bytes,
            });
        }
        Ok(())
    }

    /// Runs the extension, content-type and size checks. Both the extension
    /// and the content type must pass.
    pub fn inspect(&self, attachment: &Attachment) -> Result<(String, String), UploadRejection> {
        let extension = self.validated_extension(attachment.file_name.as_deref())?;
        let content_type = self.validated_content_type(attachment.content_type.as_deref())?;
        self.check_size(attachment.len())?;
        Ok((extension, content_type))
    }

    /// Picks the one attachment an operation accepts under `field`.
    pub fn single(&self, mut attachments: Vec<Attachment>, field: &str) -> Result<Attachment, AppError> {
        match attachments.len() {
            0 => Err(AppError::invalid_field(
                field,
                format!("{field} file is required"),
            )),
            1 => Ok(attachments.remove(0)),
            _ => Err(reject(UploadRejection::TooManyFiles { max: 1 })),
        }
    }

    /// Validates and writes one attachment.
    #[instrument(skip(self, attachment), fields(field = %attachment.field, size = attachment.len()))]
    pub async fn store(&self, attachment: Attachment) -> Result<UploadDescriptor, AppError> {
        let (extension, content_type) = self.inspect(&attachment).map_err(reject)?;

        let storage_name = generate_storage_name(&extension);
        let path = self.config.dir.join(&storage_name);

        // The directory may have been removed since startup.
        fs::create_dir_all(&self.config.dir)
            .await
            .with_context(|| format!("failed to create {}", self.config.dir.display()))
            .map_err(AppError::Internal)?;

        write_new(&path, &attachment.bytes)
            .await
            .with_context(|| format!("failed to write {}", path.display()))
            .map_err(AppError::Internal)?;

        counter!("uploads_stored_total").increment(1);
        histogram!("upload_size_bytes").record(attachment.len() as f64);
        info!(storage_name = %storage_name, "Stored upload");

        Ok(UploadDescriptor {
            original_name: attachment.file_name,
            storage_name,
            content_type,
            size: attachment.bytes.len() as u64,
            path,
        })
    }
}

/// Records a rejection and lifts it into the pipeline error.
pub fn reject(rejection: UploadRejection) -> AppError {
    warn!(reason = rejection.reason(), "Upload rejected: {}", rejection);
    counter!("uploads_rejected_total", "reason" => rejection.reason()).increment(1);
    AppError::UploadRejected(rejection)
}

/// Creates `path` and writes `bytes` to it. A file this call did not create
/// is never touched; a partial file it did create is removed on failure.
async fn write_new(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;

    let written = async {
        file.write_all(bytes).await?;
        file.flush().await
    }
    .await;

    if let Err(err) = written {
        drop(file);
        let _ = fs::remove_file(path).await;
        return Err(err);
    }
    Ok(())
}
