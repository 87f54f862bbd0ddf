//! # Intervue Storage
//!
//! Upload handling for binary attachments (interview answer recordings).
//!
//! - [`naming`]: storage names built from OS randomness and a timestamp
//! - [`guard`]: the [`UploadGuard`], which whitelists extension and MIME
//!   type, enforces size and count limits, and writes accepted files into a
//!   single fixed directory
//!
//! The client-supplied filename never reaches the filesystem; only its
//! validated extension survives into the generated name.
//!
//! # Example
//!
//! ```ignore
//! use intervue_config::UploadConfig;
//! use intervue_storage::{Attachment, UploadGuard};
//!
//! let guard = UploadGuard::new(UploadConfig::from_env())?;
//! let audio = guard.single(attachments, "audio")?;
//! let descriptor = guard.store(audio).await?;
//! println!("stored at {}", descriptor.path.display());
//! ```

pub mod guard;
pub mod naming;

pub use guard::{Attachment, UploadDescriptor, UploadGuard};
pub use naming::generate_storage_name;
