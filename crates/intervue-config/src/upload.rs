use std::env;
use std::path::{Path, PathBuf};

use crate::split_list;

pub const DEFAULT_MAX_BYTES: u64 = 10 * 1024 * 1024;
pub const DEFAULT_EXTENSIONS: &str = "wav,mp3,m4a,flac,ogg,webm,mp4";
pub const DEFAULT_MIME_PREFIXES: &str = "audio/,video/";

/// Upload guard settings.
///
/// `dir` is always absolute; relative values are resolved against the
/// working directory when the config is built.
#[derive(Clone, Debug)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub max_bytes: u64,
    /// Lowercase, without the leading dot.
    pub allowed_extensions: Vec<String>,
    /// Lowercase, e.g. `audio/`.
    pub allowed_mime_prefixes: Vec<String>,
}

impl UploadConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let dir = lookup("UPLOAD_DIR").unwrap_or_else(|| "storage/uploads".to_string());
        let extensions =
            lookup("UPLOAD_ALLOWED_EXTENSIONS").unwrap_or_else(|| DEFAULT_EXTENSIONS.to_string());
        let prefixes = lookup("UPLOAD_ALLOWED_MIME_PREFIXES")
            .unwrap_or_else(|| DEFAULT_MIME_PREFIXES.to_string());

        Self {
            dir: absolutize(Path::new(&dir)),
            max_bytes: lookup("UPLOAD_MAX_BYTES")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_BYTES),
            allowed_extensions: split_list(&extensions)
                .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            allowed_mime_prefixes: split_list(&prefixes)
                .map(|prefix| prefix.to_ascii_lowercase())
                .collect(),
        }
    }

    /// Default limits and whitelists rooted at `dir`.
    pub fn with_dir(dir: impl AsRef<Path>) -> Self {
        let mut config = Self::from_vars(|_| None);
        config.dir = absolutize(dir.as_ref());
        config
    }
}

fn absolutize(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
