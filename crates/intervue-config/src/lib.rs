//! # Intervue Config
//!
//! Configuration structures loaded once from environment variables at
//! startup and passed by reference into each component:
//!
//! - [`jwt`]: token signing secret and lifetime
//! - [`password`]: bcrypt work factor
//! - [`upload`]: upload directory, size limit, extension and MIME whitelists
//! - [`server`]: bind address and the development-mode flag
//! - [`cors`]: allowed browser origins
//!
//! # Example
//!
//! ```ignore
//! use intervue_config::{CorsConfig, JwtConfig, ServerConfig, UploadConfig};
//!
//! let server_config = ServerConfig::from_env();
//! let jwt_config = JwtConfig::from_env(server_config.environment)?;
//! let upload_config = UploadConfig::from_env();
//! let cors_config = CorsConfig::from_env();
//! ```

pub mod cors;
pub mod jwt;
pub mod password;
pub mod server;
pub mod upload;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use jwt::{JwtConfig, JwtConfigError};
pub use password::PasswordConfig;
pub use server::{Environment, ServerConfig};
pub use upload::UploadConfig;

/// Splits a comma-separated variable into trimmed, non-empty entries.
pub(crate) fn split_list(raw: &str) -> impl Iterator<Item = String> + '_ {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
