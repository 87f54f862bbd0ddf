//! # Intervue Auth
//!
//! Token verification and role authorization for the Intervue API.
//!
//! - [`claims`]: the signed claim set carried by access tokens
//! - [`jwt`]: bearer header parsing, token issuing and verification
//! - [`principal`]: the verified identity handed to route handlers
//! - [`roles`]: the closed role set and membership checks
//!
//! # Example
//!
//! ```ignore
//! use intervue_auth::{Role, authenticate, authorize, create_access_token};
//! use intervue_config::{JwtConfig, ServerConfig};
//!
//! let config = JwtConfig::from_env(ServerConfig::from_env().environment)?;
//! let token = create_access_token("user-123", Role::Candidate, &config)?;
//!
//! let header = format!("Bearer {token}");
//! let principal = authenticate(Some(&header), &config)?;
//! authorize(Some(&principal), &[Role::Candidate])?;
//! ```

pub mod claims;
pub mod jwt;
pub mod principal;
pub mod roles;

// Re-export commonly used types at crate root
pub use claims::Claims;
pub use jwt::{authenticate, bearer_token, create_access_token, encode_claims, verify_token};
pub use principal::Principal;
pub use roles::{Role, authorize};
