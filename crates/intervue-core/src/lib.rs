//! # Intervue Core
//!
//! Core types shared by every Intervue crate:
//!
//! - [`errors`]: the request-pipeline error taxonomy and its classifier
//! - [`response`]: the `{ success, data }` success envelope
//! - [`password`]: bcrypt password hashing and verification
//!
//! # Example
//!
//! ```ignore
//! use intervue_core::{AppError, AuthFailure, ErrorKind};
//!
//! let record = AppError::from(AuthFailure::Expired).classify();
//! assert_eq!(record.kind, ErrorKind::Unauthenticated);
//! assert_eq!(record.status.as_u16(), 401);
//! ```

pub mod errors;
pub mod password;
pub mod response;

// Re-export commonly used types at crate root
pub use errors::{AppError, AuthFailure, ErrorBody, ErrorKind, ErrorRecord, FieldViolation, UploadRejection};
pub use password::{hash_password, verify_password};
pub use response::ApiResponse;
