//! Middleware modules for request processing.
//!
//! # Modules
//!
//! - [`auth`]: Bearer token extractors (`AuthUser`, `OptionalAuthUser`)
//! - [`role`]: Role gates for routers and handler-level role checks
//! - [`errors`]: The error boundary and the unmatched-route fallback
//!
//! # Request Flow
//!
//! 1. Client sends request with `Authorization: Bearer <token>` header
//! 2. A role middleware verifies the token, checks the role and stores the
//!    `AuthUser` in the request extensions
//! 3. The handler's extractors validate the payload (and attachments)
//! 4. Any failure becomes an `AppError`, which the error boundary logs
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::AuthUser;
//!
//! // Basic authentication (any valid token)
//! async fn me(auth_user: AuthUser) -> impl IntoResponse {
//!     Json(auth_user.0)
//! }
//! ```

pub mod auth;
pub mod errors;
pub mod role;
