//! # Intervue API
//!
//! The request-ingress pipeline of an AI-assisted interview platform, served
//! with Axum.
//!
//! Every request passes the same stages, and any failing stage short-circuits
//! straight to the error boundary:
//!
//! ```text
//! token verification → role check → payload validation → upload guard → handler
//! ```
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── middleware/       # Auth extractors, role gates, error boundary
//! ├── modules/          # Feature modules
//! │   ├── health/      # Liveness
//! │   ├── auth/        # Register, login, current principal
//! │   ├── questions/   # Interview question bank
//! │   └── answers/     # Recorded answer intake (multipart)
//! ├── validator.rs      # Declarative rule sets and validating extractors
//! ├── logging.rs        # Tracing setup and request logging
//! ├── metrics.rs        # Prometheus metrics
//! ├── docs.rs           # OpenAPI document
//! ├── router.rs         # Main application router
//! └── state.rs          # Shared application state
//! ```
//!
//! Each feature module follows the same layout:
//!
//! - `mod.rs`: Module exports
//! - `controller.rs`: HTTP handlers
//! - `service.rs`: Business logic
//! - `model.rs`: DTOs, rule sets and response types
//! - `store.rs`: Collaborator trait and in-memory implementation
//! - `router.rs`: Axum router configuration
//!
//! The reusable pieces live in workspace crates:
//!
//! | Crate | Contents |
//! |-------|----------|
//! | [`intervue_core`] | `AppError`, error classification, response envelope, password hashing |
//! | [`intervue_config`] | Environment-driven configuration |
//! | [`intervue_auth`] | Claims, roles, principals, token issue and verification |
//! | [`intervue_storage`] | Upload guard and storage-name generation |
//!
//! ## Roles
//!
//! | Role | May |
//! |------|-----|
//! | Candidate | Submit recorded answers |
//! | Interviewer | Author questions, see expected answers |
//! | Admin | Everything an interviewer may |
//!
//! ## Environment Variables
//!
//! ```bash
//! JWT_SECRET=your-secure-secret-key
//! JWT_ACCESS_EXPIRY=3600
//! UPLOAD_DIR=storage/uploads
//! UPLOAD_MAX_BYTES=10485760
//! APP_ENV=development
//! ```
//!
//! ## API Documentation
//!
//! The OpenAPI document is served at `/api-docs/openapi.json`.

pub mod docs;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod validator;

// Re-export workspace crates for convenience
pub use intervue_auth;
pub use intervue_config;
pub use intervue_core;
pub use intervue_storage;
