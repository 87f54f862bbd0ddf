use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use anyhow::Context;
use metrics_exporter_prometheus::PrometheusHandle;

use intervue_config::{CorsConfig, JwtConfig, PasswordConfig, ServerConfig, UploadConfig};
use intervue_storage::UploadGuard;

use crate::modules::answers::service::{AnswerAnalyzer, DeferredAnalyzer};
use crate::modules::auth::store::{InMemoryUserDirectory, UserDirectory};
use crate::modules::questions::store::{InMemoryQuestionBank, QuestionBank};

/// Future returned by the collaborator traits. Boxed so the traits stay
/// object safe behind `Arc<dyn _>`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Clone)]
pub struct AppState {
    pub jwt_config: JwtConfig,
    pub password_config: PasswordConfig,
    pub server_config: ServerConfig,
    pub cors_config: CorsConfig,
    pub uploads: UploadGuard,
    pub users: Arc<dyn UserDirectory>,
    pub questions: Arc<dyn QuestionBank>,
    pub analyzer: Arc<dyn AnswerAnalyzer>,
    /// `None` when observability is disabled.
    pub metrics: Option<PrometheusHandle>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("server_config", &self.server_config)
            .field("cors_config", &self.cors_config)
            .field("uploads", &self.uploads)
            .field("metrics", &self.metrics.is_some())
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Builds state with in-memory collaborators.
    pub fn new(
        jwt_config: JwtConfig,
        password_config: PasswordConfig,
        server_config: ServerConfig,
        cors_config: CorsConfig,
        uploads: UploadGuard,
    ) -> Self {
        Self {
            jwt_config,
            password_config,
            server_config,
            cors_config,
            uploads,
            users: Arc::new(InMemoryUserDirectory::default()),
            questions: Arc::new(InMemoryQuestionBank::default()),
            analyzer: Arc::new(DeferredAnalyzer),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: Option<PrometheusHandle>) -> Self {
        self.metrics = handle;
        self
    }

    /// Whether error responses may carry internal detail.
    pub fn expose_error_detail(&self) -> bool {
        self.server_config.is_development()
    }
}

pub fn init_app_state() -> anyhow::Result<AppState> {
    let upload_config = UploadConfig::from_env();
    let uploads = UploadGuard::new(upload_config.clone()).with_context(|| {
        format!(
            "failed to prepare upload directory {}",
            upload_config.dir.display()
        )
    })?;

    let server_config = ServerConfig::from_env();
    let jwt_config = JwtConfig::from_env(server_config.environment)?;

    Ok(AppState::new(
        jwt_config,
        PasswordConfig::from_env(),
        server_config,
        CorsConfig::from_env(),
        uploads,
    ))
}
