use crate::api::error::ApiError;
use crate::auth::{AuthGate, RoleResolver};
use crate::config::Config;
use crate::store::Database;
use axum::extract::FromRef;
use std::sync::Arc;
use tracing::error;

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Database,
    pub gate: AuthGate,
}

impl AppState {
    pub fn new(config: Config, db: Database) -> Self {
        let gate = AuthGate::new(&config, RoleResolver::from_database(&db));
        Self {
            config: Arc::new(config),
            db,
            gate,
        }
    }

    /// Log an unexpected failure and convert it to a 500. The detail is only
    /// exposed outside production.
    pub fn internal(&self, err: anyhow::Error) -> ApiError {
        error!(error = ?err, "Request failed");
        ApiError::Internal {
            detail: (!self.config.is_production()).then(|| format!("{:#}", err)),
        }
    }
}

impl FromRef<AppState> for AuthGate {
    fn from_ref(state: &AppState) -> Self {
        state.gate.clone()
    }
}
