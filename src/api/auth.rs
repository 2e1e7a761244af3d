//! Authentication API Endpoints
//! Mission: Provide login and session introspection

use crate::api::{error::ApiError, extract::ApiJson, state::AppState};
use crate::auth::{hash_password, verify_password, AuthError, Identity, LoginRequest, LoginResponse, Role};
use crate::envelope::{ok, Envelope};
use crate::store::UserRecord;
use axum::{extract::State, Json};
use serde::Serialize;
use tracing::{info, warn};

/// Login endpoint - POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<Envelope<LoginResponse>>, ApiError> {
    info!("🔐 Login attempt: {} ({})", payload.email, payload.role);

    let (role, store) = state.gate.resolver.resolve(&payload.role)?;

    let record = store
        .find_by_email(&payload.email)
        .await
        .map_err(|e| state.internal(e))?;
    let Some(record) = record else {
        // Same bcrypt work as a real check so unknown emails are not faster
        hash_password(&payload.password, state.config.bcrypt_cost)
            .map_err(|e| state.internal(e))?;
        warn!("❌ Failed login attempt: {} ({})", payload.email, role);
        return Err(ApiError::InvalidCredentials);
    };

    let valid = verify_password(&payload.password, &record.account().password_hash)
        .map_err(|e| state.internal(e))?;
    if !valid {
        warn!("❌ Failed login attempt: {} ({})", payload.email, role);
        return Err(ApiError::InvalidCredentials);
    }

    if !record.is_active() {
        warn!("Login refused for inactive account {}#{}", role, record.id());
        return Err(AuthError::RecordInactive.into());
    }

    let issued = state
        .gate
        .tokens
        .issue(record.id(), role)
        .map_err(|e| state.internal(e))?;

    info!("✅ Login successful: {}#{}", role, record.id());

    Ok(ok(LoginResponse {
        token: issued.token,
        expires_in: issued.expires_in,
        role,
        user: record,
    }))
}

#[derive(Debug, Serialize)]
pub struct CurrentUser {
    pub role: Role,
    pub user: UserRecord,
}

/// Get current user info - GET /api/auth/me
pub async fn me(identity: Identity) -> Json<Envelope<CurrentUser>> {
    ok(CurrentUser {
        role: identity.role,
        user: identity.record,
    })
}

#[derive(Debug, Serialize)]
pub struct SessionStatus {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserRecord>,
}

/// Session probe for the web client - GET /api/auth/session (optional auth)
pub async fn session(identity: Option<Identity>) -> Json<Envelope<SessionStatus>> {
    let status = match identity {
        Some(identity) => SessionStatus {
            authenticated: true,
            role: Some(identity.role),
            user: Some(identity.record),
        },
        None => SessionStatus {
            authenticated: false,
            role: None,
            user: None,
        },
    };
    ok(status)
}
