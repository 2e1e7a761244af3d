//! Admin dashboard endpoints. Mounted behind `require_roles(&[Role::Admin])`.

use crate::api::{
    error::ApiError,
    extract::{ApiJson, ApiPath, ApiQuery},
    state::AppState,
};
use crate::auth::{Identity, Role};
use crate::envelope::{ok, Envelope};
use crate::store::{Page, PageRequest, PartitionCount, SubscriptionStatus, UserRecord};
use axum::{
    extract::State,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub role: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct SubscriptionUpdate {
    pub status: SubscriptionStatus,
}

#[derive(Debug, Serialize)]
pub struct PartitionStats {
    pub admin: PartitionCount,
    pub support: PartitionCount,
    pub care_giver: PartitionCount,
    pub care_recipient: PartitionCount,
}

fn parse_role(tag: &str) -> Result<Role, ApiError> {
    Role::parse(tag).ok_or_else(|| ApiError::Validation(format!("Unknown role '{}'", tag)))
}

async fn count(state: &AppState, role: Role) -> Result<PartitionCount, ApiError> {
    state
        .gate
        .resolver
        .store(role)
        .count()
        .await
        .map_err(|e| state.internal(e))
}

pub(crate) async fn partition_stats(state: &AppState) -> Result<PartitionStats, ApiError> {
    Ok(PartitionStats {
        admin: count(state, Role::Admin).await?,
        support: count(state, Role::Support).await?,
        care_giver: count(state, Role::CareGiver).await?,
        care_recipient: count(state, Role::CareRecipient).await?,
    })
}

/// List users in one partition - GET /api/admin/users?role=...
pub async fn list_users(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListUsersQuery>,
) -> Result<Json<Envelope<Page<UserRecord>>>, ApiError> {
    let tag = query
        .role
        .as_deref()
        .ok_or_else(|| ApiError::Validation("role query parameter is required".to_string()))?;
    let role = parse_role(tag)?;

    let page = state
        .gate
        .resolver
        .store(role)
        .list(PageRequest::new(query.page, query.limit))
        .await
        .map_err(|e| state.internal(e))?;

    Ok(ok(page))
}

/// Activate or soft-disable a user - PATCH /api/admin/users/:role/:id/status
pub async fn set_user_status(
    State(state): State<AppState>,
    identity: Identity,
    ApiPath((tag, id)): ApiPath<(String, i64)>,
    ApiJson(update): ApiJson<StatusUpdate>,
) -> Result<Json<Envelope<UserRecord>>, ApiError> {
    let role = parse_role(&tag)?;

    if role == identity.role && id == identity.id() && !update.is_active {
        return Err(ApiError::Validation(
            "Cannot deactivate your own account".to_string(),
        ));
    }

    let store = state.gate.resolver.store(role);
    let found = store
        .set_active(id, update.is_active)
        .await
        .map_err(|e| state.internal(e))?;
    if !found {
        return Err(ApiError::NotFound(format!("{}#{}", role, id)));
    }

    let record = store
        .find_by_id(id)
        .await
        .map_err(|e| state.internal(e))?
        .ok_or_else(|| ApiError::NotFound(format!("{}#{}", role, id)))?;

    info!(
        "{} set {}#{} is_active={}",
        identity.label(),
        role,
        id,
        update.is_active
    );

    Ok(ok(record))
}

/// Billing state of a care giver - PATCH /api/admin/care-givers/:id/subscription
pub async fn set_subscription(
    State(state): State<AppState>,
    identity: Identity,
    ApiPath(id): ApiPath<i64>,
    ApiJson(update): ApiJson<SubscriptionUpdate>,
) -> Result<Json<Envelope<UserRecord>>, ApiError> {
    let record = state
        .db
        .set_subscription_status(id, update.status)
        .await
        .map_err(|e| state.internal(e))?
        .ok_or_else(|| ApiError::NotFound(format!("{}#{}", Role::CareGiver, id)))?;

    info!(
        "{} set {}#{} subscription_status={}",
        identity.label(),
        Role::CareGiver,
        id,
        update.status.as_str()
    );

    Ok(ok(record))
}

/// Per-partition counts - GET /api/admin/stats
pub async fn stats(State(state): State<AppState>) -> Result<Json<Envelope<PartitionStats>>, ApiError> {
    Ok(ok(partition_stats(&state).await?))
}
