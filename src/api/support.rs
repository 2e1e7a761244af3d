//! Support dashboard endpoints. Open to support staff and admins.

use crate::api::{
    admin::{partition_stats, PartitionStats},
    error::ApiError,
    extract::ApiQuery,
    state::AppState,
    PageQuery,
};
use crate::auth::{Identity, Role};
use crate::envelope::{ok, Envelope};
use crate::store::{Page, UserRecord};
use axum::{
    extract::State,
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Overview {
    pub viewer: String,
    pub partitions: PartitionStats,
}

/// GET /api/support/overview
pub async fn overview(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Envelope<Overview>>, ApiError> {
    Ok(ok(Overview {
        viewer: identity.label(),
        partitions: partition_stats(&state).await?,
    }))
}

async fn list_partition(
    state: &AppState,
    role: Role,
    query: &PageQuery,
) -> Result<Json<Envelope<Page<UserRecord>>>, ApiError> {
    let page = state
        .gate
        .resolver
        .store(role)
        .list(query.request())
        .await
        .map_err(|e| state.internal(e))?;
    Ok(ok(page))
}

/// GET /api/support/care-givers
pub async fn care_givers(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<Json<Envelope<Page<UserRecord>>>, ApiError> {
    list_partition(&state, Role::CareGiver, &query).await
}

/// GET /api/support/care-recipients
pub async fn care_recipients(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<Json<Envelope<Page<UserRecord>>>, ApiError> {
    list_partition(&state, Role::CareRecipient, &query).await
}
