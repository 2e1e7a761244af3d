//! Caregiver self-service endpoints. Care givers only.

use crate::api::{error::ApiError, extract::ApiJson, state::AppState};
use crate::auth::Identity;
use crate::envelope::{ok, Envelope};
use crate::store::{CareGiverProfileUpdate, UserRecord};
use axum::{extract::State, Json};
use tracing::info;

/// GET /api/caregiver/profile
///
/// The gate already loaded a fresh record, so no second lookup.
pub async fn get_profile(identity: Identity) -> Json<Envelope<UserRecord>> {
    ok(identity.record)
}

fn normalize(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

fn validate(update: CareGiverProfileUpdate) -> Result<CareGiverProfileUpdate, ApiError> {
    let update = CareGiverProfileUpdate {
        full_name: normalize(update.full_name),
        headline: normalize(update.headline),
        bio: normalize(update.bio),
        city: normalize(update.city),
        hourly_rate_cents: update.hourly_rate_cents,
    };

    if update.full_name.as_deref() == Some("") {
        return Err(ApiError::Validation("full_name cannot be empty".to_string()));
    }
    if update.hourly_rate_cents.is_some_and(|rate| rate < 0) {
        return Err(ApiError::Validation(
            "hourly_rate_cents must be non-negative".to_string(),
        ));
    }
    Ok(update)
}

/// PUT /api/caregiver/profile
pub async fn update_profile(
    State(state): State<AppState>,
    identity: Identity,
    ApiJson(update): ApiJson<CareGiverProfileUpdate>,
) -> Result<Json<Envelope<UserRecord>>, ApiError> {
    let update = validate(update)?;

    let record = state
        .db
        .update_care_giver_profile(identity.id(), &update)
        .await
        .map_err(|e| state.internal(e))?
        .ok_or_else(|| ApiError::NotFound(identity.label()))?;

    info!("{} updated profile", identity.label());
    Ok(ok(record))
}
