//! Router assembly: public, authenticated and role-guarded route groups.

use crate::api::{admin, auth, caregiver, state::AppState, support};
use crate::auth::{auth_middleware, optional_auth_middleware, require_roles, role_guard, Role};
use crate::config::Config;
use crate::envelope::{error_response, ok, Envelope};
use crate::middleware::request_logging;
use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method, StatusCode,
    },
    middleware,
    response::Response,
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tracing::warn;

/// Build the full application router.
///
/// Route layers run bottom-up: the auth gate is added last so it runs before
/// the role guard.
pub fn router(state: AppState) -> Router {
    let gate = state.gate.clone();
    let authenticated = || middleware::from_fn_with_state(gate.clone(), auth_middleware);
    let allow = |roles: &[Role]| middleware::from_fn_with_state(require_roles(roles), role_guard);

    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/login", post(auth::login));

    let session_routes = Router::new()
        .route("/api/auth/session", get(auth::session))
        .route_layer(middleware::from_fn_with_state(
            gate.clone(),
            optional_auth_middleware,
        ));

    let account_routes = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route_layer(authenticated());

    let admin_routes = Router::new()
        .route("/api/admin/users", get(admin::list_users))
        .route(
            "/api/admin/users/:role/:id/status",
            patch(admin::set_user_status),
        )
        .route(
            "/api/admin/care-givers/:id/subscription",
            patch(admin::set_subscription),
        )
        .route("/api/admin/stats", get(admin::stats))
        .route_layer(allow(&[Role::Admin]))
        .route_layer(authenticated());

    let support_routes = Router::new()
        .route("/api/support/overview", get(support::overview))
        .route("/api/support/care-givers", get(support::care_givers))
        .route("/api/support/care-recipients", get(support::care_recipients))
        .route_layer(allow(&[Role::Support, Role::Admin]))
        .route_layer(authenticated());

    let caregiver_routes = Router::new()
        .route(
            "/api/caregiver/profile",
            get(caregiver::get_profile).put(caregiver::update_profile),
        )
        .route_layer(allow(&[Role::CareGiver]))
        .route_layer(authenticated());

    let cors = cors_layer(&state.config);

    Router::new()
        .merge(public_routes)
        .merge(session_routes)
        .merge(account_routes)
        .merge(admin_routes)
        .merge(support_routes)
        .merge(caregiver_routes)
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(middleware::from_fn(request_logging))
        .layer(cors)
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let Some(origin) = config.frontend_origin.as_deref() else {
        return CorsLayer::permissive();
    };

    match origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([AUTHORIZATION, CONTENT_TYPE]),
        Err(_) => {
            warn!("FRONTEND_ORIGIN '{}' is not a valid header value; cross-origin requests disabled", origin);
            CorsLayer::new()
        }
    }
}

async fn health_check() -> Json<Envelope<Value>> {
    ok(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "NOT_FOUND", "Route not found")
}

async fn method_not_allowed() -> Response {
    error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        "METHOD_NOT_ALLOWED",
        "Method not allowed",
    )
}
