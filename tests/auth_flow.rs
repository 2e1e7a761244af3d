//! End-to-end checks of the auth gate and role guards through the public router.

use axum::{
    body::Body,
    http::{header::AUTHORIZATION, Request, StatusCode},
    Router,
};
use carematch_backend::{
    auth::{Claims, JwtHandler, Role},
    router,
    store::{Database, NewAccount},
    AppState, Config,
};
use chrono::{Duration, Utc};
use clap::Parser;
use serde_json::{json, Value};
use tower::ServiceExt;

const SECRET: &str = "integration-test-secret";

fn state() -> AppState {
    let config = Config::parse_from([
        "carematch",
        "--jwt-secret",
        SECRET,
        "--app-env",
        "development",
    ]);
    AppState::new(config, Database::open_in_memory().unwrap())
}

async fn seed(state: &AppState, role: Role, email: &str, active: bool) -> i64 {
    state
        .db
        .insert(
            role,
            NewAccount {
                email: email.to_string(),
                full_name: "Seeded".to_string(),
                password_hash: "not-used".to_string(),
                is_active: active,
            },
        )
        .await
        .unwrap()
        .id()
}

/// Seed ids 1..=n so that `support#n` exists.
async fn seed_support_up_to(state: &AppState, n: i64) {
    for i in 1..=n {
        seed(state, Role::Support, &format!("support{}@example.com", i), true).await;
    }
}

async fn call(app: &Router, uri: &str, authorization: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(AUTHORIZATION, value);
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

fn assert_error(result: (StatusCode, Value), status: StatusCode, code: &str) {
    assert_eq!(result.0, status, "body: {}", result.1);
    assert_eq!(result.1["success"], json!(false));
    assert_eq!(result.1["error"]["code"], json!(code));
    assert!(result.1["error"]["message"].is_string());
}

const GUARDED_ROUTES: [&str; 4] = [
    "/api/auth/me",
    "/api/admin/stats",
    "/api/support/overview",
    "/api/caregiver/profile",
];

#[tokio::test]
async fn support_seven_is_forbidden_on_admin_routes_and_admitted_on_support_routes() {
    let state = state();
    seed_support_up_to(&state, 7).await;
    let token = state.gate.tokens.issue(7, Role::Support).unwrap().token;
    let app = router(state);

    let admin_only = call(&app, "/api/admin/stats", Some(&bearer(&token))).await;
    assert_error(admin_only, StatusCode::FORBIDDEN, "FORBIDDEN");

    let (status, body) = call(&app, "/api/support/overview", Some(&bearer(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["viewer"], json!("support#7"));
    assert_eq!(body["data"]["partitions"]["support"]["total"], json!(7));
}

#[tokio::test]
async fn missing_or_non_bearer_header_is_no_token() {
    let app = router(state());

    for route in GUARDED_ROUTES {
        assert_error(call(&app, route, None).await, StatusCode::UNAUTHORIZED, "NO_TOKEN");
        assert_error(
            call(&app, route, Some("Basic dXNlcjpwYXNz")).await,
            StatusCode::UNAUTHORIZED,
            "NO_TOKEN",
        );
    }
}

#[tokio::test]
async fn expired_and_malformed_tokens() {
    let state = state();
    let id = seed(&state, Role::Admin, "admin@example.com", true).await;
    let now = Utc::now().timestamp() as usize;
    let expired = state
        .gate
        .tokens
        .sign(&Claims {
            sub: id.to_string(),
            role: "admin".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        })
        .unwrap();
    let app = router(state);

    for route in GUARDED_ROUTES {
        assert_error(
            call(&app, route, Some(&bearer(&expired))).await,
            StatusCode::UNAUTHORIZED,
            "TOKEN_EXPIRED",
        );
        for bad in ["abc", "a.b.c", "eyJhbGciOiJIUzI1NiJ9.e30.sig"] {
            assert_error(
                call(&app, route, Some(&bearer(bad))).await,
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
            );
        }
    }
}

#[tokio::test]
async fn token_signed_with_another_secret_is_invalid() {
    let state = state();
    let id = seed(&state, Role::Admin, "admin@example.com", true).await;
    let foreign = JwtHandler::new("some-other-secret", Duration::hours(1))
        .issue(id, Role::Admin)
        .unwrap()
        .token;
    let app = router(state);

    assert_error(
        call(&app, "/api/auth/me", Some(&bearer(&foreign))).await,
        StatusCode::UNAUTHORIZED,
        "INVALID_TOKEN",
    );
}

#[tokio::test]
async fn role_outside_closed_set_is_invalid_role() {
    let state = state();
    seed(&state, Role::Admin, "admin@example.com", true).await;
    let now = Utc::now().timestamp() as usize;
    let app_tokens = state.gate.tokens.clone();
    let app = router(state);

    for tag in ["superuser", "ADMIN", "care-giver", ""] {
        let token = app_tokens
            .sign(&Claims {
                sub: "1".to_string(),
                role: tag.to_string(),
                iat: now,
                exp: now + 600,
            })
            .unwrap();
        assert_error(
            call(&app, "/api/auth/me", Some(&bearer(&token))).await,
            StatusCode::UNAUTHORIZED,
            "INVALID_ROLE",
        );
    }
}

#[tokio::test]
async fn unknown_subject_and_inactive_account() {
    let state = state();
    let inactive = seed(&state, Role::CareGiver, "off@example.com", false).await;
    let ghost = state.gate.tokens.issue(inactive + 100, Role::CareGiver).unwrap().token;
    let disabled = state.gate.tokens.issue(inactive, Role::CareGiver).unwrap().token;
    let app = router(state);

    assert_error(
        call(&app, "/api/caregiver/profile", Some(&bearer(&ghost))).await,
        StatusCode::UNAUTHORIZED,
        "USER_NOT_FOUND",
    );
    assert_error(
        call(&app, "/api/caregiver/profile", Some(&bearer(&disabled))).await,
        StatusCode::UNAUTHORIZED,
        "ACCOUNT_INACTIVE",
    );
}

#[tokio::test]
async fn every_role_is_held_to_its_allow_list() {
    let state = state();
    let mut tokens = Vec::new();
    for role in Role::ALL {
        let id = seed(&state, role, &format!("{}@example.com", role), true).await;
        tokens.push((role, state.gate.tokens.issue(id, role).unwrap().token));
    }
    let app = router(state);

    let routes: [(&str, &[Role]); 4] = [
        ("/api/auth/me", &Role::ALL),
        ("/api/admin/stats", &[Role::Admin]),
        ("/api/support/care-recipients", &[Role::Support, Role::Admin]),
        ("/api/caregiver/profile", &[Role::CareGiver]),
    ];

    for (route, allowed) in routes {
        for (role, token) in &tokens {
            let (status, body) = call(&app, route, Some(&bearer(token))).await;
            if allowed.contains(role) {
                assert_eq!(status, StatusCode::OK, "{} as {}: {}", route, role, body);
                assert_eq!(body["success"], json!(true));
            } else {
                assert_error((status, body), StatusCode::FORBIDDEN, "FORBIDDEN");
            }
        }
    }
}
