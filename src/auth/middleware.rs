//! Authentication Middleware
//! Mission: Turn a bearer token into a verified, active identity

use crate::auth::{
    error::AuthError,
    jwt::JwtHandler,
    models::Identity,
    resolver::RoleResolver,
};
use crate::config::Config;
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Everything the gate needs: the token verifier and the partition resolver.
#[derive(Clone)]
pub struct AuthGate {
    pub tokens: Arc<JwtHandler>,
    pub resolver: RoleResolver,
}

impl AuthGate {
    pub fn new(config: &Config, resolver: RoleResolver) -> Self {
        Self {
            tokens: Arc::new(JwtHandler::from_config(config)),
            resolver,
        }
    }

    /// Run the full pipeline against request headers.
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<Identity, AuthError> {
        let token = bearer_token(headers).ok_or(AuthError::NoCredential)?;

        let claims = self.tokens.verify(token).inspect_err(|e| {
            debug!(code = e.code(), "Token rejected");
        })?;

        let (role, store) = self.resolver.resolve(&claims.role)?;
        let subject_id = claims.subject_id().ok_or(AuthError::InvalidCredential)?;

        let record = store
            .find_by_id(subject_id)
            .await
            .map_err(AuthError::Internal)?
            .ok_or(AuthError::RecordNotFound)?;

        if !record.is_active() {
            warn!("{}#{} rejected: account inactive", role, subject_id);
            return Err(AuthError::RecordInactive);
        }

        Ok(Identity { role, record })
    }
}

/// `Authorization: Bearer <token>`; anything else counts as no credential.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Auth middleware: rejects the request unless the gate yields an identity
pub async fn auth_middleware(
    State(gate): State<AuthGate>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let identity = gate.authenticate(req.headers()).await?;

    // Handlers read it back through the `Identity` extractor
    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

/// Optional auth middleware - requests without an `Authorization` header pass
/// through anonymously; a header that is present must authenticate.
pub async fn optional_auth_middleware(
    State(gate): State<AuthGate>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    if req.headers().contains_key(AUTHORIZATION) {
        let identity = gate.authenticate(req.headers()).await?;
        req.extensions_mut().insert(identity);
    }

    Ok(next.run(req).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or(AuthError::Unauthenticated)
    }
}
