//! Identity resolution middleware.
//!
//! Resolves the `Authorization: Bearer` token to a user and stores the result
//! in request extensions. A missing or invalid token is not rejected here;
//! routes decide what an anonymous caller means. Repository failures during
//! the lookup do short-circuit, so an infrastructure outage reads as a 500
//! rather than a login prompt.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use cliphost_core::models::User;
use cliphost_core::AppError;
use cliphost_db::UserRepositoryTrait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::auth::models::{Claims, CurrentUser};
use crate::error::HttpAppError;

/// State for the identity middleware.
#[derive(Clone)]
pub struct AuthState {
    pub decoding_key: DecodingKey,
    pub validation: Validation,
    pub users: Arc<dyn UserRepositoryTrait>,
}

impl AuthState {
    pub fn new(secret: &str, users: Arc<dyn UserRepositoryTrait>) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            users,
        }
    }
}

/// Best-effort identity resolution for protected routes.
pub async fn identity_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    match resolve_identity(&auth_state, &request).await {
        Ok(Some(user)) => {
            request.extensions_mut().insert(CurrentUser(user));
        }
        Ok(None) => {}
        Err(error) => return HttpAppError(error).into_response(),
    }

    next.run(request).await
}

fn resolve_identity<'a>(
    auth_state: &'a AuthState,
    request: &Request,
) -> impl std::future::Future<Output = Result<Option<User>, AppError>> + Send + 'a {
    // The request body is !Sync, so the `&Request` borrow must end before the
    // repository await or the middleware future would not be Send.
    let claims = match bearer_token(request) {
        Some(token) => {
            match decode::<Claims>(token, &auth_state.decoding_key, &auth_state.validation) {
                Ok(data) => Some(data.claims),
                Err(error) => {
                    tracing::debug!(error = %error, "Rejected bearer token");
                    None
                }
            }
        }
        None => None,
    };

    async move {
        let claims = match claims {
            Some(claims) => claims,
            None => return Ok(None),
        };

        let user = auth_state.users.find_by_id(claims.sub).await?;
        if user.is_none() {
            tracing::debug!(user_id = %claims.sub, "Token subject has no account");
        }
        Ok(user)
    }
}

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
