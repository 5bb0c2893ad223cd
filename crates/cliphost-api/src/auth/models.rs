use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::Utc;
use cliphost_core::models::User;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid, // user id
    pub exp: i64,  // expiration timestamp
    pub iat: i64,  // issued at timestamp
}

/// Resolved caller, stored in request extensions by the identity middleware.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Extractor for the optional caller identity.
///
/// Never rejects. Each mutation route decides what a missing identity means,
/// so the precondition error (message and status) stays route-specific.
/// Implemented over request parts so it composes with `Multipart`, which
/// consumes the body.
#[derive(Debug)]
pub struct Identity(pub Option<User>);

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Identity(
            parts.extensions.get::<CurrentUser>().map(|c| c.0.clone()),
        ))
    }
}

/// Mint a bearer token for a user id.
pub fn issue_token(
    user_id: Uuid,
    secret: &str,
    expiry_hours: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        exp: (now + chrono::Duration::hours(expiry_hours)).timestamp(),
        iat: now.timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, DecodingKey, Validation};

    #[test]
    fn test_issued_token_round_trips_claims() {
        let user_id = Uuid::new_v4();
        let secret = "unit-test-secret-at-least-32-chars-long";

        let token = issue_token(user_id, secret, 24).unwrap();
        let decoded = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )
        .unwrap();

        assert_eq!(decoded.claims.sub, user_id);
        assert!(decoded.claims.exp > decoded.claims.iat);
    }

    #[test]
    fn test_token_rejected_with_wrong_secret() {
        let token = issue_token(
            Uuid::new_v4(),
            "unit-test-secret-at-least-32-chars-long",
            24,
        )
        .unwrap();

        let result = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"a-different-secret-also-32-chars-xx"),
            &Validation::default(),
        );
        assert!(result.is_err());
    }
}
