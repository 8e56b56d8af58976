use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::{ApiError, AppState};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
}

/// Authenticated caller, extracted from a `Bearer` JWT. Handlers take this
/// as an argument to require authentication; any failure is a 401 before the
/// handler body runs.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .ok_or_else(|| {
                warn!(uri = %parts.uri, "missing bearer token");
                ApiError::unauthorized()
            })?;

        let data = decode::<Claims>(token, &state.jwt_decoding, &Validation::new(Algorithm::HS256))
            .map_err(|e| {
                warn!(uri = %parts.uri, error = %e, "rejected bearer token");
                ApiError::unauthorized()
            })?;

        Ok(CurrentUser {
            id: data.claims.sub,
        })
    }
}

pub fn decoding_key(secret: &str) -> DecodingKey {
    DecodingKey::from_secret(secret.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    #[test]
    fn valid_token_round_trips_claims() {
        let claims = Claims {
            sub: "picker-7".to_string(),
            exp: chrono::Utc::now().timestamp() + 600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        let decoded = decode::<Claims>(
            &token,
            &decoding_key("test-secret"),
            &Validation::new(Algorithm::HS256),
        )
        .unwrap();
        assert_eq!(decoded.claims.sub, "picker-7");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let claims = Claims {
            sub: "picker-7".to_string(),
            exp: chrono::Utc::now().timestamp() + 600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        let result = decode::<Claims>(
            &token,
            &decoding_key("other-secret"),
            &Validation::new(Algorithm::HS256),
        );
        assert!(result.is_err());
    }
}
