// src/utils/jwt.rs

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{config::Config, error::AppError};

/// Session token claims.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SessionClaims {
    /// Subject - the session id.
    pub sub: String,
    /// Expiration time as Unix timestamp.
    pub exp: usize,
}

impl SessionClaims {
    pub fn session_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.sub).map_err(|_| AppError::AuthError("Invalid token".to_string()))
    }
}

/// Signs a token for a quiz session.
pub fn sign_session_token(
    session_id: Uuid,
    secret: &str,
    expiration_seconds: u64,
) -> Result<String, AppError> {
    // Calculate expiration: current time + expiration_seconds
    let expiration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .as_secs() as usize
        + expiration_seconds as usize;

    let claims = SessionClaims {
        sub: session_id.to_string(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Verifies and decodes a session token.
///
/// Returns the `SessionClaims` if valid, otherwise returns an `AppError`.
pub fn verify_session_token(token: &str, secret: &str) -> Result<SessionClaims, AppError> {
    let token_data = decode(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::AuthError("Invalid token".to_string()))?;

    Ok(token_data.claims)
}

/// Axum Middleware: Session.
///
/// Validates the 'Authorization: Bearer <token>' header and injects
/// `SessionClaims` into the request extensions.
/// If invalid, returns 401 Unauthorized.
pub async fn session_middleware(
    State(config): State<Config>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        _ => return Err(StatusCode::UNAUTHORIZED),
    };

    match verify_session_token(token, &config.session_secret) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            Ok(next.run(req).await)
        }
        Err(_) => Err(StatusCode::UNAUTHORIZED),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_roundtrip_keeps_session_id() {
        let id = Uuid::new_v4();
        let token = sign_session_token(id, "secret", 60).unwrap();
        let claims = verify_session_token(&token, "secret").unwrap();
        assert_eq!(claims.session_id().unwrap(), id);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = sign_session_token(Uuid::new_v4(), "secret", 60).unwrap();
        assert!(matches!(
            verify_session_token(&token, "other"),
            Err(AppError::AuthError(_))
        ));
    }
}
