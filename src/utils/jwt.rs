use crate::error::{AppError, AppResult};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried by the identity provider's access tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id assigned by the provider
    pub exp: i64,
    #[serde(default)]
    pub email: Option<String>,
}

/// Verifies bearer tokens issued by the identity provider. This service never
/// mints tokens; sign-in and refresh live entirely on the provider side.
#[derive(Clone)]
pub struct JwtService {
    decoding_key: DecodingKey,
    audience: String,
}

impl JwtService {
    pub fn new(secret: &str, audience: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            audience: audience.to_string(),
        }
    }

    pub fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[self.audience.as_str()]);
        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::JwtError(e))
    }

    pub fn user_id_from_claims(claims: &Claims) -> AppResult<Uuid> {
        Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::AuthError("Token subject is not a valid user id".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::json;

    const SECRET: &str = "test-secret";

    fn mint(sub: &str, aud: &str, exp_offset: i64) -> String {
        let claims = json!({
            "sub": sub,
            "aud": aud,
            "exp": chrono::Utc::now().timestamp() + exp_offset,
            "email": "freelancer@example.com",
        });
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_verify_token_accepts_valid_token() {
        let svc = JwtService::new(SECRET, "authenticated");
        let sub = Uuid::new_v4().to_string();
        let claims = svc.verify_token(&mint(&sub, "authenticated", 3600)).unwrap();
        assert_eq!(claims.sub, sub);
        assert_eq!(claims.email.as_deref(), Some("freelancer@example.com"));
        assert_eq!(
            JwtService::user_id_from_claims(&claims).unwrap().to_string(),
            sub
        );
    }

    #[test]
    fn test_verify_token_rejects_wrong_secret() {
        let svc = JwtService::new("other-secret", "authenticated");
        assert!(
            svc.verify_token(&mint(&Uuid::new_v4().to_string(), "authenticated", 3600))
                .is_err()
        );
    }

    #[test]
    fn test_verify_token_rejects_wrong_audience() {
        let svc = JwtService::new(SECRET, "authenticated");
        assert!(
            svc.verify_token(&mint(&Uuid::new_v4().to_string(), "anon", 3600))
                .is_err()
        );
    }

    #[test]
    fn test_verify_token_rejects_expired() {
        let svc = JwtService::new(SECRET, "authenticated");
        assert!(
            svc.verify_token(&mint(&Uuid::new_v4().to_string(), "authenticated", -3600))
                .is_err()
        );
    }

    #[test]
    fn test_non_uuid_subject_is_rejected() {
        let svc = JwtService::new(SECRET, "authenticated");
        let claims = svc
            .verify_token(&mint("service-role", "authenticated", 3600))
            .unwrap();
        assert!(JwtService::user_id_from_claims(&claims).is_err());
    }
}
