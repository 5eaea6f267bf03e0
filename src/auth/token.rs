// JWT token generation and validation service

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::auth::{error::AuthError, models::Role};

/// JWT claims structure carried by both access and refresh tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32, // user_id
    pub email: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Token service for JWT operations.
///
/// Access and refresh tokens are signed with independent secrets and
/// independent lifetimes, so verification of one class never accepts a
/// token of the other.
pub struct TokenService {
    access_secret: String,
    refresh_secret: String,
    access_token_duration: i64,  // in seconds
    refresh_token_duration: i64, // in seconds
}

impl TokenService {
    pub fn new(
        access_secret: String,
        refresh_secret: String,
        access_token_duration: i64,
        refresh_token_duration: i64,
    ) -> Self {
        Self {
            access_secret,
            refresh_secret,
            access_token_duration,
            refresh_token_duration,
        }
    }

    /// Generate an access token
    pub fn generate_access_token(
        &self,
        user_id: i32,
        email: &str,
        role: Role,
    ) -> Result<String, AuthError> {
        self.sign(user_id, email, role, &self.access_secret, self.access_token_duration)
    }

    /// Generate a refresh token
    pub fn generate_refresh_token(
        &self,
        user_id: i32,
        email: &str,
        role: Role,
    ) -> Result<String, AuthError> {
        self.sign(user_id, email, role, &self.refresh_secret, self.refresh_token_duration)
    }

    /// Generate both access and refresh tokens
    pub fn generate_token_pair(
        &self,
        user_id: i32,
        email: &str,
        role: Role,
    ) -> Result<(String, String), AuthError> {
        let access_token = self.generate_access_token(user_id, email, role)?;
        let refresh_token = self.generate_refresh_token(user_id, email, role)?;
        Ok((access_token, refresh_token))
    }

    /// Validate an access token against the access secret
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        Self::verify(token, &self.access_secret)
    }

    /// Validate a refresh token against the refresh secret
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, AuthError> {
        Self::verify(token, &self.refresh_secret)
    }

    fn sign(
        &self,
        user_id: i32,
        email: &str,
        role: Role,
        secret: &str,
        duration: i64,
    ) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            role,
            iat: now,
            exp: now + duration,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenGenerationError(e.to_string()))
    }

    fn verify(token: &str, secret: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
            _ => AuthError::InvalidToken,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ACCESS_SECRET: &str = "test_access_secret_key";
    const REFRESH_SECRET: &str = "test_refresh_secret_key";

    fn test_token_service() -> TokenService {
        TokenService::new(
            ACCESS_SECRET.to_string(),
            REFRESH_SECRET.to_string(),
            900,    // 15 minutes
            604800, // 7 days
        )
    }

    #[test]
    fn test_access_token_expiration_is_15_minutes() {
        let service = test_token_service();
        let token = service
            .generate_access_token(1, "test@example.com", Role::Staff)
            .unwrap();
        let claims = service.validate_access_token(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, 900);
    }

    #[test]
    fn test_refresh_token_expiration_is_7_days() {
        let service = test_token_service();
        let token = service
            .generate_refresh_token(1, "test@example.com", Role::Staff)
            .unwrap();
        let claims = service.validate_refresh_token(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, 604800);
    }

    #[test]
    fn test_token_claims_contain_user_identity() {
        let service = test_token_service();
        let user_id = 42;
        let email = "user@example.com";

        let access_token = service
            .generate_access_token(user_id, email, Role::Manager)
            .unwrap();
        let access_claims = service.validate_access_token(&access_token).unwrap();
        assert_eq!(access_claims.sub, user_id);
        assert_eq!(access_claims.email, email);
        assert_eq!(access_claims.role, Role::Manager);

        let refresh_token = service
            .generate_refresh_token(user_id, email, Role::Manager)
            .unwrap();
        let refresh_claims = service.validate_refresh_token(&refresh_token).unwrap();
        assert_eq!(refresh_claims.sub, user_id);
        assert_eq!(refresh_claims.email, email);
        assert_eq!(refresh_claims.role, Role::Manager);
    }

    // Access and refresh verification must be fully independent: a token of
    // one class is rejected by the other class's validator.
    #[test]
    fn test_token_classes_do_not_cross_validate() {
        let service = test_token_service();

        let access_token = service
            .generate_access_token(1, "test@example.com", Role::Staff)
            .unwrap();
        assert!(service.validate_access_token(&access_token).is_ok());
        assert!(matches!(
            service.validate_refresh_token(&access_token),
            Err(AuthError::InvalidToken)
        ));

        let refresh_token = service
            .generate_refresh_token(1, "test@example.com", Role::Staff)
            .unwrap();
        assert!(service.validate_refresh_token(&refresh_token).is_ok());
        assert!(matches!(
            service.validate_access_token(&refresh_token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_generate_token_pair() {
        let service = test_token_service();
        let (access_token, refresh_token) = service
            .generate_token_pair(1, "test@example.com", Role::Admin)
            .unwrap();

        assert!(service.validate_access_token(&access_token).is_ok());
        assert!(service.validate_refresh_token(&refresh_token).is_ok());
        assert_ne!(access_token, refresh_token);
    }

    #[test]
    fn test_malformed_tokens_are_rejected() {
        let service = test_token_service();

        assert!(service.validate_access_token("").is_err());
        assert!(service.validate_access_token("not.a.token").is_err());
        assert!(service.validate_access_token("invalid_token_format").is_err());
        assert!(service
            .validate_access_token("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.invalid.signature")
            .is_err());
    }

    #[test]
    fn test_token_signature_verification() {
        let service1 = test_token_service();
        let service2 = TokenService::new(
            "different_access_secret".to_string(),
            "different_refresh_secret".to_string(),
            900,
            604800,
        );

        let token = service1
            .generate_access_token(1, "test@example.com", Role::Staff)
            .unwrap();

        assert!(service1.validate_access_token(&token).is_ok());
        assert!(service2.validate_access_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_is_reported_as_expired() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            email: "test@example.com".to_string(),
            role: Role::Staff,
            iat: now - 1000,
            exp: now - 500,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(ACCESS_SECRET.as_bytes()),
        )
        .unwrap();

        let service = test_token_service();
        assert!(matches!(
            service.validate_access_token(&token),
            Err(AuthError::ExpiredToken)
        ));
    }

    proptest! {
        #[test]
        fn prop_token_claims_contain_identity(
            user_id in 1i32..1000000,
            email in "[a-z]{3,10}@[a-z]{3,10}\\.(com|org|net)"
        ) {
            let service = test_token_service();

            let access_token = service.generate_access_token(user_id, &email, Role::Staff)?;
            let claims = service.validate_access_token(&access_token)?;
            prop_assert_eq!(claims.sub, user_id);
            prop_assert_eq!(claims.email, email);
        }

        #[test]
        fn prop_refresh_tokens_never_pass_access_validation(
            user_id in 1i32..1000000,
            email in "[a-z]{3,10}@[a-z]{3,10}\\.(com|org|net)"
        ) {
            let service = test_token_service();
            let refresh_token = service.generate_refresh_token(user_id, &email, Role::Staff)?;
            prop_assert!(service.validate_access_token(&refresh_token).is_err());
        }

        #[test]
        fn prop_malformed_tokens_rejected(
            malformed in "[a-zA-Z0-9]{10,50}"
        ) {
            let service = test_token_service();
            prop_assert!(service.validate_access_token(&malformed).is_err());
            prop_assert!(service.validate_refresh_token(&malformed).is_err());
        }
    }
}
