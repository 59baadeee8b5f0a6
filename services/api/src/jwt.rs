//! JWT service for bearer token generation and validation
//!
//! Tokens are signed with HS256 using a shared server secret. The payload
//! embeds the submitted profile fields verbatim alongside the issued-at
//! and expiry timestamps.

use anyhow::Result;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mongodb::bson::Document;
use serde::{Deserialize, Serialize};

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared secret for signing and verifying tokens
    pub secret: String,
    /// Token expiration time in seconds (default: 24 hours)
    pub token_expiry: i64,
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `ACCESS_TOKEN_SECRET`: shared signing secret
    /// - `TOKEN_EXPIRY_SECS`: token expiry in seconds (default: 86400)
    pub fn from_env() -> Result<Self> {
        let secret = std::env::var("ACCESS_TOKEN_SECRET")
            .map_err(|_| anyhow::anyhow!("ACCESS_TOKEN_SECRET environment variable not set"))?;

        let token_expiry = std::env::var("TOKEN_EXPIRY_SECS")
            .unwrap_or_else(|_| "86400".to_string())
            .parse()
            .unwrap_or(86400);

        Ok(JwtConfig {
            secret,
            token_expiry,
        })
    }
}

/// JWT claims structure
///
/// The profile map is whatever the client submitted; no shape is imposed
/// beyond the registered timestamp claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(flatten)]
    pub profile: Document,
    /// Issued at time
    pub iat: i64,
    /// Expiration time
    pub exp: i64,
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_expiry: i64,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: &JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        JwtService {
            encoding_key,
            decoding_key,
            validation,
            token_expiry: config.token_expiry,
        }
    }

    /// Issue a token embedding the given profile fields verbatim
    pub fn issue(&self, profile: &Document) -> Result<String> {
        let now = Utc::now().timestamp();

        let claims = Claims {
            profile: profile.clone(),
            iat: now,
            exp: now + self.token_expiry,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Validate a token and return the claims
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_jwt_config_from_env() {
        unsafe {
            std::env::set_var("ACCESS_TOKEN_SECRET", "env-secret");
            std::env::remove_var("TOKEN_EXPIRY_SECS");
        }

        let config = JwtConfig::from_env().unwrap();
        assert_eq!(config.secret, "env-secret");
        assert_eq!(config.token_expiry, 86400);

        unsafe {
            std::env::set_var("TOKEN_EXPIRY_SECS", "3600");
        }

        let config = JwtConfig::from_env().unwrap();
        assert_eq!(config.token_expiry, 3600);

        unsafe {
            std::env::remove_var("ACCESS_TOKEN_SECRET");
            std::env::remove_var("TOKEN_EXPIRY_SECS");
        }

        assert!(JwtConfig::from_env().is_err());
    }

    fn service() -> JwtService {
        JwtService::new(&JwtConfig {
            secret: "test-secret".to_string(),
            token_expiry: 86400,
        })
    }

    #[test]
    fn test_issue_then_verify_roundtrip() {
        let service = service();
        let profile = doc! { "email": "guest@example.com", "name": "Guest" };

        let token = service.issue(&profile).unwrap();
        let claims = service.verify(&token).unwrap();

        assert_eq!(
            claims.profile.get_str("email").unwrap(),
            "guest@example.com"
        );
        assert_eq!(claims.profile.get_str("name").unwrap(), "Guest");
        assert_eq!(claims.exp - claims.iat, 86400);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = service();
        let now = Utc::now().timestamp();
        let claims = Claims {
            profile: doc! { "email": "guest@example.com" },
            iat: now - 7200,
            exp: now - 3600,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &service.encoding_key,
        )
        .unwrap();

        assert!(service.verify(&token).is_err());
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let service = service();
        let other = JwtService::new(&JwtConfig {
            secret: "other-secret".to_string(),
            token_expiry: 86400,
        });

        let token = other.issue(&doc! { "email": "guest@example.com" }).unwrap();
        assert!(service.verify(&token).is_err());
    }
}
