use jsonwebtoken::{decode, Algorithm, DecodingKey, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Claims of an access token issued by the identity provider. This service
/// only verifies tokens; it never issues them.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    pub exp: i64,
    pub aud: String,
    #[serde(default)]
    pub role: Option<String>,
}

pub fn verify_token(token: &str, config: &Config) -> AppResult<TokenData<Claims>> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.set_audience(&[config.auth_jwt_audience.as_str()]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.auth_jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!(error = %e, "Rejected bearer token");
        AppError::Unauthorized
    })
}

/// Mints a token the way the identity provider would.
#[cfg(test)]
pub fn mint_token(user_id: Uuid, config: &Config, ttl_secs: i64) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let claims = Claims {
        sub: user_id,
        email: Some("runner@example.com".into()),
        exp: (chrono::Utc::now() + chrono::Duration::seconds(ttl_secs)).timestamp(),
        aud: config.auth_jwt_audience.clone(),
        role: Some("authenticated".into()),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.auth_jwt_secret.as_bytes()),
    )
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_provider_token_is_accepted() {
        let config = Config::for_tests();
        let user = Uuid::new_v4();
        let data = verify_token(&mint_token(user, &config, 300), &config).unwrap();
        assert_eq!(data.claims.sub, user);
        assert_eq!(data.claims.email.as_deref(), Some("runner@example.com"));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let config = Config::for_tests();
        let token = mint_token(Uuid::new_v4(), &config, -3600);
        assert!(matches!(verify_token(&token, &config), Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_wrong_secret_or_audience_is_rejected() {
        let config = Config::for_tests();
        let token = mint_token(Uuid::new_v4(), &config, 300);

        let mut other_secret = Config::for_tests();
        other_secret.auth_jwt_secret = "another-secret".into();
        assert!(verify_token(&token, &other_secret).is_err());

        let mut other_audience = Config::for_tests();
        other_audience.auth_jwt_audience = "service_role".into();
        assert!(verify_token(&token, &other_audience).is_err());
    }

    #[test]
    fn test_garbage_is_rejected() {
        let config = Config::for_tests();
        assert!(verify_token("not.a.jwt", &config).is_err());
    }
}
