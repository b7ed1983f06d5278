use actimon_core::{models::Claims, AppError};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

/// Stateless HS256 signer for registration claims.
///
/// Decoding verifies the signature only. Expiry is a time-relative check made by the
/// lifecycle service, so an expired but authentic token still decodes.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Sign a claim set expiring `ttl` from now.
    pub fn encode(&self, email: &str, role: &str, ttl: Duration) -> Result<String, AppError> {
        self.encode_at(email, role, Utc::now(), ttl)
    }

    /// Sign a claim set expiring `ttl` after `issued_at`. Same inputs, same token.
    pub fn encode_at(
        &self,
        email: &str,
        role: &str,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<String, AppError> {
        let claims = Claims {
            email: email.to_string(),
            role: role.to_string(),
            exp: (issued_at + ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign registration token: {}", e)))
    }

    /// Verify the signature and return the embedded claims.
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Registration token failed verification");
                AppError::InvalidSignature
            })
    }
}
