//! JWT verification against the shared HS256 signing secret

use anyhow::{Context, Result};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use super::Claims;

/// Verifies bearer tokens issued for this application.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
}

impl TokenVerifier {
    pub fn new(secret: &str, issuer: String, audience: String) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            audience,
        }
    }

    /// Verify a JWT token and return the claims
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .context("JWT validation failed")?;

        Ok(token_data.claims)
    }
}
