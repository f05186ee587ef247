use serde::{Deserialize, Serialize};

/// JWT claims issued by the identity provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// Audience
    pub aud: String,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp) - optional
    #[serde(default)]
    pub nbf: Option<i64>,

    /// User email - optional
    #[serde(default)]
    pub email: Option<String>,

    /// Raw role claim - optional, untrusted until validated against the
    /// closed role set (see `domain::roles`)
    #[serde(default)]
    pub role: Option<String>,
}
