use uuid::Uuid;

use super::Claims;
use crate::domain::roles::UserRole;
use crate::error::ApiError;

/// Authenticated user context extracted from a verified JWT
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// User ID (from JWT sub claim)
    pub user_id: Uuid,

    /// User email if available
    pub email: Option<String>,

    /// Validated role. The raw claim is run through the closed role set;
    /// an unrecognized claim degrades to `None` ("no role"), it is never
    /// passed through as-is and never treated as an error.
    pub role: Option<UserRole>,
}

impl AuthContext {
    pub fn from_claims(claims: &Claims) -> Result<Self, &'static str> {
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| "Invalid user ID in token")?;

        let role = claims.role.as_deref().and_then(UserRole::parse);
        if claims.role.is_some() && role.is_none() {
            tracing::warn!(
                user_id = %user_id,
                "Token carries an unrecognized role claim, treating as no role"
            );
        }

        Ok(Self {
            user_id,
            email: claims.email.clone(),
            role,
        })
    }

    /// Require one of the given roles, for role-gated endpoints.
    pub fn require_role(&self, allowed: &[UserRole]) -> Result<UserRole, ApiError> {
        match self.role {
            Some(role) if allowed.contains(&role) => Ok(role),
            Some(_) => Err(ApiError::forbidden("Insufficient role for this action")),
            None => Err(ApiError::forbidden("No recognized role assigned")),
        }
    }

    /// Require any agency-staff role (everything above a plain user).
    pub fn require_agency_staff(&self) -> Result<UserRole, ApiError> {
        let staff: Vec<UserRole> = UserRole::ALL
            .into_iter()
            .filter(UserRole::is_agency_staff)
            .collect();
        self.require_role(&staff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: Option<&str>) -> Claims {
        Claims {
            sub: Uuid::new_v4().to_string(),
            aud: "authenticated".to_string(),
            iss: "itinero".to_string(),
            iat: 0,
            exp: i64::MAX,
            nbf: None,
            email: None,
            role: role.map(str::to_string),
        }
    }

    #[test]
    fn valid_role_claim_is_admitted() {
        let ctx = AuthContext::from_claims(&claims(Some("AGENCY_ADMIN"))).unwrap();
        assert_eq!(ctx.role, Some(UserRole::AgencyAdmin));
    }

    #[test]
    fn unrecognized_role_claim_degrades_to_none() {
        for bad in ["admin", "SUPERADMIN", "", " ADMIN"] {
            let ctx = AuthContext::from_claims(&claims(Some(bad))).unwrap();
            assert_eq!(ctx.role, None, "claim {bad:?} must not be trusted");
        }
    }

    #[test]
    fn missing_role_claim_is_no_role() {
        let ctx = AuthContext::from_claims(&claims(None)).unwrap();
        assert_eq!(ctx.role, None);
        assert!(ctx.require_agency_staff().is_err());
    }

    #[test]
    fn role_gating() {
        let staff = AuthContext::from_claims(&claims(Some("TEAM_LEAD"))).unwrap();
        assert!(staff.require_agency_staff().is_ok());
        assert!(staff.require_role(&[UserRole::Admin]).is_err());

        let user = AuthContext::from_claims(&claims(Some("USER"))).unwrap();
        assert!(user.require_agency_staff().is_err());
        assert!(user.require_role(&[UserRole::User]).is_ok());
    }

    #[test]
    fn invalid_subject_is_rejected() {
        let mut c = claims(Some("ADMIN"));
        c.sub = "not-a-uuid".to_string();
        assert!(AuthContext::from_claims(&c).is_err());
    }
}
