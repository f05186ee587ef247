//! User role taxonomy
//!
//! The closed set of roles recognized by the platform and the validation
//! predicate every untrusted role claim (token, query param, form field)
//! must pass through before being trusted. Role literals are never compared
//! as raw strings anywhere else in the system.

use serde::{Deserialize, Serialize};

/// User role enum (closed set)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    User,
    AgencyAdmin,
    TeamLead,
    Admin,
    SuperAdmin,
}

impl UserRole {
    /// Every recognized role, in ascending order of privilege.
    pub const ALL: [UserRole; 5] = [
        Self::User,
        Self::AgencyAdmin,
        Self::TeamLead,
        Self::Admin,
        Self::SuperAdmin,
    ];

    /// The exact wire literal for this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::AgencyAdmin => "AGENCY_ADMIN",
            Self::TeamLead => "TEAM_LEAD",
            Self::Admin => "ADMIN",
            Self::SuperAdmin => "SUPER_ADMIN",
        }
    }

    /// Parse an untrusted role string. Exact literal match, case-sensitive,
    /// no trimming or coercion. Unrecognized input is `None`, never an error.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|role| role.as_str() == s)
    }

    /// Dashboard surface this role lands on after sign-in.
    pub fn dashboard(&self) -> &'static str {
        match self {
            Self::User => "/dashboard/executive",
            Self::AgencyAdmin => "/dashboard/agency-admin",
            Self::TeamLead => "/dashboard/team-lead",
            Self::Admin => "/dashboard/admin",
            Self::SuperAdmin => "/dashboard/super-admin",
        }
    }

    /// Whether this role belongs to agency staff (anything above a plain
    /// executive user). Staff roles may record and activate PDF versions.
    pub fn is_agency_staff(&self) -> bool {
        !matches!(self, Self::User)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Total type-narrowing predicate over arbitrary JSON input.
///
/// True iff the value is a string equal to one of the five role literals.
/// Null, numbers, booleans, arrays, objects and unrecognized strings all
/// degrade to `false` - callers use this as a runtime guard before trusting
/// externally supplied role claims, so it never fails.
pub fn is_user_type(value: &serde_json::Value) -> bool {
    value
        .as_str()
        .map_or(false, |s| UserRole::parse(s).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_all_five_literals() {
        assert_eq!(UserRole::parse("USER"), Some(UserRole::User));
        assert_eq!(UserRole::parse("AGENCY_ADMIN"), Some(UserRole::AgencyAdmin));
        assert_eq!(UserRole::parse("TEAM_LEAD"), Some(UserRole::TeamLead));
        assert_eq!(UserRole::parse("ADMIN"), Some(UserRole::Admin));
        assert_eq!(UserRole::parse("SUPER_ADMIN"), Some(UserRole::SuperAdmin));
    }

    #[test]
    fn rejects_near_misses() {
        assert_eq!(UserRole::parse("admin"), None);
        assert_eq!(UserRole::parse("Admin"), None);
        assert_eq!(UserRole::parse(" ADMIN"), None);
        assert_eq!(UserRole::parse("ADMIN "), None);
        assert_eq!(UserRole::parse("TEAMLEAD"), None);
        assert_eq!(UserRole::parse(""), None);
    }

    #[test]
    fn predicate_accepts_only_role_strings() {
        for role in UserRole::ALL {
            assert!(is_user_type(&json!(role.as_str())));
        }
        assert!(!is_user_type(&json!("admin")));
        assert!(!is_user_type(&json!(42)));
        assert!(!is_user_type(&json!(null)));
        assert!(!is_user_type(&json!("")));
        assert!(!is_user_type(&json!(true)));
        assert!(!is_user_type(&json!(["ADMIN"])));
        assert!(!is_user_type(&json!({ "role": "ADMIN" })));
    }

    #[test]
    fn predicate_is_pure() {
        let v = json!("TEAM_LEAD");
        assert_eq!(is_user_type(&v), is_user_type(&v));
        let bad = json!(42);
        assert_eq!(is_user_type(&bad), is_user_type(&bad));
    }

    #[test]
    fn serde_round_trip_uses_wire_literals() {
        let encoded = serde_json::to_string(&UserRole::AgencyAdmin).unwrap();
        assert_eq!(encoded, "\"AGENCY_ADMIN\"");
        let decoded: UserRole = serde_json::from_str("\"SUPER_ADMIN\"").unwrap();
        assert_eq!(decoded, UserRole::SuperAdmin);
        assert!(serde_json::from_str::<UserRole>("\"super_admin\"").is_err());
    }

    #[test]
    fn dashboard_mapping_is_exhaustive() {
        for role in UserRole::ALL {
            assert!(role.dashboard().starts_with("/dashboard/"));
        }
        assert!(!UserRole::User.is_agency_staff());
        assert!(UserRole::TeamLead.is_agency_staff());
    }
}
