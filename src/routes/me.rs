use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::auth::RequireAuth;
use crate::domain::roles::UserRole;

#[derive(Serialize)]
pub struct MeResponse {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub role: Option<UserRole>,
    /// Dashboard surface for the validated role; absent when the token
    /// carries no recognized role.
    pub dashboard: Option<&'static str>,
}

/// Get current authenticated user info
pub async fn get_me(auth: RequireAuth) -> Json<MeResponse> {
    Json(MeResponse {
        user_id: auth.user_id,
        email: auth.email.clone(),
        role: auth.role,
        dashboard: auth.role.map(|r| r.dashboard()),
    })
}
