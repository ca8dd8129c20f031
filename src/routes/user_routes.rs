use axum::{Json, Router, routing::get};

use crate::{
    middleware::auth_context::AuthContext,
    models::{AppState, UserProfile},
};

pub fn router() -> Router<AppState> {
    Router::new().route("/me", get(me))
}

// The extractor already loaded the user row for this token.
pub async fn me(auth: AuthContext) -> Json<UserProfile> {
    Json(UserProfile {
        user_id: auth.user_id,
        username: auth.username,
        email: auth.email,
        role: auth.role,
        created_at: auth.created_at,
    })
}
