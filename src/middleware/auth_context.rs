use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use chrono::{DateTime, Utc};
use headers::{Authorization, authorization::Bearer};
use uuid::Uuid;

use crate::auth::decode_token;
use crate::error::ApiError;
use crate::models::AppState;

/// Identity of the request, resolved from the bearer token.
/// The token carries the username; the row is loaded so deleted
/// accounts stop authenticating even while their token is unexpired.
/// Profile fields ride along so handlers like /users/me need no
/// second lookup.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct UserLookupRow {
    user_id: Uuid,
    username: String,
    email: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl FromRequestParts<AppState> for AuthContext {
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            // Extract Authorization: Bearer <token>
            let TypedHeader(authz): TypedHeader<Authorization<Bearer>> =
                TypedHeader::from_request_parts(parts, state)
                    .await
                    .map_err(|_| ApiError::invalid_token())?;

            let claims = decode_token(authz.token(), &state.jwt_secret)
                .ok_or_else(ApiError::invalid_token)?;

            let row: UserLookupRow = sqlx::query_as::<_, UserLookupRow>(
                r#"
                SELECT user_id, username, email, role, created_at
                FROM users
                WHERE username = $1
                "#,
            )
            .bind(&claims.sub)
            .fetch_optional(&state.db)
            .await
            .map_err(|e| ApiError::Internal(format!("db error: {e}")))?
            .ok_or_else(ApiError::invalid_token)?;

            Ok(AuthContext {
                user_id: row.user_id,
                username: row.username,
                email: row.email,
                role: row.role,
                created_at: row.created_at,
            })
        }
    }
}
