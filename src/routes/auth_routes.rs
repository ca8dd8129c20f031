use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::post,
};
use uuid::Uuid;

use crate::{
    auth::{Claims, hash_password, issue_token, verify_password},
    error::ApiError,
    models::{AppState, LoginRequest, RegisterRequest, TokenResponse, UserProfile, UserRow},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

// Loose check; the mailbox is never verified, we only reject obvious typos.
fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    }
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserProfile>), ApiError> {
    let username = req.username.trim();
    let email = req.email.trim();

    if username.is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest(
            "VALIDATION_ERROR",
            "username and password are required".into(),
        ));
    }
    if !is_plausible_email(email) {
        return Err(ApiError::BadRequest(
            "VALIDATION_ERROR",
            "email is not a valid address".into(),
        ));
    }

    let taken: Option<Uuid> = sqlx::query_scalar(
        r#"
        SELECT user_id
        FROM users
        WHERE username = $1 OR email = $2
        "#,
    )
    .bind(username)
    .bind(email)
    .fetch_optional(&state.db)
    .await
    .map_err(|e| ApiError::Internal(format!("db error: {e}")))?;

    if taken.is_some() {
        return Err(ApiError::BadRequest(
            "ALREADY_REGISTERED",
            "Username or email already registered".into(),
        ));
    }

    let password_hash = hash_password(&req.password).map_err(ApiError::Internal)?;

    let row: UserRow = sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (username, email, password_hash)
        VALUES ($1, $2, $3)
        RETURNING user_id, username, email, password_hash, role, created_at
        "#,
    )
    .bind(username)
    .bind(email)
    .bind(&password_hash)
    .fetch_one(&state.db)
    .await
    .map_err(|e| match &e {
        // Unique violation: the pre-check raced with a concurrent register.
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
            ApiError::BadRequest("ALREADY_REGISTERED", "Username or email already registered".into())
        }
        _ => ApiError::Internal(format!("db error: {e}")),
    })?;

    Ok((StatusCode::CREATED, Json(row.into_profile())))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let username = req.username.trim();
    if username.is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest(
            "VALIDATION_ERROR",
            "username and password are required".into(),
        ));
    }

    let user: UserRow = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT user_id, username, email, password_hash, role, created_at
        FROM users
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(&state.db)
    .await
    .map_err(|e| ApiError::Internal(format!("db error: {e}")))?
    .ok_or_else(ApiError::invalid_credentials)?;

    if !verify_password(&req.password, &user.password_hash) {
        return Err(ApiError::invalid_credentials());
    }

    let claims = Claims::new(&user.username, state.token_ttl_minutes);
    let access_token = issue_token(&claims, &state.jwt_secret).map_err(ApiError::Internal)?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::is_plausible_email;
    use crate::routes::test_support::{app, body_json, register_and_login, request};

    use axum::http::StatusCode;
    use serde_json::json;
    use sqlx::PgPool;

    #[test]
    fn email_plausibility() {
        assert!(is_plausible_email("asha@example.com"));
        assert!(!is_plausible_email("asha"));
        assert!(!is_plausible_email("@example.com"));
        assert!(!is_plausible_email("asha@.com"));
        assert!(!is_plausible_email("asha@localhost"));
    }

    #[sqlx::test]
    async fn duplicate_username_or_email_is_rejected(pool: PgPool) {
        let app = app(pool);

        let resp = request(
            &app,
            "POST",
            "/auth/register",
            None,
            Some(json!({ "username": "asha", "email": "asha@example.com", "password": "s3cret" })),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        // same username, fresh email
        let resp = request(
            &app,
            "POST",
            "/auth/register",
            None,
            Some(json!({ "username": "asha", "email": "other@example.com", "password": "s3cret" })),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"]["code"], "ALREADY_REGISTERED");

        // same email, fresh username
        let resp = request(
            &app,
            "POST",
            "/auth/register",
            None,
            Some(json!({ "username": "ravi", "email": "asha@example.com", "password": "s3cret" })),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"]["code"], "ALREADY_REGISTERED");
    }

    #[sqlx::test]
    async fn wrong_password_login_is_rejected(pool: PgPool) {
        let app = app(pool);
        register_and_login(&app, "asha").await;

        let resp = request(
            &app,
            "POST",
            "/auth/login",
            None,
            Some(json!({ "username": "asha", "password": "wrong" })),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(resp).await["error"]["code"], "INVALID_CREDENTIALS");
    }

    #[sqlx::test]
    async fn login_token_authorizes_me(pool: PgPool) {
        let app = app(pool);
        let token = register_and_login(&app, "asha").await;

        let resp = request(&app, "GET", "/users/me", Some(&token), None).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let json = body_json(resp).await;
        assert_eq!(json["username"], "asha");
        assert_eq!(json["email"], "asha@example.com");
        assert_eq!(json["role"], "user");
    }
}
