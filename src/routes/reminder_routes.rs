use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::ApiError,
    middleware::auth_context::AuthContext,
    models::{AppState, MessageResponse},
};

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ReminderRow {
    pub reminder_id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    pub remind_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateReminderRequest {
    pub message: String,
    pub remind_at: Option<chrono::DateTime<chrono::Utc>>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_reminder).get(list_reminders))
        .route("/{reminder_id}", get(get_reminder).delete(delete_reminder))
}

pub async fn create_reminder(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<CreateReminderRequest>,
) -> Result<Json<ReminderRow>, ApiError> {
    let message = req.message.trim();
    if message.is_empty() {
        return Err(ApiError::BadRequest(
            "VALIDATION_ERROR",
            "message is required".to_string(),
        ));
    }

    let row: ReminderRow = sqlx::query_as::<_, ReminderRow>(
        r#"
        INSERT INTO reminders (user_id, message, remind_at)
        VALUES ($1, $2, $3)
        RETURNING reminder_id, user_id, message, remind_at, created_at
        "#,
    )
    .bind(auth.user_id)
    .bind(message)
    .bind(req.remind_at)
    .fetch_one(&state.db)
    .await
    .map_err(|e| ApiError::Internal(format!("db error: {e}")))?;

    Ok(Json(row))
}

pub async fn list_reminders(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<ReminderRow>>, ApiError> {
    let rows: Vec<ReminderRow> = sqlx::query_as::<_, ReminderRow>(
        r#"
        SELECT reminder_id, user_id, message, remind_at, created_at
        FROM reminders
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(auth.user_id)
    .fetch_all(&state.db)
    .await
    .map_err(|e| ApiError::Internal(format!("db error: {e}")))?;

    Ok(Json(rows))
}

pub async fn get_reminder(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(reminder_id): Path<Uuid>,
) -> Result<Json<ReminderRow>, ApiError> {
    // Scoped to the owner: another user's reminder looks like it does not exist.
    let row: ReminderRow = sqlx::query_as::<_, ReminderRow>(
        r#"
        SELECT reminder_id, user_id, message, remind_at, created_at
        FROM reminders
        WHERE reminder_id = $1
          AND user_id = $2
        "#,
    )
    .bind(reminder_id)
    .bind(auth.user_id)
    .fetch_optional(&state.db)
    .await
    .map_err(|e| ApiError::Internal(format!("db error: {e}")))?
    .ok_or_else(|| ApiError::NotFound("REMINDER_NOT_FOUND", "Reminder not found".to_string()))?;

    Ok(Json(row))
}

pub async fn delete_reminder(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(reminder_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let rows = sqlx::query(
        r#"
        DELETE FROM reminders
        WHERE reminder_id = $1
          AND user_id = $2
        "#,
    )
    .bind(reminder_id)
    .bind(auth.user_id)
    .execute(&state.db)
    .await
    .map_err(|e| ApiError::Internal(format!("db error: {e}")))?;

    if rows.rows_affected() == 0 {
        return Err(ApiError::NotFound(
            "REMINDER_NOT_FOUND",
            "Reminder not found".to_string(),
        ));
    }

    Ok(Json(MessageResponse {
        message: "Reminder deleted".to_string(),
    }))
}
