// src/routes/patient_routes.rs

use axum::{
    extract::{Path, Query, State},
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
pub struct PatientRow {
    pub patient_id: Uuid,
    pub name: String,
    pub age: i32,
    pub gender: Option<String>,
    pub condition: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize)]
pub struct PatientBody {
    pub name: String,
    pub age: i32,
    pub gender: Option<String>,
    pub condition: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_patient).get(list_patients))
        .route(
            "/{patient_id}",
            get(get_patient).put(update_patient).delete(delete_patient),
        )
}

fn validate_body(req: &PatientBody) -> Result<String, ApiError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest(
            "VALIDATION_ERROR",
            "name is required".to_string(),
        ));
    }
    if req.age < 0 || req.age > 150 {
        return Err(ApiError::BadRequest(
            "VALIDATION_ERROR",
            "age must be between 0 and 150".to_string(),
        ));
    }
    Ok(name.to_string())
}

pub async fn create_patient(
    State(state): State<AppState>,
    _auth: AuthContext,
    Json(req): Json<PatientBody>,
) -> Result<Json<PatientRow>, ApiError> {
    let name = validate_body(&req)?;

    let row: PatientRow = sqlx::query_as::<_, PatientRow>(
        r#"
        INSERT INTO patients (name, age, gender, condition)
        VALUES ($1, $2, $3, $4)
        RETURNING patient_id, name, age, gender, condition, created_at
        "#,
    )
    .bind(&name)
    .bind(req.age)
    .bind(req.gender.as_deref())
    .bind(req.condition.as_deref())
    .fetch_one(&state.db)
    .await
    .map_err(|e| ApiError::Internal(format!("db error: {e}")))?;

    Ok(Json(row))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub name: Option<String>,
    pub age: Option<i32>,
}

pub async fn list_patients(
    State(state): State<AppState>,
    _auth: AuthContext,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<PatientRow>>, ApiError> {
    // Empty name means no filter, matching the query-string semantics clients expect.
    let like = q
        .name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{s}%"));

    let rows: Vec<PatientRow> = sqlx::query_as::<_, PatientRow>(
        r#"
        SELECT patient_id, name, age, gender, condition, created_at
        FROM patients
        WHERE ($1::text IS NULL OR name ILIKE $1)
          AND ($2::int4 IS NULL OR age = $2)
        ORDER BY created_at DESC
        "#,
    )
    .bind(like)
    .bind(q.age)
    .fetch_all(&state.db)
    .await
    .map_err(|e| ApiError::Internal(format!("db error: {e}")))?;

    Ok(Json(rows))
}

pub async fn get_patient(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<PatientRow>, ApiError> {
    let row: PatientRow = sqlx::query_as::<_, PatientRow>(
        r#"
        SELECT patient_id, name, age, gender, condition, created_at
        FROM patients
        WHERE patient_id = $1
        "#,
    )
    .bind(patient_id)
    .fetch_optional(&state.db)
    .await
    .map_err(|e| ApiError::Internal(format!("db error: {e}")))?
    .ok_or_else(|| ApiError::NotFound("PATIENT_NOT_FOUND", "Patient not found".to_string()))?;

    Ok(Json(row))
}

pub async fn update_patient(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(patient_id): Path<Uuid>,
    Json(req): Json<PatientBody>,
) -> Result<Json<PatientRow>, ApiError> {
    let name = validate_body(&req)?;

    let updated: PatientRow = sqlx::query_as::<_, PatientRow>(
        r#"
        UPDATE patients
        SET name = $1,
            age = $2,
            gender = $3,
            condition = $4
        WHERE patient_id = $5
        RETURNING patient_id, name, age, gender, condition, created_at
        "#,
    )
    .bind(&name)
    .bind(req.age)
    .bind(req.gender.as_deref())
    .bind(req.condition.as_deref())
    .bind(patient_id)
    .fetch_optional(&state.db)
    .await
    .map_err(|e| ApiError::Internal(format!("db error: {e}")))?
    .ok_or_else(|| ApiError::NotFound("PATIENT_NOT_FOUND", "Patient not found".to_string()))?;

    Ok(Json(updated))
}

pub async fn delete_patient(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let rows = sqlx::query(
        r#"
        DELETE FROM patients
        WHERE patient_id = $1
        "#,
    )
    .bind(patient_id)
    .execute(&state.db)
    .await
    .map_err(|e| ApiError::Internal(format!("db error: {e}")))?;

    if rows.rows_affected() == 0 {
        return Err(ApiError::NotFound(
            "PATIENT_NOT_FOUND",
            "Patient not found".to_string(),
        ));
    }

    Ok(Json(MessageResponse {
        message: "Patient deleted".to_string(),
    }))
}
