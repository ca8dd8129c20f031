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
pub struct AppointmentRow {
    pub appointment_id: Uuid,
    pub user_id: Uuid,
    pub patient_id: Uuid,
    pub doctor: String,
    pub date: chrono::DateTime<chrono::Utc>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize)]
pub struct BookAppointmentRequest {
    pub doctor: String,
    pub date: chrono::DateTime<chrono::Utc>,
    pub patient_id: Uuid,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(book_appointment).get(list_appointments))
        .route(
            "/{appointment_id}",
            get(get_appointment).delete(cancel_appointment),
        )
}

pub async fn book_appointment(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<BookAppointmentRequest>,
) -> Result<Json<AppointmentRow>, ApiError> {
    let doctor = req.doctor.trim();
    if doctor.is_empty() {
        return Err(ApiError::BadRequest(
            "VALIDATION_ERROR",
            "doctor is required".to_string(),
        ));
    }

    // Booking against an unknown patient is a 404, not a constraint error.
    let patient: Option<Uuid> = sqlx::query_scalar(
        r#"
        SELECT patient_id
        FROM patients
        WHERE patient_id = $1
        "#,
    )
    .bind(req.patient_id)
    .fetch_optional(&state.db)
    .await
    .map_err(|e| ApiError::Internal(format!("db error: {e}")))?;

    if patient.is_none() {
        return Err(ApiError::NotFound(
            "PATIENT_NOT_FOUND",
            "Patient not found".to_string(),
        ));
    }

    let row: AppointmentRow = sqlx::query_as::<_, AppointmentRow>(
        r#"
        INSERT INTO appointments (user_id, patient_id, doctor, date)
        VALUES ($1, $2, $3, $4)
        RETURNING appointment_id, user_id, patient_id, doctor, date, created_at
        "#,
    )
    .bind(auth.user_id)
    .bind(req.patient_id)
    .bind(doctor)
    .bind(req.date)
    .fetch_one(&state.db)
    .await
    .map_err(|e| ApiError::Internal(format!("db error: {e}")))?;

    Ok(Json(row))
}

pub async fn list_appointments(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<AppointmentRow>>, ApiError> {
    let rows: Vec<AppointmentRow> = sqlx::query_as::<_, AppointmentRow>(
        r#"
        SELECT appointment_id, user_id, patient_id, doctor, date, created_at
        FROM appointments
        WHERE user_id = $1
        ORDER BY date ASC
        "#,
    )
    .bind(auth.user_id)
    .fetch_all(&state.db)
    .await
    .map_err(|e| ApiError::Internal(format!("db error: {e}")))?;

    Ok(Json(rows))
}

pub async fn get_appointment(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<AppointmentRow>, ApiError> {
    let row: AppointmentRow = sqlx::query_as::<_, AppointmentRow>(
        r#"
        SELECT appointment_id, user_id, patient_id, doctor, date, created_at
        FROM appointments
        WHERE appointment_id = $1
          AND user_id = $2
        "#,
    )
    .bind(appointment_id)
    .bind(auth.user_id)
    .fetch_optional(&state.db)
    .await
    .map_err(|e| ApiError::Internal(format!("db error: {e}")))?
    .ok_or_else(|| {
        ApiError::NotFound("APPOINTMENT_NOT_FOUND", "Appointment not found".to_string())
    })?;

    Ok(Json(row))
}

pub async fn cancel_appointment(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let rows = sqlx::query(
        r#"
        DELETE FROM appointments
        WHERE appointment_id = $1
          AND user_id = $2
        "#,
    )
    .bind(appointment_id)
    .bind(auth.user_id)
    .execute(&state.db)
    .await
    .map_err(|e| ApiError::Internal(format!("db error: {e}")))?;

    if rows.rows_affected() == 0 {
        return Err(ApiError::NotFound(
            "APPOINTMENT_NOT_FOUND",
            "Appointment not found".to_string(),
        ));
    }

    Ok(Json(MessageResponse {
        message: "Appointment canceled".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::{app, body_json, register_and_login, request};

    use axum::http::StatusCode;
    use serde_json::json;
    use sqlx::PgPool;
    use uuid::Uuid;

    async fn create_patient(app: &axum::Router, token: &str) -> String {
        let resp = request(
            app,
            "POST",
            "/patients",
            Some(token),
            Some(json!({ "name": "Meena", "age": 62 })),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        body_json(resp).await["patient_id"]
            .as_str()
            .unwrap()
            .to_string()
    }

    #[sqlx::test]
    async fn cancel_is_scoped_to_the_owner(pool: PgPool) {
        let app = app(pool);
        let asha = register_and_login(&app, "asha").await;
        let ravi = register_and_login(&app, "ravi").await;
        let patient_id = create_patient(&app, &asha).await;

        let resp = request(
            &app,
            "POST",
            "/appointments",
            Some(&asha),
            Some(json!({
                "doctor": "Dr. Rao",
                "date": "2026-09-14T10:00:00Z",
                "patient_id": patient_id,
            })),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let id = body_json(resp).await["appointment_id"]
            .as_str()
            .unwrap()
            .to_string();

        let resp = request(
            &app,
            "DELETE",
            &format!("/appointments/{id}"),
            Some(&ravi),
            None,
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(resp).await["error"]["code"], "APPOINTMENT_NOT_FOUND");

        let resp = request(
            &app,
            "DELETE",
            &format!("/appointments/{id}"),
            Some(&asha),
            None,
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["message"], "Appointment canceled");
    }

    #[sqlx::test]
    async fn booking_unknown_patient_is_not_found(pool: PgPool) {
        let app = app(pool);
        let token = register_and_login(&app, "asha").await;

        let resp = request(
            &app,
            "POST",
            "/appointments",
            Some(&token),
            Some(json!({
                "doctor": "Dr. Rao",
                "date": "2026-09-14T10:00:00Z",
                "patient_id": Uuid::new_v4(),
            })),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(resp).await["error"]["code"], "PATIENT_NOT_FOUND");
    }
}
