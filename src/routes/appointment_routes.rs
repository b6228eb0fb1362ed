// src/routes/appointment_routes.rs

use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use sqlx::FromRow;

use crate::{
    error::ApiError,
    models::{AppState, Appointment, AppointmentPayload, Doctor, MessageResponse, Patient},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/appointments", get(list_appointments).post(create_appointment))
        .route(
            "/appointments/{appointment_id}",
            put(update_appointment).delete(delete_appointment),
        )
}

/* ============================================================
   Row folding
   ============================================================ */

const SELECT_JOINED: &str = r#"
    SELECT
      a.id,
      a.patient_id,
      a.doctor_id,
      a.date,
      a.time,
      a.reason,

      p.id    AS p_id,
      p.name  AS p_name,
      p.age   AS p_age,
      p.phone AS p_phone,

      d.id        AS d_id,
      d.name      AS d_name,
      d.specialty AS d_specialty

    FROM appointments a
    LEFT JOIN patients p ON p.id = a.patient_id
    LEFT JOIN doctors  d ON d.id = a.doctor_id
"#;

#[derive(Debug, FromRow)]
struct AppointmentJoinRow {
    id: i64,
    patient_id: i64,
    doctor_id: i64,
    date: String,
    time: String,
    reason: String,

    p_id: Option<i64>,
    p_name: Option<String>,
    p_age: Option<i64>,
    p_phone: Option<String>,

    d_id: Option<i64>,
    d_name: Option<String>,
    d_specialty: Option<String>,
}

impl From<AppointmentJoinRow> for Appointment {
    fn from(r: AppointmentJoinRow) -> Self {
        let patient = match (r.p_id, r.p_name, r.p_age, r.p_phone) {
            (Some(id), Some(name), Some(age), Some(phone)) => Some(Patient {
                id,
                name,
                age,
                phone,
            }),
            _ => None,
        };
        let doctor = match (r.d_id, r.d_name, r.d_specialty) {
            (Some(id), Some(name), Some(specialty)) => Some(Doctor { id, name, specialty }),
            _ => None,
        };
        Appointment {
            id: r.id,
            patient_id: r.patient_id,
            doctor_id: r.doctor_id,
            date: r.date,
            time: r.time,
            reason: r.reason,
            patient,
            doctor,
        }
    }
}

async fn fetch_joined(state: &AppState, appointment_id: i64) -> Result<Appointment, ApiError> {
    let row = sqlx::query_as::<_, AppointmentJoinRow>(&format!("{SELECT_JOINED} WHERE a.id = ?"))
        .bind(appointment_id)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::db)?
        .ok_or_else(ApiError::appointment_not_found)?;
    Ok(row.into())
}

fn validate(req: &AppointmentPayload) -> Result<(), ApiError> {
    for (field, value) in [("date", &req.date), ("time", &req.time), ("reason", &req.reason)] {
        if value.trim().is_empty() {
            return Err(ApiError::BadRequest(
                "VALIDATION_ERROR",
                format!("{field} is required"),
            ));
        }
    }
    Ok(())
}

/// Unknown patient/doctor ids surface as foreign key failures.
fn map_write_error(e: sqlx::Error) -> ApiError {
    match &e {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => ApiError::BadRequest(
            "VALIDATION_ERROR",
            "patient_id and doctor_id must reference existing records".into(),
        ),
        _ => ApiError::db(e),
    }
}

/* ============================================================
   GET /appointments
   ============================================================ */

pub async fn list_appointments(
    State(state): State<AppState>,
) -> Result<Json<Vec<Appointment>>, ApiError> {
    let sql = format!("{SELECT_JOINED} ORDER BY a.id ASC");
    let rows = sqlx::query_as::<_, AppointmentJoinRow>(&sql)
        .fetch_all(&state.db)
        .await
        .map_err(ApiError::db)?;

    Ok(Json(rows.into_iter().map(Appointment::from).collect()))
}

/* ============================================================
   POST /appointments
   ============================================================ */

pub async fn create_appointment(
    State(state): State<AppState>,
    Json(req): Json<AppointmentPayload>,
) -> Result<Json<Appointment>, ApiError> {
    validate(&req)?;

    let appointment_id = sqlx::query(
        r#"
        INSERT INTO appointments (patient_id, doctor_id, date, time, reason)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(req.patient_id)
    .bind(req.doctor_id)
    .bind(&req.date)
    .bind(&req.time)
    .bind(&req.reason)
    .execute(&state.db)
    .await
    .map_err(map_write_error)?
    .last_insert_rowid();

    tracing::info!(appointment_id, "appointment created");
    Ok(Json(fetch_joined(&state, appointment_id).await?))
}

/* ============================================================
   PUT /appointments/{id}
   ============================================================ */

pub async fn update_appointment(
    State(state): State<AppState>,
    Path(appointment_id): Path<i64>,
    Json(req): Json<AppointmentPayload>,
) -> Result<Json<Appointment>, ApiError> {
    validate(&req)?;

    let res = sqlx::query(
        r#"
        UPDATE appointments
        SET patient_id = ?, doctor_id = ?, date = ?, time = ?, reason = ?
        WHERE id = ?
        "#,
    )
    .bind(req.patient_id)
    .bind(req.doctor_id)
    .bind(&req.date)
    .bind(&req.time)
    .bind(&req.reason)
    .bind(appointment_id)
    .execute(&state.db)
    .await
    .map_err(map_write_error)?;

    if res.rows_affected() == 0 {
        return Err(ApiError::appointment_not_found());
    }

    tracing::info!(appointment_id, "appointment updated");
    Ok(Json(fetch_joined(&state, appointment_id).await?))
}

/* ============================================================
   DELETE /appointments/{id}
   ============================================================ */

pub async fn delete_appointment(
    State(state): State<AppState>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let res = sqlx::query("DELETE FROM appointments WHERE id = ?")
        .bind(appointment_id)
        .execute(&state.db)
        .await
        .map_err(ApiError::db)?;

    if res.rows_affected() == 0 {
        return Err(ApiError::appointment_not_found());
    }

    tracing::info!(appointment_id, "appointment deleted");
    Ok(Json(MessageResponse {
        message: "Appointment deleted".into(),
    }))
}
