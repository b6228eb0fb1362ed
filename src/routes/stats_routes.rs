// src/routes/stats_routes.rs

use axum::{Json, Router, extract::State, routing::get};

use crate::{
    error::ApiError,
    models::{AppState, Stats},
};

pub fn router() -> Router<AppState> {
    Router::new().route("/stats", get(get_stats))
}

/// Appointment dates are stored as text; "today" is the server's local date.
pub fn today() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<Stats>, ApiError> {
    let stats = sqlx::query_as::<_, Stats>(
        r#"
        SELECT
          (SELECT COUNT(*) FROM appointments)             AS total_appointments,
          (SELECT COUNT(*) FROM patients)                 AS total_patients,
          (SELECT COUNT(*) FROM doctors)                  AS total_doctors,
          (SELECT COUNT(*) FROM appointments WHERE date = ?) AS today_appointments
        "#,
    )
    .bind(today())
    .fetch_one(&state.db)
    .await
    .map_err(ApiError::db)?;

    Ok(Json(stats))
}
