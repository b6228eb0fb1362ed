// src/routes/patient_routes.rs

use axum::{Json, Router, extract::State, routing::get};

use crate::{
    error::ApiError,
    models::{AppState, Patient},
};

pub fn router() -> Router<AppState> {
    Router::new().route("/patients", get(list_patients))
}

pub async fn list_patients(State(state): State<AppState>) -> Result<Json<Vec<Patient>>, ApiError> {
    let rows: Vec<Patient> = sqlx::query_as::<_, Patient>(
        r#"
        SELECT id, name, age, phone
        FROM patients
        ORDER BY id ASC
        "#,
    )
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::db)?;

    Ok(Json(rows))
}
