// src/routes/doctor_routes.rs

use axum::{Json, Router, extract::State, routing::get};

use crate::{
    error::ApiError,
    models::{AppState, Doctor},
};

pub fn router() -> Router<AppState> {
    Router::new().route("/doctors", get(list_doctors))
}

pub async fn list_doctors(State(state): State<AppState>) -> Result<Json<Vec<Doctor>>, ApiError> {
    let rows: Vec<Doctor> = sqlx::query_as::<_, Doctor>(
        r#"
        SELECT id, name, specialty
        FROM doctors
        ORDER BY id ASC
        "#,
    )
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::db)?;

    Ok(Json(rows))
}
