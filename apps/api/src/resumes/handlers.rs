use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::resume::ResumeData;
use crate::resumes::store;
use crate::state::AppState;

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Resume {id} not found"))
}

/// POST /api/resumes
pub async fn handle_create_resume(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(data): Json<ResumeData>,
) -> Result<Json<Value>, AppError> {
    let id = store::insert_resume(&state.db, user.id, &data).await?;
    info!("User {} saved resume {id}", user.id);
    Ok(Json(json!({
        "status": "success",
        "id": id,
        "message": "Resume saved",
    })))
}

/// GET /api/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Value>, AppError> {
    let resumes = store::list_resumes(&state.db, user.id).await?;
    Ok(Json(json!({ "status": "success", "resumes": resumes })))
}

/// GET /api/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let resume = store::get_resume(&state.db, id, user.id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(json!({ "status": "success", "resume": resume })))
}

/// PUT /api/resumes/:id
pub async fn handle_update_resume(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
    Json(data): Json<ResumeData>,
) -> Result<Json<Value>, AppError> {
    if !store::update_resume(&state.db, id, user.id, &data).await? {
        return Err(not_found(id));
    }
    Ok(Json(json!({ "status": "success", "message": "Resume updated" })))
}

/// DELETE /api/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    if !store::delete_resume(&state.db, id, user.id).await? {
        return Err(not_found(id));
    }
    info!("User {} deleted resume {id}", user.id);
    Ok(Json(json!({ "status": "success", "message": "Resume deleted" })))
}
