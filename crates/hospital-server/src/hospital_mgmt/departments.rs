//! Department endpoints.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use hospital_api::{ApiError, StoreResultExt};
use hospital_storage::RequestContext;
use time::OffsetDateTime;
use uuid::Uuid;

use super::extract::JsonBody;
use super::models::Department;
use super::state::AppState;

const RESOURCE: &str = "Department";

pub async fn create_department(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    JsonBody(mut department): JsonBody<Department>,
) -> Result<impl IntoResponse, ApiError> {
    if department.id.is_empty() {
        department.id = Uuid::new_v4().to_string();
    }
    let now = OffsetDateTime::now_utc();
    department.created_at = now;
    department.updated_at = now;

    state
        .departments
        .create(&ctx, &department.id, &department)
        .await
        .or_api(RESOURCE, "Failed to create department in database")?;

    tracing::info!(department_id = %department.id, "Department created");
    Ok((StatusCode::CREATED, Json(department)))
}

pub async fn list_departments(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<Json<Vec<Department>>, ApiError> {
    let departments = state
        .departments
        .find_all(&ctx)
        .await
        .or_api(RESOURCE, "Failed to retrieve departments from database")?;
    Ok(Json(departments))
}

pub async fn get_department(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(department_id): Path<String>,
) -> Result<Json<Department>, ApiError> {
    let department = state
        .departments
        .find(&ctx, &department_id)
        .await
        .or_api(RESOURCE, "Failed to find department in database")?;
    Ok(Json(department))
}

pub async fn update_department(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(department_id): Path<String>,
    JsonBody(mut department): JsonBody<Department>,
) -> Result<Json<Department>, ApiError> {
    let existing = state
        .departments
        .find(&ctx, &department_id)
        .await
        .or_api(RESOURCE, "Failed to find department in database")?;

    department.id = department_id;
    department.created_at = existing.created_at;
    department.updated_at = OffsetDateTime::now_utc();

    state
        .departments
        .update(&ctx, &department.id, &department)
        .await
        .or_api(RESOURCE, "Failed to update department in database")?;
    Ok(Json(department))
}

pub async fn delete_department(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(department_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .departments
        .delete(&ctx, &department_id)
        .await
        .or_api(RESOURCE, "Failed to delete department from database")?;

    tracing::info!(department_id = %department_id, "Department deleted");
    Ok(StatusCode::NO_CONTENT)
}
