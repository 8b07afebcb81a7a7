//! Bed endpoints, including the per-department listing.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use hospital_api::{ApiError, StoreResultExt};
use hospital_storage::{DocumentFilter, RequestContext};
use time::OffsetDateTime;
use uuid::Uuid;

use super::extract::JsonBody;
use super::models::Bed;
use super::state::AppState;

const RESOURCE: &str = "Bed";

pub async fn create_bed(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    JsonBody(mut bed): JsonBody<Bed>,
) -> Result<impl IntoResponse, ApiError> {
    if bed.id.is_empty() {
        bed.id = Uuid::new_v4().to_string();
    }
    let now = OffsetDateTime::now_utc();
    bed.created_at = now;
    bed.updated_at = now;

    state
        .beds
        .create(&ctx, &bed.id, &bed)
        .await
        .or_api(RESOURCE, "Failed to create bed in database")?;

    tracing::info!(bed_id = %bed.id, department_id = %bed.department_id, "Bed created");
    Ok((StatusCode::CREATED, Json(bed)))
}

pub async fn list_beds(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<Json<Vec<Bed>>, ApiError> {
    let beds = state
        .beds
        .find_all(&ctx)
        .await
        .or_api(RESOURCE, "Failed to retrieve beds from database")?;
    Ok(Json(beds))
}

/// Beds assigned to a department. An unknown department yields an empty list.
pub async fn list_department_beds(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(department_id): Path<String>,
) -> Result<Json<Vec<Bed>>, ApiError> {
    let filter = DocumentFilter::all().where_eq("department_id", department_id);
    let beds = state
        .beds
        .find_by_filter(&ctx, &filter)
        .await
        .or_api(
            RESOURCE,
            "Failed to retrieve beds by department from database",
        )?;
    Ok(Json(beds))
}

pub async fn get_bed(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(bed_id): Path<String>,
) -> Result<Json<Bed>, ApiError> {
    let bed = state
        .beds
        .find(&ctx, &bed_id)
        .await
        .or_api(RESOURCE, "Failed to find bed in database")?;
    Ok(Json(bed))
}

pub async fn update_bed(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(bed_id): Path<String>,
    JsonBody(mut bed): JsonBody<Bed>,
) -> Result<Json<Bed>, ApiError> {
    let existing = state
        .beds
        .find(&ctx, &bed_id)
        .await
        .or_api(RESOURCE, "Failed to find bed in database")?;

    bed.id = bed_id;
    bed.created_at = existing.created_at;
    bed.updated_at = OffsetDateTime::now_utc();

    state
        .beds
        .update(&ctx, &bed.id, &bed)
        .await
        .or_api(RESOURCE, "Failed to update bed in database")?;
    Ok(Json(bed))
}

pub async fn delete_bed(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(bed_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .beds
        .delete(&ctx, &bed_id)
        .await
        .or_api(RESOURCE, "Failed to delete bed from database")?;

    tracing::info!(bed_id = %bed_id, "Bed deleted");
    Ok(StatusCode::NO_CONTENT)
}
