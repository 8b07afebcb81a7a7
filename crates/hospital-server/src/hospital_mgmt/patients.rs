//! Patient endpoints and the hospitalization records nested in each patient.

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
use super::models::{HospitalizationRecord, Patient};
use super::state::AppState;

const RESOURCE: &str = "Patient";

// =============================================================================
// Patients
// =============================================================================

pub async fn create_patient(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    JsonBody(mut patient): JsonBody<Patient>,
) -> Result<impl IntoResponse, ApiError> {
    if patient.id.is_empty() {
        patient.id = Uuid::new_v4().to_string();
    }
    for record in &mut patient.hospitalization_records {
        if record.id.is_empty() {
            record.id = Uuid::new_v4().to_string();
        }
    }
    let now = OffsetDateTime::now_utc();
    patient.created_at = now;
    patient.updated_at = now;

    state
        .patients
        .create(&ctx, &patient.id, &patient)
        .await
        .or_api(RESOURCE, "Failed to create patient in database")?;

    tracing::info!(patient_id = %patient.id, "Patient created");
    Ok((StatusCode::CREATED, Json(patient)))
}

pub async fn list_patients(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<Json<Vec<Patient>>, ApiError> {
    let patients = state
        .patients
        .find_all(&ctx)
        .await
        .or_api(RESOURCE, "Failed to retrieve patients from database")?;
    Ok(Json(patients))
}

pub async fn get_patient(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(patient_id): Path<String>,
) -> Result<Json<Patient>, ApiError> {
    let patient = find_patient(&state, &ctx, &patient_id).await?;
    Ok(Json(patient))
}

/// Replaces the patient's demographics and records; `created_at` is kept.
pub async fn update_patient(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(patient_id): Path<String>,
    JsonBody(mut patient): JsonBody<Patient>,
) -> Result<Json<Patient>, ApiError> {
    let existing = find_patient(&state, &ctx, &patient_id).await?;

    patient.id = patient_id;
    patient.created_at = existing.created_at;
    patient.updated_at = OffsetDateTime::now_utc();

    save_patient(
        &state,
        &ctx,
        &patient,
        "Failed to update patient in database",
    )
    .await?;
    Ok(Json(patient))
}

pub async fn delete_patient(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(patient_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .patients
        .delete(&ctx, &patient_id)
        .await
        .or_api(RESOURCE, "Failed to delete patient from database")?;

    tracing::info!(patient_id = %patient_id, "Patient deleted");
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Hospitalization records
// =============================================================================

pub async fn add_hospitalization_record(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(patient_id): Path<String>,
    JsonBody(mut record): JsonBody<HospitalizationRecord>,
) -> Result<impl IntoResponse, ApiError> {
    let mut patient = find_patient(&state, &ctx, &patient_id).await?;

    if record.id.is_empty() {
        record.id = Uuid::new_v4().to_string();
    }
    patient.hospitalization_records.push(record.clone());
    patient.updated_at = OffsetDateTime::now_utc();

    save_patient(
        &state,
        &ctx,
        &patient,
        "Failed to add hospitalization record",
    )
    .await?;

    tracing::info!(
        patient_id = %patient.id,
        record_id = %record.id,
        "Hospitalization record added"
    );
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update_hospitalization_record(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path((patient_id, record_id)): Path<(String, String)>,
    JsonBody(mut record): JsonBody<HospitalizationRecord>,
) -> Result<Json<HospitalizationRecord>, ApiError> {
    let mut patient = find_patient(&state, &ctx, &patient_id).await?;

    let index = patient
        .record_index(&record_id)
        .ok_or_else(record_not_found)?;
    record.id = record_id;
    patient.hospitalization_records[index] = record.clone();
    patient.updated_at = OffsetDateTime::now_utc();

    save_patient(
        &state,
        &ctx,
        &patient,
        "Failed to update hospitalization record",
    )
    .await?;
    Ok(Json(record))
}

pub async fn delete_hospitalization_record(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path((patient_id, record_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let mut patient = find_patient(&state, &ctx, &patient_id).await?;

    let index = patient
        .record_index(&record_id)
        .ok_or_else(record_not_found)?;
    patient.hospitalization_records.remove(index);
    patient.updated_at = OffsetDateTime::now_utc();

    save_patient(
        &state,
        &ctx,
        &patient,
        "Failed to delete hospitalization record",
    )
    .await?;

    tracing::info!(
        patient_id = %patient.id,
        record_id = %record_id,
        "Hospitalization record deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Helpers
// =============================================================================

async fn find_patient(
    state: &AppState,
    ctx: &RequestContext,
    patient_id: &str,
) -> Result<Patient, ApiError> {
    state
        .patients
        .find(ctx, patient_id)
        .await
        .or_api(RESOURCE, "Failed to find patient in database")
}

async fn save_patient(
    state: &AppState,
    ctx: &RequestContext,
    patient: &Patient,
    failure: &str,
) -> Result<(), ApiError> {
    state
        .patients
        .update(ctx, &patient.id, patient)
        .await
        .or_api(RESOURCE, failure)
}

fn record_not_found() -> ApiError {
    ApiError::not_found(
        "Hospitalization record not found",
        "record with specified ID not found",
    )
}
