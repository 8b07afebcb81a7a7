//! Hospital management REST API.
//!
//! # Endpoints
//!
//! ## Department
//!
//! - `GET /api/departments` - List departments
//! - `POST /api/departments` - Create a department
//! - `GET /api/departments/{departmentId}` - Read a department
//! - `PUT /api/departments/{departmentId}` - Update a department
//! - `DELETE /api/departments/{departmentId}` - Delete a department
//! - `GET /api/departments/{departmentId}/beds` - Beds of a department
//!
//! ## Bed
//!
//! - `GET /api/beds`, `POST /api/beds`
//! - `GET|PUT|DELETE /api/beds/{bedId}`
//!
//! ## Patient
//!
//! - `GET /api/patients`, `POST /api/patients`
//! - `GET|PUT|DELETE /api/patients/{patientId}`
//! - `POST /api/patients/{patientId}/hospitalizations` - Add a record
//! - `PUT|DELETE /api/patients/{patientId}/hospitalizations/{recordId}`

pub mod beds;
pub mod departments;
mod extract;
pub mod models;
pub mod patients;
pub mod state;

pub use extract::JsonBody;
pub use models::{Bed, BedStatus, Department, DepartmentCapacity, HospitalizationRecord, Patient};
pub use state::AppState;

use axum::Router;
use axum::routing::{get, post, put};

// =============================================================================
// Routes
// =============================================================================

/// Creates the `/api` routes. Handlers expect a
/// [`RequestContext`](hospital_storage::RequestContext) extension, see
/// [`crate::middleware::request_context`].
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/departments",
            get(departments::list_departments).post(departments::create_department),
        )
        .route(
            "/api/departments/{department_id}",
            get(departments::get_department)
                .put(departments::update_department)
                .delete(departments::delete_department),
        )
        .route(
            "/api/departments/{department_id}/beds",
            get(beds::list_department_beds),
        )
        .route("/api/beds", get(beds::list_beds).post(beds::create_bed))
        .route(
            "/api/beds/{bed_id}",
            get(beds::get_bed)
                .put(beds::update_bed)
                .delete(beds::delete_bed),
        )
        .route(
            "/api/patients",
            get(patients::list_patients).post(patients::create_patient),
        )
        .route(
            "/api/patients/{patient_id}",
            get(patients::get_patient)
                .put(patients::update_patient)
                .delete(patients::delete_patient),
        )
        .route(
            "/api/patients/{patient_id}/hospitalizations",
            post(patients::add_hospitalization_record),
        )
        .route(
            "/api/patients/{patient_id}/hospitalizations/{record_id}",
            put(patients::update_hospitalization_record)
                .delete(patients::delete_hospitalization_record),
        )
}
