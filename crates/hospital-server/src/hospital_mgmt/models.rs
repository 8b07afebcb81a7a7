//! Documents stored in the department, bed and patient collections.
//!
//! Request bodies are lenient: missing fields take their defaults, and the
//! handlers own `id`, `created_at` and `updated_at`.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

// =============================================================================
// Departments
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepartmentCapacity {
    pub maximum_beds: i32,
    pub actual_beds: i32,
    pub occupied_beds: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Department {
    pub id: String,
    pub name: String,
    pub description: String,
    pub floor: i32,
    pub capacity: DepartmentCapacity,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Default for Department {
    fn default() -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: String::new(),
            name: String::new(),
            description: String::new(),
            floor: 0,
            capacity: DepartmentCapacity::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

// =============================================================================
// Beds
// =============================================================================

/// Occupancy of a bed. Both fields are omitted from JSON when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BedStatus {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub patient_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bed {
    pub id: String,
    pub department_id: String,
    pub bed_type: String,
    pub bed_quality: f64,
    pub status: BedStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Default for Bed {
    fn default() -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: String::new(),
            department_id: String::new(),
            bed_type: String::new(),
            bed_quality: 0.0,
            status: BedStatus::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

// =============================================================================
// Patients
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HospitalizationRecord {
    pub id: String,
    pub description: String,
    #[serde(
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub admission_date: Option<OffsetDateTime>,
    #[serde(
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub discharge_date: Option<OffsetDateTime>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub department_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub bed_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Patient {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    /// Free-form, as entered at admission.
    pub birth_date: String,
    pub gender: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub phone: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub email: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hospitalization_records: Vec<HospitalizationRecord>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Default for Patient {
    fn default() -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            birth_date: String::new(),
            gender: String::new(),
            phone: String::new(),
            email: String::new(),
            hospitalization_records: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Patient {
    pub fn record_index(&self, record_id: &str) -> Option<usize> {
        self.hospitalization_records
            .iter()
            .position(|record| record.id == record_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bed_status_omits_empty_fields() {
        let bed: Bed = serde_json::from_value(json!({
            "department_id": "D1",
            "bed_type": "ICU",
            "bed_quality": 4.5
        }))
        .unwrap();
        assert_eq!(bed.id, "");
        let value = serde_json::to_value(&bed).unwrap();
        assert_eq!(value["status"], json!({}));
        assert_eq!(value["bed_quality"], json!(4.5));
    }

    #[test]
    fn timestamps_use_rfc3339() {
        let department: Department = serde_json::from_value(json!({
            "name": "Cardiology",
            "created_at": "2024-03-01T08:30:00Z",
            "updated_at": "2024-03-02T10:00:00+01:00"
        }))
        .unwrap();
        assert_eq!(department.created_at.year(), 2024);
        let value = serde_json::to_value(&department).unwrap();
        assert_eq!(value["created_at"], "2024-03-01T08:30:00Z");
        assert_eq!(value["capacity"]["maximum_beds"], 0);
    }

    #[test]
    fn patient_optional_fields_are_skipped() {
        let patient = Patient {
            id: "p1".into(),
            first_name: "Ada".into(),
            ..Default::default()
        };
        let value = serde_json::to_value(&patient).unwrap();
        assert!(value.get("phone").is_none());
        assert!(value.get("hospitalization_records").is_none());

        let record: HospitalizationRecord = serde_json::from_value(json!({
            "description": "Observation",
            "admission_date": "2024-05-01T12:00:00Z"
        }))
        .unwrap();
        assert!(record.admission_date.is_some());
        assert!(record.discharge_date.is_none());
        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("discharge_date").is_none());
        assert!(value.get("bed_id").is_none());
    }

    #[test]
    fn record_lookup_by_id() {
        let patient = Patient {
            hospitalization_records: vec![
                HospitalizationRecord {
                    id: "r1".into(),
                    ..Default::default()
                },
                HospitalizationRecord {
                    id: "r2".into(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        assert_eq!(patient.record_index("r2"), Some(1));
        assert_eq!(patient.record_index("r3"), None);
    }
}
