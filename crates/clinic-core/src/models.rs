//! Persisted records and the inputs used to create them.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub birthdate: Option<NaiveDate>,
    pub phone: Option<String>,
    /// Set at insert time; never taken from input.
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Doctor {
    pub id: i64,
    pub name: String,
    pub specialty: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Appointment {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    /// Appointment instant, stored in UTC.
    pub date: NaiveDateTime,
    pub notes: Option<String>,
}

/// An appointment together with the names of the patient and doctor it references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AppointmentDetail {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub patient_name: String,
    pub doctor_name: String,
}

/// Raw patient input, as submitted by a form or JSON client.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct NewPatient {
    #[serde(default)]
    pub name: String,
    /// ISO-8601 date (`YYYY-MM-DD`).
    pub birthdate: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct NewDoctor {
    #[serde(default)]
    pub name: String,
    pub specialty: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewAppointment {
    pub patient_id: i64,
    pub doctor_id: i64,
    /// ISO-8601 date-time; an offset, if present, is normalised to UTC.
    pub date: String,
    pub notes: Option<String>,
}

/// Everything the index page shows.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClinicOverview {
    pub patients: Vec<Patient>,
    pub doctors: Vec<Doctor>,
    pub recent_appointments: Vec<AppointmentDetail>,
}
