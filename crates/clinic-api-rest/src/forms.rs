//! Submitted HTML form bodies.
//!
//! Patient and doctor forms deserialize straight into `NewPatient` / `NewDoctor`.
//! The appointment form carries its ids as text so a bad `<select>` value becomes a
//! field error instead of an extractor rejection.

use clinic_core::validation::parse_id;
use clinic_core::{ClinicResult, NewAppointment};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppointmentForm {
    #[serde(default)]
    pub patient_id: String,
    #[serde(default)]
    pub doctor_id: String,
    #[serde(default)]
    pub date: String,
    pub notes: Option<String>,
}

impl AppointmentForm {
    pub fn to_new_appointment(&self) -> ClinicResult<NewAppointment> {
        Ok(NewAppointment {
            patient_id: parse_id("patient_id", &self.patient_id)?,
            doctor_id: parse_id("doctor_id", &self.doctor_id)?,
            date: self.date.clone(),
            notes: self.notes.clone(),
        })
    }
}
