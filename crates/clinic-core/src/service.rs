//! Clinic service: the access layer as seen by the HTTP and CLI front ends.
//!
//! Pure data operations, no API concerns. Each call takes the connection for exactly
//! one repository operation, so every create is its own transaction.

use crate::config::CoreConfig;
use crate::constants::MAX_RECENT_APPOINTMENTS_LIMIT;
use crate::db::Database;
use crate::error::{ClinicError, ClinicResult};
use crate::models::{
    Appointment, AppointmentDetail, ClinicOverview, Doctor, NewAppointment, NewDoctor,
    NewPatient, Patient,
};
use crate::repositories::{appointments, doctors, patients};
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct ClinicService {
    db: Database,
    cfg: Arc<CoreConfig>,
}

impl ClinicService {
    /// Creates a service over an already opened database.
    pub fn new(db: Database, cfg: Arc<CoreConfig>) -> Self {
        Self { db, cfg }
    }

    /// Opens the database named by `cfg` (running migrations) and wraps it.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the file cannot be opened or a migration fails.
    pub fn open(cfg: Arc<CoreConfig>) -> ClinicResult<Self> {
        let db = Database::open(cfg.database_path())?;
        Ok(Self::new(db, cfg))
    }

    pub fn create_patient(&self, new: NewPatient) -> ClinicResult<Patient> {
        let patient = self
            .db
            .with_connection(|conn| patients::create_patient(conn, &new))?;
        tracing::info!(patient_id = patient.id, "patient created");
        Ok(patient)
    }

    pub fn create_doctor(&self, new: NewDoctor) -> ClinicResult<Doctor> {
        let doctor = self
            .db
            .with_connection(|conn| doctors::create_doctor(conn, &new))?;
        tracing::info!(doctor_id = doctor.id, "doctor created");
        Ok(doctor)
    }

    pub fn create_appointment(&self, new: NewAppointment) -> ClinicResult<Appointment> {
        let appointment = self
            .db
            .with_connection(|conn| appointments::create_appointment(conn, &new))?;
        tracing::info!(
            appointment_id = appointment.id,
            patient_id = appointment.patient_id,
            doctor_id = appointment.doctor_id,
            "appointment created"
        );
        Ok(appointment)
    }

    pub fn list_patients(&self) -> ClinicResult<Vec<Patient>> {
        self.db.with_connection(|conn| patients::list_patients(conn))
    }

    pub fn list_doctors(&self) -> ClinicResult<Vec<Doctor>> {
        self.db.with_connection(|conn| doctors::list_doctors(conn))
    }

    /// Most recent appointments, newest first.
    ///
    /// `None` uses the configured default; any limit is capped at
    /// `MAX_RECENT_APPOINTMENTS_LIMIT`. A limit of zero is `InvalidLimit`.
    pub fn list_recent_appointments(&self, limit: Option<usize>) -> ClinicResult<Vec<Appointment>> {
        let limit = self.effective_limit(limit)?;
        self.db
            .with_connection(|conn| appointments::list_recent_appointments(conn, limit))
    }

    pub fn list_recent_appointment_details(
        &self,
        limit: Option<usize>,
    ) -> ClinicResult<Vec<AppointmentDetail>> {
        let limit = self.effective_limit(limit)?;
        self.db
            .with_connection(|conn| appointments::list_recent_appointment_details(conn, limit))
    }

    pub fn get_patient(&self, id: i64) -> ClinicResult<Patient> {
        self.db.with_connection(|conn| patients::get_patient(conn, id))
    }

    pub fn get_doctor(&self, id: i64) -> ClinicResult<Doctor> {
        self.db.with_connection(|conn| doctors::get_doctor(conn, id))
    }

    pub fn get_appointment(&self, id: i64) -> ClinicResult<Appointment> {
        self.db
            .with_connection(|conn| appointments::get_appointment(conn, id))
    }

    pub fn list_appointments_for_patient(&self, id: i64) -> ClinicResult<Vec<AppointmentDetail>> {
        self.db
            .with_connection(|conn| appointments::list_appointments_for_patient(conn, id))
    }

    pub fn list_appointments_for_doctor(&self, id: i64) -> ClinicResult<Vec<AppointmentDetail>> {
        self.db
            .with_connection(|conn| appointments::list_appointments_for_doctor(conn, id))
    }

    /// Patients, doctors and recent appointments for the index page.
    pub fn overview(&self) -> ClinicResult<ClinicOverview> {
        Ok(ClinicOverview {
            patients: self.list_patients()?,
            doctors: self.list_doctors()?,
            recent_appointments: self.list_recent_appointment_details(None)?,
        })
    }

    fn effective_limit(&self, limit: Option<usize>) -> ClinicResult<usize> {
        match limit {
            Some(0) => Err(ClinicError::InvalidLimit),
            Some(n) => Ok(n.min(MAX_RECENT_APPOINTMENTS_LIMIT)),
            None => Ok(self.cfg.recent_appointments_limit()),
        }
    }
}
