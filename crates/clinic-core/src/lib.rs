//! # Clinic Core
//!
//! Core business logic for the clinic records system.
//!
//! This crate contains the data model and its access layer:
//! - SQLite schema and migrations (`db`)
//! - Validation and coercion of submitted form fields (`validation`)
//! - Single-row inserts and ordered list queries (`repositories`, `ClinicService`)
//!
//! **No API concerns**: HTTP routing, HTML rendering and the CLI belong in
//! `clinic-api-rest` and `clinic-cli`.

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod models;
pub mod repositories;
pub mod service;
pub mod validation;

pub use clinic_types::{NonEmptyText, TextError};
pub use config::CoreConfig;
pub use constants::DEFAULT_DATABASE_PATH;
pub use db::Database;
pub use error::{ClinicError, ClinicResult, Entity, ErrorKind};
pub use models::{
    Appointment, AppointmentDetail, ClinicOverview, Doctor, NewAppointment, NewDoctor,
    NewPatient, Patient,
};
pub use service::ClinicService;
