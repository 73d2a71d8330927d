//! Constants used throughout the clinic core crate.
//!
//! Column bounds live here so the validation layer and the SQL schema agree on them.

/// Default SQLite database file when no explicit path is configured.
pub const DEFAULT_DATABASE_PATH: &str = "clinic.db";

/// Maximum characters in a patient's name.
pub const PATIENT_NAME_MAX_LEN: usize = 140;

/// Maximum characters in a patient's phone number.
pub const PATIENT_PHONE_MAX_LEN: usize = 30;

/// Maximum characters in a doctor's name.
pub const DOCTOR_NAME_MAX_LEN: usize = 140;

/// Maximum characters in a doctor's specialty.
pub const DOCTOR_SPECIALTY_MAX_LEN: usize = 120;

/// Number of appointments shown on the index when nothing else is configured.
pub const DEFAULT_RECENT_APPOINTMENTS_LIMIT: usize = 10;

/// Upper bound for any caller-supplied appointment list limit.
pub const MAX_RECENT_APPOINTMENTS_LIMIT: usize = 100;
