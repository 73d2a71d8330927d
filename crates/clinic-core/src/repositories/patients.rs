use crate::constants::{PATIENT_NAME_MAX_LEN, PATIENT_PHONE_MAX_LEN};
use crate::error::{ClinicError, ClinicResult, Entity};
use crate::models::{NewPatient, Patient};
use crate::validation::{optional_text, parse_optional_date, required_text};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

const PATIENT_COLUMNS: &str = "id, name, birthdate, phone, created_at";

fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        name: row.get(1)?,
        birthdate: row.get(2)?,
        phone: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Validates `new` and inserts it, returning the stored row.
///
/// # Errors
///
/// * `MissingField` / `FieldTooLong` for `name` or `phone`.
/// * `InvalidDate` if `birthdate` is present but not an ISO-8601 date.
/// * `Storage` if the insert fails.
pub fn create_patient(conn: &mut Connection, new: &NewPatient) -> ClinicResult<Patient> {
    let name = required_text("name", &new.name, PATIENT_NAME_MAX_LEN)?;
    let birthdate = parse_optional_date("birthdate", new.birthdate.as_deref())?;
    let phone = optional_text("phone", new.phone.as_deref(), PATIENT_PHONE_MAX_LEN)?;
    let created_at = Utc::now();

    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO patients (name, birthdate, phone, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![name.as_str(), birthdate, phone, created_at],
    )?;
    let id = tx.last_insert_rowid();
    tx.commit()?;

    Ok(Patient {
        id,
        name: name.into_inner(),
        birthdate,
        phone,
        created_at,
    })
}

/// All patients, newest created first.
pub fn list_patients(conn: &Connection) -> ClinicResult<Vec<Patient>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PATIENT_COLUMNS} FROM patients ORDER BY created_at DESC, id DESC"
    ))?;
    let rows = stmt.query_map([], patient_from_row)?;
    rows.map(|r| r.map_err(ClinicError::from)).collect()
}

pub fn get_patient(conn: &Connection, id: i64) -> ClinicResult<Patient> {
    conn.query_row(
        &format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ?1"),
        params![id],
        patient_from_row,
    )
    .optional()?
    .ok_or(ClinicError::NotFound {
        entity: Entity::Patient,
        id,
    })
}

pub fn patient_exists(conn: &Connection, id: i64) -> ClinicResult<bool> {
    let found = conn
        .query_row("SELECT 1 FROM patients WHERE id = ?1", params![id], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}
