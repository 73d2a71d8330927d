use crate::constants::{DOCTOR_NAME_MAX_LEN, DOCTOR_SPECIALTY_MAX_LEN};
use crate::error::{ClinicError, ClinicResult, Entity};
use crate::models::{Doctor, NewDoctor};
use crate::validation::{optional_text, required_text};
use rusqlite::{params, Connection, OptionalExtension, Row};

const DOCTOR_COLUMNS: &str = "id, name, specialty";

fn doctor_from_row(row: &Row<'_>) -> rusqlite::Result<Doctor> {
    Ok(Doctor {
        id: row.get(0)?,
        name: row.get(1)?,
        specialty: row.get(2)?,
    })
}

/// Validates `new` and inserts it, returning the stored row.
pub fn create_doctor(conn: &mut Connection, new: &NewDoctor) -> ClinicResult<Doctor> {
    let name = required_text("name", &new.name, DOCTOR_NAME_MAX_LEN)?;
    let specialty = optional_text(
        "specialty",
        new.specialty.as_deref(),
        DOCTOR_SPECIALTY_MAX_LEN,
    )?;

    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO doctors (name, specialty) VALUES (?1, ?2)",
        params![name.as_str(), specialty],
    )?;
    let id = tx.last_insert_rowid();
    tx.commit()?;

    Ok(Doctor {
        id,
        name: name.into_inner(),
        specialty,
    })
}

/// All doctors, alphabetical by name.
pub fn list_doctors(conn: &Connection) -> ClinicResult<Vec<Doctor>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {DOCTOR_COLUMNS} FROM doctors ORDER BY name COLLATE NOCASE ASC, id ASC"
    ))?;
    let rows = stmt.query_map([], doctor_from_row)?;
    rows.map(|r| r.map_err(ClinicError::from)).collect()
}

pub fn get_doctor(conn: &Connection, id: i64) -> ClinicResult<Doctor> {
    conn.query_row(
        &format!("SELECT {DOCTOR_COLUMNS} FROM doctors WHERE id = ?1"),
        params![id],
        doctor_from_row,
    )
    .optional()?
    .ok_or(ClinicError::NotFound {
        entity: Entity::Doctor,
        id,
    })
}

pub fn doctor_exists(conn: &Connection, id: i64) -> ClinicResult<bool> {
    let found = conn
        .query_row("SELECT 1 FROM doctors WHERE id = ?1", params![id], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn new_doctor(name: &str, specialty: Option<&str>) -> NewDoctor {
        NewDoctor {
            name: name.to_string(),
            specialty: specialty.map(str::to_string),
        }
    }

    #[test]
    fn test_list_is_alphabetical() {
        let db = Database::open_in_memory().unwrap();
        db.with_connection(|conn| create_doctor(conn, &new_doctor("Zara", None)))
            .unwrap();
        db.with_connection(|conn| create_doctor(conn, &new_doctor("Ana", Some("Cardiology"))))
            .unwrap();

        let names: Vec<String> = db
            .with_connection(|conn| list_doctors(conn))
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["Ana", "Zara"]);
    }

    #[test]
    fn test_create_rejects_empty_name() {
        let db = Database::open_in_memory().unwrap();
        let err = db
            .with_connection(|conn| create_doctor(conn, &new_doctor("", Some("Dermatology"))))
            .unwrap_err();
        assert!(matches!(err, ClinicError::MissingField { field: "name" }));
    }

    #[test]
    fn test_create_rejects_long_specialty() {
        let db = Database::open_in_memory().unwrap();
        let specialty = "x".repeat(DOCTOR_SPECIALTY_MAX_LEN + 1);
        let err = db
            .with_connection(|conn| create_doctor(conn, &new_doctor("Ana", Some(&specialty))))
            .unwrap_err();
        assert!(matches!(
            err,
            ClinicError::FieldTooLong {
                field: "specialty",
                ..
            }
        ));
    }

    #[test]
    fn test_blank_specialty_is_null_and_round_trips() {
        let db = Database::open_in_memory().unwrap();
        let created = db
            .with_connection(|conn| create_doctor(conn, &new_doctor(" Dr. House ", Some(""))))
            .unwrap();
        assert_eq!(created.name, "Dr. House");
        assert_eq!(created.specialty, None);

        let fetched = db.with_connection(|conn| get_doctor(conn, created.id)).unwrap();
        assert_eq!(fetched, created);
        assert!(db.with_connection(|conn| doctor_exists(conn, created.id)).unwrap());
    }
}
