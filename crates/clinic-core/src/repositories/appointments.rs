use crate::error::{ClinicError, ClinicResult, Entity};
use crate::models::{Appointment, AppointmentDetail, NewAppointment};
use crate::repositories::{doctors::doctor_exists, patients::patient_exists};
use crate::validation::{optional_notes, parse_date_time};
use rusqlite::{params, Connection, OptionalExtension, Row};

const APPOINTMENT_COLUMNS: &str = "a.id, a.patient_id, a.doctor_id, a.date, a.notes";

fn appointment_from_row(row: &Row<'_>) -> rusqlite::Result<Appointment> {
    Ok(Appointment {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        doctor_id: row.get(2)?,
        date: row.get(3)?,
        notes: row.get(4)?,
    })
}

fn detail_from_row(row: &Row<'_>) -> rusqlite::Result<AppointmentDetail> {
    Ok(AppointmentDetail {
        appointment: appointment_from_row(row)?,
        patient_name: row.get(5)?,
        doctor_name: row.get(6)?,
    })
}

/// Validates `new`, checks both references and inserts the appointment.
///
/// No overlap or double-booking check is made.
///
/// # Errors
///
/// * `MissingField` / `InvalidDate` if `date` is blank or unparsable.
/// * `UnknownReference` if the patient or doctor does not exist. Nothing is written.
pub fn create_appointment(conn: &mut Connection, new: &NewAppointment) -> ClinicResult<Appointment> {
    let date = parse_date_time("date", &new.date)?;
    let notes = optional_notes(new.notes.as_deref());

    let tx = conn.transaction()?;
    if !patient_exists(&tx, new.patient_id)? {
        return Err(ClinicError::UnknownReference {
            entity: Entity::Patient,
            id: new.patient_id,
        });
    }
    if !doctor_exists(&tx, new.doctor_id)? {
        return Err(ClinicError::UnknownReference {
            entity: Entity::Doctor,
            id: new.doctor_id,
        });
    }
    tx.execute(
        "INSERT INTO appointments (patient_id, doctor_id, date, notes) VALUES (?1, ?2, ?3, ?4)",
        params![new.patient_id, new.doctor_id, date, notes],
    )?;
    let id = tx.last_insert_rowid();
    tx.commit()?;

    Ok(Appointment {
        id,
        patient_id: new.patient_id,
        doctor_id: new.doctor_id,
        date,
        notes,
    })
}

/// The `limit` most recent appointments by appointment date, newest first.
pub fn list_recent_appointments(conn: &Connection, limit: usize) -> ClinicResult<Vec<Appointment>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments a
         ORDER BY a.date DESC, a.id DESC LIMIT ?1"
    ))?;
    let rows = stmt.query_map(params![sql_limit(limit)], appointment_from_row)?;
    rows.map(|r| r.map_err(ClinicError::from)).collect()
}

/// Same ordering as `list_recent_appointments`, with patient and doctor names joined in.
pub fn list_recent_appointment_details(
    conn: &Connection,
    limit: usize,
) -> ClinicResult<Vec<AppointmentDetail>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {APPOINTMENT_COLUMNS}, p.name, d.name FROM appointments a
         JOIN patients p ON p.id = a.patient_id
         JOIN doctors d ON d.id = a.doctor_id
         ORDER BY a.date DESC, a.id DESC LIMIT ?1"
    ))?;
    let rows = stmt.query_map(params![sql_limit(limit)], detail_from_row)?;
    rows.map(|r| r.map_err(ClinicError::from)).collect()
}

pub fn get_appointment(conn: &Connection, id: i64) -> ClinicResult<Appointment> {
    conn.query_row(
        &format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments a WHERE a.id = ?1"),
        params![id],
        appointment_from_row,
    )
    .optional()?
    .ok_or(ClinicError::NotFound {
        entity: Entity::Appointment,
        id,
    })
}

/// All appointments of one patient, newest first.
pub fn list_appointments_for_patient(
    conn: &Connection,
    patient_id: i64,
) -> ClinicResult<Vec<AppointmentDetail>> {
    if !patient_exists(conn, patient_id)? {
        return Err(ClinicError::NotFound {
            entity: Entity::Patient,
            id: patient_id,
        });
    }
    list_details_where(conn, "a.patient_id = ?1", patient_id)
}

/// All appointments with one doctor, newest first.
pub fn list_appointments_for_doctor(
    conn: &Connection,
    doctor_id: i64,
) -> ClinicResult<Vec<AppointmentDetail>> {
    if !doctor_exists(conn, doctor_id)? {
        return Err(ClinicError::NotFound {
            entity: Entity::Doctor,
            id: doctor_id,
        });
    }
    list_details_where(conn, "a.doctor_id = ?1", doctor_id)
}

fn list_details_where(
    conn: &Connection,
    predicate: &str,
    id: i64,
) -> ClinicResult<Vec<AppointmentDetail>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {APPOINTMENT_COLUMNS}, p.name, d.name FROM appointments a
         JOIN patients p ON p.id = a.patient_id
         JOIN doctors d ON d.id = a.doctor_id
         WHERE {predicate}
         ORDER BY a.date DESC, a.id DESC"
    ))?;
    let rows = stmt.query_map(params![id], detail_from_row)?;
    rows.map(|r| r.map_err(ClinicError::from)).collect()
}

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::{Doctor, NewDoctor, NewPatient, Patient};
    use crate::repositories::{doctors::create_doctor, patients::create_patient};

    fn seed(db: &Database) -> (Patient, Doctor) {
        db.with_connection(|conn| {
            let patient = create_patient(
                conn,
                &NewPatient {
                    name: "Carmen Ruiz".into(),
                    ..Default::default()
                },
            )?;
            let doctor = create_doctor(
                conn,
                &NewDoctor {
                    name: "Dr. Ortega".into(),
                    specialty: Some("Pediatrics".into()),
                },
            )?;
            Ok((patient, doctor))
        })
        .expect("seeding should succeed")
    }

    fn book(db: &Database, patient_id: i64, doctor_id: i64, date: &str) -> ClinicResult<Appointment> {
        let new = NewAppointment {
            patient_id,
            doctor_id,
            date: date.to_string(),
            notes: None,
        };
        db.with_connection(|conn| create_appointment(conn, &new))
    }

    fn count_appointments(db: &Database) -> i64 {
        db.with_connection(|conn| {
            Ok(conn.query_row("SELECT COUNT(*) FROM appointments", [], |row| row.get(0))?)
        })
        .unwrap()
    }

    #[test]
    fn test_create_and_read_back() {
        let db = Database::open_in_memory().unwrap();
        let (patient, doctor) = seed(&db);

        let new = NewAppointment {
            patient_id: patient.id,
            doctor_id: doctor.id,
            date: "2024-05-10T09:15".into(),
            notes: Some("Follow-up on blood work".into()),
        };
        let created = db
            .with_connection(|conn| create_appointment(conn, &new))
            .unwrap();
        assert_eq!(created.date.to_string(), "2024-05-10 09:15:00");

        let fetched = db
            .with_connection(|conn| get_appointment(conn, created.id))
            .unwrap();
        assert_eq!(fetched, created);
    }

    #[test]
    fn test_unknown_doctor_is_rejected_without_write() {
        let db = Database::open_in_memory().unwrap();
        let (patient, doctor) = seed(&db);

        let err = book(&db, patient.id, doctor.id + 100, "2024-05-10T09:00").unwrap_err();
        assert!(matches!(
            err,
            ClinicError::UnknownReference {
                entity: Entity::Doctor,
                ..
            }
        ));
        assert_eq!(count_appointments(&db), 0);
    }

    #[test]
    fn test_unknown_patient_is_rejected_without_write() {
        let db = Database::open_in_memory().unwrap();
        let (_patient, doctor) = seed(&db);

        let err = book(&db, 424242, doctor.id, "2024-05-10T09:00").unwrap_err();
        assert!(matches!(
            err,
            ClinicError::UnknownReference {
                entity: Entity::Patient,
                id: 424242
            }
        ));
        assert_eq!(count_appointments(&db), 0);
    }

    #[test]
    fn test_unparsable_date_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        let (patient, doctor) = seed(&db);

        let err = book(&db, patient.id, doctor.id, "tomorrow at noon").unwrap_err();
        assert!(matches!(err, ClinicError::InvalidDate { field: "date", .. }));
        assert_eq!(count_appointments(&db), 0);
    }

    #[test]
    fn test_recent_is_newest_first_and_capped() {
        let db = Database::open_in_memory().unwrap();
        let (patient, doctor) = seed(&db);

        book(&db, patient.id, doctor.id, "2024-01-01T09:00").unwrap();
        let second = book(&db, patient.id, doctor.id, "2024-02-01T09:00").unwrap();
        let third = book(&db, patient.id, doctor.id, "2024-03-01T09:00").unwrap();

        let recent = db
            .with_connection(|conn| list_recent_appointments(conn, 2))
            .unwrap();
        assert_eq!(recent, vec![third, second]);
    }

    #[test]
    fn test_recent_orders_by_appointment_date_not_insertion() {
        let db = Database::open_in_memory().unwrap();
        let (patient, doctor) = seed(&db);

        let later = book(&db, patient.id, doctor.id, "2024-06-01T10:00").unwrap();
        let earlier = book(&db, patient.id, doctor.id, "2024-06-01T08:30").unwrap();

        let details = db
            .with_connection(|conn| list_recent_appointment_details(conn, 10))
            .unwrap();
        let ids: Vec<i64> = details.iter().map(|d| d.appointment.id).collect();
        assert_eq!(ids, vec![later.id, earlier.id]);
        assert_eq!(details[0].patient_name, "Carmen Ruiz");
        assert_eq!(details[0].doctor_name, "Dr. Ortega");
    }

    #[test]
    fn test_double_booking_is_allowed() {
        let db = Database::open_in_memory().unwrap();
        let (patient, doctor) = seed(&db);

        book(&db, patient.id, doctor.id, "2024-06-01T10:00").unwrap();
        book(&db, patient.id, doctor.id, "2024-06-01T10:00").unwrap();
        assert_eq!(count_appointments(&db), 2);
    }

    #[test]
    fn test_per_owner_lists() {
        let db = Database::open_in_memory().unwrap();
        let (patient, doctor) = seed(&db);
        let other_doctor = db
            .with_connection(|conn| {
                create_doctor(
                    conn,
                    &NewDoctor {
                        name: "Dr. Vega".into(),
                        specialty: None,
                    },
                )
            })
            .unwrap();

        book(&db, patient.id, doctor.id, "2024-01-01T09:00").unwrap();
        book(&db, patient.id, other_doctor.id, "2024-01-02T09:00").unwrap();

        let for_patient = db
            .with_connection(|conn| list_appointments_for_patient(conn, patient.id))
            .unwrap();
        assert_eq!(for_patient.len(), 2);
        assert_eq!(for_patient[0].doctor_name, "Dr. Vega");

        let for_doctor = db
            .with_connection(|conn| list_appointments_for_doctor(conn, doctor.id))
            .unwrap();
        assert_eq!(for_doctor.len(), 1);
        assert_eq!(for_doctor[0].appointment.doctor_id, doctor.id);

        let err = db
            .with_connection(|conn| list_appointments_for_doctor(conn, 9999))
            .unwrap_err();
        assert!(matches!(
            err,
            ClinicError::NotFound {
                entity: Entity::Doctor,
                id: 9999
            }
        ));
    }
}
