//! Server-rendered HTML pages.
//!
//! Every interpolated value goes through `escape`.

use crate::forms::AppointmentForm;
use clinic_core::{AppointmentDetail, ClinicOverview, Doctor, NewDoctor, NewPatient, Patient};

const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} · Clinic</title>
<style>
body{{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,sans-serif;margin:0 auto;max-width:960px;padding:24px;color:#1c1917}}
nav a{{margin-right:16px}}
table{{border-collapse:collapse;width:100%;margin-bottom:24px}}
th,td{{border-bottom:1px solid #e7e5e4;padding:6px 8px;text-align:left}}
form label{{display:block;margin:12px 0 4px}}
.error{{background:#fef2f2;border:1px solid #fecaca;color:#991b1b;padding:12px;border-radius:8px}}
.empty{{color:#78716c}}
</style>
</head>
<body>
<nav><a href="/">Home</a><a href="/patients/new">New patient</a><a href="/doctors/new">New doctor</a><a href="/appointments/new">New appointment</a></nav>
<h1>{title}</h1>
{body}
</body>
</html>"##,
        title = escape(title),
    )
}

fn error_banner(error: Option<&str>) -> String {
    match error {
        Some(message) => format!(r#"<p class="error">{}</p>"#, escape(message)),
        None => String::new(),
    }
}

fn opt(value: Option<&str>) -> String {
    value.map(escape).unwrap_or_default()
}

fn patient_rows(patients: &[Patient]) -> String {
    if patients.is_empty() {
        return r#"<p class="empty">No patients yet.</p>"#.to_string();
    }
    let rows: String = patients
        .iter()
        .map(|p| {
            format!(
                r#"<tr><td><a href="/patients/{id}">{name}</a></td><td>{birthdate}</td><td>{phone}</td><td>{created}</td></tr>"#,
                id = p.id,
                name = escape(&p.name),
                birthdate = p.birthdate.map(|d| d.to_string()).unwrap_or_default(),
                phone = opt(p.phone.as_deref()),
                created = p.created_at.format(DATE_TIME_FORMAT),
            )
        })
        .collect();
    format!(
        "<table><tr><th>Name</th><th>Birthdate</th><th>Phone</th><th>Registered</th></tr>{rows}</table>"
    )
}

fn doctor_rows(doctors: &[Doctor]) -> String {
    if doctors.is_empty() {
        return r#"<p class="empty">No doctors yet.</p>"#.to_string();
    }
    let rows: String = doctors
        .iter()
        .map(|d| {
            format!(
                r#"<tr><td><a href="/doctors/{id}">{name}</a></td><td>{specialty}</td></tr>"#,
                id = d.id,
                name = escape(&d.name),
                specialty = opt(d.specialty.as_deref()),
            )
        })
        .collect();
    format!("<table><tr><th>Name</th><th>Specialty</th></tr>{rows}</table>")
}

fn appointment_rows(appointments: &[AppointmentDetail]) -> String {
    if appointments.is_empty() {
        return r#"<p class="empty">No appointments.</p>"#.to_string();
    }
    let rows: String = appointments
        .iter()
        .map(|a| {
            format!(
                r#"<tr><td>{date}</td><td><a href="/patients/{pid}">{patient}</a></td><td><a href="/doctors/{did}">{doctor}</a></td><td>{notes}</td></tr>"#,
                date = a.appointment.date.format(DATE_TIME_FORMAT),
                pid = a.appointment.patient_id,
                patient = escape(&a.patient_name),
                did = a.appointment.doctor_id,
                doctor = escape(&a.doctor_name),
                notes = opt(a.appointment.notes.as_deref()),
            )
        })
        .collect();
    format!(
        "<table><tr><th>Date (UTC)</th><th>Patient</th><th>Doctor</th><th>Notes</th></tr>{rows}</table>"
    )
}

pub fn index(overview: &ClinicOverview) -> String {
    let body = format!(
        "<h2>Recent appointments</h2>{appointments}<h2>Patients</h2>{patients}<h2>Doctors</h2>{doctors}",
        appointments = appointment_rows(&overview.recent_appointments),
        patients = patient_rows(&overview.patients),
        doctors = doctor_rows(&overview.doctors),
    );
    layout("Clinic", &body)
}

pub fn patient_form(values: &NewPatient, error: Option<&str>) -> String {
    let body = format!(
        r#"{error}<form method="post" action="/patients/new">
<label for="name">Name</label><input id="name" name="name" maxlength="140" required value="{name}">
<label for="birthdate">Birthdate</label><input id="birthdate" name="birthdate" type="date" value="{birthdate}">
<label for="phone">Phone</label><input id="phone" name="phone" maxlength="30" value="{phone}">
<p><button>Save</button></p>
</form>"#,
        error = error_banner(error),
        name = escape(&values.name),
        birthdate = opt(values.birthdate.as_deref()),
        phone = opt(values.phone.as_deref()),
    );
    layout("New patient", &body)
}

pub fn doctor_form(values: &NewDoctor, error: Option<&str>) -> String {
    let body = format!(
        r#"{error}<form method="post" action="/doctors/new">
<label for="name">Name</label><input id="name" name="name" maxlength="140" required value="{name}">
<label for="specialty">Specialty</label><input id="specialty" name="specialty" maxlength="120" value="{specialty}">
<p><button>Save</button></p>
</form>"#,
        error = error_banner(error),
        name = escape(&values.name),
        specialty = opt(values.specialty.as_deref()),
    );
    layout("New doctor", &body)
}

fn select_options<'a>(
    items: impl Iterator<Item = (i64, &'a str)>,
    selected: &str,
) -> String {
    items
        .map(|(id, label)| {
            let id = id.to_string();
            let selected = if id == selected.trim() { " selected" } else { "" };
            format!(r#"<option value="{id}"{selected}>{}</option>"#, escape(label))
        })
        .collect()
}

pub fn appointment_form(
    patients: &[Patient],
    doctors: &[Doctor],
    values: &AppointmentForm,
    error: Option<&str>,
) -> String {
    let body = format!(
        r#"{error}<form method="post" action="/appointments/new">
<label for="patient_id">Patient</label><select id="patient_id" name="patient_id" required><option value="">Select a patient</option>{patients}</select>
<label for="doctor_id">Doctor</label><select id="doctor_id" name="doctor_id" required><option value="">Select a doctor</option>{doctors}</select>
<label for="date">Date and time</label><input id="date" name="date" type="datetime-local" required value="{date}">
<label for="notes">Notes</label><textarea id="notes" name="notes" rows="4">{notes}</textarea>
<p><button>Save</button></p>
</form>"#,
        error = error_banner(error),
        patients = select_options(
            patients.iter().map(|p| (p.id, p.name.as_str())),
            &values.patient_id
        ),
        doctors = select_options(
            doctors.iter().map(|d| (d.id, d.name.as_str())),
            &values.doctor_id
        ),
        date = escape(&values.date),
        notes = opt(values.notes.as_deref()),
    );
    layout("New appointment", &body)
}

pub fn patient_detail(patient: &Patient, appointments: &[AppointmentDetail]) -> String {
    let body = format!(
        "<p>Birthdate: {birthdate}<br>Phone: {phone}<br>Registered: {created} UTC</p><h2>Appointments</h2>{appointments}",
        birthdate = patient
            .birthdate
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".into()),
        phone = patient.phone.as_deref().map(escape).unwrap_or_else(|| "-".into()),
        created = patient.created_at.format(DATE_TIME_FORMAT),
        appointments = appointment_rows(appointments),
    );
    layout(&patient.name, &body)
}

pub fn doctor_detail(doctor: &Doctor, appointments: &[AppointmentDetail]) -> String {
    let body = format!(
        "<p>Specialty: {specialty}</p><h2>Appointments</h2>{appointments}",
        specialty = doctor
            .specialty
            .as_deref()
            .map(escape)
            .unwrap_or_else(|| "-".into()),
        appointments = appointment_rows(appointments),
    );
    layout(&doctor.name, &body)
}

pub fn error_page(title: &str, message: &str) -> String {
    layout(title, &format!("<p>{}</p>", escape(message)))
}
