use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use clinic_core::config::recent_appointments_limit_from_env_value;
use clinic_core::{ClinicService, CoreConfig, NewAppointment, NewDoctor, NewPatient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "clinic")]
#[command(about = "Clinic records CLI")]
struct Cli {
    /// SQLite database file
    #[arg(
        long,
        global = true,
        env = "CLINIC_DATABASE_PATH",
        default_value = clinic_core::DEFAULT_DATABASE_PATH
    )]
    database: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database file and apply migrations
    InitDb,
    /// Register a patient
    AddPatient {
        /// Full name
        name: String,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        birthdate: Option<String>,
        /// Phone number
        #[arg(long)]
        phone: Option<String>,
    },
    /// Register a doctor
    AddDoctor {
        /// Full name
        name: String,
        /// Medical specialty
        #[arg(long)]
        specialty: Option<String>,
    },
    /// Book an appointment
    AddAppointment {
        /// Patient id
        patient_id: i64,
        /// Doctor id
        doctor_id: i64,
        /// Date and time (ISO-8601, e.g. 2024-05-01T10:00)
        date: String,
        /// Free-text notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// List patients, newest first
    ListPatients,
    /// List doctors alphabetically
    ListDoctors,
    /// List the most recent appointments
    ListAppointments {
        /// Maximum number of appointments (capped at 100)
        #[arg(long)]
        limit: Option<usize>,
    },
}

fn open_service(database: PathBuf) -> anyhow::Result<ClinicService> {
    let limit =
        recent_appointments_limit_from_env_value(std::env::var("CLINIC_RECENT_APPOINTMENTS").ok())?;
    let cfg = CoreConfig::new(database, limit)?;
    Ok(ClinicService::open(Arc::new(cfg))?)
}

fn run(cli: Cli, out: &mut impl Write) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        writeln!(out, "Use 'clinic --help' for commands")?;
        return Ok(());
    };

    let service = open_service(cli.database.clone())?;

    match command {
        Commands::InitDb => {
            writeln!(out, "Initialised database at {}", cli.database.display())?;
        }
        Commands::AddPatient {
            name,
            birthdate,
            phone,
        } => {
            let patient = service.create_patient(NewPatient {
                name,
                birthdate,
                phone,
            })?;
            writeln!(out, "Created patient {}: {}", patient.id, patient.name)?;
        }
        Commands::AddDoctor { name, specialty } => {
            let doctor = service.create_doctor(NewDoctor { name, specialty })?;
            writeln!(out, "Created doctor {}: {}", doctor.id, doctor.name)?;
        }
        Commands::AddAppointment {
            patient_id,
            doctor_id,
            date,
            notes,
        } => {
            let appointment = service.create_appointment(NewAppointment {
                patient_id,
                doctor_id,
                date,
                notes,
            })?;
            writeln!(
                out,
                "Created appointment {} on {}",
                appointment.id,
                appointment.date.format("%Y-%m-%d %H:%M")
            )?;
        }
        Commands::ListPatients => {
            let patients = service.list_patients()?;
            if patients.is_empty() {
                writeln!(out, "No patients found.")?;
            }
            for p in patients {
                writeln!(
                    out,
                    "ID: {}, Name: {}, Birthdate: {}, Phone: {}, Created: {}",
                    p.id,
                    p.name,
                    p.birthdate.map(|d| d.to_string()).unwrap_or_else(|| "-".into()),
                    p.phone.as_deref().unwrap_or("-"),
                    p.created_at.to_rfc3339()
                )?;
            }
        }
        Commands::ListDoctors => {
            let doctors = service.list_doctors()?;
            if doctors.is_empty() {
                writeln!(out, "No doctors found.")?;
            }
            for d in doctors {
                writeln!(
                    out,
                    "ID: {}, Name: {}, Specialty: {}",
                    d.id,
                    d.name,
                    d.specialty.as_deref().unwrap_or("-")
                )?;
            }
        }
        Commands::ListAppointments { limit } => {
            let appointments = service.list_recent_appointment_details(limit)?;
            if appointments.is_empty() {
                writeln!(out, "No appointments found.")?;
            }
            for a in appointments {
                writeln!(
                    out,
                    "ID: {}, Date: {}, Patient: {}, Doctor: {}, Notes: {}",
                    a.appointment.id,
                    a.appointment.date.format("%Y-%m-%d %H:%M"),
                    a.patient_name,
                    a.doctor_name,
                    a.appointment.notes.as_deref().unwrap_or("-")
                )?;
            }
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("clinic_core=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    run(cli, &mut std::io::stdout().lock())
}
