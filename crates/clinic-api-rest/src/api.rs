//! JSON API handlers and their OpenAPI description.

use crate::error::{ApiError, ErrorBody, ErrorDetail};
use crate::extract::ApiJson;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use clinic_core::{
    Appointment, AppointmentDetail, Doctor, NewAppointment, NewDoctor, NewPatient, Patient,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, OpenApi, ToSchema};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecentQuery {
    /// Maximum number of appointments (default 10, capped at 100).
    pub limit: Option<usize>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        list_patients,
        create_patient,
        get_patient,
        list_patient_appointments,
        list_doctors,
        create_doctor,
        get_doctor,
        list_doctor_appointments,
        list_recent_appointments,
        create_appointment,
    ),
    components(schemas(
        HealthRes,
        Patient,
        Doctor,
        Appointment,
        AppointmentDetail,
        NewPatient,
        NewDoctor,
        NewAppointment,
        ErrorBody,
        ErrorDetail,
    ))
)]
pub struct ApiDoc;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint used by monitoring and load balancers.
#[axum::debug_handler]
pub async fn health() -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "Clinic is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/api/patients",
    responses(
        (status = 200, description = "Patients, newest first", body = [Patient]),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
#[axum::debug_handler]
pub async fn list_patients(State(state): State<AppState>) -> Result<Json<Vec<Patient>>, ApiError> {
    let patients = state.run(|clinic| clinic.list_patients()).await?;
    Ok(Json(patients))
}

#[utoipa::path(
    post,
    path = "/api/patients",
    request_body = NewPatient,
    responses(
        (status = 201, description = "Patient created", body = Patient),
        (status = 400, description = "Invalid input or malformed body", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
/// Create a patient
///
/// `birthdate` must be an ISO-8601 date when present. Blank optional fields are stored as null.
#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewPatient>,
) -> Result<(StatusCode, Json<Patient>), ApiError> {
    let patient = state.run(move |clinic| clinic.create_patient(req)).await?;
    Ok((StatusCode::CREATED, Json(patient)))
}

#[utoipa::path(
    get,
    path = "/api/patients/{id}",
    params(("id" = i64, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Patient", body = Patient),
        (status = 404, description = "No such patient", body = ErrorBody)
    )
)]
#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Patient>, ApiError> {
    let patient = state.run(move |clinic| clinic.get_patient(id)).await?;
    Ok(Json(patient))
}

#[utoipa::path(
    get,
    path = "/api/patients/{id}/appointments",
    params(("id" = i64, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Appointments of the patient, newest first", body = [AppointmentDetail]),
        (status = 404, description = "No such patient", body = ErrorBody)
    )
)]
#[axum::debug_handler]
pub async fn list_patient_appointments(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<AppointmentDetail>>, ApiError> {
    let appointments = state
        .run(move |clinic| clinic.list_appointments_for_patient(id))
        .await?;
    Ok(Json(appointments))
}

#[utoipa::path(
    get,
    path = "/api/doctors",
    responses(
        (status = 200, description = "Doctors, alphabetical by name", body = [Doctor]),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
#[axum::debug_handler]
pub async fn list_doctors(State(state): State<AppState>) -> Result<Json<Vec<Doctor>>, ApiError> {
    let doctors = state.run(|clinic| clinic.list_doctors()).await?;
    Ok(Json(doctors))
}

#[utoipa::path(
    post,
    path = "/api/doctors",
    request_body = NewDoctor,
    responses(
        (status = 201, description = "Doctor created", body = Doctor),
        (status = 400, description = "Invalid input or malformed body", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
#[axum::debug_handler]
pub async fn create_doctor(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewDoctor>,
) -> Result<(StatusCode, Json<Doctor>), ApiError> {
    let doctor = state.run(move |clinic| clinic.create_doctor(req)).await?;
    Ok((StatusCode::CREATED, Json(doctor)))
}

#[utoipa::path(
    get,
    path = "/api/doctors/{id}",
    params(("id" = i64, Path, description = "Doctor id")),
    responses(
        (status = 200, description = "Doctor", body = Doctor),
        (status = 404, description = "No such doctor", body = ErrorBody)
    )
)]
#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Doctor>, ApiError> {
    let doctor = state.run(move |clinic| clinic.get_doctor(id)).await?;
    Ok(Json(doctor))
}

#[utoipa::path(
    get,
    path = "/api/doctors/{id}/appointments",
    params(("id" = i64, Path, description = "Doctor id")),
    responses(
        (status = 200, description = "Appointments with the doctor, newest first", body = [AppointmentDetail]),
        (status = 404, description = "No such doctor", body = ErrorBody)
    )
)]
#[axum::debug_handler]
pub async fn list_doctor_appointments(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<AppointmentDetail>>, ApiError> {
    let appointments = state
        .run(move |clinic| clinic.list_appointments_for_doctor(id))
        .await?;
    Ok(Json(appointments))
}

#[utoipa::path(
    get,
    path = "/api/appointments",
    params(RecentQuery),
    responses(
        (status = 200, description = "Most recent appointments, newest first", body = [AppointmentDetail]),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
#[axum::debug_handler]
pub async fn list_recent_appointments(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<AppointmentDetail>>, ApiError> {
    let appointments = state
        .run(move |clinic| clinic.list_recent_appointment_details(query.limit))
        .await?;
    Ok(Json(appointments))
}

#[utoipa::path(
    post,
    path = "/api/appointments",
    request_body = NewAppointment,
    responses(
        (status = 201, description = "Appointment created", body = Appointment),
        (status = 400, description = "Invalid input or malformed body", body = ErrorBody),
        (status = 422, description = "Patient or doctor does not exist", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
/// Book an appointment
///
/// No overlap check is made; the same doctor can be booked twice for the same time.
#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewAppointment>,
) -> Result<(StatusCode, Json<Appointment>), ApiError> {
    let appointment = state
        .run(move |clinic| clinic.create_appointment(req))
        .await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}
