//! HTML form and list handlers.
//!
//! A successful POST redirects to the index with `303 See Other`. Validation and
//! not-found failures redisplay the submitted form with `422`; anything else is a `500`.

use crate::error::ApiError;
use crate::forms::AppointmentForm;
use crate::html;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use clinic_core::{ErrorKind, NewDoctor, NewPatient};

fn internal_error_page(err: ApiError) -> Response {
    tracing::error!("Page request failed: {:?}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(html::error_page(
            "Something went wrong",
            "The request could not be completed. Please try again.",
        )),
    )
        .into_response()
}

fn lookup_error_page(err: ApiError) -> Response {
    if let ApiError::Clinic(e) = &err {
        if e.kind() == ErrorKind::NotFound {
            return (
                StatusCode::NOT_FOUND,
                Html(html::error_page("Not found", &e.to_string())),
            )
                .into_response();
        }
    }
    internal_error_page(err)
}

fn invalid_form(page: String) -> Response {
    (StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response()
}

#[axum::debug_handler]
pub async fn index(State(state): State<AppState>) -> Response {
    match state.run(|clinic| clinic.overview()).await {
        Ok(overview) => Html(html::index(&overview)).into_response(),
        Err(e) => internal_error_page(e),
    }
}

#[axum::debug_handler]
pub async fn new_patient_form() -> Html<String> {
    Html(html::patient_form(&NewPatient::default(), None))
}

#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<AppState>,
    Form(form): Form<NewPatient>,
) -> Response {
    let input = form.clone();
    match state.run(move |clinic| clinic.create_patient(input)).await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(e) if e.is_recoverable() => {
            tracing::warn!("Create patient rejected: {}", e);
            invalid_form(html::patient_form(&form, Some(&e.to_string())))
        }
        Err(e) => internal_error_page(e),
    }
}

#[axum::debug_handler]
pub async fn new_doctor_form() -> Html<String> {
    Html(html::doctor_form(&NewDoctor::default(), None))
}

#[axum::debug_handler]
pub async fn create_doctor(
    State(state): State<AppState>,
    Form(form): Form<NewDoctor>,
) -> Response {
    let input = form.clone();
    match state.run(move |clinic| clinic.create_doctor(input)).await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(e) if e.is_recoverable() => {
            tracing::warn!("Create doctor rejected: {}", e);
            invalid_form(html::doctor_form(&form, Some(&e.to_string())))
        }
        Err(e) => internal_error_page(e),
    }
}

async fn render_appointment_form(
    state: &AppState,
    values: &AppointmentForm,
    error: Option<&str>,
) -> Result<String, ApiError> {
    let (patients, doctors) = state
        .run(|clinic| Ok((clinic.list_patients()?, clinic.list_doctors()?)))
        .await?;
    Ok(html::appointment_form(&patients, &doctors, values, error))
}

#[axum::debug_handler]
pub async fn new_appointment_form(State(state): State<AppState>) -> Response {
    match render_appointment_form(&state, &AppointmentForm::default(), None).await {
        Ok(page) => Html(page).into_response(),
        Err(e) => internal_error_page(e),
    }
}

#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<AppState>,
    Form(form): Form<AppointmentForm>,
) -> Response {
    let submitted = form.clone();
    let result = state
        .run(move |clinic| clinic.create_appointment(submitted.to_new_appointment()?))
        .await;

    match result {
        Ok(_) => Redirect::to("/").into_response(),
        Err(e) if e.is_recoverable() => {
            tracing::warn!("Create appointment rejected: {}", e);
            match render_appointment_form(&state, &form, Some(&e.to_string())).await {
                Ok(page) => invalid_form(page),
                Err(e) => internal_error_page(e),
            }
        }
        Err(e) => internal_error_page(e),
    }
}

#[axum::debug_handler]
pub async fn patient_detail(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let result = state
        .run(move |clinic| {
            let patient = clinic.get_patient(id)?;
            let appointments = clinic.list_appointments_for_patient(id)?;
            Ok((patient, appointments))
        })
        .await;

    match result {
        Ok((patient, appointments)) => {
            Html(html::patient_detail(&patient, &appointments)).into_response()
        }
        Err(e) => lookup_error_page(e),
    }
}

#[axum::debug_handler]
pub async fn doctor_detail(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let result = state
        .run(move |clinic| {
            let doctor = clinic.get_doctor(id)?;
            let appointments = clinic.list_appointments_for_doctor(id)?;
            Ok((doctor, appointments))
        })
        .await;

    match result {
        Ok((doctor, appointments)) => {
            Html(html::doctor_detail(&doctor, &appointments)).into_response()
        }
        Err(e) => lookup_error_page(e),
    }
}
