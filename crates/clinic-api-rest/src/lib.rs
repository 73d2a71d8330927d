//! # Clinic API REST
//!
//! HTTP front end for the clinic records system.
//!
//! Handles:
//! - HTML forms and list pages (`pages`, `html`)
//! - JSON endpoints with OpenAPI/Swagger documentation (`api`)
//! - HTTP concerns (form/JSON extraction, status mapping, CORS)
//!
//! All data access goes through `clinic_core::ClinicService`.

#![warn(rust_2018_idioms)]

pub mod api;
pub mod error;
pub mod extract;
pub mod forms;
pub mod html;
pub mod pages;
pub mod state;

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use api::ApiDoc;
pub use error::ApiError;
pub use state::AppState;

/// Builds the full application router: HTML pages, JSON API and Swagger UI.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route(
            "/patients/new",
            get(pages::new_patient_form).post(pages::create_patient),
        )
        .route("/patients/:id", get(pages::patient_detail))
        .route(
            "/doctors/new",
            get(pages::new_doctor_form).post(pages::create_doctor),
        )
        .route("/doctors/:id", get(pages::doctor_detail))
        .route(
            "/appointments/new",
            get(pages::new_appointment_form).post(pages::create_appointment),
        )
        .route("/health", get(api::health))
        .route(
            "/api/patients",
            get(api::list_patients).post(api::create_patient),
        )
        .route("/api/patients/:id", get(api::get_patient))
        .route(
            "/api/patients/:id/appointments",
            get(api::list_patient_appointments),
        )
        .route("/api/doctors", get(api::list_doctors).post(api::create_doctor))
        .route("/api/doctors/:id", get(api::get_doctor))
        .route(
            "/api/doctors/:id/appointments",
            get(api::list_doctor_appointments),
        )
        .route(
            "/api/appointments",
            get(api::list_recent_appointments).post(api::create_appointment),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
