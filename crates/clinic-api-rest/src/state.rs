use crate::error::ApiError;
use clinic_core::{ClinicResult, ClinicService};

/// Application state shared across handlers.
///
/// Holds the clinic service, whose database handle is owned by process bootstrap.
#[derive(Clone)]
pub struct AppState {
    clinic: ClinicService,
}

impl AppState {
    pub fn new(clinic: ClinicService) -> Self {
        Self { clinic }
    }

    /// Runs one access-layer call on the blocking pool.
    ///
    /// SQLite calls block the calling thread, so they never run on the async workers.
    pub async fn run<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&ClinicService) -> ClinicResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let clinic = self.clinic.clone();
        let result = tokio::task::spawn_blocking(move || f(&clinic)).await?;
        Ok(result?)
    }
}
