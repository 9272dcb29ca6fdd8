use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, info, warn};

use auth_cell::AuthenticatedClient;
use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_storage::SessionContext;

use crate::models::{
    Appointment, AppointmentStatus, EndAppointmentRequest, StartAppointmentRequest,
};
use crate::services::gate::StatusReading;

#[async_trait]
pub trait AppointmentService: Send + Sync {
    /// Never fails: an authorization failure that survives the token refresh
    /// reads as `UNKNOWN`; any other failure is reported as a failed check.
    async fn read_status(&self, appointment_id: &str) -> StatusReading;

    async fn start(&self, appointment_id: &str, consultant_id: &str) -> Result<(), AppError>;

    async fn end(&self, appointment_id: &str, consultant_id: &str, note: &str) -> Result<(), AppError>;
}

pub struct HttpAppointmentService {
    client: AuthenticatedClient,
}

impl HttpAppointmentService {
    pub fn new(client: AuthenticatedClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: &AppConfig, session: SessionContext) -> Self {
        Self::new(AuthenticatedClient::from_config(config, session))
    }

    fn appointment_path(appointment_id: &str) -> String {
        format!("/appointments/{}", urlencoding::encode(appointment_id))
    }

    pub async fn get_appointment(&self, appointment_id: &str) -> Result<Appointment, AppError> {
        debug!("Fetching appointment {}", appointment_id);
        self.client
            .request(Method::GET, &Self::appointment_path(appointment_id), None)
            .await
    }
}

#[async_trait]
impl AppointmentService for HttpAppointmentService {
    async fn read_status(&self, appointment_id: &str) -> StatusReading {
        match self.get_appointment(appointment_id).await {
            Ok(appointment) => {
                debug!("Appointment {} is {}", appointment_id, appointment.status);
                StatusReading::Observed(appointment.status)
            }
            Err(e) if e.is_auth() => {
                warn!("Not authorized to read appointment {} after refresh: {}", appointment_id, e);
                StatusReading::Observed(AppointmentStatus::Unknown)
            }
            Err(e) => {
                warn!("Failed to read appointment {} status: {}", appointment_id, e);
                StatusReading::CheckFailed(e.user_message("Could not check the appointment status"))
            }
        }
    }

    async fn start(&self, appointment_id: &str, consultant_id: &str) -> Result<(), AppError> {
        let body = serde_json::to_value(StartAppointmentRequest { consultant_id })?;
        let path = format!("{}/start", Self::appointment_path(appointment_id));

        let _: Value = self.client.request(Method::PUT, &path, Some(&body)).await?;

        info!("Appointment {} started by consultant {}", appointment_id, consultant_id);
        Ok(())
    }

    async fn end(&self, appointment_id: &str, consultant_id: &str, note: &str) -> Result<(), AppError> {
        let body = serde_json::to_value(EndAppointmentRequest { consultant_id, note })?;
        let path = format!("{}/end", Self::appointment_path(appointment_id));

        let _: Value = self.client.request(Method::PUT, &path, Some(&body)).await?;

        info!("Appointment {} ended by consultant {}", appointment_id, consultant_id);
        Ok(())
    }
}
