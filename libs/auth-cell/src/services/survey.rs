use reqwest::Method;
use serde_json::Value;
use tracing::{debug, info, warn};

use shared_models::error::AppError;

use crate::models::SurveyFlush;
use crate::services::authenticated::AuthenticatedClient;

const SURVEY_SUBMISSIONS_PATH: &str = "/surveys/submissions";

/// Submits a survey that was filled in before the user signed in.
pub struct SurveySubmitter {
    client: AuthenticatedClient,
}

impl SurveySubmitter {
    pub fn new(client: AuthenticatedClient) -> Self {
        Self { client }
    }

    pub async fn flush(&self) -> Result<SurveyFlush, AppError> {
        let session = self.client.session();

        let Some(payload) = session.queued_survey_payload()? else {
            debug!("No queued survey submission");
            return Ok(SurveyFlush::Nothing);
        };

        if session.survey_result()?.is_some() {
            debug!("Queued survey already has a result, skipping submission");
            return Ok(SurveyFlush::AlreadySubmitted);
        }

        let result: Value = self
            .client
            .request(Method::POST, SURVEY_SUBMISSIONS_PATH, Some(&payload))
            .await?;

        session.store_survey_result(&result)?;
        session.clear_survey_payload()?;
        info!("Queued survey submission sent");
        Ok(SurveyFlush::Submitted)
    }

    /// Like [`flush`](Self::flush) but never fails; errors are logged.
    pub async fn flush_quietly(&self) -> SurveyFlush {
        match self.flush().await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Failed to submit queued survey: {}", e);
                SurveyFlush::Failed
            }
        }
    }
}
