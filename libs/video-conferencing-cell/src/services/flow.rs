use std::mem;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use appointment_cell::{
    AppointmentGate, AppointmentService, GateAction, HttpAppointmentService, LifecycleIntent,
};
use shared_config::AppConfig;
use shared_models::ui::{BusyGuard, BusyIndicator};
use shared_storage::SessionContext;

use crate::models::{
    EndOutcome, EndPrompt, JoinToken, MeetingJoinConfig, MeetingNotice, MeetingRoute,
    MeetingSettings, StartOutcome, VideoConferencingError,
};
use crate::services::identity::resolve_participant_id;
use crate::services::media::{LocalMediaStream, MediaDevices};
use crate::services::meeting::{MeetingSdk, MeetingSession};
use crate::services::video_api::{HttpVideoSessionApi, VideoSessionApi};

const START_FAILED: &str = "Failed to start the appointment. Please try again.";
const END_FAILED: &str = "Failed to end the appointment. Please try again.";

/// Prompts and notices the meeting screen shows.
#[async_trait]
pub trait MeetingUi: Send + Sync {
    /// `check_error` is set when the appointment status could not be read.
    async fn confirm_start(&self, check_error: Option<&str>) -> bool;

    async fn confirm_end(&self, check_error: Option<&str>) -> EndPrompt;

    fn notify(&self, notice: MeetingNotice);
}

#[derive(Clone)]
pub struct MeetingServices {
    pub appointments: Arc<dyn AppointmentService>,
    pub video: Arc<dyn VideoSessionApi>,
    pub sdk: Arc<dyn MeetingSdk>,
    pub media: Arc<dyn MediaDevices>,
}

impl MeetingServices {
    pub fn from_config(
        config: &AppConfig,
        session: &SessionContext,
        sdk: Arc<dyn MeetingSdk>,
        media: Arc<dyn MediaDevices>,
    ) -> Result<Self, VideoConferencingError> {
        Ok(Self {
            appointments: Arc::new(HttpAppointmentService::from_config(config, session.clone())),
            video: Arc::new(HttpVideoSessionApi::new(config)?),
            sdk,
            media,
        })
    }
}

enum MeetingPhase {
    Setup,
    Ready {
        meeting_id: String,
        token: JoinToken,
        preview: Option<LocalMediaStream>,
    },
    InMeeting(MeetingSession),
    Ended,
}

impl MeetingPhase {
    fn name(&self) -> &'static str {
        match self {
            MeetingPhase::Setup => "setup",
            MeetingPhase::Ready { .. } => "ready",
            MeetingPhase::InMeeting(_) => "in_meeting",
            MeetingPhase::Ended => "ended",
        }
    }
}

/// Drives one consultation meeting from route resolution to leave.
///
/// Dropping the flow while in a meeting leaves it and stops local media.
pub struct ConsultationMeetingFlow {
    route: MeetingRoute,
    session: SessionContext,
    services: MeetingServices,
    ui: Arc<dyn MeetingUi>,
    busy: Arc<dyn BusyIndicator>,
    settings: MeetingSettings,
    phase: MeetingPhase,
}

impl ConsultationMeetingFlow {
    pub fn new(
        route: MeetingRoute,
        session: SessionContext,
        services: MeetingServices,
        ui: Arc<dyn MeetingUi>,
        busy: Arc<dyn BusyIndicator>,
    ) -> Self {
        let mut settings = MeetingSettings::default();
        if let Ok(Some(profile)) = session.user_profile() {
            if let Some(name) = profile.display_name() {
                settings.display_name = name.to_string();
            }
        }

        Self {
            route,
            session,
            services,
            ui,
            busy,
            settings,
            phase: MeetingPhase::Setup,
        }
    }

    pub fn route(&self) -> &MeetingRoute {
        &self.route
    }

    pub fn settings(&self) -> &MeetingSettings {
        &self.settings
    }

    pub fn set_display_name(&mut self, name: impl Into<String>) {
        self.settings.display_name = name.into();
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.phase, MeetingPhase::Ready { .. })
    }

    pub fn is_in_meeting(&self) -> bool {
        matches!(self.phase, MeetingPhase::InMeeting(_))
    }

    pub fn has_ended(&self) -> bool {
        matches!(self.phase, MeetingPhase::Ended)
    }

    fn busy(&self) -> BusyGuard {
        BusyGuard::new(self.busy.clone())
    }

    fn invalid_state(&self) -> VideoConferencingError {
        VideoConferencingError::InvalidMeetingState {
            phase: self.phase.name().to_string(),
        }
    }

    /// Fetches a join token, validates the room, fixes the participant id
    /// and opens the local preview.
    pub async fn prepare(&mut self) -> Result<(), VideoConferencingError> {
        if !matches!(self.phase, MeetingPhase::Setup) {
            return Err(self.invalid_state());
        }

        let token = {
            let _busy = self.busy();
            self.services.video.get_token().await
        };
        let token = token.map_err(|e| {
            self.ui.notify(MeetingNotice::TokenUnavailable(
                e.user_message("Could not prepare the meeting. Please try again."),
            ));
            e
        })?;

        let meeting_id = {
            let _busy = self.busy();
            self.services.video.validate_meeting(&self.route.room_id, &token).await
        };
        let meeting_id = meeting_id.map_err(|e| {
            self.ui.notify(MeetingNotice::MeetingInvalid(e.user_message("This meeting is not available.")));
            e
        })?;

        let participant_id = resolve_participant_id(&self.session, &meeting_id)?;
        debug!("Participant id for meeting {}: {}", meeting_id, participant_id);
        self.settings.participant_id = Some(participant_id);

        let preview = self.acquire_preview().await;
        self.phase = MeetingPhase::Ready { meeting_id, token, preview };
        info!("Meeting {} ready to join", self.route.room_id);
        Ok(())
    }

    async fn acquire_preview(&self) -> Option<LocalMediaStream> {
        if !self.settings.mic_enabled && !self.settings.webcam_enabled {
            return None;
        }

        match self
            .services
            .media
            .acquire(self.settings.mic_enabled, self.settings.webcam_enabled)
            .await
        {
            Ok(stream) => Some(stream),
            Err(e) => {
                warn!("Could not open local media: {}", e);
                self.ui.notify(MeetingNotice::MediaUnavailable(
                    e.user_message("Camera or microphone unavailable."),
                ));
                None
            }
        }
    }

    /// Appointment and consultant ids when the lifecycle gate applies:
    /// the route names an appointment and the signed-in user is a consultant.
    fn gate_target(&self) -> Option<(String, String)> {
        let appointment_id = self.route.appointment_id.clone()?;
        let profile = match self.session.user_profile() {
            Ok(Some(profile)) if profile.is_consultant() => profile,
            _ => return None,
        };
        Some((appointment_id, profile.id))
    }

    async fn gate(&self, intent: LifecycleIntent) -> GateAction {
        let Some((appointment_id, _)) = self.gate_target() else {
            return match intent {
                LifecycleIntent::Start => GateAction::JoinDirectly,
                LifecycleIntent::End => GateAction::LeaveDirectly,
            };
        };

        let reading = {
            let _busy = self.busy();
            self.services.appointments.read_status(&appointment_id).await
        };
        AppointmentGate::decide(intent, &reading)
    }

    /// Start intent: confirms and starts the appointment when it is
    /// `CONFIRMED`, then joins.
    pub async fn start(&mut self) -> Result<StartOutcome, VideoConferencingError> {
        if !self.is_ready() {
            return Err(self.invalid_state());
        }

        let appointment_started = match self.gate(LifecycleIntent::Start).await {
            GateAction::ConfirmThenStart { check_error } => {
                if !self.ui.confirm_start(check_error.as_deref()).await {
                    debug!("Start of appointment declined");
                    return Ok(StartOutcome::Declined);
                }

                if let Some((appointment_id, consultant_id)) = self.gate_target() {
                    let result = {
                        let _busy = self.busy();
                        self.services.appointments.start(&appointment_id, &consultant_id).await
                    };
                    if let Err(e) = result {
                        warn!("Failed to start appointment {}: {}", appointment_id, e);
                        self.ui.notify(MeetingNotice::LifecycleUpdateFailed(e.user_message(START_FAILED)));
                        return Ok(StartOutcome::LifecycleUpdateFailed);
                    }
                }
                true
            }
            _ => false,
        };

        if self.join() {
            Ok(StartOutcome::Joined { appointment_started })
        } else {
            Ok(StartOutcome::JoinFailed)
        }
    }

    fn join(&mut self) -> bool {
        let (meeting_id, token, preview) = match mem::replace(&mut self.phase, MeetingPhase::Setup) {
            MeetingPhase::Ready { meeting_id, token, preview } => (meeting_id, token, preview),
            other => {
                self.phase = other;
                return false;
            }
        };

        let config = MeetingJoinConfig {
            meeting_id: meeting_id.clone(),
            token: token.clone(),
            participant_id: self.settings.participant_id.clone().unwrap_or_default(),
            display_name: self.settings.display_name.clone(),
            mic_enabled: self.settings.mic_enabled,
            webcam_enabled: self.settings.webcam_enabled,
        };

        let joined = self
            .services
            .sdk
            .create_meeting(&config)
            .and_then(|handle| MeetingSession::join(meeting_id.clone(), handle, preview));

        match joined {
            Ok(session) => {
                self.phase = MeetingPhase::InMeeting(session);
                true
            }
            Err(e) => {
                warn!("Failed to join meeting {}: {}", meeting_id, e);
                self.ui.notify(MeetingNotice::JoinFailed(e.user_message("Could not join the meeting.")));
                self.phase = MeetingPhase::Ready { meeting_id, token, preview: None };
                false
            }
        }
    }

    /// End intent: confirms and ends the appointment when it is `ON_GOING`,
    /// then leaves.
    pub async fn end(&mut self) -> Result<EndOutcome, VideoConferencingError> {
        if !self.is_in_meeting() {
            return Err(self.invalid_state());
        }

        let appointment_ended = match self.gate(LifecycleIntent::End).await {
            GateAction::ConfirmThenEnd { check_error } => {
                let note = match self.ui.confirm_end(check_error.as_deref()).await {
                    EndPrompt::Confirmed { note } => note,
                    EndPrompt::Cancelled => {
                        debug!("End of appointment cancelled");
                        return Ok(EndOutcome::Cancelled);
                    }
                };

                if let Some((appointment_id, consultant_id)) = self.gate_target() {
                    let result = {
                        let _busy = self.busy();
                        self.services.appointments.end(&appointment_id, &consultant_id, &note).await
                    };
                    if let Err(e) = result {
                        warn!("Failed to end appointment {}: {}", appointment_id, e);
                        self.ui.notify(MeetingNotice::LifecycleUpdateFailed(e.user_message(END_FAILED)));
                        return Ok(EndOutcome::LifecycleUpdateFailed);
                    }
                }
                true
            }
            _ => false,
        };

        self.leave();
        Ok(EndOutcome::Left { appointment_ended })
    }

    /// Leaves without touching the appointment. Returns `false` if there
    /// was nothing to leave.
    pub fn leave(&mut self) -> bool {
        match mem::replace(&mut self.phase, MeetingPhase::Ended) {
            MeetingPhase::InMeeting(session) => session.leave(),
            MeetingPhase::Ready { preview, .. } => {
                drop(preview);
                true
            }
            MeetingPhase::Setup | MeetingPhase::Ended => false,
        }
    }

    pub async fn toggle_mic(&mut self) -> bool {
        self.settings.mic_enabled = !self.settings.mic_enabled;
        self.apply_media_settings().await;
        self.settings.mic_enabled
    }

    pub async fn toggle_webcam(&mut self) -> bool {
        self.settings.webcam_enabled = !self.settings.webcam_enabled;
        self.apply_media_settings().await;
        self.settings.webcam_enabled
    }

    async fn apply_media_settings(&mut self) {
        if let MeetingPhase::InMeeting(session) = &self.phase {
            session.set_mic(self.settings.mic_enabled);
            session.set_webcam(self.settings.webcam_enabled);
            return;
        }

        // Preview tracks follow the toggles: release, then reopen.
        if let MeetingPhase::Ready { preview, .. } = &mut self.phase {
            *preview = None;
        } else {
            return;
        }

        let reopened = self.acquire_preview().await;
        if let MeetingPhase::Ready { preview, .. } = &mut self.phase {
            *preview = reopened;
        }
    }
}
