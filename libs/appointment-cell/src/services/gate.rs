use tracing::debug;

use crate::models::AppointmentStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleIntent {
    Start,
    End,
}

/// Outcome of reading an appointment's status before acting on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusReading {
    Observed(AppointmentStatus),
    /// The read failed for a reason other than authorization.
    CheckFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateAction {
    /// Ask the consultant, request the start transition, then join.
    ConfirmThenStart { check_error: Option<String> },
    JoinDirectly,
    /// Ask the consultant for a closing note, request the end transition,
    /// then leave.
    ConfirmThenEnd { check_error: Option<String> },
    LeaveDirectly,
}

impl GateAction {
    pub fn requires_confirmation(&self) -> bool {
        matches!(self, GateAction::ConfirmThenStart { .. } | GateAction::ConfirmThenEnd { .. })
    }
}

/// Decides whether a start/end intent mutates the appointment.
///
/// Start is only requested from `CONFIRMED`, end only from `ON_GOING`. A
/// failed status check still asks for confirmation so nothing changes
/// without a human saying so.
pub struct AppointmentGate;

impl AppointmentGate {
    pub fn decide(intent: LifecycleIntent, reading: &StatusReading) -> GateAction {
        use AppointmentStatus::*;

        let action = match (intent, reading) {
            (LifecycleIntent::Start, StatusReading::Observed(Confirmed)) => {
                GateAction::ConfirmThenStart { check_error: None }
            }
            (LifecycleIntent::Start, StatusReading::Observed(OnGoing | Completed | Unknown)) => {
                GateAction::JoinDirectly
            }
            (LifecycleIntent::Start, StatusReading::CheckFailed(err)) => {
                GateAction::ConfirmThenStart { check_error: Some(err.clone()) }
            }
            (LifecycleIntent::End, StatusReading::Observed(OnGoing)) => {
                GateAction::ConfirmThenEnd { check_error: None }
            }
            (LifecycleIntent::End, StatusReading::Observed(Confirmed | Completed | Unknown)) => {
                GateAction::LeaveDirectly
            }
            (LifecycleIntent::End, StatusReading::CheckFailed(err)) => {
                GateAction::ConfirmThenEnd { check_error: Some(err.clone()) }
            }
        };

        debug!("Gate {:?} with {:?} -> {:?}", intent, reading, action);
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_confirms_only_when_confirmed() {
        for status in AppointmentStatus::ALL {
            let action = AppointmentGate::decide(LifecycleIntent::Start, &StatusReading::Observed(status));
            if status == AppointmentStatus::Confirmed {
                assert_eq!(action, GateAction::ConfirmThenStart { check_error: None });
            } else {
                assert_eq!(action, GateAction::JoinDirectly, "status {}", status);
            }
        }
    }

    #[test]
    fn test_end_confirms_only_when_on_going() {
        for status in AppointmentStatus::ALL {
            let action = AppointmentGate::decide(LifecycleIntent::End, &StatusReading::Observed(status));
            if status == AppointmentStatus::OnGoing {
                assert_eq!(action, GateAction::ConfirmThenEnd { check_error: None });
            } else {
                assert_eq!(action, GateAction::LeaveDirectly, "status {}", status);
            }
        }
    }

    #[test]
    fn test_failed_check_requires_confirmation() {
        let reading = StatusReading::CheckFailed("timed out".to_string());

        let start = AppointmentGate::decide(LifecycleIntent::Start, &reading);
        assert_eq!(start, GateAction::ConfirmThenStart { check_error: Some("timed out".to_string()) });
        assert!(start.requires_confirmation());

        let end = AppointmentGate::decide(LifecycleIntent::End, &reading);
        assert_eq!(end, GateAction::ConfirmThenEnd { check_error: Some("timed out".to_string()) });
    }
}
