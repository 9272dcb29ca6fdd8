use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Lifecycle status as reported by the backend. Anything this client does
/// not recognise, including a missing field, reads as `Unknown`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Confirmed,
    OnGoing,
    Completed,
    #[default]
    #[serde(other)]
    Unknown,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 4] = [
        AppointmentStatus::Confirmed,
        AppointmentStatus::OnGoing,
        AppointmentStatus::Completed,
        AppointmentStatus::Unknown,
    ];
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Confirmed => write!(f, "CONFIRMED"),
            AppointmentStatus::OnGoing => write!(f, "ON_GOING"),
            AppointmentStatus::Completed => write!(f, "COMPLETED"),
            AppointmentStatus::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "status_or_unknown")]
    pub status: AppointmentStatus,
    #[serde(default)]
    pub consultant_id: Option<String>,
}

fn status_or_unknown<'de, D>(deserializer: D) -> Result<AppointmentStatus, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<AppointmentStatus>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartAppointmentRequest<'a> {
    pub consultant_id: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndAppointmentRequest<'a> {
    pub consultant_id: &'a str,
    pub note: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        for (raw, status) in [
            ("\"CONFIRMED\"", AppointmentStatus::Confirmed),
            ("\"ON_GOING\"", AppointmentStatus::OnGoing),
            ("\"COMPLETED\"", AppointmentStatus::Completed),
        ] {
            assert_eq!(serde_json::from_str::<AppointmentStatus>(raw).unwrap(), status);
            assert_eq!(serde_json::to_string(&status).unwrap(), raw);
        }
    }

    #[test]
    fn test_unrecognised_status_reads_as_unknown() {
        assert_eq!(
            serde_json::from_str::<AppointmentStatus>("\"CANCELLED\"").unwrap(),
            AppointmentStatus::Unknown
        );

        let appointment: Appointment = serde_json::from_str(r#"{"id":"A1"}"#).unwrap();
        assert_eq!(appointment.status, AppointmentStatus::Unknown);

        let appointment: Appointment = serde_json::from_str(r#"{"id":"A1","status":null}"#).unwrap();
        assert_eq!(appointment.status, AppointmentStatus::Unknown);
    }

    #[test]
    fn test_end_request_body() {
        let body = serde_json::to_value(EndAppointmentRequest { consultant_id: "C1", note: "Follow up in 2 weeks" }).unwrap();
        assert_eq!(body, serde_json::json!({"consultantId": "C1", "note": "Follow up in 2 weeks"}));
    }
}
