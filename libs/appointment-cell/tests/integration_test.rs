use assert_matches::assert_matches;
use serde_json::json;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{method, path, header, body_json};

use appointment_cell::{
    AppointmentService, AppointmentStatus, HttpAppointmentService, StatusReading,
};
use shared_models::error::AppError;
use shared_utils::test_utils::{MockApiResponses, TestConfig, TestUser};

fn service_for(mock_server: &MockServer, access_token: &str) -> HttpAppointmentService {
    let config = TestConfig::with_mock(&mock_server.uri()).to_app_config();
    let session = TestUser::consultant("doc@example.com").signed_in_session(access_token, "refresh-1");
    HttpAppointmentService::from_config(&config, session)
}

#[tokio::test]
async fn test_read_status_observed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/appointments/A1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockApiResponses::appointment_response("A1", "CONFIRMED")))
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server, "fresh");
    assert_eq!(service.read_status("A1").await, StatusReading::Observed(AppointmentStatus::Confirmed));
}

#[tokio::test]
async fn test_read_status_recovers_after_one_refresh() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/appointments/A1"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockApiResponses::refreshed_token_response("fresh")))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/appointments/A1"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockApiResponses::appointment_response("A1", "ON_GOING")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server, "stale");
    assert_eq!(service.read_status("A1").await, StatusReading::Observed(AppointmentStatus::OnGoing));
}

#[tokio::test]
async fn test_read_status_unknown_after_two_authorization_failures() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/appointments/A1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockApiResponses::refreshed_token_response("also-rejected")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server, "stale");
    assert_eq!(service.read_status("A1").await, StatusReading::Observed(AppointmentStatus::Unknown));
}

#[tokio::test]
async fn test_read_status_server_error_is_failed_check() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/appointments/A1"))
        .respond_with(ResponseTemplate::new(503).set_body_json(MockApiResponses::error_response("Maintenance")))
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server, "fresh");
    assert_eq!(service.read_status("A1").await, StatusReading::CheckFailed("Maintenance".to_string()));
}

#[tokio::test]
async fn test_read_status_forbidden_is_failed_check_without_refresh() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/appointments/A1"))
        .respond_with(ResponseTemplate::new(403).set_body_json(MockApiResponses::error_response("Not your appointment")))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockApiResponses::refreshed_token_response("rotated")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server, "fresh");
    assert_eq!(
        service.read_status("A1").await,
        StatusReading::CheckFailed("Not your appointment".to_string())
    );
}

#[tokio::test]
async fn test_start_sends_consultant_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/appointments/A1/start"))
        .and(header("authorization", "Bearer fresh"))
        .and(body_json(json!({"consultantId": "C1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server, "fresh");
    assert!(service.start("A1", "C1").await.is_ok());
}

#[tokio::test]
async fn test_end_sends_note() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/appointments/A1/end"))
        .and(body_json(json!({"consultantId": "C1", "note": "Prescribed rest"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server, "fresh");
    assert!(service.end("A1", "C1", "Prescribed rest").await.is_ok());
}

#[tokio::test]
async fn test_start_failure_carries_backend_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/appointments/A1/start"))
        .respond_with(ResponseTemplate::new(409).set_body_json(MockApiResponses::error_response("Appointment already started")))
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server, "fresh");
    let err = service.start("A1", "C1").await.unwrap_err();

    assert_matches!(&err, AppError::ExternalService { status: 409, .. });
    assert_eq!(err.user_message("Failed to start appointment"), "Appointment already started");
}
