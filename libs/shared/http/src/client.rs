use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION},
    Method, StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;
use shared_models::error::AppError;

/// JSON client for the clinic backend.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_base_url(&config.api_base_url)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn get_headers(&self, auth_token: Option<&str>) -> Result<HeaderMap, AppError> {
        let mut headers = HeaderMap::new();

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = auth_token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| AppError::Auth("Access token is not a valid header value".to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }

    pub async fn request<T>(&self, method: Method, path: &str,
                            auth_token: Option<&str>, body: Option<&Value>)
                            -> Result<T, AppError>
    where T: DeserializeOwned {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        debug!("Making {} request to {}", method, url);

        let headers = self.get_headers(auth_token)?;

        let mut req = self.client.request(method, &url)
            .headers(headers);

        if let Some(body_data) = body {
            req = req.json(body_data);
        }

        let response = req.send().await.map_err(map_transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(map_transport_error)?;

        if !status.is_success() {
            error!("API error ({}): {}", status, text);
            return Err(error_from_response(status, &text));
        }

        parse_body(&text)
    }
}

/// Empty bodies decode as JSON `null` so acknowledgement endpoints can be
/// read as `Value` or `()`.
pub fn parse_body<T: DeserializeOwned>(text: &str) -> Result<T, AppError> {
    let text = if text.trim().is_empty() { "null" } else { text };
    serde_json::from_str(text).map_err(|e| AppError::ExternalService {
        status: 200,
        message: Some(format!("Unexpected response body: {}", e)),
    })
}

pub fn map_transport_error(err: reqwest::Error) -> AppError {
    if err.is_connect() || err.is_timeout() || err.is_request() {
        AppError::Network(err.to_string())
    } else {
        AppError::Internal(err.to_string())
    }
}

/// Pulls the human-readable message out of an error body: the `message` or
/// `error` field of a JSON object, otherwise the trimmed text.
pub fn backend_message(text: &str) -> Option<String> {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        for field in ["message", "error"] {
            match value.get(field) {
                Some(Value::String(msg)) if !msg.is_empty() => return Some(msg.clone()),
                Some(Value::Object(inner)) => {
                    if let Some(Value::String(msg)) = inner.get("message") {
                        return Some(msg.clone());
                    }
                }
                _ => {}
            }
        }
        return None;
    }

    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub fn error_from_response(status: StatusCode, text: &str) -> AppError {
    let message = backend_message(text);
    match status.as_u16() {
        401 => AppError::Auth(message.unwrap_or_default()),
        403 => AppError::Forbidden(message.unwrap_or_default()),
        404 => AppError::NotFound(message.unwrap_or_default()),
        400 | 422 => AppError::BadRequest(message.unwrap_or_default()),
        code => AppError::ExternalService { status: code, message },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_message_extraction() {
        assert_eq!(backend_message(r#"{"message":"Invalid note"}"#).as_deref(), Some("Invalid note"));
        assert_eq!(backend_message(r#"{"error":"Room not found"}"#).as_deref(), Some("Room not found"));
        assert_eq!(backend_message(r#"{"error":{"message":"nested"}}"#).as_deref(), Some("nested"));
        assert_eq!(backend_message("Bad Gateway\n").as_deref(), Some("Bad Gateway"));
        assert_eq!(backend_message(r#"{"code":7}"#), None);
        assert_eq!(backend_message(""), None);
    }

    #[test]
    fn test_error_from_response_classification() {
        assert!(error_from_response(StatusCode::UNAUTHORIZED, "").is_auth());
        assert_eq!(
            error_from_response(StatusCode::FORBIDDEN, r#"{"message":"Consultants only"}"#),
            AppError::Forbidden("Consultants only".to_string())
        );
        assert_eq!(
            error_from_response(StatusCode::NOT_FOUND, r#"{"message":"no appointment"}"#),
            AppError::NotFound("no appointment".to_string())
        );
        assert_eq!(
            error_from_response(StatusCode::SERVICE_UNAVAILABLE, ""),
            AppError::ExternalService { status: 503, message: None }
        );
    }

    #[test]
    fn test_parse_empty_body_as_null() {
        let value: Value = parse_body("").unwrap();
        assert_eq!(value, Value::Null);
        let unit: () = parse_body("  ").unwrap();
        assert_eq!(unit, ());
    }
}
