use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{TimeZone, Utc};
use tracing::debug;
use shared_models::auth::{JwtClaims, UserProfile};

/// Reads the claims of an access token without checking its signature.
///
/// The client never holds the signing secret; the backend remains the
/// authority on whether a token is valid. This is only used to learn who
/// the signed-in user is.
pub fn decode_claims(token: &str) -> Result<JwtClaims, String> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err("Invalid token format".to_string());
    }

    let claims_json = match URL_SAFE_NO_PAD.decode(parts[1].trim_end_matches('=')) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(json_str) => json_str,
            Err(_) => return Err("Invalid claims encoding".to_string()),
        },
        Err(_) => return Err("Invalid claims encoding".to_string()),
    };

    serde_json::from_str(&claims_json).map_err(|e| {
        debug!("Failed to parse claims: {}", e);
        "Invalid claims format".to_string()
    })
}

pub fn profile_from_token(token: &str) -> Result<UserProfile, String> {
    let claims = decode_claims(token)?;

    let name = claims.name.clone().or_else(|| {
        claims
            .user_metadata
            .as_ref()
            .and_then(|meta| meta.get("full_name"))
            .and_then(|value| value.as_str())
            .map(str::to_string)
    });

    let created_at = claims
        .iat
        .and_then(|timestamp| Utc.timestamp_opt(timestamp as i64, 0).single());

    let profile = UserProfile {
        id: claims.sub,
        email: claims.email,
        name,
        role: claims.role,
        created_at,
    };

    debug!("Decoded profile for user: {}", profile.id);
    Ok(profile)
}
