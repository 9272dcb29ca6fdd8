use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use sha2::{Digest, Sha256};
use tracing::debug;

use shared_models::error::AppError;
use shared_storage::SessionContext;

/// Same profile and meeting always give the same id, so a consultant who
/// reloads rejoins as the same participant.
pub fn derive_participant_id(profile_id: &str, meeting_id: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(profile_id.as_bytes());
    hasher.update(b":");
    hasher.update(meeting_id.as_bytes());
    URL_SAFE_NO_PAD.encode(hasher.finalize())
}

/// Derived id for signed-in users; a tab-scoped random id otherwise.
pub fn resolve_participant_id(session: &SessionContext, meeting_id: &str) -> Result<String, AppError> {
    match session.user_profile()? {
        Some(profile) => {
            debug!("Deriving participant id for user {}", profile.id);
            Ok(derive_participant_id(&profile.id, meeting_id))
        }
        None => session.temporary_participant_id(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_models::auth::UserProfile;

    fn signed_in(id: &str) -> SessionContext {
        let session = SessionContext::in_memory();
        session
            .store_user_profile(&UserProfile {
                id: id.to_string(),
                email: None,
                name: None,
                role: None,
                created_at: None,
            })
            .unwrap();
        session
    }

    #[test]
    fn test_signed_in_id_is_stable() {
        let first = resolve_participant_id(&signed_in("U1"), "M1").unwrap();
        let second = resolve_participant_id(&signed_in("U1"), "M1").unwrap();
        assert_eq!(first, second);
        assert_eq!(first, derive_participant_id("U1", "M1"));
    }

    #[test]
    fn test_signed_in_id_depends_on_meeting_and_user() {
        assert_ne!(derive_participant_id("U1", "M1"), derive_participant_id("U1", "M2"));
        assert_ne!(derive_participant_id("U1", "M1"), derive_participant_id("U2", "M1"));
        // The separator keeps ("U1", "1M") and ("U11", "M") apart.
        assert_ne!(derive_participant_id("U1", "1M"), derive_participant_id("U11", "M"));
    }

    #[test]
    fn test_anonymous_id_is_tab_scoped() {
        let session = SessionContext::in_memory();
        let first = resolve_participant_id(&session, "M1").unwrap();
        let second = resolve_participant_id(&session, "M1").unwrap();
        assert_eq!(first, second);

        let new_tab = session.new_tab();
        assert_ne!(resolve_participant_id(&new_tab, "M1").unwrap(), first);
    }
}
