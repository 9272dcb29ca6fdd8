pub mod auth_api;
pub mod authenticated;
pub mod login;
pub mod survey;

pub use auth_api::{AuthApi, HttpAuthApi, TokenRefresher};
pub use authenticated::AuthenticatedClient;
pub use login::SessionEntryFlow;
pub use survey::SurveySubmitter;
