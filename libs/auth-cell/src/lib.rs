//! # Auth Cell
//!
//! Client side of authentication: talking to the auth service, keeping the
//! access token fresh for every other call, and the login screen's flow.
//!
//! ```text
//! +-----------------------------------------------------+
//! |                    Auth Cell                        |
//! +-----------------------------------------------------+
//! |  models.rs          |  Credentials, login outcomes  |
//! |  services/                                          |
//! |    auth_api.rs      |  login / google / refresh     |
//! |    authenticated.rs |  bearer + refresh-and-retry   |
//! |    survey.rs        |  queued survey flush          |
//! |    login.rs         |  Session Entry Flow           |
//! +-----------------------------------------------------+
//! ```

pub mod models;
pub mod services;

pub use models::{Credentials, LoginError, LoginSuccess, SurveyFlush};
pub use services::{
    AuthApi, AuthenticatedClient, HttpAuthApi, SessionEntryFlow, SurveySubmitter, TokenRefresher,
};
