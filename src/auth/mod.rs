//! Authentication module
//!
//! Okta API tokens are sent as `Authorization: SSWS <api_key>`.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::{AuthConfig, AUTHORIZATION_HEADER, SSWS_SCHEME};
