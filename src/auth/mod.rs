//! Authentication module
//!
//! WebinarJam and EverWebinar share a single credential type: an API key
//! injected into each request body as `api_key`.

mod credential;

pub use credential::{ApiKeyCredential, API_KEY_ENV, API_KEY_FIELD};
