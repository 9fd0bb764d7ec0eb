//! Typed wrappers for every endpoint of the service.
//!
//! [`SocialApi`] carries the viewer's bearer token next to the transport; it is
//! what list sources, cards and the composer hold. Unauthenticated calls
//! (login, register) live on [`crate::SocialHttpClient`] directly.

pub mod auth;
pub mod follows;
pub mod publications;
pub mod users;

use reqwest::{Method, RequestBuilder};

use crate::{SocialHttpClient, errors::Result};

pub use auth::{Credentials, Registration};
pub use users::ProfileUpdate;

/// Authenticated handle on the API, scoped to one viewer.
///
/// Obtained from [`crate::SessionContext::api`]. A handle taken while
/// anonymous has no token; its calls fail with
/// [`crate::errors::AuthError::NotAuthenticated`] before any request.
///
/// Cheap to clone.
#[derive(Clone)]
pub struct SocialApi {
    pub(crate) client: SocialHttpClient,
    pub(crate) token: Option<String>,
}

impl SocialApi {
    /// Pair a transport with a bearer token.
    pub fn new(client: SocialHttpClient, token: Option<String>) -> Self {
        Self { client, token }
    }

    /// Whether calls will carry a token.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The token calls carry, used to tell which session a rejection was for.
    pub(crate) fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// The underlying transport.
    pub fn client(&self) -> &SocialHttpClient {
        &self.client
    }

    pub(crate) fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        self.client
            .authed_request(method, segments, self.token.as_deref())
    }
}

impl std::fmt::Debug for SocialApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SocialApi")
            .field("base_url", &self.client.base_url().as_str())
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
