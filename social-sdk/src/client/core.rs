use std::fmt::Debug;
use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use url::Url;

use crate::errors::{AuthError, BuildError, Result};

const DEFAULT_USER_AGENT: &str = concat!("social-client", "@", env!("CARGO_PKG_VERSION"),);

/// Base URL used when none is configured: a service running locally.
pub const DEFAULT_API_URL: &str = "http://localhost:3900/api/";

#[derive(Debug, Clone)]
#[must_use]
/// Configures a [`SocialHttpClient`] before construction.
///
/// # Defaults
/// - API base URL: [`DEFAULT_API_URL`]
/// - HTTP request timeout: reqwest default (no global timeout) unless set via
///   [`Self::request_timeout`]
/// - User-agent: `social-client@<crate-version>` plus any [`Self::user_agent_extra`]
///
/// # Example
/// ```no_run
/// use std::time::Duration;
/// # use social::SocialHttpClient;
/// let client = SocialHttpClient::builder()
///     .base_url("https://social.example.net/api/")
///     .request_timeout(Duration::from_secs(10))
///     .user_agent_extra("myapp/1.2.3")
///     .build()?;
/// # Ok::<_, social::BuildError>(())
/// ```
pub struct SocialHttpClientBuilder {
    base_url: String,
    http_request_timeout: Option<Duration>,

    /// Optional user-agent segment appended to the default UA for app-level telemetry.
    user_agent_extra: Option<String>,
}

impl Default for SocialHttpClientBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            http_request_timeout: None,
            user_agent_extra: None,
        }
    }
}

impl SocialHttpClientBuilder {
    /// Set the API root every endpoint path is appended to.
    pub fn base_url<S: Into<String>>(&mut self, base_url: S) -> &mut Self {
        self.base_url = base_url.into();
        self
    }

    /// Set HTTP requests timeout.
    pub fn request_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.http_request_timeout = Some(timeout);
        self
    }

    /// Append an extra user-agent segment after the default `social-client@<version>`.
    pub fn user_agent_extra<S: Into<String>>(&mut self, extra: S) -> &mut Self {
        self.user_agent_extra = Some(extra.into());
        self
    }

    /// Build [SocialHttpClient]
    pub fn build(&self) -> std::result::Result<SocialHttpClient, BuildError> {
        let base_url = Url::parse(self.base_url.trim())?;
        if base_url.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase.into());
        }

        // Compose user agent with optional extra part.
        let user_agent = match &self.user_agent_extra {
            Some(extra) if !extra.trim().is_empty() => {
                &format!("{DEFAULT_USER_AGENT} {}", extra.trim())
            }
            _ => DEFAULT_USER_AGENT,
        };

        #[cfg_attr(target_arch = "wasm32", allow(unused_mut, reason = "no timeout on wasm"))]
        let mut http_builder = reqwest::Client::builder().user_agent(user_agent);

        // reqwest has no request timeout on wasm.
        #[cfg(not(target_arch = "wasm32"))]
        if let Some(timeout) = self.http_request_timeout {
            http_builder = http_builder.timeout(timeout);
        }

        Ok(SocialHttpClient {
            http: http_builder.build()?,
            base_url,
        })
    }
}

/// Transport client for the social service's REST API.
///
/// `SocialHttpClient` is the low-level, stateless engine the higher-level
/// actors (`SessionContext`, `PaginatedList`, cards, `Composer`) are built on.
/// It owns one reqwest client (connection pool) and the API base URL.
///
/// ### What it does
/// - Resolves endpoint segments against the base URL, percent-encoding ids.
/// - Attaches `Authorization: Bearer <token>` to authenticated requests.
///
/// ### What it *doesn’t* do
/// - It is **not** session aware. Tokens are supplied per request; for
///   authenticated flows use [`crate::SessionContext::api`].
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone, Debug)]
pub struct SocialHttpClient {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: Url,
}

impl SocialHttpClient {
    /// Creates a client for the API rooted at `base_url`.
    pub fn new(base_url: &str) -> std::result::Result<SocialHttpClient, BuildError> {
        Self::builder().base_url(base_url).build()
    }

    /// Returns a builder to edit settings before creating [`SocialHttpClient`].
    pub fn builder() -> SocialHttpClientBuilder {
        SocialHttpClientBuilder::default()
    }

    /// The API root.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve endpoint path segments, e.g. `["publication", "feed", "2"]`.
    ///
    /// Each segment is percent-encoded, so ids cannot escape their position.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Start an unauthenticated request to an endpoint.
    pub fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        Ok(self.http.request(method, self.endpoint(segments)?))
    }

    /// Start a request carrying the bearer `token`.
    ///
    /// Fails with [`AuthError::NotAuthenticated`] when there is no token, without
    /// touching the network.
    pub fn authed_request(
        &self,
        method: Method,
        segments: &[&str],
        token: Option<&str>,
    ) -> Result<RequestBuilder> {
        let token = token.ok_or(AuthError::NotAuthenticated)?;
        Ok(self.request(method, segments)?.bearer_auth(token))
    }
}
