use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use social_common::User;

use super::persist::SessionStore;
use crate::{
    Error, ImageUpload, Result, SocialHttpClient,
    api::{Credentials, ProfileUpdate, Registration, SocialApi},
    cross_log,
    errors::AuthError,
};

/// The viewer's identity and bearer token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    user: User,
    token: String,
}

impl Session {
    /// Pair a user with the token the server issued for them.
    pub fn new(user: User, token: impl Into<String>) -> Self {
        Self {
            user,
            token: token.into(),
        }
    }

    /// The logged-in user.
    pub fn user(&self) -> &User {
        &self.user
    }

    /// The bearer token. Treat it as a secret; do not log it.
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user.id)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Lifecycle of the viewer's session.
///
/// `Uninitialized → Rehydrating → Authenticated | Anonymous`, then
/// `Authenticated ⇄ Anonymous` through login, logout and expiry.
/// `Rehydrating` and `Anonymous` are distinct so navigation can wait for the
/// former instead of redirecting.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AuthState {
    /// Nothing has been read from the store yet.
    #[default]
    Uninitialized,
    /// The persisted session is being read or revalidated.
    Rehydrating,
    /// A session is present.
    Authenticated(Session),
    /// Definitely no session.
    Anonymous,
}

impl AuthState {
    /// The session, when authenticated.
    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthState::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    /// Whether a session is present.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }

    /// Whether the session question is still open.
    pub fn is_settling(&self) -> bool {
        matches!(self, AuthState::Uninitialized | AuthState::Rehydrating)
    }
}

/// Explicitly constructed holder of the viewer's session.
///
/// One `SessionContext` is created at startup and handed to every component
/// that needs the viewer's identity or token. It owns the session's
/// lifecycle ([`AuthState`]) and its persistence ([`SessionStore`]).
///
/// Renderers can [`subscribe`](Self::subscribe) to state changes.
///
/// Cheap to clone; clones share the state.
#[derive(Clone, Debug)]
pub struct SessionContext {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    client: SocialHttpClient,
    state: watch::Sender<AuthState>,
    store: Box<dyn SessionStore>,
}

impl SessionContext {
    /// A context in the `Uninitialized` state.
    pub fn new(client: SocialHttpClient, store: impl SessionStore + 'static) -> Self {
        Self {
            inner: Arc::new(Inner {
                client,
                state: watch::Sender::new(AuthState::Uninitialized),
                store: Box::new(store),
            }),
        }
    }

    // === Getters ===

    /// Snapshot of the current state.
    pub fn state(&self) -> AuthState {
        self.inner.state.borrow().clone()
    }

    /// Receive every subsequent state change.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.inner.state.subscribe()
    }

    /// Whether a session is present.
    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    /// The logged-in user, if any.
    pub fn current_user(&self) -> Option<User> {
        self.inner
            .state
            .borrow()
            .session()
            .map(|s| s.user().clone())
    }

    /// Id of the logged-in user, if any.
    pub fn viewer_id(&self) -> Option<String> {
        self.inner
            .state
            .borrow()
            .session()
            .map(|s| s.user().id.clone())
    }

    /// The transport this context authenticates.
    pub fn client(&self) -> &SocialHttpClient {
        &self.inner.client
    }

    /// API handle carrying the current token (none when anonymous).
    ///
    /// The handle is a snapshot: logging out later does not revoke it.
    pub fn api(&self) -> SocialApi {
        let token = self
            .inner
            .state
            .borrow()
            .session()
            .map(|s| s.token().to_string());
        SocialApi::new(self.inner.client.clone(), token)
    }

    // === Lifecycle ===

    /// Read the persisted session.
    ///
    /// Ends `Authenticated` when the store holds a session and `Anonymous`
    /// otherwise. An unreadable store counts as empty.
    pub fn rehydrate(&self) -> AuthState {
        self.set(AuthState::Rehydrating);
        let next = match self.inner.store.load() {
            Ok(Some(session)) => {
                cross_log!(debug, "Rehydrated session for {}", session.user().id);
                AuthState::Authenticated(session)
            }
            Ok(None) => AuthState::Anonymous,
            Err(e) => {
                cross_log!(warn, "Ignoring unreadable session: {e}");
                AuthState::Anonymous
            }
        };
        self.set(next.clone());
        next
    }

    /// Read the persisted session and confirm it with the server.
    ///
    /// The state stays `Rehydrating` until the server answers. A rejected
    /// token ends `Anonymous` and clears the store; a server that cannot be
    /// reached keeps the stored session.
    pub async fn rehydrate_and_validate(&self) -> AuthState {
        self.set(AuthState::Rehydrating);
        let session = match self.inner.store.load() {
            Ok(Some(session)) => session,
            Ok(None) => return self.settle(AuthState::Anonymous),
            Err(e) => {
                cross_log!(warn, "Ignoring unreadable session: {e}");
                return self.settle(AuthState::Anonymous);
            }
        };

        let api = SocialApi::new(self.inner.client.clone(), Some(session.token().to_string()));
        match api.profile(None).await {
            Ok(user) => {
                let session = Session::new(user, session.token);
                self.persist(&session);
                self.settle(AuthState::Authenticated(session))
            }
            Err(e) if e.is_unauthorized() => {
                cross_log!(info, "Stored session was rejected by the server");
                self.forget();
                self.settle(AuthState::Anonymous)
            }
            Err(e) => {
                cross_log!(warn, "Could not revalidate session, keeping it: {e}");
                self.settle(AuthState::Authenticated(session))
            }
        }
    }

    /// `POST /user/login`, then persist and enter `Authenticated`.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let credentials = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let (user, token) = self.inner.client.login(&credentials).await?;
        let session = Session::new(user.clone(), token);
        self.persist(&session);
        self.set(AuthState::Authenticated(session));
        cross_log!(info, "Logged in as @{}", user.handle);
        Ok(user)
    }

    /// `POST /user/register`. Does not log in.
    pub async fn register(&self, registration: &Registration) -> Result<Option<User>> {
        self.inner.client.register(registration).await
    }

    /// Drop the session locally and from the store.
    ///
    /// The in-memory state is cleared before anything else. No server-side
    /// revocation happens.
    pub fn logout(&self) {
        self.set(AuthState::Anonymous);
        self.forget();
        cross_log!(info, "Logged out");
    }

    /// Ask the server whether the token is still valid.
    ///
    /// Returns the fresh user. A rejected token expires the session and
    /// yields [`AuthError::SessionExpired`].
    pub async fn revalidate(&self) -> Result<User> {
        let api = self.api();
        if !api.is_authenticated() {
            return Err(AuthError::NotAuthenticated.into());
        }
        match api.profile(None).await {
            Ok(user) => {
                self.replace_user(user.clone());
                Ok(user)
            }
            Err(e) if self.expire_if_unauthorized(&api, &e) => {
                Err(AuthError::SessionExpired.into())
            }
            Err(e) => Err(e),
        }
    }

    /// Expire the session if `error` says the token `api` sent was rejected.
    ///
    /// Only the session owning that token is ended: a late rejection of a
    /// token that was since replaced by logout or a new login changes
    /// nothing. Returns whether the session was expired.
    pub fn expire_if_unauthorized(&self, api: &SocialApi, error: &Error) -> bool {
        if !error.is_unauthorized() {
            return false;
        }
        let owns_token = match (api.token(), self.inner.state.borrow().session()) {
            (Some(sent), Some(current)) => sent == current.token(),
            _ => false,
        };
        if !owns_token {
            cross_log!(debug, "Ignoring rejection of a replaced token");
            return false;
        }
        cross_log!(info, "Session expired: {error}");
        self.logout();
        true
    }

    /// `PUT /user/update`; the session's user follows the server's answer.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Option<User>> {
        let user = self.api().update_profile(update).await?;
        if let Some(user) = &user {
            self.replace_user(user.clone());
        }
        Ok(user)
    }

    /// `POST /user/upload`; the session's user follows the server's answer.
    pub async fn upload_avatar(&self, image: &ImageUpload) -> Result<Option<User>> {
        let user = self.api().upload_avatar(image).await?;
        if let Some(user) = &user {
            self.replace_user(user.clone());
        }
        Ok(user)
    }

    // === Internals ===

    fn set(&self, state: AuthState) {
        self.inner.state.send_replace(state);
    }

    fn settle(&self, state: AuthState) -> AuthState {
        self.set(state.clone());
        state
    }

    fn replace_user(&self, user: User) {
        let Some(token) = self.inner.state.borrow().session().map(|s| s.token.clone()) else {
            return;
        };
        let session = Session::new(user, token);
        self.persist(&session);
        self.set(AuthState::Authenticated(session));
    }

    fn persist(&self, session: &Session) {
        if let Err(e) = self.inner.store.save(session) {
            cross_log!(warn, "Session will not survive a restart: {e}");
        }
    }

    fn forget(&self) {
        if let Err(e) = self.inner.store.clear() {
            cross_log!(warn, "Failed to clear the persisted session: {e}");
        }
    }
}
