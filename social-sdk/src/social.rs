//! High-level façade for the `social` crate.
//!
//! ## Mental model
//! - `Social` - your entrypoint. Owns a `SocialHttpClient` and the notifier
//!   every view-model reports to, and constructs the view-models.
//! - `SessionContext` - the viewer's session; created once, passed everywhere.
//! - `Router` - gated navigation over the session.
//! - `PaginatedList` - feed, directory, per-user publications and follow listings.
//! - `Composer`, `PublicationCard`, `UserCard` - per-item actions.
//!
//! ## Quick start
//! ```no_run
//! use social::{Social, FileSessionStore};
//!
//! # async fn run() -> social::Result<()> {
//! let social = Social::new("http://localhost:3900/api/")?;
//! let session = social.session(FileSessionStore::new("/tmp/social/session.json"));
//! session.rehydrate_and_validate().await;
//!
//! let mut router = social.router(&session);
//! println!("{:?}", router.navigate("/"));
//!
//! let mut composer = social.composer(&session);
//! composer.set_text("hello");
//! let feed = social.feed(&session);
//! composer
//!     .submit(move |_| async move {
//!         let _ = feed.refresh().await;
//!     })
//!     .await?;
//! # Ok(()) }
//! ```

use std::sync::Arc;

use social_common::{Publication, User};

use crate::{
    Composer, Result, Router, SessionContext, SocialHttpClient,
    cards::{PublicationCard, UserCard},
    list::{
        Feed, FeedSource, FollowersSource, FollowingSource, PageSource, PaginatedList,
        UserDirectory, UserDirectorySource, UserPublicationsSource,
    },
    notify::{LogNotifier, Notifier, SharedNotifier},
    session::persist::SessionStore,
};

/// High-level façade. Owns a `SocialHttpClient` and constructs the view-models.
#[derive(Clone, Debug)]
pub struct Social {
    client: SocialHttpClient,
    notifier: SharedNotifier,
}

impl Social {
    /// Construct against the API at `base_url`, logging notifications.
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self::with_client(SocialHttpClient::new(base_url)?))
    }

    /// Construct from an already-configured transport.
    pub fn with_client(client: SocialHttpClient) -> Self {
        Self {
            client,
            notifier: Arc::new(LogNotifier),
        }
    }

    /// Report notifications to `notifier` instead of the log.
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Arc::new(notifier);
        self
    }

    /// Access the underlying transport (advanced use).
    #[inline]
    pub fn client(&self) -> &SocialHttpClient {
        &self.client
    }

    /// Where view-models report notifications.
    pub fn notifier(&self) -> &SharedNotifier {
        &self.notifier
    }

    /// A fresh, `Uninitialized` session context persisted in `store`.
    pub fn session(&self, store: impl SessionStore + 'static) -> SessionContext {
        SessionContext::new(self.client.clone(), store)
    }

    /// A router over `session` with nothing mounted.
    pub fn router(&self, session: &SessionContext) -> Router {
        Router::new(session.clone())
    }

    /// The viewer's feed.
    pub fn feed(&self, session: &SessionContext) -> Feed {
        self.list(FeedSource::new(session.clone()))
    }

    /// The user directory.
    pub fn users(&self, session: &SessionContext) -> UserDirectory {
        self.list(UserDirectorySource::new(session.clone()))
    }

    /// Publications by `user_id`.
    pub fn user_publications(
        &self,
        session: &SessionContext,
        user_id: &str,
    ) -> PaginatedList<UserPublicationsSource> {
        self.list(UserPublicationsSource::new(session.clone(), user_id))
    }

    /// Users followed by `user_id`, or by the viewer.
    pub fn following(
        &self,
        session: &SessionContext,
        user_id: Option<&str>,
    ) -> PaginatedList<FollowingSource> {
        self.list(FollowingSource::new(
            session.clone(),
            user_id.map(str::to_string),
        ))
    }

    /// Users following `user_id`, or the viewer.
    pub fn followers(
        &self,
        session: &SessionContext,
        user_id: Option<&str>,
    ) -> PaginatedList<FollowersSource> {
        self.list(FollowersSource::new(
            session.clone(),
            user_id.map(str::to_string),
        ))
    }

    /// An empty draft published as the viewer.
    pub fn composer(&self, session: &SessionContext) -> Composer {
        Composer::new(session.clone(), Arc::clone(&self.notifier))
    }

    /// A card for `publication` as seen by the current viewer.
    pub fn publication_card(
        &self,
        session: &SessionContext,
        publication: Publication,
    ) -> PublicationCard {
        PublicationCard::new(publication, session.viewer_id())
    }

    /// A card for `user` with a follow toggle starting at `following`.
    pub fn user_card(&self, session: &SessionContext, user: User, following: bool) -> UserCard {
        UserCard::new(user, following, session.clone(), Arc::clone(&self.notifier))
    }

    fn list<S: PageSource>(&self, source: S) -> PaginatedList<S> {
        PaginatedList::new(source, Arc::clone(&self.notifier))
    }
}
