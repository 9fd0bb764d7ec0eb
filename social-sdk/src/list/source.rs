//! Where pages come from: one source per listing endpoint.

use async_trait::async_trait;

use social_common::{Identified, Page, Publication, User};

use crate::{Result, SessionContext, api::SocialApi};

/// A remote, 1-based paginated collection.
#[async_trait]
pub trait PageSource: Send + Sync + std::fmt::Debug + 'static {
    /// What the collection holds.
    type Item: Clone + Identified + Send + Sync + 'static;

    /// Fetch page `page`.
    async fn fetch_page(&self, page: u32) -> Result<Page<Self::Item>>;

    /// Noun used in notifications, e.g. `"publications"`.
    fn noun(&self) -> &'static str;
}

/// A collection whose items the viewer can delete.
#[async_trait]
pub trait RemoteDelete: PageSource {
    /// Delete item `id` on the server.
    async fn delete_remote(&self, id: &str) -> Result<()>;
}

/// `GET /publication/feed/:page`.
#[derive(Clone, Debug)]
pub struct FeedSource {
    session: SessionContext,
}

impl FeedSource {
    /// The feed of the viewer of `session`.
    pub fn new(session: SessionContext) -> Self {
        Self { session }
    }
}

#[async_trait]
impl PageSource for FeedSource {
    type Item = Publication;

    async fn fetch_page(&self, page: u32) -> Result<Page<Publication>> {
        let api = self.session.api();
        let result = api.feed(page).await;
        guarded(&self.session, &api, result)
    }

    fn noun(&self) -> &'static str {
        "publications"
    }
}

#[async_trait]
impl RemoteDelete for FeedSource {
    async fn delete_remote(&self, id: &str) -> Result<()> {
        let api = self.session.api();
        let result = api.remove_publication(id).await;
        guarded(&self.session, &api, result)
    }
}

/// `GET /publication/user/:userId/:page`.
#[derive(Clone, Debug)]
pub struct UserPublicationsSource {
    session: SessionContext,
    user_id: String,
}

impl UserPublicationsSource {
    /// Publications authored by `user_id`.
    pub fn new(session: SessionContext, user_id: impl Into<String>) -> Self {
        Self {
            session,
            user_id: user_id.into(),
        }
    }
}

#[async_trait]
impl PageSource for UserPublicationsSource {
    type Item = Publication;

    async fn fetch_page(&self, page: u32) -> Result<Page<Publication>> {
        let api = self.session.api();
        let result = api.user_publications(&self.user_id, page).await;
        guarded(&self.session, &api, result)
    }

    fn noun(&self) -> &'static str {
        "publications"
    }
}

#[async_trait]
impl RemoteDelete for UserPublicationsSource {
    async fn delete_remote(&self, id: &str) -> Result<()> {
        let api = self.session.api();
        let result = api.remove_publication(id).await;
        guarded(&self.session, &api, result)
    }
}

/// `GET /user/list/:page`.
#[derive(Clone, Debug)]
pub struct UserDirectorySource {
    session: SessionContext,
}

impl UserDirectorySource {
    /// Every registered user.
    pub fn new(session: SessionContext) -> Self {
        Self { session }
    }
}

#[async_trait]
impl PageSource for UserDirectorySource {
    type Item = User;

    async fn fetch_page(&self, page: u32) -> Result<Page<User>> {
        let api = self.session.api();
        let result = api.list_users(page).await;
        guarded(&self.session, &api, result)
    }

    fn noun(&self) -> &'static str {
        "users"
    }
}

/// `GET /follow/following[/:userId]/:page`.
#[derive(Clone, Debug)]
pub struct FollowingSource {
    session: SessionContext,
    user_id: Option<String>,
}

impl FollowingSource {
    /// Users followed by `user_id`, or by the viewer when `None`.
    pub fn new(session: SessionContext, user_id: Option<String>) -> Self {
        Self { session, user_id }
    }
}

#[async_trait]
impl PageSource for FollowingSource {
    type Item = User;

    async fn fetch_page(&self, page: u32) -> Result<Page<User>> {
        let api = self.session.api();
        let result = api.following(self.user_id.as_deref(), page).await;
        guarded(&self.session, &api, result)
    }

    fn noun(&self) -> &'static str {
        "followed users"
    }
}

/// `GET /follow/followers[/:userId]/:page`.
#[derive(Clone, Debug)]
pub struct FollowersSource {
    session: SessionContext,
    user_id: Option<String>,
}

impl FollowersSource {
    /// Users following `user_id`, or the viewer when `None`.
    pub fn new(session: SessionContext, user_id: Option<String>) -> Self {
        Self { session, user_id }
    }
}

#[async_trait]
impl PageSource for FollowersSource {
    type Item = User;

    async fn fetch_page(&self, page: u32) -> Result<Page<User>> {
        let api = self.session.api();
        let result = api.followers(self.user_id.as_deref(), page).await;
        guarded(&self.session, &api, result)
    }

    fn noun(&self) -> &'static str {
        "followers"
    }
}

// A rejected token ends the session before the error travels on.
fn guarded<T>(session: &SessionContext, api: &SocialApi, result: Result<T>) -> Result<T> {
    if let Err(error) = &result {
        session.expire_if_unauthorized(api, error);
    }
    result
}
