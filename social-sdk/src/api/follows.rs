//! Follow edges: creating, removing and listing them.

use reqwest::Method;
use serde::Serialize;

use social_common::{
    Page, PageEnvelope, User,
    follow::{FollowerEntry, FollowingEntry},
};

use super::SocialApi;
use crate::{
    cross_log,
    errors::Result,
    util::{StatusReply, read_json},
};

#[derive(Serialize)]
struct FollowBody<'a> {
    followed: &'a str,
}

impl SocialApi {
    /// `POST /follow/save`.
    pub async fn follow(&self, user_id: &str) -> Result<()> {
        cross_log!(debug, "Following {user_id}");
        let response = self
            .request(Method::POST, &["follow", "save"])?
            .json(&FollowBody { followed: user_id })
            .send()
            .await?;
        let reply: StatusReply = read_json(response).await?;
        reply.ensure_success()?;
        Ok(())
    }

    /// `DELETE /follow/unfollow/:userId`.
    pub async fn unfollow(&self, user_id: &str) -> Result<()> {
        cross_log!(debug, "Unfollowing {user_id}");
        let response = self
            .request(Method::DELETE, &["follow", "unfollow", user_id])?
            .send()
            .await?;
        let reply: StatusReply = read_json(response).await?;
        reply.ensure_success()?;
        Ok(())
    }

    /// `GET /follow/following[/:userId]/:page`: users followed by `user_id`
    /// (the viewer when `None`).
    pub async fn following(&self, user_id: Option<&str>, page: u32) -> Result<Page<User>> {
        let envelope: PageEnvelope<FollowingEntry> =
            self.follow_listing("following", user_id, page).await?;
        Ok(Page::from(envelope).map(|entry| entry.followed))
    }

    /// `GET /follow/followers[/:userId]/:page`: users following `user_id`
    /// (the viewer when `None`).
    pub async fn followers(&self, user_id: Option<&str>, page: u32) -> Result<Page<User>> {
        let envelope: PageEnvelope<FollowerEntry> =
            self.follow_listing("followers", user_id, page).await?;
        Ok(Page::from(envelope).map(|entry| entry.user))
    }

    async fn follow_listing<T: serde::de::DeserializeOwned>(
        &self,
        kind: &str,
        user_id: Option<&str>,
        page: u32,
    ) -> Result<PageEnvelope<T>> {
        let page = page.to_string();
        let rb = match user_id {
            Some(id) => self.request(Method::GET, &["follow", kind, id, &page])?,
            None => self.request(Method::GET, &["follow", kind, &page])?,
        };
        read_json(rb.send().await?).await
    }
}
