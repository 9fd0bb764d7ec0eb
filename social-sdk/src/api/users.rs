//! Profiles, counters, avatar upload and the user directory.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use social_common::{Page, PageEnvelope, User, UserCounters};

use super::SocialApi;
use crate::{
    ImageUpload, cross_log,
    errors::Result,
    util::{StatusReply, read_json},
};

/// Partial profile update for `PUT /user/update`. Unset fields are left alone.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ProfileUpdate {
    /// New given name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New family name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    /// New handle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nick: Option<String>,
    /// New email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New biography.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl ProfileUpdate {
    /// Whether no field is set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.surname.is_none()
            && self.nick.is_none()
            && self.email.is_none()
            && self.bio.is_none()
    }
}

#[derive(Deserialize)]
struct UserReply {
    #[serde(flatten)]
    reply: StatusReply,
    #[serde(default)]
    user: Option<User>,
}

impl UserReply {
    fn into_user(self) -> Result<Option<User>> {
        self.reply.ensure_success()?;
        Ok(self.user)
    }
}

impl SocialApi {
    /// `GET /user/profile[/:id]`. `None` fetches the viewer's own profile.
    pub async fn profile(&self, user_id: Option<&str>) -> Result<User> {
        let rb = match user_id {
            Some(id) => self.request(Method::GET, &["user", "profile", id])?,
            None => self.request(Method::GET, &["user", "profile"])?,
        };
        let reply: UserReply = read_json(rb.send().await?).await?;
        reply.into_user()?.ok_or_else(|| missing("user"))
    }

    /// `PUT /user/update`. Returns the updated user when the server echoes it.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Option<User>> {
        let response = self
            .request(Method::PUT, &["user", "update"])?
            .json(update)
            .send()
            .await?;
        let reply: UserReply = read_json(response).await?;
        reply.into_user()
    }

    /// `POST /user/upload` with the avatar in `file0`.
    pub async fn upload_avatar(&self, image: &ImageUpload) -> Result<Option<User>> {
        cross_log!(debug, "Uploading avatar {} ({} bytes)", image.file_name(), image.len());
        let response = self
            .request(Method::POST, &["user", "upload"])?
            .multipart(image.to_form()?)
            .send()
            .await?;
        let reply: UserReply = read_json(response).await?;
        reply.into_user()
    }

    /// `GET /user/counters/:id`.
    pub async fn counters(&self, user_id: &str) -> Result<UserCounters> {
        let response = self
            .request(Method::GET, &["user", "counters", user_id])?
            .send()
            .await?;
        read_json(response).await
    }

    /// `GET /user/list/:page`.
    pub async fn list_users(&self, page: u32) -> Result<Page<User>> {
        let page = page.to_string();
        let response = self
            .request(Method::GET, &["user", "list", &page])?
            .send()
            .await?;
        let envelope: PageEnvelope<User> = read_json(response).await?;
        Ok(envelope.into())
    }
}

pub(crate) fn missing(field: &str) -> crate::Error {
    crate::errors::RequestError::DecodeJson {
        message: format!("reply has no `{field}`"),
    }
    .into()
}
