//! Publications: the two-phase create, detail, removal and the paginated feeds.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use social_common::{Page, PageEnvelope, Publication};

use super::{SocialApi, users::missing};
use crate::{
    ImageUpload, cross_log,
    errors::Result,
    util::{StatusReply, read_json},
};

#[derive(Serialize)]
struct CreateBody<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct PublicationReply {
    #[serde(flatten)]
    reply: StatusReply,
    #[serde(default)]
    publication: Option<Publication>,
}

impl SocialApi {
    /// `POST /publication/save`. First phase of publishing.
    ///
    /// Fails unless the reply is successful and carries the created publication,
    /// whose id keys the optional image upload.
    pub async fn create_publication(&self, text: &str) -> Result<Publication> {
        let response = self
            .request(Method::POST, &["publication", "save"])?
            .json(&CreateBody { text })
            .send()
            .await?;
        let reply: PublicationReply = read_json(response).await?;
        reply.reply.ensure_success()?;
        let publication = reply.publication.ok_or_else(|| missing("publication"))?;
        cross_log!(debug, "Created publication {}", publication.id);
        Ok(publication)
    }

    /// `POST /publication/upload/:id` with the image in `file0`. Second phase of publishing.
    pub async fn upload_publication_image(
        &self,
        publication_id: &str,
        image: &ImageUpload,
    ) -> Result<Option<Publication>> {
        let response = self
            .request(Method::POST, &["publication", "upload", publication_id])?
            .multipart(image.to_form()?)
            .send()
            .await?;
        let reply: PublicationReply = read_json(response).await?;
        reply.reply.ensure_success()?;
        Ok(reply.publication)
    }

    /// `GET /publication/detail/:id`.
    pub async fn publication(&self, publication_id: &str) -> Result<Publication> {
        let response = self
            .request(Method::GET, &["publication", "detail", publication_id])?
            .send()
            .await?;
        let reply: PublicationReply = read_json(response).await?;
        reply.reply.ensure_success()?;
        reply.publication.ok_or_else(|| missing("publication"))
    }

    /// `DELETE /publication/remove/:id`.
    pub async fn remove_publication(&self, publication_id: &str) -> Result<()> {
        cross_log!(debug, "Removing publication {publication_id}");
        let response = self
            .request(Method::DELETE, &["publication", "remove", publication_id])?
            .send()
            .await?;
        let reply: StatusReply = read_json(response).await?;
        reply.ensure_success()?;
        Ok(())
    }

    /// `GET /publication/feed/:page`: the viewer's feed, newest first.
    pub async fn feed(&self, page: u32) -> Result<Page<Publication>> {
        let page = page.to_string();
        let response = self
            .request(Method::GET, &["publication", "feed", &page])?
            .send()
            .await?;
        let envelope: PageEnvelope<Publication> = read_json(response).await?;
        Ok(envelope.into())
    }

    /// `GET /publication/user/:userId/:page`.
    pub async fn user_publications(&self, user_id: &str, page: u32) -> Result<Page<Publication>> {
        let page = page.to_string();
        let response = self
            .request(Method::GET, &["publication", "user", user_id, &page])?
            .send()
            .await?;
        let envelope: PageEnvelope<Publication> = read_json(response).await?;
        Ok(envelope.into())
    }
}
