//! Publications (posts) and their authors.

use serde::{Deserialize, Serialize};

use crate::{Identified, UserSummary};

/// A text publication with an optional attached image.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    /// Server id.
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Author, as embedded by the server.
    #[serde(rename = "user")]
    pub author: UserSummary,
    /// Body text, at most [`crate::constants::MAX_PUBLICATION_CHARS`] characters.
    pub text: String,
    /// Attached image location, once the second creation phase succeeded.
    #[serde(rename = "file", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Creation time, verbatim. See [`crate::timestamp::parse`].
    #[serde(default)]
    pub created_at: String,
    /// Last update time, verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Publication {
    /// Whether the second creation phase attached an image.
    pub fn has_image(&self) -> bool {
        self.image_url.as_deref().is_some_and(|f| !f.is_empty())
    }
}

impl Identified for Publication {
    fn id(&self) -> &str {
        &self.id
    }
}
