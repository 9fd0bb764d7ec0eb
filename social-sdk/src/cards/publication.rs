//! Display model of a single publication.

use chrono::{DateTime, Utc};

use social_common::{Publication, timestamp};

/// One publication as shown in a feed or on a profile.
///
/// Likes and comments have no server counterpart; the like toggle is a local
/// overlay starting at zero and the comment count is always zero.
#[derive(Clone, Debug)]
pub struct PublicationCard {
    publication: Publication,
    viewer_id: Option<String>,
    liked: bool,
    likes: u64,
}

impl PublicationCard {
    /// A card for `publication` as seen by `viewer_id` (`None` when anonymous).
    pub fn new(publication: Publication, viewer_id: Option<String>) -> Self {
        Self {
            publication,
            viewer_id,
            liked: false,
            likes: 0,
        }
    }

    /// The publication shown.
    pub fn publication(&self) -> &Publication {
        &self.publication
    }

    /// Whether the viewer wrote it, and so may delete it.
    pub fn is_owner(&self) -> bool {
        self.viewer_id.as_deref() == Some(self.publication.author.id.as_str())
    }

    /// Author's full name.
    pub fn author_name(&self) -> String {
        self.publication.author.display_name()
    }

    /// Author's handle, prefixed with `@`.
    pub fn author_handle(&self) -> String {
        format!("@{}", self.publication.author.handle)
    }

    /// Avatar fallback letters.
    pub fn author_initials(&self) -> String {
        self.publication.author.initials()
    }

    /// Link target of the author's profile.
    pub fn author_path(&self) -> String {
        format!("/profile/{}", self.publication.author.id)
    }

    /// Creation time, when the server sent one that parses.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        timestamp::parse(&self.publication.created_at)
    }

    /// Relative creation time, e.g. `"3 minutes ago"`.
    pub fn time_ago(&self, now: DateTime<Utc>) -> Option<String> {
        self.created_at().map(|then| timestamp::time_ago(then, now))
    }

    /// Flip the local like overlay. Returns the new state.
    pub fn toggle_like(&mut self) -> bool {
        self.liked = !self.liked;
        if self.liked {
            self.likes += 1;
        } else {
            self.likes = self.likes.saturating_sub(1);
        }
        self.liked
    }

    /// Whether the viewer liked it in this session.
    pub fn is_liked(&self) -> bool {
        self.liked
    }

    /// Displayed like count.
    pub fn like_count(&self) -> u64 {
        self.likes
    }

    /// Displayed comment count.
    pub fn comment_count(&self) -> u64 {
        0
    }
}
