//! Entries of the following/followers listings.

use serde::Deserialize;

use crate::User;

/// An item of `GET /follow/following/...`: the followed user.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct FollowingEntry {
    /// The user being followed.
    pub followed: User,
}

/// An item of `GET /follow/followers/...`: the following user.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct FollowerEntry {
    /// The user who follows.
    pub user: User,
}
