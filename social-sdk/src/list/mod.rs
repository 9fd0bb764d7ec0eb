//! Paginated collections held client-side.
//!
//! A [`PaginatedList`] keeps a locally coherent view of one server-paginated
//! collection. What it lists is decided by its [`PageSource`].

pub mod controller;
pub mod source;

pub use controller::{ListView, LoadOutcome, PaginatedList, Phase};
pub use source::{
    FeedSource, FollowersSource, FollowingSource, PageSource, RemoteDelete, UserDirectorySource,
    UserPublicationsSource,
};

/// The viewer's feed.
pub type Feed = PaginatedList<FeedSource>;

/// The user directory.
pub type UserDirectory = PaginatedList<UserDirectorySource>;
