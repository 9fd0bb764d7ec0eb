//! Per-item view-models: one card per publication or user shown in a list.

pub mod publication;
pub mod user;

pub use publication::PublicationCard;
pub use user::{FollowToggle, UserCard};
