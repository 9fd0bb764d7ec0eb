#![doc = include_str!("../README.md")]
//!

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(any(), deny(clippy::unwrap_used))]

pub mod constants;
pub mod follow;
pub mod page;
pub mod publication;
pub mod timestamp;
pub mod user;

pub use page::{Page, PageEnvelope};
pub use publication::Publication;
pub use user::{User, UserCounters, UserSummary};

/// Anything carrying the server-assigned identity key.
pub trait Identified {
    /// The server id (`_id` on the wire).
    fn id(&self) -> &str;
}
