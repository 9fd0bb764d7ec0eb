#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(any(), deny(clippy::unwrap_used))]

pub mod api;
pub mod cards;
mod client;
pub mod compose;
pub mod errors;
pub mod gate;
pub mod list;
mod macros;
pub mod notify;
mod session;
mod social;
mod util;

pub mod prelude;

// --- PUBLIC API EXPORTS ---
// Transport
pub use client::core::{DEFAULT_API_URL, SocialHttpClient, SocialHttpClientBuilder};
pub use client::upload::ImageUpload;
// Endpoint wrappers
pub use api::{Credentials, ProfileUpdate, Registration, SocialApi};
// Session
pub use session::core::{AuthState, Session, SessionContext};
pub use session::persist::{FileSessionStore, MemorySessionStore, SessionStore};
// View-models
pub use cards::{FollowToggle, PublicationCard, UserCard};
pub use compose::{ComposeOutcome, Composer, CounterTone};
pub use gate::{Admission, AuthGate, NavAction, NavLink, Route, Router};
pub use list::{Feed, ListView, LoadOutcome, PaginatedList, UserDirectory};
pub use notify::{LogNotifier, Notifier, Severity, Toast, ToastQueue};
pub use social::Social;

// Error
pub use errors::{BuildError, Error, Result};

// Re-exports
pub use reqwest::{Method, StatusCode};
pub use social_common::{
    Page, Publication, User, UserCounters, UserSummary, constants, timestamp,
};
