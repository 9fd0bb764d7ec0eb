//! Common imports for quick starts.

// Common
pub use crate::{BuildError, Error, Result};

// Transport
pub use crate::{SocialHttpClient, SocialHttpClientBuilder};

// Entry point and session
pub use crate::Social;
pub use crate::{AuthState, FileSessionStore, MemorySessionStore, SessionContext};

// Navigation
pub use crate::{Admission, Route, Router};

// View-models
pub use crate::{Composer, PaginatedList, PublicationCard, UserCard};

// Data
pub use crate::{ImageUpload, Publication, User};
