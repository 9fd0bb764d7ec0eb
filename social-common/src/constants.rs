//! Limits and fixed values shared by the client crates.

/// Maximum length of a publication's text, in characters. Inclusive.
pub const MAX_PUBLICATION_CHARS: usize = 280;

/// Share of [`MAX_PUBLICATION_CHARS`] above which the composer counter warns, in percent.
pub const COUNTER_WARNING_PERCENT: usize = 80;

/// Multipart field name expected by every upload endpoint.
pub const UPLOAD_FIELD: &str = "file0";

/// `status` value of a successful reply envelope.
pub const STATUS_SUCCESS: &str = "success";

/// First page number of every paginated endpoint. Pages are 1-based.
pub const FIRST_PAGE: u32 = 1;
