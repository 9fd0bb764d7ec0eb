pub mod core;
pub mod upload;
