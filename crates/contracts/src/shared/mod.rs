pub mod api_error;
pub mod config;
pub mod query;

pub use api_error::ApiError;
