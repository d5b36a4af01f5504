//! HTTP request extractors.
//!
//! - [`TokenHeader`] - optional session token from the `token` header
//! - [`SessionClaims`] - token claim set with issue/verify operations
//! - [`ValidateJson`] - JSON extraction with automatic validation

mod claims;
mod token_header;
mod validate_json;

pub use claims::{SessionClaims, TokenError};
pub use token_header::{TOKEN_HEADER, TokenHeader};
pub use validate_json::ValidateJson;
