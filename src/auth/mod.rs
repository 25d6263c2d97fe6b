//! Bearer token acquisition

pub mod token;

pub use token::{BearerToken, REFRESH_TOKEN_GRANT, TokenClient, TokenGrant};
