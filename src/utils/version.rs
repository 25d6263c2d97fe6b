//! Version and client identification

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name used as the product token of the user agent
pub const PRODUCT: &str = env!("CARGO_PKG_NAME");

pub fn get_version() -> &'static str {
    VERSION
}

/// `playlist-bridge/<version>`, sent as the default `User-Agent`
pub fn default_user_agent() -> String {
    format!("{}/{}", PRODUCT, VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_user_agent() {
        let user_agent = default_user_agent();
        assert!(user_agent.starts_with("playlist-bridge/"));
        assert!(user_agent.ends_with(get_version()));
    }
}
