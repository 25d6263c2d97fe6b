//! HTTP plumbing shared by the provider clients
//!
//! Client construction, response checking, and the retry and chunking
//! policies injected into the Spotify client.

pub mod network;
pub mod retry;

pub use network::NetworkManager;
pub use retry::{BackoffSource, BatchPolicy, RetryPolicy};
