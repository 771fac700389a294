//! External signer interface.
//!
//! # Security
//! - Key material never enters this crate; signing is fully delegated
//! - Payloads handed to `send` are unsigned and safe to log at trace level,
//!   responses are transaction hashes only

use async_trait::async_trait;

use crate::client::ClientError;

/// An external signer: either accepted directly by a binding's delegated
/// sign-and-send capability, or driven manually through [`Signer::send`].
#[async_trait]
pub trait Signer: Send + Sync {
    /// Account identifier the signature is made for (transaction source).
    fn address(&self) -> &str;

    /// Sign the serialized unsigned payload, submit it, and return the
    /// transaction hash. One remote round trip of its own.
    async fn send(&self, payload: &str) -> Result<String, ClientError>;
}
