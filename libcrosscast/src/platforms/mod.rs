//! Platform abstraction and implementations
//!
//! This module provides a unified trait for posting to the supported
//! social platforms. Each implementation handles authentication headers,
//! posting, and content validation according to platform-specific
//! requirements.
//!
//! # Examples
//!
//! ```no_run
//! use libcrosscast::platforms::{Platform, twitter::TwitterClient};
//! use secrecy::SecretString;
//!
//! # async fn example() -> libcrosscast::error::Result<()> {
//! let platform = TwitterClient::new(SecretString::from("user-access-token"))?;
//!
//! println!("{} allows {} characters", platform.name(), platform.character_limit());
//!
//! let post_id = platform.post("Hello from crosscast!", None).await?;
//! println!("Posted: {}", post_id);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;

use crate::error::{PlatformError, Result};
use crate::types::MediaAttachment;

pub mod linkedin;
pub mod twitter;

// Mock platform is available for all builds (not just tests) to support
// integration tests
pub mod mock;

/// Platform trait for unified posting interactions
///
/// Implementations are constructed with a caller-supplied credential that
/// lives only as long as the client; nothing is persisted. All operations
/// are `&self` so a client can be shared across concurrent requests.
#[async_trait]
pub trait Platform: Send + Sync {
    /// Post content to the platform
    ///
    /// Posts the given content, optionally with a media attachment, and
    /// returns the platform-specific post ID.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::ContentTooLong` when the content fails
    /// validation, or `PlatformError::Upstream` when the platform API
    /// rejects the call.
    async fn post(&self, content: &str, media: Option<&MediaAttachment>) -> Result<String>;

    /// Post content as a reply to an earlier post
    ///
    /// `reply_to` is the remote id of the post being replied to; `None`
    /// starts a new chain. Thread-capable platforms must override this.
    ///
    /// # Errors
    ///
    /// The default implementation fails with `PlatformError::Upstream`
    /// since the platform has no reply primitive.
    async fn post_reply(&self, _content: &str, _reply_to: Option<&str>) -> Result<String> {
        Err(PlatformError::Upstream(format!(
            "{} does not support threaded replies",
            self.name()
        ))
        .into())
    }

    /// Validate content before posting
    ///
    /// Checks the content against the platform's character limit without
    /// performing any network I/O.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::ContentTooLong` if the content exceeds the
    /// platform's limit.
    fn validate_content(&self, content: &str) -> Result<()> {
        let char_count = content.chars().count();
        let limit = self.character_limit();

        if char_count > limit {
            return Err(PlatformError::ContentTooLong(format!(
                "content is {} characters, {} allows {}",
                char_count,
                self.name(),
                limit
            ))
            .into());
        }

        Ok(())
    }

    /// Lowercase identifier for the platform (e.g., "twitter", "linkedin")
    fn name(&self) -> &str;

    /// Maximum number of characters allowed in a single post
    fn character_limit(&self) -> usize;

    /// Whether the platform supports reply-chained threads
    fn supports_threading(&self) -> bool {
        false
    }

    /// Whether the platform supports media attachments
    fn supports_media(&self) -> bool {
        false
    }
}
