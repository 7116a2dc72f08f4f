//! Mock platform implementation for testing
//!
//! A configurable platform that can simulate successes, failures, delays,
//! and mid-thread failures. It records every call (content plus reply
//! target) so tests can verify ordering and reply chaining without
//! credentials or network access.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::error::{PlatformError, Result};
use crate::platforms::Platform;
use crate::types::MediaAttachment;

/// One recorded post call: the content and the reply target it was sent with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPost {
    pub content: String,
    pub reply_to: Option<String>,
}

/// Configuration for mock platform behavior
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Platform name (e.g., "mock-twitter")
    pub name: String,

    /// Whether posting should succeed
    pub post_succeeds: bool,

    /// Error to return on posting failure
    pub post_error: Option<String>,

    /// Fail the Nth post call (1-based) and every call after it
    pub fail_from_call: Option<usize>,

    /// Delay before completing operations (simulates network latency)
    pub delay: Duration,

    /// Character limit enforced by validate_content
    pub character_limit: usize,

    /// Whether the platform accepts reply-chained posts
    pub supports_threading: bool,

    /// Whether the platform accepts media attachments
    pub supports_media: bool,

    /// Number of times post/post_reply has been called
    pub post_call_count: Arc<Mutex<usize>>,

    /// Calls that have been made (for verification)
    pub recorded: Arc<Mutex<Vec<RecordedPost>>>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            name: "mock".to_string(),
            post_succeeds: true,
            post_error: None,
            fail_from_call: None,
            delay: Duration::from_millis(0),
            character_limit: 280,
            supports_threading: true,
            supports_media: true,
            post_call_count: Arc::new(Mutex::new(0)),
            recorded: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

/// Mock platform for testing
pub struct MockPlatform {
    config: MockConfig,
}

impl MockPlatform {
    /// Create a new mock platform with the given configuration
    pub fn new(config: MockConfig) -> Self {
        Self { config }
    }

    /// Create a mock platform that always succeeds
    pub fn success(name: &str) -> Self {
        Self::new(MockConfig {
            name: name.to_string(),
            ..Default::default()
        })
    }

    /// Create a mock platform whose posts always fail
    pub fn post_failure(name: &str, error: &str) -> Self {
        Self::new(MockConfig {
            name: name.to_string(),
            post_succeeds: false,
            post_error: Some(error.to_string()),
            ..Default::default()
        })
    }

    /// Create a mock platform that fails from the Nth post call (1-based)
    pub fn failing_from_call(name: &str, call: usize, error: &str) -> Self {
        Self::new(MockConfig {
            name: name.to_string(),
            fail_from_call: Some(call),
            post_error: Some(error.to_string()),
            ..Default::default()
        })
    }

    /// Create a mock platform with a simulated latency
    pub fn with_delay(name: &str, delay: Duration) -> Self {
        Self::new(MockConfig {
            name: name.to_string(),
            delay,
            ..Default::default()
        })
    }

    /// Create a mock platform with a character limit
    pub fn with_limit(name: &str, limit: usize) -> Self {
        Self::new(MockConfig {
            name: name.to_string(),
            character_limit: limit,
            ..Default::default()
        })
    }

    /// Create a mock platform without threading support
    pub fn without_threading(name: &str, limit: usize) -> Self {
        Self::new(MockConfig {
            name: name.to_string(),
            character_limit: limit,
            supports_threading: false,
            ..Default::default()
        })
    }

    /// Get the number of times post/post_reply was called
    pub fn post_call_count(&self) -> usize {
        *self.config.post_call_count.lock().unwrap()
    }

    /// Get all recorded post calls in order
    pub fn recorded_posts(&self) -> Vec<RecordedPost> {
        self.config.recorded.lock().unwrap().clone()
    }

    /// Clone the counters so a boxed instance can still be inspected
    pub fn handles(&self) -> (Arc<Mutex<usize>>, Arc<Mutex<Vec<RecordedPost>>>) {
        (
            Arc::clone(&self.config.post_call_count),
            Arc::clone(&self.config.recorded),
        )
    }

    async fn record_and_post(&self, content: &str, reply_to: Option<&str>) -> Result<String> {
        let call_number = {
            let mut count = self.config.post_call_count.lock().unwrap();
            *count += 1;
            *count
        };

        if !self.config.delay.is_zero() {
            sleep(self.config.delay).await;
        }

        let failing = !self.config.post_succeeds
            || self
                .config
                .fail_from_call
                .is_some_and(|from| call_number >= from);

        if failing {
            let error_msg = self
                .config
                .post_error
                .clone()
                .unwrap_or_else(|| "Mock posting failed".to_string());
            return Err(PlatformError::Upstream(error_msg).into());
        }

        self.config.recorded.lock().unwrap().push(RecordedPost {
            content: content.to_string(),
            reply_to: reply_to.map(|s| s.to_string()),
        });

        Ok(format!("{}:mock-{}", self.config.name, uuid::Uuid::new_v4()))
    }
}

#[async_trait]
impl Platform for MockPlatform {
    async fn post(&self, content: &str, _media: Option<&MediaAttachment>) -> Result<String> {
        self.record_and_post(content, None).await
    }

    async fn post_reply(&self, content: &str, reply_to: Option<&str>) -> Result<String> {
        self.record_and_post(content, reply_to).await
    }

    fn name(&self) -> &str {
        &self.config.name
    }

    fn character_limit(&self) -> usize {
        self.config.character_limit
    }

    fn supports_threading(&self) -> bool {
        self.config.supports_threading
    }

    fn supports_media(&self) -> bool {
        self.config.supports_media
    }
}
