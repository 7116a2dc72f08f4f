//! Multi-platform crossposting orchestration
//!
//! The coordinator fans a single [`PostRequest`] out to every requested
//! platform. Platforms are mutually independent: each runs as its own
//! future and the outcomes are joined at the end, so one slow or failing
//! platform never blocks or aborts another. Within a platform, thread
//! posting stays strictly sequential (see [`crate::thread`]).

use futures::future::join_all;
use tracing::{info, warn};

use crate::chunker;
use crate::config::Config;
use crate::error::{CrosscastError, PlatformError, Result};
use crate::platforms::{linkedin::LinkedinClient, twitter::TwitterClient, Platform};
use crate::thread;
use crate::types::{AggregateResult, PlatformOutcome, PostRequest};

/// Coordinates posting one request across platform capabilities
pub struct CrosspostCoordinator {
    platforms: Vec<Box<dyn Platform>>,
}

impl CrosspostCoordinator {
    /// Create a coordinator over a set of connected platform capabilities
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use libcrosscast::config::Config;
    /// use libcrosscast::crosspost::{create_platforms, CrosspostCoordinator};
    ///
    /// # fn example() -> libcrosscast::error::Result<()> {
    /// let config = Config::load()?;
    /// let platforms = create_platforms(&config, None)?;
    /// let coordinator = CrosspostCoordinator::new(platforms);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(platforms: Vec<Box<dyn Platform>>) -> Self {
        Self { platforms }
    }

    /// Names of the connected platforms
    pub fn connected(&self) -> Vec<&str> {
        self.platforms.iter().map(|p| p.name()).collect()
    }

    fn platform(&self, name: &str) -> Option<&dyn Platform> {
        self.platforms
            .iter()
            .find(|p| p.name() == name)
            .map(|p| p.as_ref())
    }

    /// Post one request to every platform it names.
    ///
    /// Requested platforms without a connected capability yield a
    /// `NotConnected` outcome without any network call. Per-platform
    /// failures never abort sibling platforms; they are folded into the
    /// aggregate.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidInput` when the request carries neither content
    /// nor media, before any platform is attempted.
    pub async fn crosspost(&self, request: &PostRequest) -> Result<AggregateResult> {
        if request.is_empty() {
            return Err(CrosscastError::InvalidInput(
                "post needs content or a media attachment".to_string(),
            ));
        }

        info!(
            request_id = %request.id,
            platforms = ?request.platforms,
            thread_mode = request.thread_mode,
            "crossposting"
        );

        let attempts = request.platforms.iter().map(|name| async move {
            match self.platform(name) {
                Some(platform) => self.post_to_platform(platform, request).await,
                None => {
                    warn!(platform = %name, "requested platform has no capability");
                    PlatformOutcome::failed(
                        name,
                        PlatformError::NotConnected(name.to_string()).to_string(),
                    )
                }
            }
        });

        let outcomes = join_all(attempts).await;
        let result = AggregateResult::from_outcomes(outcomes);

        info!(
            request_id = %request.id,
            status = %result.status,
            "crosspost finished"
        );
        Ok(result)
    }

    /// Post the request to one connected platform
    async fn post_to_platform(
        &self,
        platform: &dyn Platform,
        request: &PostRequest,
    ) -> PlatformOutcome {
        let name = platform.name();

        if request.thread_mode && platform.supports_threading() {
            return self.post_as_thread(platform, request).await;
        }

        // Threading requested on a platform without a reply primitive falls
        // through to its single-post path with the full text unchunked.
        if let Err(e) = platform.validate_content(&request.content) {
            return PlatformOutcome::failed(name, e.to_string());
        }

        let media = if platform.supports_media() {
            request.media.as_ref()
        } else {
            if request.media.is_some() {
                warn!(platform = %name, "dropping media attachment: platform does not support media");
            }
            None
        };

        match platform.post(&request.content, media).await {
            Ok(post_id) => {
                info!(platform = %name, post_id = %post_id, "posted");
                PlatformOutcome::succeeded(name, post_id)
            }
            Err(e) => {
                warn!(platform = %name, "post failed: {}", e);
                PlatformOutcome::failed(name, e.to_string())
            }
        }
    }

    /// Chunk the content against this platform's limit and post the chain
    async fn post_as_thread(&self, platform: &dyn Platform, request: &PostRequest) -> PlatformOutcome {
        let name = platform.name();

        if request.media.is_some() {
            warn!(platform = %name, "media attachments are not posted with threads");
        }

        let chunks = chunker::split(&request.content, platform.character_limit());

        // Fail fast before any network call if a chunk cannot fit (a single
        // word longer than the limit survives chunking oversized)
        for chunk in &chunks {
            if let Err(e) = platform.validate_content(&chunk.text) {
                return PlatformOutcome::failed(name, e.to_string());
            }
        }

        match thread::post_thread(platform, &chunks).await {
            Ok(outcome) => {
                let mut platform_outcome = if outcome.success {
                    info!(
                        platform = %name,
                        chunks = outcome.chunks.len(),
                        thread_id = ?outcome.thread_id,
                        "thread posted"
                    );
                    PlatformOutcome::succeeded(
                        name,
                        outcome.thread_id.clone().unwrap_or_default(),
                    )
                } else {
                    PlatformOutcome::failed(
                        name,
                        outcome
                            .error
                            .clone()
                            .unwrap_or_else(|| "thread aborted".to_string()),
                    )
                };
                platform_outcome.thread = Some(outcome);
                platform_outcome
            }
            Err(e) => PlatformOutcome::failed(name, e.to_string()),
        }
    }
}

/// Create platform clients from configuration
///
/// Builds a client for every enabled platform whose credential resolves;
/// `filter` restricts construction to the named platforms. An enabled
/// platform whose token cannot be resolved is an error so the caller can
/// fix the configuration instead of silently posting to fewer places.
pub fn create_platforms(
    config: &Config,
    filter: Option<&[String]>,
) -> Result<Vec<Box<dyn Platform>>> {
    let wanted = |name: &str| filter.is_none_or(|names| names.iter().any(|n| n == name));
    let mut platforms: Vec<Box<dyn Platform>> = Vec::new();

    if let Some(twitter) = &config.twitter {
        if twitter.enabled && wanted("twitter") {
            info!("creating Twitter platform client");
            let token = twitter.resolve_token()?.ok_or_else(|| {
                PlatformError::NotConnected(format!(
                    "twitter is enabled but no access token was found; set {} or token_file",
                    crate::config::TWITTER_TOKEN_ENV
                ))
            })?;
            platforms.push(Box::new(TwitterClient::with_urls(
                token,
                twitter.api_url(),
                twitter.upload_url(),
            )?));
        }
    }

    if let Some(linkedin) = &config.linkedin {
        if linkedin.enabled && wanted("linkedin") {
            info!("creating LinkedIn platform client");
            let token = linkedin.resolve_token()?.ok_or_else(|| {
                PlatformError::NotConnected(format!(
                    "linkedin is enabled but no access token was found; set {} or token_file",
                    crate::config::LINKEDIN_TOKEN_ENV
                ))
            })?;
            platforms.push(Box::new(LinkedinClient::with_api_url(
                token,
                linkedin.api_url(),
            )?));
        }
    }

    if platforms.is_empty() {
        warn!("no platforms are enabled in configuration");
    } else {
        info!("created {} platform client(s)", platforms.len());
    }

    Ok(platforms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platforms::mock::MockPlatform;
    use crate::types::StatusClass;
    use serial_test::serial;

    fn request(content: &str, platforms: &[&str]) -> PostRequest {
        PostRequest::new(
            content.to_string(),
            platforms.iter().map(|s| s.to_string()).collect(),
        )
    }

    #[tokio::test]
    async fn test_empty_request_rejected() {
        let coordinator = CrosspostCoordinator::new(vec![]);
        let result = coordinator.crosspost(&request("   ", &["twitter"])).await;

        assert!(matches!(result, Err(CrosscastError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_zero_platforms_is_total_failure() {
        let coordinator = CrosspostCoordinator::new(vec![]);
        let result = coordinator.crosspost(&request("hello", &[])).await.unwrap();

        assert!(!result.overall_success);
        assert_eq!(result.status, StatusClass::TotalFailure);
        assert!(result.outcomes.is_empty());
    }

    #[tokio::test]
    async fn test_requested_but_unconnected_platform() {
        let coordinator = CrosspostCoordinator::new(vec![]);
        let result = coordinator
            .crosspost(&request("hello", &["twitter", "linkedin"]))
            .await
            .unwrap();

        assert_eq!(result.status, StatusClass::TotalFailure);
        assert_eq!(result.outcomes.len(), 2);
        for outcome in &result.outcomes {
            assert!(!outcome.success);
            assert!(outcome.error.as_deref().unwrap().contains("not connected"));
        }
    }

    #[tokio::test]
    async fn test_single_post_success() {
        let mock = MockPlatform::success("twitter");
        let (_, recorded) = mock.handles();
        let coordinator = CrosspostCoordinator::new(vec![Box::new(mock)]);

        let result = coordinator
            .crosspost(&request("hello world", &["twitter"]))
            .await
            .unwrap();

        assert_eq!(result.status, StatusClass::FullSuccess);
        assert!(result.outcome_for("twitter").unwrap().success);
        assert_eq!(recorded.lock().unwrap().len(), 1);
        assert_eq!(recorded.lock().unwrap()[0].content, "hello world");
    }

    #[tokio::test]
    async fn test_partial_failure_independence() {
        let good = MockPlatform::success("twitter");
        let bad = MockPlatform::post_failure("linkedin", "500 from API");
        let coordinator = CrosspostCoordinator::new(vec![Box::new(good), Box::new(bad)]);

        let result = coordinator
            .crosspost(&request("hello", &["twitter", "linkedin"]))
            .await
            .unwrap();

        assert_eq!(result.status, StatusClass::PartialSuccess);
        assert!(result.overall_success);
        assert!(result.outcome_for("twitter").unwrap().success);

        let failed = result.outcome_for("linkedin").unwrap();
        assert!(!failed.success);
        assert!(failed.error.as_deref().unwrap().contains("500 from API"));
    }

    #[tokio::test]
    async fn test_all_platforms_failing_is_total_failure() {
        let a = MockPlatform::post_failure("twitter", "down");
        let b = MockPlatform::post_failure("linkedin", "down");
        let coordinator = CrosspostCoordinator::new(vec![Box::new(a), Box::new(b)]);

        let result = coordinator
            .crosspost(&request("hello", &["twitter", "linkedin"]))
            .await
            .unwrap();

        assert_eq!(result.status, StatusClass::TotalFailure);
        assert!(!result.overall_success);
    }

    #[tokio::test]
    async fn test_content_too_long_fails_fast_without_io() {
        let mock = MockPlatform::with_limit("twitter", 10);
        let (calls, _) = mock.handles();
        let coordinator = CrosspostCoordinator::new(vec![Box::new(mock)]);

        let result = coordinator
            .crosspost(&request("this is definitely longer than ten characters", &["twitter"]))
            .await
            .unwrap();

        let outcome = result.outcome_for("twitter").unwrap();
        assert!(!outcome.success);
        assert!(outcome.error.as_deref().unwrap().contains("too long"));
        assert_eq!(*calls.lock().unwrap(), 0, "no network call may be made");
    }

    #[tokio::test]
    async fn test_thread_mode_chunks_and_chains() {
        let mock = MockPlatform::with_limit("twitter", 20);
        let (_, recorded) = mock.handles();
        let coordinator = CrosspostCoordinator::new(vec![Box::new(mock)]);

        let mut req = request(
            "alpha beta gamma delta epsilon zeta eta theta iota kappa",
            &["twitter"],
        );
        req.thread_mode = true;

        let result = coordinator.crosspost(&req).await.unwrap();
        let outcome = result.outcome_for("twitter").unwrap();

        assert!(outcome.success);
        let thread = outcome.thread.as_ref().unwrap();
        assert!(thread.chunks.len() > 1);

        let recorded = recorded.lock().unwrap();
        assert_eq!(recorded.len(), thread.chunks.len());
        // Chunks are numbered and chained in order
        assert!(recorded[0].content.ends_with(&format!("(1/{})", recorded.len())));
        assert_eq!(recorded[0].reply_to, None);
        for pair in recorded.windows(2) {
            assert!(pair[1].reply_to.is_some());
        }
        for post in recorded.iter() {
            assert!(post.content.chars().count() <= 20);
        }
    }

    #[tokio::test]
    async fn test_thread_mode_on_non_threading_platform_posts_once() {
        let mock = MockPlatform::without_threading("linkedin", 3000);
        let (_, recorded) = mock.handles();
        let coordinator = CrosspostCoordinator::new(vec![Box::new(mock)]);

        let long_text = "word ".repeat(100);
        let mut req = request(long_text.trim(), &["linkedin"]);
        req.thread_mode = true;

        let result = coordinator.crosspost(&req).await.unwrap();

        assert!(result.outcome_for("linkedin").unwrap().success);
        let recorded = recorded.lock().unwrap();
        // One unchunked post with the full text, no numbering applied
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].content, long_text.trim());
        assert!(!recorded[0].content.contains("(1/"));
    }

    #[tokio::test]
    async fn test_thread_partial_failure_surfaces_in_outcome() {
        // Limit 20 makes the content a three-chunk thread; the second
        // chunk fails mid-thread
        let twitter = MockPlatform::new(crate::platforms::mock::MockConfig {
            name: "twitter".to_string(),
            character_limit: 20,
            fail_from_call: Some(2),
            post_error: Some("rate limited".to_string()),
            ..Default::default()
        });
        let linkedin = MockPlatform::without_threading("linkedin", 3000);
        let coordinator =
            CrosspostCoordinator::new(vec![Box::new(twitter), Box::new(linkedin)]);

        let mut req = request(
            "alpha beta gamma delta epsilon zeta eta theta iota kappa",
            &["twitter", "linkedin"],
        );
        req.thread_mode = true;

        let result = coordinator.crosspost(&req).await.unwrap();

        // LinkedIn still succeeds; the aggregate is a partial success
        assert_eq!(result.status, StatusClass::PartialSuccess);

        let twitter_outcome = result.outcome_for("twitter").unwrap();
        assert!(!twitter_outcome.success);
        let thread = twitter_outcome.thread.as_ref().unwrap();
        assert!(thread.chunks[0].success, "first chunk stays posted");
        assert!(!thread.chunks.last().unwrap().success);
    }

    #[tokio::test]
    async fn test_oversized_word_in_thread_mode_fails_fast() {
        // A single word longer than the limit survives chunking oversized
        // (it is never split mid-word) and must be rejected before I/O
        let mock = MockPlatform::with_limit("twitter", 10);
        let (calls, _) = mock.handles();
        let coordinator = CrosspostCoordinator::new(vec![Box::new(mock)]);

        let mut req = request("pneumonoultramicroscopicsilicovolcanoconiosis", &["twitter"]);
        req.thread_mode = true;

        let result = coordinator.crosspost(&req).await.unwrap();

        assert!(!result.outcome_for("twitter").unwrap().success);
        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_connected_names() {
        let coordinator = CrosspostCoordinator::new(vec![
            Box::new(MockPlatform::success("twitter")),
            Box::new(MockPlatform::success("linkedin")),
        ]);

        assert_eq!(coordinator.connected(), vec!["twitter", "linkedin"]);
    }

    #[test]
    fn test_create_platforms_no_enabled_platforms() {
        let config = Config {
            twitter: None,
            linkedin: None,
            defaults: Default::default(),
        };

        let platforms = create_platforms(&config, None).unwrap();
        assert!(platforms.is_empty());
    }

    #[test]
    fn test_create_platforms_disabled_platform_skipped() {
        let config = Config {
            twitter: Some(crate::config::TwitterConfig {
                enabled: false,
                token_file: None,
                api_url: None,
                upload_url: None,
            }),
            linkedin: None,
            defaults: Default::default(),
        };

        let platforms = create_platforms(&config, None).unwrap();
        assert!(platforms.is_empty());
    }

    #[test]
    #[serial]
    fn test_create_platforms_with_token_file() {
        use std::io::Write;

        let mut token_file = tempfile::NamedTempFile::new().unwrap();
        token_file.write_all(b"file-token\n").unwrap();
        token_file.flush().unwrap();

        let config = Config {
            twitter: Some(crate::config::TwitterConfig {
                enabled: true,
                token_file: Some(token_file.path().to_str().unwrap().to_string()),
                api_url: None,
                upload_url: None,
            }),
            linkedin: None,
            defaults: Default::default(),
        };

        let platforms = create_platforms(&config, None).unwrap();
        assert_eq!(platforms.len(), 1);
        assert_eq!(platforms[0].name(), "twitter");
    }

    #[test]
    #[serial]
    fn test_create_platforms_enabled_without_token_errors() {
        let config = Config {
            linkedin: Some(crate::config::LinkedinConfig {
                enabled: true,
                token_file: None,
                api_url: None,
            }),
            twitter: None,
            defaults: Default::default(),
        };

        let result = create_platforms(&config, None);
        match result {
            Err(CrosscastError::Platform(PlatformError::NotConnected(msg))) => {
                assert!(msg.contains("linkedin"));
            }
            _ => panic!("Expected NotConnected error for missing token"),
        }
    }

    #[test]
    #[serial]
    fn test_create_platforms_filter() {
        use std::io::Write;

        let mut token_file = tempfile::NamedTempFile::new().unwrap();
        token_file.write_all(b"file-token").unwrap();
        token_file.flush().unwrap();
        let path = token_file.path().to_str().unwrap().to_string();

        let config = Config {
            twitter: Some(crate::config::TwitterConfig {
                enabled: true,
                token_file: Some(path.clone()),
                api_url: None,
                upload_url: None,
            }),
            linkedin: Some(crate::config::LinkedinConfig {
                enabled: true,
                token_file: Some(path),
                api_url: None,
            }),
            defaults: Default::default(),
        };

        let platforms = create_platforms(&config, Some(&["linkedin".to_string()])).unwrap();
        assert_eq!(platforms.len(), 1);
        assert_eq!(platforms[0].name(), "linkedin");
    }
}
