//! Twitter platform implementation
//!
//! Posts through the v2 `/2/tweets` endpoint using a caller-supplied OAuth
//! 2.0 user access token. Media is uploaded through the v1.1
//! `media/upload` endpoint first and referenced by id from the tweet.
//! Replies carry `reply.in_reply_to_tweet_id`, which is what makes
//! reply-chained threads possible on this platform.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PlatformError, Result};
use crate::platforms::Platform;
use crate::types::MediaAttachment;

/// Twitter's hard character limit for a single tweet
pub const TWITTER_CHAR_LIMIT: usize = 280;

const DEFAULT_API_URL: &str = "https://api.twitter.com";
const DEFAULT_UPLOAD_URL: &str = "https://upload.twitter.com";

/// Twitter platform client
pub struct TwitterClient {
    http: Client,
    access_token: SecretString,
    api_url: String,
    upload_url: String,
}

#[derive(Debug, Serialize)]
struct CreateTweetRequest {
    text: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    reply: Option<TweetReply>,

    #[serde(skip_serializing_if = "Option::is_none")]
    media: Option<TweetMedia>,
}

#[derive(Debug, Serialize)]
struct TweetReply {
    in_reply_to_tweet_id: String,
}

#[derive(Debug, Serialize)]
struct TweetMedia {
    media_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CreateTweetResponse {
    data: CreatedTweet,
}

#[derive(Debug, Deserialize)]
struct CreatedTweet {
    id: String,
}

#[derive(Debug, Deserialize)]
struct MediaUploadResponse {
    media_id_string: String,
}

impl TwitterClient {
    /// Create a new Twitter client for a user access token
    pub fn new(access_token: SecretString) -> Result<Self> {
        Self::with_urls(
            access_token,
            DEFAULT_API_URL.to_string(),
            DEFAULT_UPLOAD_URL.to_string(),
        )
    }

    /// Create a client against non-default API hosts
    ///
    /// Used when the config overrides the API base URL.
    pub fn with_urls(
        access_token: SecretString,
        api_url: String,
        upload_url: String,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(format!("crosscast/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                PlatformError::Upstream(format!("failed to build Twitter HTTP client: {}", e))
            })?;

        Ok(Self {
            http,
            access_token,
            api_url: api_url.trim_end_matches('/').to_string(),
            upload_url: upload_url.trim_end_matches('/').to_string(),
        })
    }

    /// Upload a media attachment, returning the platform media id
    async fn upload_media(&self, media: &MediaAttachment) -> Result<String> {
        debug!(
            file = %media.file_name,
            mime = %media.mime_type,
            bytes = media.size(),
            sha256 = %media.sha256,
            "uploading media to Twitter"
        );

        // The v1.1 upload endpoint takes base64 content in the media_data
        // form field
        let category = match media.mime_type {
            crate::types::MediaMimeType::Mp4 => "tweet_video",
            crate::types::MediaMimeType::Gif => "tweet_gif",
            _ => "tweet_image",
        };
        let form = reqwest::multipart::Form::new()
            .text("media_data", BASE64.encode(&media.data))
            .text("media_category", category);

        let response = self
            .http
            .post(format!("{}/1.1/media/upload.json", self.upload_url))
            .bearer_auth(self.access_token.expose_secret())
            .multipart(form)
            .send()
            .await
            .map_err(|e| upstream_error("media upload", e))?;

        let upload: MediaUploadResponse = read_json(response, "media upload").await?;
        Ok(upload.media_id_string)
    }

    /// Create a tweet, optionally as a reply and/or with attached media
    async fn create_tweet(
        &self,
        content: &str,
        reply_to: Option<&str>,
        media_ids: Option<Vec<String>>,
    ) -> Result<String> {
        self.validate_content(content)?;

        let request = CreateTweetRequest {
            text: content.to_string(),
            reply: reply_to.map(|id| TweetReply {
                in_reply_to_tweet_id: id.to_string(),
            }),
            media: media_ids.map(|ids| TweetMedia { media_ids: ids }),
        };

        let response = self
            .http
            .post(format!("{}/2/tweets", self.api_url))
            .bearer_auth(self.access_token.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| upstream_error("create tweet", e))?;

        let created: CreateTweetResponse = read_json(response, "create tweet").await?;
        debug!(tweet_id = %created.data.id, "tweet created");
        Ok(created.data.id)
    }
}

#[async_trait]
impl Platform for TwitterClient {
    async fn post(&self, content: &str, media: Option<&MediaAttachment>) -> Result<String> {
        let media_ids = match media {
            Some(attachment) => Some(vec![self.upload_media(attachment).await?]),
            None => None,
        };

        self.create_tweet(content, None, media_ids).await
    }

    async fn post_reply(&self, content: &str, reply_to: Option<&str>) -> Result<String> {
        self.create_tweet(content, reply_to, None).await
    }

    fn name(&self) -> &str {
        "twitter"
    }

    fn character_limit(&self) -> usize {
        TWITTER_CHAR_LIMIT
    }

    fn supports_threading(&self) -> bool {
        true
    }

    fn supports_media(&self) -> bool {
        true
    }
}

/// Convert a transport-level failure into an upstream error
fn upstream_error(context: &str, error: reqwest::Error) -> PlatformError {
    PlatformError::Upstream(format!("Twitter {} request failed: {}", context, error))
}

/// Decode a JSON response body, surfacing non-2xx bodies verbatim
async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
    context: &str,
) -> Result<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| upstream_error(context, e))?;

    if !status.is_success() {
        return Err(PlatformError::Upstream(format!(
            "Twitter {} rejected ({}): {}",
            context, status, body
        ))
        .into());
    }

    serde_json::from_str(&body).map_err(|e| {
        PlatformError::Upstream(format!(
            "Twitter {} returned unexpected body ({}): {}",
            context, e, body
        ))
        .into()
    })
}
