//! LinkedIn platform implementation
//!
//! Posts UGC shares on behalf of the member that owns the caller-supplied
//! OAuth access token. The member URN comes from the OpenID `/v2/userinfo`
//! endpoint (`sub` claim); shares go through `/v2/ugcPosts`. Media is
//! registered with the assets API, uploaded to the returned URL, and
//! referenced from the share by asset URN.
//!
//! LinkedIn has no reply-chaining primitive, so this platform reports
//! `supports_threading() == false` and long submissions are posted as a
//! single share.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::{PlatformError, Result};
use crate::platforms::Platform;
use crate::types::MediaAttachment;

/// LinkedIn's character limit for a share commentary
pub const LINKEDIN_CHAR_LIMIT: usize = 3000;

const DEFAULT_API_URL: &str = "https://api.linkedin.com";
const RESTLI_HEADER: (&str, &str) = ("X-Restli-Protocol-Version", "2.0.0");

/// LinkedIn platform client
pub struct LinkedinClient {
    http: Client,
    access_token: SecretString,
    api_url: String,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    /// The member id ("subject") of the token owner
    sub: String,
}

#[derive(Debug, Deserialize)]
struct UgcPostResponse {
    id: String,
}

impl LinkedinClient {
    /// Create a new LinkedIn client for a member access token
    pub fn new(access_token: SecretString) -> Result<Self> {
        Self::with_api_url(access_token, DEFAULT_API_URL.to_string())
    }

    /// Create a client against a non-default API host
    pub fn with_api_url(access_token: SecretString, api_url: String) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(format!("crosscast/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                PlatformError::Upstream(format!("failed to build LinkedIn HTTP client: {}", e))
            })?;

        Ok(Self {
            http,
            access_token,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resolve the author URN for the token owner
    async fn author_urn(&self) -> Result<String> {
        let response = self
            .http
            .get(format!("{}/v2/userinfo", self.api_url))
            .bearer_auth(self.access_token.expose_secret())
            .send()
            .await
            .map_err(|e| upstream_error("userinfo", e))?;

        let info: UserInfo = read_json(response, "userinfo").await?;
        Ok(format!("urn:li:person:{}", info.sub))
    }

    /// Register and upload a media asset, returning its URN
    async fn upload_asset(&self, author: &str, media: &MediaAttachment) -> Result<String> {
        let recipe = if media.mime_type.is_video() {
            "urn:li:digitalmediaRecipe:feedshare-video"
        } else {
            "urn:li:digitalmediaRecipe:feedshare-image"
        };

        let register_body = json!({
            "registerUploadRequest": {
                "recipes": [recipe],
                "owner": author,
                "serviceRelationships": [{
                    "relationshipType": "OWNER",
                    "identifier": "urn:li:userGeneratedContent"
                }]
            }
        });

        let response = self
            .http
            .post(format!("{}/v2/assets?action=registerUpload", self.api_url))
            .bearer_auth(self.access_token.expose_secret())
            .header(RESTLI_HEADER.0, RESTLI_HEADER.1)
            .json(&register_body)
            .send()
            .await
            .map_err(|e| upstream_error("register upload", e))?;

        let registered: serde_json::Value = read_json(response, "register upload").await?;

        let upload_url = registered
            .pointer(concat!(
                "/value/uploadMechanism",
                "/com.linkedin.digitalmedia.uploading.MediaUploadHttpRequest",
                "/uploadUrl"
            ))
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                PlatformError::Upstream("LinkedIn register upload returned no uploadUrl".to_string())
            })?
            .to_string();
        let asset = registered
            .pointer("/value/asset")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                PlatformError::Upstream("LinkedIn register upload returned no asset URN".to_string())
            })?
            .to_string();

        debug!(
            asset = %asset,
            bytes = media.size(),
            sha256 = %media.sha256,
            "uploading media asset to LinkedIn"
        );

        let upload_response = self
            .http
            .put(&upload_url)
            .bearer_auth(self.access_token.expose_secret())
            .header("Content-Type", media.mime_type.as_str())
            .body(media.data.clone())
            .send()
            .await
            .map_err(|e| upstream_error("asset upload", e))?;

        let status = upload_response.status();
        if !status.is_success() {
            let body = upload_response.text().await.unwrap_or_default();
            return Err(PlatformError::Upstream(format!(
                "LinkedIn asset upload rejected ({}): {}",
                status, body
            ))
            .into());
        }

        Ok(asset)
    }
}

#[async_trait]
impl Platform for LinkedinClient {
    async fn post(&self, content: &str, media: Option<&MediaAttachment>) -> Result<String> {
        self.validate_content(content)?;

        let author = self.author_urn().await?;

        let share_content = match media {
            Some(attachment) => {
                let asset = self.upload_asset(&author, attachment).await?;
                let category = if attachment.mime_type.is_video() {
                    "VIDEO"
                } else {
                    "IMAGE"
                };
                let mut entry = json!({ "status": "READY", "media": asset });
                if let Some(alt) = &attachment.alt_text {
                    entry["description"] = json!({ "text": alt });
                }
                json!({
                    "shareCommentary": { "text": content },
                    "shareMediaCategory": category,
                    "media": [entry]
                })
            }
            None => json!({
                "shareCommentary": { "text": content },
                "shareMediaCategory": "NONE"
            }),
        };

        let body = json!({
            "author": author,
            "lifecycleState": "PUBLISHED",
            "specificContent": { "com.linkedin.ugc.ShareContent": share_content },
            "visibility": { "com.linkedin.ugc.MemberNetworkVisibility": "PUBLIC" }
        });

        let response = self
            .http
            .post(format!("{}/v2/ugcPosts", self.api_url))
            .bearer_auth(self.access_token.expose_secret())
            .header(RESTLI_HEADER.0, RESTLI_HEADER.1)
            .json(&body)
            .send()
            .await
            .map_err(|e| upstream_error("ugc post", e))?;

        let created: UgcPostResponse = read_json(response, "ugc post").await?;
        debug!(share_id = %created.id, "LinkedIn share created");
        Ok(created.id)
    }

    fn name(&self) -> &str {
        "linkedin"
    }

    fn character_limit(&self) -> usize {
        LINKEDIN_CHAR_LIMIT
    }

    fn supports_media(&self) -> bool {
        true
    }
}

/// Convert a transport-level failure into an upstream error
fn upstream_error(context: &str, error: reqwest::Error) -> PlatformError {
    PlatformError::Upstream(format!("LinkedIn {} request failed: {}", context, error))
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
            "LinkedIn {} rejected ({}): {}",
            context, status, body
        ))
        .into());
    }

    serde_json::from_str(&body).map_err(|e| {
        PlatformError::Upstream(format!(
            "LinkedIn {} returned unexpected body ({}): {}",
            context, e, body
        ))
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> LinkedinClient {
        LinkedinClient::new(SecretString::from("test-token")).expect("client should build")
    }

    #[test]
    fn test_client_capabilities() {
        let client = test_client();

        assert_eq!(client.name(), "linkedin");
        assert_eq!(client.character_limit(), 3000);
        assert!(!client.supports_threading());
        assert!(client.supports_media());
    }

    #[test]
    fn test_validate_content_boundary() {
        let client = test_client();

        assert!(client.validate_content(&"a".repeat(3000)).is_ok());
        assert!(client.validate_content(&"a".repeat(3001)).is_err());
    }

    #[test]
    fn test_validate_content_error_kind() {
        let client = test_client();

        let result = client.validate_content(&"a".repeat(3500));
        match result {
            Err(crate::error::CrosscastError::Platform(PlatformError::ContentTooLong(msg))) => {
                assert!(msg.contains("3000"));
            }
            _ => panic!("Expected ContentTooLong error"),
        }
    }

    #[tokio::test]
    async fn test_post_reply_unsupported() {
        let client = test_client();

        let result = client.post_reply("part two", Some("urn:li:share:1")).await;
        match result {
            Err(crate::error::CrosscastError::Platform(PlatformError::Upstream(msg))) => {
                assert!(msg.contains("does not support threaded replies"));
            }
            _ => panic!("Expected upstream error for unsupported reply"),
        }
    }

    #[test]
    fn test_userinfo_deserialization() {
        let body = r#"{"sub":"782bbtaQ","name":"Ada Lovelace","locale":"en-US"}"#;
        let info: UserInfo = serde_json::from_str(body).unwrap();

        assert_eq!(info.sub, "782bbtaQ");
    }

    #[test]
    fn test_ugc_response_deserialization() {
        let body = r#"{"id":"urn:li:share:6844785523593134080"}"#;
        let response: UgcPostResponse = serde_json::from_str(body).unwrap();

        assert_eq!(response.id, "urn:li:share:6844785523593134080");
    }

    #[test]
    fn test_register_upload_response_pointers() {
        // Shape returned by the assets registerUpload action
        let body = json!({
            "value": {
                "uploadMechanism": {
                    "com.linkedin.digitalmedia.uploading.MediaUploadHttpRequest": {
                        "uploadUrl": "https://api.linkedin.com/mediaUpload/abc",
                        "headers": {}
                    }
                },
                "asset": "urn:li:digitalmediaAsset:abc"
            }
        });

        let upload_url = body
            .pointer(concat!(
                "/value/uploadMechanism",
                "/com.linkedin.digitalmedia.uploading.MediaUploadHttpRequest",
                "/uploadUrl"
            ))
            .and_then(|v| v.as_str());
        let asset = body.pointer("/value/asset").and_then(|v| v.as_str());

        assert_eq!(upload_url, Some("https://api.linkedin.com/mediaUpload/abc"));
        assert_eq!(asset, Some("urn:li:digitalmediaAsset:abc"));
    }

    #[test]
    fn test_api_url_trailing_slash_trimmed() {
        let client = LinkedinClient::with_api_url(
            SecretString::from("token"),
            "https://api.example.test/".to_string(),
        )
        .unwrap();

        assert_eq!(client.api_url, "https://api.example.test");
    }
}
