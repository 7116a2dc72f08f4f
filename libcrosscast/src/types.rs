//! Core types for Crosscast

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// A single cross-posting submission.
///
/// Carries everything the coordinator needs for one request: the text, an
/// optional in-memory media attachment, the requested platform names, and
/// whether long text should be threaded on platforms that support it.
#[derive(Debug, Clone)]
pub struct PostRequest {
    pub id: String,
    pub content: String,
    pub media: Option<MediaAttachment>,
    pub platforms: Vec<String>,
    pub thread_mode: bool,
}

impl PostRequest {
    pub fn new(content: String, platforms: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content,
            media: None,
            platforms,
            thread_mode: false,
        }
    }

    /// True when the request carries neither text nor media.
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty() && self.media.is_none()
    }
}

// ============================================================================
// Media Types
// ============================================================================

/// Supported media MIME types for attachments
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MediaMimeType {
    Jpeg,
    Png,
    Gif,
    WebP,
    Mp4,
}

impl MediaMimeType {
    /// Parse MIME type from a MIME string (e.g., "image/jpeg")
    pub fn from_mime_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/gif" => Some(Self::Gif),
            "image/webp" => Some(Self::WebP),
            "video/mp4" => Some(Self::Mp4),
            _ => None,
        }
    }

    /// Detect MIME type from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            "webp" => Some(Self::WebP),
            "mp4" => Some(Self::Mp4),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::WebP => "image/webp",
            Self::Mp4 => "video/mp4",
        }
    }

    pub fn is_video(&self) -> bool {
        matches!(self, Self::Mp4)
    }
}

impl std::fmt::Display for MediaMimeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A media attachment for a post
///
/// Attachments are held in memory for the duration of one request; nothing
/// is written to disk or a database. The sha256 field provides integrity
/// verification for upload logging.
#[derive(Debug, Clone)]
pub struct MediaAttachment {
    pub file_name: String,
    pub mime_type: MediaMimeType,
    pub data: Vec<u8>,
    pub alt_text: Option<String>,
    pub sha256: String,
}

impl MediaAttachment {
    /// Create an attachment, hashing the content on construction
    pub fn new(
        file_name: String,
        mime_type: MediaMimeType,
        data: Vec<u8>,
        alt_text: Option<String>,
    ) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(&data);
        let sha256 = format!("{:x}", hasher.finalize());

        Self {
            file_name,
            mime_type,
            data,
            alt_text,
            sha256,
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

// ============================================================================
// Thread Types
// ============================================================================

/// One bounded-length segment of a long text, destined for one post in a
/// thread. `index` is 0-based; `total` is the number of chunks in the
/// sequence the chunk belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub index: usize,
    pub total: usize,
    pub text: String,
}

/// The outcome of attempting to post one chunk of a thread
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub index: usize,
    pub remote_id: Option<String>,
    pub success: bool,
    pub error: Option<String>,
}

/// Result of posting a full thread to one platform.
///
/// `chunks` lists every attempted chunk in order. Chunks after the first
/// failure are never attempted and do not appear; chunks posted before the
/// failure are reported as successes and are not retracted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadOutcome {
    pub success: bool,
    /// Remote id of the last chunk when the whole thread posted
    pub thread_id: Option<String>,
    pub chunks: Vec<ChunkRecord>,
    pub error: Option<String>,
}

// ============================================================================
// Aggregate Types
// ============================================================================

/// Result of posting to a single platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformOutcome {
    /// Platform name (e.g., "twitter", "linkedin")
    pub platform: String,
    /// Whether the post was successful
    pub success: bool,
    /// Platform-specific post ID (if successful)
    pub post_id: Option<String>,
    /// Error message (if failed)
    pub error: Option<String>,
    /// Per-chunk detail when the platform posted a thread
    pub thread: Option<ThreadOutcome>,
    /// When the post completed (Unix timestamp, successful posts only)
    pub posted_at: Option<i64>,
}

impl PlatformOutcome {
    pub fn succeeded(platform: &str, post_id: String) -> Self {
        Self {
            platform: platform.to_string(),
            success: true,
            post_id: Some(post_id),
            error: None,
            thread: None,
            posted_at: Some(chrono::Utc::now().timestamp()),
        }
    }

    pub fn failed(platform: &str, error: String) -> Self {
        Self {
            platform: platform.to_string(),
            success: false,
            post_id: None,
            error: Some(error),
            thread: None,
            posted_at: None,
        }
    }
}

/// Classification of a whole crosspost attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusClass {
    FullSuccess,
    PartialSuccess,
    TotalFailure,
}

impl std::fmt::Display for StatusClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FullSuccess => write!(f, "full-success"),
            Self::PartialSuccess => write!(f, "partial-success"),
            Self::TotalFailure => write!(f, "total-failure"),
        }
    }
}

/// The joined outcome across all platforms attempted for one submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateResult {
    pub overall_success: bool,
    pub status: StatusClass,
    pub outcomes: Vec<PlatformOutcome>,
}

impl AggregateResult {
    /// Join per-platform outcomes into an aggregate status.
    ///
    /// Full success requires every requested platform to have succeeded and
    /// at least one to have been requested; an empty outcome list is a
    /// total failure.
    pub fn from_outcomes(outcomes: Vec<PlatformOutcome>) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.success).count();

        let status = if outcomes.is_empty() || succeeded == 0 {
            StatusClass::TotalFailure
        } else if succeeded == outcomes.len() {
            StatusClass::FullSuccess
        } else {
            StatusClass::PartialSuccess
        };

        Self {
            overall_success: succeeded > 0,
            status,
            outcomes,
        }
    }

    pub fn outcome_for(&self, platform: &str) -> Option<&PlatformOutcome> {
        self.outcomes.iter().find(|o| o.platform == platform)
    }
}
