//! Content validation service
//!
//! Pre-submission validation of content against platform requirements:
//! character limits, content size, and empty-content checks. The
//! coordinator re-checks limits before any network call; this service
//! exists so callers (the CLI's `--check` flag, a form frontend) can
//! validate without building platform clients.

use std::collections::HashMap;

use crate::platforms::linkedin::LINKEDIN_CHAR_LIMIT;
use crate::platforms::twitter::TWITTER_CHAR_LIMIT;

/// Maximum content size in bytes (100KB)
const MAX_CONTENT_LENGTH: usize = 100 * 1024;

/// Service for validating content against platform requirements
#[derive(Debug, Clone, Default)]
pub struct ValidationService;

/// Request to validate content for specific platforms
#[derive(Debug, Clone)]
pub struct ValidationRequest {
    /// Content to validate
    pub content: String,
    /// Platforms to validate against
    pub platforms: Vec<String>,
    /// If true, thread-capable platforms skip the character limit (the
    /// content will be split into chunks)
    pub thread_mode: bool,
    /// Whether the submission carries a media attachment
    pub has_media: bool,
}

/// Response containing validation results
#[derive(Debug, Clone)]
pub struct ValidationResponse {
    /// Whether content is valid for all requested platforms
    pub valid: bool,
    /// Per-platform validation results
    pub results: Vec<PlatformValidation>,
}

/// Validation result for a single platform
#[derive(Debug, Clone)]
pub struct PlatformValidation {
    /// Platform name
    pub platform: String,
    /// Whether content is valid for this platform
    pub valid: bool,
    /// Validation errors (if any)
    pub errors: Vec<String>,
    /// Validation warnings (non-blocking)
    pub warnings: Vec<String>,
}

impl ValidationService {
    pub fn new() -> Self {
        Self
    }

    /// Validate content for the specified platforms
    pub fn validate(&self, request: ValidationRequest) -> ValidationResponse {
        let mut results = Vec::new();
        let mut all_valid = true;

        for platform in &request.platforms {
            let validation = self.validate_for_platform(
                &request.content,
                platform,
                request.thread_mode,
                request.has_media,
            );
            if !validation.valid {
                all_valid = false;
            }
            results.push(validation);
        }

        ValidationResponse {
            valid: all_valid,
            results,
        }
    }

    /// Check if content is valid for all specified platforms
    pub fn is_valid(&self, content: &str, platforms: &[String]) -> bool {
        let request = ValidationRequest {
            content: content.to_string(),
            platforms: platforms.to_vec(),
            thread_mode: false,
            has_media: false,
        };
        self.validate(request).valid
    }

    /// Get character limits for the specified platforms
    ///
    /// `None` means the platform is unknown to this service.
    pub fn get_limits(&self, platforms: &[String]) -> HashMap<String, Option<usize>> {
        let mut limits = HashMap::new();

        for platform in platforms {
            let limit = match platform.as_str() {
                "twitter" => Some(TWITTER_CHAR_LIMIT),
                "linkedin" => Some(LINKEDIN_CHAR_LIMIT),
                _ => None,
            };
            limits.insert(platform.clone(), limit);
        }

        limits
    }

    fn validate_for_platform(
        &self,
        content: &str,
        platform: &str,
        thread_mode: bool,
        has_media: bool,
    ) -> PlatformValidation {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if content.trim().is_empty() && !has_media {
            errors.push("Content cannot be empty or whitespace-only".to_string());
        }

        if content.len() > MAX_CONTENT_LENGTH {
            errors.push(format!(
                "Content size ({} bytes) exceeds maximum allowed size ({} bytes)",
                content.len(),
                MAX_CONTENT_LENGTH
            ));
        }

        let char_count = content.chars().count();

        match platform {
            "twitter" => {
                if thread_mode {
                    // Content will be split; per-chunk limits apply later
                    if has_media {
                        warnings.push(
                            "Media attachments are not posted with threads".to_string(),
                        );
                    }
                } else if char_count > TWITTER_CHAR_LIMIT {
                    errors.push(format!(
                        "Content length ({} characters) exceeds Twitter limit of {} characters",
                        char_count, TWITTER_CHAR_LIMIT
                    ));
                }
            }
            "linkedin" => {
                // LinkedIn has no threading; the full text must fit even
                // when thread mode targets another platform
                if char_count > LINKEDIN_CHAR_LIMIT {
                    errors.push(format!(
                        "Content length ({} characters) exceeds LinkedIn limit of {} characters",
                        char_count, LINKEDIN_CHAR_LIMIT
                    ));
                }
            }
            _ => {
                warnings.push(format!(
                    "Unknown platform '{}', skipping platform-specific validation",
                    platform
                ));
            }
        }

        PlatformValidation {
            platform: platform.to_string(),
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}
