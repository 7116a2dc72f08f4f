//! Sequential thread posting
//!
//! Drives the ordered posting of chunked content through a platform's
//! reply capability. Each chunk is posted as a reply to the previously
//! posted chunk's remote id, so posting is strictly sequential: the next
//! call cannot be issued until the previous one has resolved.
//!
//! A reply chain cannot skip a broken link. When a chunk fails, posting
//! stops immediately; chunks already posted stay up (the platforms offer
//! no atomic multi-post primitive) and are reported to the caller as
//! partial successes.

use tracing::{info, warn};

use crate::error::{PlatformError, Result};
use crate::platforms::Platform;
use crate::types::{Chunk, ChunkRecord, ThreadOutcome};

/// Post an ordered sequence of chunks as a reply-chained thread.
///
/// # Errors
///
/// Fails with `PlatformError::EmptyThread` before any network interaction
/// when `chunks` is empty. Per-chunk upstream failures do not error the
/// call; they end the thread early and are reported in the returned
/// [`ThreadOutcome`].
pub async fn post_thread(platform: &dyn Platform, chunks: &[Chunk]) -> Result<ThreadOutcome> {
    if chunks.is_empty() {
        return Err(PlatformError::EmptyThread.into());
    }

    let mut records: Vec<ChunkRecord> = Vec::with_capacity(chunks.len());
    let mut last_id: Option<String> = None;

    for chunk in chunks {
        match platform.post_reply(&chunk.text, last_id.as_deref()).await {
            Ok(remote_id) => {
                info!(
                    platform = platform.name(),
                    chunk = chunk.index + 1,
                    total = chunk.total,
                    remote_id = %remote_id,
                    "thread chunk posted"
                );
                records.push(ChunkRecord {
                    index: chunk.index,
                    remote_id: Some(remote_id.clone()),
                    success: true,
                    error: None,
                });
                last_id = Some(remote_id);
            }
            Err(e) => {
                warn!(
                    platform = platform.name(),
                    chunk = chunk.index + 1,
                    total = chunk.total,
                    posted = records.len(),
                    "thread aborted mid-way: {}",
                    e
                );
                records.push(ChunkRecord {
                    index: chunk.index,
                    remote_id: None,
                    success: false,
                    error: Some(e.to_string()),
                });
                return Ok(ThreadOutcome {
                    success: false,
                    thread_id: None,
                    chunks: records,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    Ok(ThreadOutcome {
        success: true,
        thread_id: last_id,
        chunks: records,
        error: None,
    })
}
