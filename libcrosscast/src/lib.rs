//! Crosscast - post once, publish everywhere
//!
//! This library provides core functionality for cross-posting content to
//! multiple social platforms from a single submission, including
//! thread-aware splitting of long text for platforms with tight character
//! limits.

pub mod chunker;
pub mod config;
pub mod crosspost;
pub mod error;
pub mod logging;
pub mod platforms;
pub mod thread;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use crosspost::{create_platforms, CrosspostCoordinator};
pub use error::{CrosscastError, Result};
pub use types::{AggregateResult, PlatformOutcome, PostRequest, StatusClass};
