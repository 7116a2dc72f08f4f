//! cross-post - post content to Twitter and LinkedIn from one command

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Parser;

use libcrosscast::config::Config;
use libcrosscast::crosspost::{create_platforms, CrosspostCoordinator};
use libcrosscast::logging::{LogFormat, LoggingConfig};
use libcrosscast::types::{MediaAttachment, MediaMimeType, PostRequest, StatusClass};
use libcrosscast::validation::{ValidationRequest, ValidationService};
use libcrosscast::{CrosscastError, Result};

#[derive(Parser, Debug)]
#[command(name = "cross-post")]
#[command(about = "Cross-post content to Twitter and LinkedIn", long_about = None)]
struct Cli {
    /// Content to post (reads from stdin if not provided)
    content: Option<String>,

    /// Target specific platform(s) (comma-separated)
    #[arg(short, long)]
    platform: Option<String>,

    /// Split long content into a reply-chained thread where supported
    #[arg(short, long)]
    thread: bool,

    /// Attach a media file (image or mp4)
    #[arg(short, long)]
    media: Option<PathBuf>,

    /// Alt text for the media attachment
    #[arg(long, requires = "media")]
    alt: Option<String>,

    /// Validate the content without posting
    #[arg(long)]
    check: bool,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Path to a config file (defaults to the XDG location)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    LoggingConfig::new(LogFormat::Text, level.to_string(), cli.verbose).init();

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> Result<i32> {
    let content = resolve_content(cli.content)?;

    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load_or_default()?,
    };

    let platforms = match &cli.platform {
        Some(list) => parse_platform_list(list),
        None => config.defaults.platforms.clone(),
    };

    let mut request = PostRequest::new(content, platforms.clone());
    request.thread_mode = cli.thread;
    if let Some(path) = &cli.media {
        request.media = Some(load_media(path, cli.alt.clone())?);
    }

    if cli.check {
        return run_check(&request, &cli.format);
    }

    let capabilities = create_platforms(&config, Some(&platforms))?;
    let coordinator = CrosspostCoordinator::new(capabilities);
    let result = coordinator.crosspost(&request).await?;

    if cli.format == "json" {
        println!("{}", serde_json::to_string_pretty(&result).unwrap_or_default());
    } else {
        for outcome in &result.outcomes {
            if outcome.success {
                println!(
                    "{}: posted {}",
                    outcome.platform,
                    outcome.post_id.as_deref().unwrap_or("")
                );
                if let Some(thread) = &outcome.thread {
                    println!("{}: thread of {} posts", outcome.platform, thread.chunks.len());
                }
            } else {
                eprintln!(
                    "{}: failed: {}",
                    outcome.platform,
                    outcome.error.as_deref().unwrap_or("unknown error")
                );
                if let Some(thread) = &outcome.thread {
                    let posted = thread.chunks.iter().filter(|c| c.success).count();
                    eprintln!(
                        "{}: {} of {} thread posts went out before the failure",
                        outcome.platform,
                        posted,
                        thread.chunks.last().map(|c| c.index + 1).unwrap_or(0)
                    );
                }
            }
        }
        println!("status: {}", result.status);
    }

    Ok(match result.status {
        StatusClass::TotalFailure => 1,
        _ => 0,
    })
}

/// Validate without posting; exit code 3 when the content is invalid
fn run_check(request: &PostRequest, format: &str) -> Result<i32> {
    let service = ValidationService::new();
    let response = service.validate(ValidationRequest {
        content: request.content.clone(),
        platforms: request.platforms.clone(),
        thread_mode: request.thread_mode,
        has_media: request.media.is_some(),
    });

    if format == "json" {
        let results: Vec<serde_json::Value> = response
            .results
            .iter()
            .map(|r| {
                serde_json::json!({
                    "platform": r.platform,
                    "valid": r.valid,
                    "errors": r.errors,
                    "warnings": r.warnings,
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "valid": response.valid,
                "results": results,
            }))
            .unwrap_or_default()
        );
    } else {
        for result in &response.results {
            let verdict = if result.valid { "ok" } else { "invalid" };
            println!("{}: {}", result.platform, verdict);
            for error in &result.errors {
                println!("  error: {}", error);
            }
            for warning in &result.warnings {
                println!("  warning: {}", warning);
            }
        }
    }

    Ok(if response.valid { 0 } else { 3 })
}

/// Use the argument if given, otherwise read piped stdin
fn resolve_content(arg: Option<String>) -> Result<String> {
    if let Some(content) = arg {
        return Ok(content);
    }

    if atty::is(atty::Stream::Stdin) {
        return Err(CrosscastError::InvalidInput(
            "no content provided; pass it as an argument or pipe it on stdin".to_string(),
        ));
    }

    let mut content = String::new();
    std::io::stdin()
        .read_to_string(&mut content)
        .map_err(|e| CrosscastError::InvalidInput(format!("failed to read stdin: {}", e)))?;
    Ok(content.trim_end().to_string())
}

fn parse_platform_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Read a media file into an in-memory attachment
fn load_media(path: &Path, alt_text: Option<String>) -> Result<MediaAttachment> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    let mime_type = MediaMimeType::from_extension(extension).ok_or_else(|| {
        CrosscastError::InvalidInput(format!(
            "unsupported media type '{}'; supported: jpg, png, gif, webp, mp4",
            extension
        ))
    })?;

    let data = std::fs::read(path)
        .map_err(|e| CrosscastError::InvalidInput(format!("failed to read {}: {}", path.display(), e)))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("attachment")
        .to_string();

    Ok(MediaAttachment::new(file_name, mime_type, data, alt_text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_basic_invocation() {
        let cli = Cli::try_parse_from(["cross-post", "hello world"]).unwrap();

        assert_eq!(cli.content.as_deref(), Some("hello world"));
        assert!(!cli.thread);
        assert!(!cli.check);
        assert_eq!(cli.format, "text");
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::try_parse_from([
            "cross-post",
            "--platform",
            "twitter,linkedin",
            "--thread",
            "--format",
            "json",
            "long announcement",
        ])
        .unwrap();

        assert_eq!(cli.platform.as_deref(), Some("twitter,linkedin"));
        assert!(cli.thread);
        assert_eq!(cli.format, "json");
    }

    #[test]
    fn test_cli_alt_requires_media() {
        let result = Cli::try_parse_from(["cross-post", "--alt", "a sunset", "content"]);
        assert!(result.is_err());

        let result = Cli::try_parse_from([
            "cross-post",
            "--media",
            "/tmp/pic.jpg",
            "--alt",
            "a sunset",
            "content",
        ]);
        assert!(result.is_ok());
    }

    #[test]
    fn test_parse_platform_list() {
        assert_eq!(
            parse_platform_list("twitter, LinkedIn"),
            vec!["twitter", "linkedin"]
        );
        assert_eq!(parse_platform_list("twitter,,"), vec!["twitter"]);
    }

    #[test]
    fn test_load_media_from_file() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.png");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(&[0x89, 0x50, 0x4E, 0x47]).unwrap();

        let attachment = load_media(&path, Some("screenshot".to_string())).unwrap();

        assert_eq!(attachment.file_name, "shot.png");
        assert_eq!(attachment.mime_type, MediaMimeType::Png);
        assert_eq!(attachment.size(), 4);
        assert_eq!(attachment.alt_text.as_deref(), Some("screenshot"));
    }

    #[test]
    fn test_load_media_unsupported_extension() {
        let result = load_media(Path::new("/tmp/notes.txt"), None);

        match result {
            Err(CrosscastError::InvalidInput(msg)) => {
                assert!(msg.contains("unsupported media type"));
            }
            _ => panic!("expected InvalidInput for unsupported extension"),
        }
    }

    #[test]
    fn test_resolve_content_prefers_argument() {
        let content = resolve_content(Some("from arg".to_string())).unwrap();
        assert_eq!(content, "from arg");
    }
}
