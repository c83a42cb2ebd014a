//! CLI output formatting for pipeline runs.
//!
//! # Output Format
//!
//! ```text
//! Loaded img/photo.jpg (1920x1080)
//!     Tone: invert
//!     Watermark: text "© Jan Kowalski"
//! Saved img/photo-with-watermark-1.jpg
//! Watermark added successfully.
//! ```
//!
//! Errors are printed as a single line followed by a hint that the session
//! restarts:
//!
//! ```text
//! Error: File not found: img/missing.jpg
//! Something went wrong... Try again.
//! ```
//!
//! # Architecture
//!
//! Each entry point has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout or stderr.
//! Format functions are pure and do no I/O.

use crate::pipeline::{PipelineError, PipelineEvent, WatermarkKind};
use std::path::Path;

/// Longest watermark text shown verbatim before truncation.
const TEXT_PREVIEW_CHARS: usize = 40;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_text(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max).collect();
        format!("{head}...")
    }
}

/// Format one pipeline progress event.
pub fn format_pipeline_event(event: &PipelineEvent) -> Vec<String> {
    match event {
        PipelineEvent::Loaded {
            path,
            width,
            height,
        } => vec![format!("Loaded {} ({}x{})", path.display(), width, height)],
        PipelineEvent::Adjusted { adjustment } => match adjustment {
            Some(adj) => vec![format!("{}Tone: {}", indent(1), adj)],
            None => Vec::new(),
        },
        PipelineEvent::Watermarked { kind } => {
            let detail = match kind {
                WatermarkKind::Text { text } if text.trim().is_empty() => {
                    "text (empty, nothing drawn)".to_string()
                }
                WatermarkKind::Text { text } => {
                    format!("text \"{}\"", truncate_text(text, TEXT_PREVIEW_CHARS))
                }
                WatermarkKind::Image { width, height } => format!("image {}x{}", width, height),
            };
            vec![format!("{}Watermark: {}", indent(1), detail)]
        }
        PipelineEvent::Saved { path } => vec![format!("Saved {}", path.display())],
    }
}

/// Format the closing lines of a successful run.
pub fn format_success(output: &Path) -> Vec<String> {
    vec![
        "Watermark added successfully.".to_string(),
        format!("{}Output: {}", indent(1), output.display()),
    ]
}

/// Format a failed run.
pub fn format_error(error: &PipelineError) -> Vec<String> {
    vec![
        format!("Error: {}", error),
        "Something went wrong... Try again.".to_string(),
    ]
}

pub fn print_pipeline_event(event: &PipelineEvent) {
    for line in format_pipeline_event(event) {
        println!("{}", line);
    }
}

pub fn print_success(output: &Path) {
    for line in format_success(output) {
        println!("{}", line);
    }
}

pub fn print_error(error: &PipelineError) {
    for line in format_error(error) {
        eprintln!("{}", line);
    }
}
