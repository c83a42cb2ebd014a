//! The watermarking pipeline: load → adjust → watermark → save.
//!
//! A run walks four stages in order and either reaches [`Stage::Saved`] or
//! stops at the first error:
//!
//! ```text
//! Loaded       input decoded to RGBA
//! Adjusted     zero or one tone adjustment applied
//! Watermarked  exactly one text or image overlay composited
//! Saved        written next to the input under a fresh name
//! ```
//!
//! Nothing is retried here. A failed run leaves no output file behind; the
//! caller decides whether to ask again (see `main.rs`).
//!
//! Progress is reported as [`PipelineEvent`]s on an optional channel, so the
//! CLI can print each stage as it completes.

use crate::imaging::{
    FsStore, ImageStore, StoreError, ToneAdjustment, Watermark, WatermarkSettings, apply_tone,
    apply_watermark,
};
use crate::naming::{NamingError, resolve_output_name};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Naming(#[from] NamingError),
}

/// Coarse classification of a [`PipelineError`] for callers that only care
/// about what went wrong, not the details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    DecodeError,
    InvalidFilename,
    ReadError,
    WriteError,
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Store(StoreError::NotFound(_)) => ErrorKind::NotFound,
            Self::Store(StoreError::Decode { .. }) => ErrorKind::DecodeError,
            Self::Store(StoreError::Read { .. }) => ErrorKind::ReadError,
            Self::Store(StoreError::Write { .. } | StoreError::Encode { .. }) => {
                ErrorKind::WriteError
            }
            Self::Naming(NamingError::InvalidFilename(_)) => ErrorKind::InvalidFilename,
        }
    }
}

/// Where the watermark comes from, before anything is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatermarkSource {
    Text(String),
    Image(PathBuf),
}

/// Everything one run needs, already validated by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRequest {
    pub input: PathBuf,
    pub adjustment: Option<ToneAdjustment>,
    pub watermark: WatermarkSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Loaded,
    Adjusted,
    Watermarked,
    Saved,
}

/// Which overlay a run applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatermarkKind {
    Text { text: String },
    Image { width: u32, height: u32 },
}

impl WatermarkKind {
    fn of(watermark: &Watermark) -> Self {
        match watermark {
            Watermark::Text(text) => Self::Text { text: text.clone() },
            Watermark::Image(img) => Self::Image {
                width: img.width(),
                height: img.height(),
            },
        }
    }
}

/// Progress notification emitted as each stage completes.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    Loaded {
        path: PathBuf,
        width: u32,
        height: u32,
    },
    Adjusted {
        adjustment: Option<ToneAdjustment>,
    },
    Watermarked {
        kind: WatermarkKind,
    },
    Saved {
        path: PathBuf,
    },
}

impl PipelineEvent {
    pub fn stage(&self) -> Stage {
        match self {
            Self::Loaded { .. } => Stage::Loaded,
            Self::Adjusted { .. } => Stage::Adjusted,
            Self::Watermarked { .. } => Stage::Watermarked,
            Self::Saved { .. } => Stage::Saved,
        }
    }
}

fn emit(events: Option<&Sender<PipelineEvent>>, event: PipelineEvent) {
    if let Some(tx) = events {
        // A dropped receiver only means nobody is listening
        tx.send(event).ok();
    }
}

/// Compute where the result for `input` goes: same directory, first free
/// `-with-watermark-N` name.
pub fn resolve_output_path(
    store: &impl ImageStore,
    input: &Path,
) -> Result<PathBuf, PipelineError> {
    let file_name = input
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| NamingError::InvalidFilename(input.display().to_string()))?;

    let dir = match input.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let existing = store.list_names(dir)?;
    let output_name = resolve_output_name(file_name, &existing)?;
    Ok(input.with_file_name(output_name))
}

/// Run the pipeline against the local filesystem.
pub fn run(
    request: RunRequest,
    settings: &WatermarkSettings,
    events: Option<&Sender<PipelineEvent>>,
) -> Result<PathBuf, PipelineError> {
    run_with_store(&FsStore::new(), request, settings, events)
}

/// Run the pipeline using a specific store (allows testing with mock).
pub fn run_with_store(
    store: &impl ImageStore,
    request: RunRequest,
    settings: &WatermarkSettings,
    events: Option<&Sender<PipelineEvent>>,
) -> Result<PathBuf, PipelineError> {
    let RunRequest {
        input,
        adjustment,
        watermark,
    } = request;

    let image = store.load(&input)?;
    emit(
        events,
        PipelineEvent::Loaded {
            path: input.clone(),
            width: image.width(),
            height: image.height(),
        },
    );

    let image = match adjustment {
        Some(adj) => apply_tone(image, adj),
        None => image,
    };
    emit(events, PipelineEvent::Adjusted { adjustment });

    let watermark = match watermark {
        WatermarkSource::Text(text) => Watermark::Text(text),
        WatermarkSource::Image(path) => Watermark::Image(store.load(&path)?),
    };
    let kind = WatermarkKind::of(&watermark);
    let image = apply_watermark(image, watermark, settings);
    emit(events, PipelineEvent::Watermarked { kind });

    let output = resolve_output_path(store, &input)?;
    store.save(&image, &output)?;
    emit(
        events,
        PipelineEvent::Saved {
            path: output.clone(),
        },
    );

    Ok(output)
}
