use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::dataurl;
use crate::error::AttachResult;

/// Pixel dimensions, used both for an image's natural size and for a
/// policy's maximum output size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Server-declared compression guidance for re-encoded images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompressionGuidance {
    None,
    Lossless,
    LossyHigh,
    LossyMedium,
    LossyLow,
}

/// Encoder quality factor for a guidance value. `lossy-high` is also the
/// default when no guidance was declared.
pub fn quality_for(guidance: Option<CompressionGuidance>) -> f32 {
    match guidance {
        Some(CompressionGuidance::Lossless) => 1.0,
        Some(CompressionGuidance::LossyMedium) => 0.85,
        Some(CompressionGuidance::LossyLow) => 0.70,
        Some(CompressionGuidance::LossyHigh)
        | Some(CompressionGuidance::None)
        | Option::None => 0.92,
    }
}

/// One user-attached file, validated and re-encoded, ready for send.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAttachment {
    /// Opaque identifier, collision-free per process.
    pub id: String,
    /// Display filename. Original, or synthesized for clipboard content.
    pub name: String,
    /// MIME type as reported by the source.
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Byte length of the original content.
    pub size: usize,
    /// The bytes re-encoded as `data:<mime>;base64,<payload>`; the canonical
    /// in-memory representation consumed by preview and send code.
    pub data_url: String,
}

static ATTACHMENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Millisecond timestamp plus a process-wide counter, so two attachments
/// created in the same millisecond cannot collide.
pub(crate) fn next_attachment_id() -> String {
    let seq = ATTACHMENT_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("att-{}-{}", Utc::now().timestamp_millis(), seq)
}

impl FileAttachment {
    pub fn from_bytes(name: &str, mime_type: &str, bytes: &[u8]) -> Self {
        Self {
            id: next_attachment_id(),
            name: name.to_string(),
            mime_type: mime_type.to_string(),
            size: bytes.len(),
            data_url: dataurl::encode(mime_type, bytes),
        }
    }
}

/// Where a candidate's bytes live: already in memory (clipboard, drop
/// payloads) or on disk behind a file-picker path.
#[derive(Debug, Clone)]
pub enum ContentSource {
    Memory(Bytes),
    Path(PathBuf),
}

impl ContentSource {
    /// Read the content without blocking the caller. There is no
    /// cancellation; a started read runs to completion or failure.
    pub async fn load(&self) -> AttachResult<Bytes> {
        match self {
            ContentSource::Memory(bytes) => Ok(bytes.clone()),
            ContentSource::Path(path) => Ok(Bytes::from(tokio::fs::read(path).await?)),
        }
    }
}

/// A file the user is trying to attach, before validation.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub name: String,
    pub mime_type: String,
    pub content: ContentSource,
}

impl Candidate {
    pub fn in_memory(name: &str, mime_type: &str, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.to_string(),
            mime_type: mime_type.to_string(),
            content: ContentSource::Memory(bytes.into()),
        }
    }

    pub fn from_path(name: &str, mime_type: &str, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            mime_type: mime_type.to_string(),
            content: ContentSource::Path(path.into()),
        }
    }
}

/// User-visible rejection feedback for one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub name: String,
    pub reason: String,
}
