//! Batch ingestion orchestration: classification, the attachment list, and
//! the crop dialog queue.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use chrono::Utc;

use crate::error::AttachResult;
use crate::mime::extension_for_mime;
use crate::model::{
    Candidate, CompressionGuidance, ContentSource, Dimensions, FileAttachment, Rejection,
};
use crate::policy::{AttachmentPolicy, ConsoleConfig};
use crate::resize::{crop_resize_encode, needs_resize, probe_dimensions, CropRect};
use crate::validate::{check_size, is_allowed_type, Verdict};

/// An image that passed validation but exceeds the console's maximum
/// dimensions; it waits in the crop queue until the user crops or skips.
#[derive(Debug, Clone)]
pub struct PendingCrop {
    pub name: String,
    pub mime_type: String,
    pub bytes: Bytes,
    pub dimensions: Dimensions,
}

/// Classification result for one ingestion batch, in original batch order
/// within each bucket.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub valid: Vec<FileAttachment>,
    pub needs_crop: Vec<PendingCrop>,
    pub rejected: Vec<Rejection>,
}

/// Classify a batch of candidates against the policy.
///
/// Files are processed sequentially in batch order so the resulting buckets
/// are deterministic. Content reads are awaited per file; there is no
/// cancellation of a started read.
pub async fn classify_batch(
    candidates: &[Candidate],
    policy: &AttachmentPolicy,
    max_image_dimensions: Option<Dimensions>,
) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();

    for candidate in candidates {
        let verdict = is_allowed_type(
            &candidate.name,
            &candidate.mime_type,
            &policy.allowed_mime_types,
            &policy.allowed_extensions,
        );
        if let Verdict::Rejected(reason) = verdict {
            outcome.rejected.push(Rejection {
                name: candidate.name.clone(),
                reason,
            });
            continue;
        }

        // Stat path sources up front: an oversized file on disk is rejected
        // without buffering its content. Stat failures fall through to the
        // read, which produces the rejection.
        if let ContentSource::Path(path) = &candidate.content {
            if let Ok(metadata) = tokio::fs::metadata(path).await {
                if let Verdict::Rejected(reason) = check_size(metadata.len(), policy) {
                    outcome.rejected.push(Rejection {
                        name: candidate.name.clone(),
                        reason,
                    });
                    continue;
                }
            }
        }

        let bytes = match candidate.content.load().await {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!("failed to read candidate {}: {}", candidate.name, err);
                outcome.rejected.push(Rejection {
                    name: candidate.name.clone(),
                    reason: format!("Could not read file: {}", err),
                });
                continue;
            }
        };

        if let Verdict::Rejected(reason) = check_size(bytes.len() as u64, policy) {
            outcome.rejected.push(Rejection {
                name: candidate.name.clone(),
                reason,
            });
            continue;
        }

        if candidate.mime_type.starts_with("image/") && max_image_dimensions.is_some() {
            let dimensions = match probe_dimensions(&bytes) {
                Ok(dimensions) => dimensions,
                Err(err) => {
                    tracing::warn!(
                        "dimension probe failed for {}: {}",
                        candidate.name,
                        err
                    );
                    outcome.rejected.push(Rejection {
                        name: candidate.name.clone(),
                        reason: "Could not read image dimensions".to_string(),
                    });
                    continue;
                }
            };
            if needs_resize(dimensions.width, dimensions.height, max_image_dimensions) {
                outcome.needs_crop.push(PendingCrop {
                    name: candidate.name.clone(),
                    mime_type: candidate.mime_type.clone(),
                    bytes,
                    dimensions,
                });
                continue;
            }
        }

        outcome.valid.push(FileAttachment::from_bytes(
            &candidate.name,
            &candidate.mime_type,
            &bytes,
        ));
    }

    outcome
}

/// Queue behind the crop dialog. The dialog is open while the queue is
/// non-empty; completing or cancelling the current file always advances to
/// the next, and the dialog only fully closes when the queue drains.
#[derive(Debug, Default)]
pub struct CropQueue {
    queue: VecDeque<PendingCrop>,
}

impl CropQueue {
    pub fn is_open(&self) -> bool {
        !self.queue.is_empty()
    }

    /// The file currently shown in the dialog.
    pub fn current(&self) -> Option<&PendingCrop> {
        self.queue.front()
    }

    pub fn push(&mut self, pending: PendingCrop) {
        self.queue.push_back(pending);
    }

    /// Drop the current file and surface the next queued one, if any.
    pub fn advance(&mut self) -> Option<PendingCrop> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// One clipboard item from a paste event.
#[derive(Debug, Clone)]
pub struct ClipboardItem {
    pub mime_type: String,
    pub bytes: Bytes,
}

static PASTE_SEQ: AtomicU64 = AtomicU64::new(0);

/// `pasted-<millis>-<seq>.<ext>` with the extension derived from the MIME
/// subtype, so clipboard content goes through the same type check as picked
/// files and two pastes cannot collide on name.
fn synthesized_paste_name(mime_type: &str) -> String {
    let seq = PASTE_SEQ.fetch_add(1, Ordering::Relaxed);
    let ext = extension_for_mime(mime_type).unwrap_or_else(|| "png".to_string());
    format!("pasted-{}-{}.{}", Utc::now().timestamp_millis(), seq, ext)
}

/// Message composer state: the attachment list, the latest batch's rejection
/// feedback, and the crop queue. Mutated only in response to discrete user
/// events; no background actor touches it.
#[derive(Debug)]
pub struct Composer {
    policy: AttachmentPolicy,
    max_image_dimensions: Option<Dimensions>,
    compression: Option<CompressionGuidance>,
    attachments: Vec<FileAttachment>,
    rejections: Vec<Rejection>,
    crop_queue: CropQueue,
}

impl Composer {
    pub fn new(config: &ConsoleConfig) -> Self {
        Self {
            policy: config.attachments.clone(),
            max_image_dimensions: config.max_image_dimensions,
            compression: config.compression,
            attachments: Vec::new(),
            rejections: Vec::new(),
            crop_queue: CropQueue::default(),
        }
    }

    /// Ingest one batch from drop or the file picker. Valid files are
    /// attached immediately, oversized images join the crop queue, and the
    /// batch's rejections replace any previous feedback.
    pub async fn ingest(&mut self, candidates: &[Candidate]) {
        let outcome =
            classify_batch(candidates, &self.policy, self.max_image_dimensions).await;

        // Feedback is per batch: stale rejection messages never linger.
        self.rejections = outcome.rejected;

        for attachment in outcome.valid {
            self.push_attachment(attachment);
        }
        for pending in outcome.needs_crop {
            self.crop_queue.push(pending);
        }
    }

    /// Ingest a paste event. Only image items are considered; returns true
    /// when at least one image item was taken from the clipboard, in which
    /// case the caller should suppress default paste handling. With no image
    /// items the event is left untouched and text pasting proceeds.
    pub async fn ingest_clipboard(&mut self, items: &[ClipboardItem]) -> bool {
        let candidates: Vec<Candidate> = items
            .iter()
            .filter(|item| item.mime_type.starts_with("image/"))
            .map(|item| {
                Candidate::in_memory(
                    &synthesized_paste_name(&item.mime_type),
                    &item.mime_type,
                    item.bytes.clone(),
                )
            })
            .collect();
        if candidates.is_empty() {
            return false;
        }
        self.ingest(&candidates).await;
        true
    }

    /// Attachments beyond `max_files` are silently dropped, keeping the
    /// earliest insertions.
    fn push_attachment(&mut self, attachment: FileAttachment) {
        self.attachments.push(attachment);
        self.attachments.truncate(self.policy.max_files);
    }

    pub fn attachments(&self) -> &[FileAttachment] {
        &self.attachments
    }

    pub fn rejections(&self) -> &[Rejection] {
        &self.rejections
    }

    pub fn dismiss_rejections(&mut self) {
        self.rejections.clear();
    }

    pub fn remove(&mut self, id: &str) {
        self.attachments.retain(|a| a.id != id);
    }

    /// Hand the attachment list to the send path and clear it.
    pub fn take_for_send(&mut self) -> Vec<FileAttachment> {
        std::mem::take(&mut self.attachments)
    }

    pub fn clear(&mut self) {
        self.attachments.clear();
        self.rejections.clear();
    }

    /// The image currently shown in the crop dialog.
    pub fn current_crop(&self) -> Option<&PendingCrop> {
        self.crop_queue.current()
    }

    pub fn crop_dialog_open(&self) -> bool {
        self.crop_queue.is_open()
    }

    /// Run the pipeline on the current pending image with the user's crop
    /// region, attach the result, and advance the queue.
    ///
    /// On encode failure the queue is left untouched so the dialog can still
    /// cancel or retry; the failure is logged for operators.
    pub fn apply_crop(&mut self, crop: CropRect) -> AttachResult<()> {
        let pending = self
            .crop_queue
            .current()
            .ok_or(crate::error::AttachError::NoPendingCrop)?;

        let source = match image::load_from_memory(&pending.bytes) {
            Ok(source) => source,
            Err(err) => {
                tracing::error!("image decode failed for {}: {}", pending.name, err);
                return Err(err.into());
            }
        };
        let encoded = match crop_resize_encode(
            &source,
            &pending.name,
            crop,
            self.max_image_dimensions,
            encode_target(&pending.mime_type),
            self.compression,
        ) {
            Ok(encoded) => encoded,
            Err(err) => {
                tracing::error!("crop pipeline failed for {}: {}", pending.name, err);
                return Err(err);
            }
        };

        self.push_attachment(FileAttachment::from_bytes(
            &encoded.name,
            &encoded.mime_type,
            &encoded.bytes,
        ));
        self.crop_queue.advance();
        Ok(())
    }

    /// The "skip crop" path: same pipeline with the full-frame rectangle.
    pub fn skip_crop(&mut self) -> AttachResult<()> {
        let rect = match self.crop_queue.current() {
            Some(pending) => CropRect::full_frame(pending.dimensions.width, pending.dimensions.height),
            None => return Err(crate::error::AttachError::NoPendingCrop),
        };
        self.apply_crop(rect)
    }

    /// Discard the current pending image and advance. Does not interrupt any
    /// encode already completed for a previous file.
    pub fn cancel_crop(&mut self) {
        self.crop_queue.advance();
    }
}

/// Re-encode to the source type when the encoder supports it, otherwise JPEG.
fn encode_target(mime_type: &str) -> &str {
    match mime_type {
        "image/png" | "image/jpeg" | "image/webp" => mime_type,
        _ => "image/jpeg",
    }
}
