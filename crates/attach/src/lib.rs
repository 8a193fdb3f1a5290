//! Attachment ingestion pipeline for the agent console.
//!
//! Candidate files arrive from drag-drop, paste, or a file picker. Each batch
//! is validated against a per-console [`policy::AttachmentPolicy`] (MIME
//! patterns, extension fallback, size and count caps), oversized images are
//! routed through an interactive crop/resize/compress step, and accepted
//! files become uniform [`model::FileAttachment`] records carrying their
//! bytes as a data URL, ready for the send path.
//!
//! Validation failures are data surfaced to the user, never errors;
//! [`error::AttachError`] is reserved for genuine decode/encode/I/O failures.

pub mod dataurl;
pub mod error;
pub mod ingest;
pub mod mime;
pub mod model;
pub mod policy;
pub mod resize;
pub mod validate;

pub use error::AttachError;
pub use ingest::{classify_batch, BatchOutcome, ClipboardItem, Composer, CropQueue, PendingCrop};
pub use model::{Candidate, CompressionGuidance, ContentSource, Dimensions, FileAttachment, Rejection};
pub use policy::{AttachmentPolicy, ConsoleConfig};
pub use resize::{CropRect, EncodedImage};
pub use validate::Verdict;
