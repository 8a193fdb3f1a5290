//! Type and size validation. Rejections are data, never errors.

use crate::mime::{file_extension, matches_mime_pattern};
use crate::policy::AttachmentPolicy;

/// Outcome of a validation check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Allowed,
    Rejected(String),
}

impl Verdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Verdict::Allowed)
    }
}

/// Check a candidate's declared MIME type against the allow-lists.
///
/// MIME patterns take precedence; the filename extension is a fallback
/// because browsers sometimes report overly generic types (e.g.
/// `application/octet-stream`) for recognizable files.
pub fn is_allowed_type(
    name: &str,
    mime_type: &str,
    allowed_mime_types: &[String],
    allowed_extensions: &[String],
) -> Verdict {
    if allowed_mime_types
        .iter()
        .any(|pattern| matches_mime_pattern(mime_type, pattern))
    {
        return Verdict::Allowed;
    }

    let extension = file_extension(name);
    if let Some(ext) = &extension {
        if allowed_extensions.iter().any(|allowed| allowed == ext) {
            return Verdict::Allowed;
        }
    }

    let reason = if !mime_type.is_empty() {
        format!("File type \"{}\" is not allowed", mime_type)
    } else if let Some(ext) = extension {
        format!("File extension \"{}\" is not allowed", ext)
    } else {
        format!("File \"{}\" has no recognizable type", name)
    };
    Verdict::Rejected(reason)
}

/// Check a candidate's byte length against the policy cap. Independent of
/// the type check.
pub fn check_size(size: u64, policy: &AttachmentPolicy) -> Verdict {
    if size > policy.max_file_size {
        Verdict::Rejected(format!(
            "File is too large ({}, limit {})",
            format_file_size(size),
            format_file_size(policy.max_file_size)
        ))
    } else {
        Verdict::Allowed
    }
}

/// Human-readable byte count for rejection messages.
pub fn format_file_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = 1024.0 * 1024.0;
    let b = bytes as f64;
    if b < KB {
        format!("{} B", bytes)
    } else if b < MB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{:.1} MB", b / MB)
    }
}
