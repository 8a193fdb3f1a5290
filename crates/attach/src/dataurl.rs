//! `data:` URL encoding for attachment payloads.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// Encode raw bytes as `data:<mime>;base64,<payload>`.
pub fn encode(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}
