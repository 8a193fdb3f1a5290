use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AttachResult;
use crate::mime::infer_extensions;
use crate::model::{CompressionGuidance, Dimensions};

/// Fallback MIME allow-list when the console configuration declares none:
/// common images and audio, PDF/text/markdown, common code/text variants,
/// CSV and JSON.
pub const DEFAULT_ALLOWED_MIME_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/gif",
    "image/webp",
    "image/svg+xml",
    "audio/mpeg",
    "audio/wav",
    "audio/ogg",
    "application/pdf",
    "text/plain",
    "text/markdown",
    "text/csv",
    "application/json",
    "text/javascript",
    "application/javascript",
    "text/typescript",
    "text/x-python",
];

pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

pub const DEFAULT_MAX_FILES: usize = 5;

/// Per-console attachment policy.
///
/// The file-picker accept string is always derived from the other fields via
/// [`AttachmentPolicy::accept_string`]; it is never stored or hand-edited.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentPolicy {
    /// Exact (`image/png`) or wildcard (`image/*`, `*/*`) entries.
    #[serde(default = "default_allowed_mime_types")]
    pub allowed_mime_types: Vec<String>,
    /// Lower-cased, dot-prefixed. Inferred from `allowed_mime_types` when
    /// left empty. A missing config key must deserialize to empty, not to
    /// the stock extension list, or inference in `resolve` never runs.
    #[serde(default)]
    pub allowed_extensions: Vec<String>,
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// Cap on total attachments per message.
    #[serde(default = "default_max_files")]
    pub max_files: usize,
}

fn default_allowed_mime_types() -> Vec<String> {
    DEFAULT_ALLOWED_MIME_TYPES
        .iter()
        .map(|m| (*m).to_string())
        .collect()
}

fn default_max_file_size() -> u64 {
    DEFAULT_MAX_FILE_SIZE
}

fn default_max_files() -> usize {
    DEFAULT_MAX_FILES
}

impl Default for AttachmentPolicy {
    fn default() -> Self {
        let allowed_mime_types = default_allowed_mime_types();
        let allowed_extensions = infer_extensions(&allowed_mime_types);
        Self {
            allowed_mime_types,
            allowed_extensions,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_files: DEFAULT_MAX_FILES,
        }
    }
}

impl AttachmentPolicy {
    /// Fill in extensions from the MIME list when the configuration left
    /// them out, and normalize declared ones to lower-cased, dot-prefixed
    /// form.
    pub fn resolve(mut self) -> Self {
        if self.allowed_extensions.is_empty() {
            self.allowed_extensions = infer_extensions(&self.allowed_mime_types);
        } else {
            self.allowed_extensions = self
                .allowed_extensions
                .iter()
                .map(|e| {
                    let e = e.to_lowercase();
                    if e.starts_with('.') {
                        e
                    } else {
                        format!(".{}", e)
                    }
                })
                .collect();
        }
        self
    }

    /// Comma-joined MIME types and extensions for file-picker filtering.
    pub fn accept_string(&self) -> String {
        build_accept_string(&self.allowed_mime_types, &self.allowed_extensions)
    }
}

/// Concatenate MIME types and extensions, in order, comma-separated.
pub fn build_accept_string(mime_types: &[String], extensions: &[String]) -> String {
    mime_types
        .iter()
        .chain(extensions.iter())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

/// Console-level configuration resolved per agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConsoleConfig {
    pub attachments: AttachmentPolicy,
    /// Images larger than this on either axis are routed through the crop
    /// dialog. Absent means no image is ever resized.
    pub max_image_dimensions: Option<Dimensions>,
    pub compression: Option<CompressionGuidance>,
}

impl ConsoleConfig {
    /// Load configuration, preferring the file named by `CONSOLE_CONFIG_FILE`
    /// and falling back to defaults when it does not exist.
    pub fn load() -> AttachResult<Self> {
        let config_path = std::env::var("CONSOLE_CONFIG_FILE")
            .unwrap_or_else(|_| "/etc/console/attachments.toml".to_string());

        if Path::new(&config_path).exists() {
            tracing::info!("Loading console configuration from: {}", config_path);
            Self::from_file(&config_path)
        } else {
            tracing::info!(
                "Config file not found at {}, using attachment policy defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &str) -> AttachResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: ConsoleConfig = toml::from_str(&contents)?;
        config.attachments = config.attachments.resolve();
        Ok(config)
    }
}
