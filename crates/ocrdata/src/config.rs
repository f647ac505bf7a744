//! Indexer configuration.
//!
//! Defaults reproduce the conventional layout: images under the current
//! directory, store written to `ocr_data.js` next to them. A `ocrdata.toml`
//! file may override any field:
//!
//! ```toml
//! root = "public"
//! output = "public/ocr_data.js"
//! extension = "webp"
//! ```
use crate::{OcrDataError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name searched for by [`IndexerConfig::discover`].
pub const CONFIG_FILE_NAME: &str = "ocrdata.toml";

/// Successful items between checkpoints.
pub const CHECKPOINT_INTERVAL: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexerConfig {
    /// Directory scanned for images. Store keys are relative to it.
    pub root: PathBuf,
    /// Store file location.
    pub output: PathBuf,
    /// Image file extension, without the dot.
    pub extension: String,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            output: PathBuf::from("ocr_data.js"),
            extension: "webp".to_string(),
        }
    }
}

impl IndexerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.extension.trim_start_matches('.').trim().is_empty() {
            return Err(OcrDataError::validation("extension cannot be empty"));
        }
        if self.output.as_os_str().is_empty() {
            return Err(OcrDataError::validation("output path cannot be empty"));
        }
        Ok(())
    }

    /// Load configuration from a TOML file.
    ///
    /// Relative `root` and `output` paths, including the defaults for fields the
    /// file leaves out, are resolved against the directory containing the file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| OcrDataError::validation(format!("Failed to read config file {}: {}", path.display(), e)))?;

        let mut config: Self = toml::from_str(&content)
            .map_err(|e| OcrDataError::validation(format!("Invalid TOML in {}: {}", path.display(), e)))?;
        config.validate()?;

        if let Some(base) = path.parent() {
            config.root = anchor(base, &config.root);
            config.output = anchor(base, &config.output);
        }
        Ok(config)
    }

    /// Search for `ocrdata.toml` in `start` and its parents.
    pub fn discover_from(start: impl AsRef<Path>) -> Result<Option<Self>> {
        let mut current = start.as_ref().to_path_buf();

        loop {
            let candidate = current.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                tracing::debug!("Using config {}", candidate.display());
                return Ok(Some(Self::from_toml_file(candidate)?));
            }

            if !current.pop() {
                break;
            }
        }

        Ok(None)
    }

    /// Search for `ocrdata.toml` in the current directory and its parents.
    pub fn discover() -> Result<Option<Self>> {
        let cwd = std::env::current_dir().map_err(OcrDataError::Io)?;
        Self::discover_from(cwd)
    }
}

fn anchor(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() || base.as_os_str().is_empty() {
        return path.to_path_buf();
    }
    if path == Path::new(".") {
        return base.to_path_buf();
    }
    base.join(path)
}
