//! Error types for ocrdata.
//!
//! All fallible operations in the library return [`OcrDataError`]. Two tiers of
//! failure are handled inside the library rather than surfaced to callers:
//!
//! - A store file that cannot be read or decoded is logged and treated as empty.
//! - A single image that cannot be decoded or recognized is logged and skipped,
//!   so it stays absent from the store and is retried on the next run.
//!
//! Everything else (a missing `tesseract` binary, an unreadable config file, a
//! failed final flush) bubbles up through [`Result`].
//!
//! # Example
//!
//! ```rust
//! use ocrdata::{OcrDataError, Result};
//!
//! fn require_extension(ext: &str) -> Result<()> {
//!     if ext.is_empty() {
//!         return Err(OcrDataError::validation("extension cannot be empty"));
//!     }
//!     Ok(())
//! }
//! # assert!(require_extension("").is_err());
//! ```
use thiserror::Error;

/// Result type alias using `OcrDataError`.
pub type Result<T> = std::result::Result<T, OcrDataError>;

/// Main error type for all ocrdata operations.
#[derive(Debug, Error)]
pub enum OcrDataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parsing error: {message}")]
    Parsing {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("OCR error: {message}")]
    Ocr {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Image processing error: {message}")]
    ImageProcessing {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Missing dependency: {0}")]
    MissingDependency(String),
}

impl From<serde_json::Error> for OcrDataError {
    fn from(err: serde_json::Error) -> Self {
        OcrDataError::Serialization {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<image::ImageError> for OcrDataError {
    fn from(err: image::ImageError) -> Self {
        OcrDataError::ImageProcessing {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

macro_rules! error_constructor {
    ($name:ident, $variant:ident) => {
        pastey::paste! {
            #[doc = "Create a " $variant " error"]
            pub fn $name<S: Into<String>>(message: S) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: None,
                }
            }

            #[doc = "Create a " $variant " error with source"]
            pub fn [<$name _with_source>]<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
                message: S,
                source: E,
            ) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: Some(Box::new(source)),
                }
            }
        }
    };
}

impl OcrDataError {
    error_constructor!(parsing, Parsing);
    error_constructor!(ocr, Ocr);
    error_constructor!(validation, Validation);
    error_constructor!(image_processing, ImageProcessing);
    error_constructor!(serialization, Serialization);
}
