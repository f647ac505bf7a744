//! ocrdata - incremental OCR indexing for static image galleries
//!
//! ocrdata walks a directory of images, runs each image that is not yet indexed
//! through an OCR engine, and accumulates the recognized text in a single
//! `ocr_data.js` file that a static page can load for client-side full-text
//! search.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use ocrdata::{BatchProcessor, IndexerConfig, TesseractEngine};
//! use tokio_util::sync::CancellationToken;
//!
//! # fn main() -> ocrdata::Result<()> {
//! let processor = BatchProcessor::new(TesseractEngine::new()?, IndexerConfig::default());
//! let summary = processor.run(&CancellationToken::new())?;
//! println!("{} new entries", summary.processed);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Store** (`store`): the path → text mapping and its `const OCR_DATA = {...};` codec
//! - **Discovery** (`discovery`): recursive, extension-filtered listing with stable keys
//! - **OCR** (`ocr`): the [`OcrEngine`] seam and the bundled Tesseract backend
//! - **Processor** (`processor`): skip-if-present loop with checkpoints and a
//!   guaranteed final flush
//!
//! Runs are resumable: anything recognized before an interruption is on disk,
//! and the next run only processes what is still missing.

#![deny(unsafe_code)]

pub mod config;
pub mod discovery;
pub mod error;
pub mod imaging;
pub mod ocr;
pub mod processor;
pub mod store;

pub use config::{CHECKPOINT_INTERVAL, IndexerConfig};
pub use discovery::{ImageFile, discover_images};
pub use error::{OcrDataError, Result};
pub use ocr::{OcrEngine, RecognitionParams, TesseractEngine};
pub use processor::{BatchProcessor, CheckpointedStore, RunSummary, compose_entry_text};
pub use store::Store;
