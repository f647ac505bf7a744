//! OCR engine seam.
//!
//! The indexer hands each decoded image to an [`OcrEngine`] together with the
//! fixed [`RecognitionParams::INDEXING`] bundle and stores whatever fragments
//! come back. [`TesseractEngine`] is the bundled backend; tests and embedders
//! can plug in their own.
//!
//! # Example
//!
//! ```rust
//! use ocrdata::ocr::{OcrEngine, RecognitionParams};
//! use ocrdata::Result;
//! use image::RgbImage;
//!
//! struct Constant;
//!
//! impl OcrEngine for Constant {
//!     fn name(&self) -> &str {
//!         "constant"
//!     }
//!
//!     fn recognize(&self, _image: &RgbImage, _params: &RecognitionParams) -> Result<Vec<String>> {
//!         Ok(vec!["HELLO".to_string()])
//!     }
//! }
//! # let text = Constant.recognize(&RgbImage::new(1, 1), &RecognitionParams::INDEXING).unwrap();
//! # assert_eq!(text, vec!["HELLO"]);
//! ```
pub mod language;
pub mod params;
pub mod tesseract;
pub mod tsv;

use crate::Result;
use image::RgbImage;

pub use language::{tesseract_language_arg, tesseract_language_code};
pub use params::{DetailLevel, RecognitionParams};
pub use tesseract::TesseractEngine;

/// A text recognizer.
///
/// Engines are invoked sequentially, one image at a time. They must be
/// `Send + Sync` so a processor can be moved onto a blocking worker thread.
pub trait OcrEngine: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Recognize text in `image`.
    ///
    /// Returns fragments in the order the engine reports them. An empty vector
    /// means no text was found, which is not an error.
    fn recognize(&self, image: &RgbImage, params: &RecognitionParams) -> Result<Vec<String>>;
}

impl<E: OcrEngine + ?Sized> OcrEngine for Box<E> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn recognize(&self, image: &RgbImage, params: &RecognitionParams) -> Result<Vec<String>> {
        (**self).recognize(image, params)
    }
}
