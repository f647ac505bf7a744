//! Shared fixtures for integration tests.
#![allow(dead_code)]

use image::{ImageFormat, Rgb, RgbImage};
use ocrdata::ocr::{OcrEngine, RecognitionParams};
use ocrdata::{IndexerConfig, OcrDataError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

/// A scratch gallery with an `images/` root and an `ocr_data.js` output.
pub struct Gallery {
    pub dir: TempDir,
}

impl Gallery {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        std::fs::create_dir_all(dir.path().join("images")).expect("failed to create images dir");
        Self { dir }
    }

    pub fn root(&self) -> PathBuf {
        self.dir.path().join("images")
    }

    pub fn output(&self) -> PathBuf {
        self.dir.path().join("ocr_data.js")
    }

    pub fn config(&self) -> IndexerConfig {
        IndexerConfig {
            root: self.root(),
            output: self.output(),
            extension: "webp".to_string(),
        }
    }

    /// Write a decodable image at `key`. Its width tags it for [`ScriptedEngine`].
    pub fn add_image(&self, key: &str, tag: u32) -> PathBuf {
        let path = self.root().join(key);
        write_image(&path, tag);
        path
    }
}

pub fn write_image(path: &Path, width: u32) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("failed to create parent dir");
    }
    RgbImage::from_pixel(width, 3, Rgb([250, 250, 250]))
        .save_with_format(path, ImageFormat::Png)
        .expect("failed to write image");
}

/// Engine answering by image width and recording every call.
pub struct ScriptedEngine {
    answers: HashMap<u32, Vec<String>>,
    pub calls: AtomicUsize,
    pub widths: Mutex<Vec<u32>>,
}

impl ScriptedEngine {
    pub fn new(answers: &[(u32, &[&str])]) -> Self {
        Self {
            answers: answers
                .iter()
                .map(|(tag, texts)| (*tag, texts.iter().map(|t| t.to_string()).collect()))
                .collect(),
            calls: AtomicUsize::new(0),
            widths: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl OcrEngine for ScriptedEngine {
    fn name(&self) -> &str {
        "scripted"
    }

    fn recognize(&self, image: &RgbImage, params: &RecognitionParams) -> Result<Vec<String>> {
        assert_eq!(params, &RecognitionParams::INDEXING);
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.widths.lock().unwrap().push(image.width());

        self.answers
            .get(&image.width())
            .cloned()
            .ok_or_else(|| OcrDataError::ocr(format!("engine failure for tag {}", image.width())))
    }
}
