//! OCR backend driving the `tesseract` executable.
use super::language::tesseract_language_arg;
use super::params::RecognitionParams;
use super::tsv::{TsvWord, extract_words, group_lines};
use super::OcrEngine;
use crate::imaging;
use crate::{OcrDataError, Result};
use image::{ImageFormat, RgbImage};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Page segmentation mode: fully automatic, no OSD.
const PSM_AUTO: &str = "3";

pub struct TesseractEngine {
    binary: PathBuf,
    tessdata_dir: Option<PathBuf>,
}

impl TesseractEngine {
    /// Locate `tesseract` on `PATH`.
    pub fn new() -> Result<Self> {
        let binary = which::which("tesseract").map_err(|e| {
            OcrDataError::MissingDependency(format!("tesseract executable not found on PATH: {e}"))
        })?;
        tracing::debug!("Using tesseract at {}", binary.display());
        Ok(Self::with_binary(binary))
    }

    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            tessdata_dir: None,
        }
    }

    /// Pass `--tessdata-dir` on every invocation.
    pub fn with_tessdata_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.tessdata_dir = Some(dir.into());
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    fn run_tsv(&self, image: &RgbImage, languages: &str) -> Result<String> {
        let input = tempfile::Builder::new().prefix("ocrdata-").suffix(".png").tempfile()?;
        image.save_with_format(input.path(), ImageFormat::Png)?;

        let mut cmd = Command::new(&self.binary);
        cmd.arg(input.path()).arg("stdout");
        if let Some(dir) = &self.tessdata_dir {
            cmd.arg("--tessdata-dir").arg(dir);
        }
        cmd.args(["-l", languages, "--psm", PSM_AUTO, "tsv"]);
        cmd.stdin(Stdio::null());

        let output = cmd.output().map_err(|e| {
            OcrDataError::ocr_with_source(format!("Failed to run {}", self.binary.display()), e)
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrDataError::ocr(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn total_confidence(words: &[TsvWord]) -> f64 {
    words.iter().map(|w| w.confidence).sum()
}

impl OcrEngine for TesseractEngine {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn recognize(&self, image: &RgbImage, params: &RecognitionParams) -> Result<Vec<String>> {
        let languages = tesseract_language_arg(params.target_languages)?;

        let mut prepared = imaging::magnify(image, params.magnification_ratio);
        let stats = imaging::contrast_stats(&prepared);
        if stats.contrast < params.contrast_threshold {
            tracing::debug!(
                "Low contrast {:.3} (p10={}, p90={}), adjusting",
                stats.contrast,
                stats.low,
                stats.high
            );
            prepared = imaging::adjust_contrast(&prepared, params.contrast_adjustment);
        }

        tracing::debug!(
            "tesseract: languages={} size={}x{} beam_width={} (unused)",
            languages,
            prepared.width(),
            prepared.height(),
            params.beam_width
        );

        let min_word_confidence = f64::from(params.low_text_threshold) * 100.0;
        let mut best: Option<(u16, Vec<TsvWord>)> = None;

        for degrees in std::iter::once(0).chain(params.rotation_hypotheses.iter().copied()) {
            let rotated = imaging::rotate(&prepared, degrees)?;
            let tsv = self.run_tsv(&rotated, &languages)?;
            let words = extract_words(&tsv, min_word_confidence);

            let better = match &best {
                Some((_, current)) => total_confidence(&words) > total_confidence(current),
                None => true,
            };
            if better {
                best = Some((degrees, words));
            }
        }

        let Some((degrees, words)) = best else {
            return Ok(Vec::new());
        };
        tracing::debug!("tesseract: best orientation {} degrees, {} words", degrees, words.len());

        let min_line_confidence = f64::from(params.text_confidence_threshold) * 100.0;
        Ok(group_lines(&words)
            .into_iter()
            .filter(|line| line.confidence >= min_line_confidence)
            .map(|line| line.text)
            .collect())
    }
}
