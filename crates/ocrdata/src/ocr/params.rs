/// How much detail the engine returns per detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailLevel {
    /// Text fragments only, no boxes or confidences.
    TextOnly = 0,
}

/// Recognition parameters passed to an [`OcrEngine`](super::OcrEngine).
///
/// The indexer always uses [`RecognitionParams::INDEXING`]; it is a type rather
/// than a set of loose constants so engines receive one bundle.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionParams {
    /// ISO 639-1 codes, in priority order.
    pub target_languages: &'static [&'static str],
    pub detail_level: DetailLevel,
    /// Upscale factor applied before detection.
    pub magnification_ratio: f32,
    pub beam_width: u32,
    /// Clockwise rotations, in degrees, tried in addition to upright.
    pub rotation_hypotheses: &'static [u16],
    /// Minimum confidence (0..1) for a detected line to be kept.
    pub text_confidence_threshold: f32,
    /// Minimum confidence (0..1) for a single word to count towards a line.
    pub low_text_threshold: f32,
    /// Contrast below which an image is contrast-adjusted.
    pub contrast_threshold: f32,
    /// Target contrast for adjusted images.
    pub contrast_adjustment: f32,
}

impl RecognitionParams {
    pub const INDEXING: RecognitionParams = RecognitionParams {
        target_languages: &["ja", "en"],
        detail_level: DetailLevel::TextOnly,
        magnification_ratio: 3.0,
        beam_width: 20,
        rotation_hypotheses: &[90, 180, 270],
        text_confidence_threshold: 0.5,
        low_text_threshold: 0.3,
        contrast_threshold: 0.1,
        contrast_adjustment: 0.5,
    };
}

impl Default for RecognitionParams {
    fn default() -> Self {
        Self::INDEXING
    }
}
