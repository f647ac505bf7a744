//! Parsing of Tesseract TSV output.
//!
//! Columns: `level page_num block_num par_num line_num word_num left top width
//! height conf text`. Only word rows (level 5) carry text.

/// TSV row level for words.
pub const TSV_WORD_LEVEL: u32 = 5;
pub const TSV_MIN_FIELDS: usize = 12;

#[derive(Debug, Clone, PartialEq)]
pub struct TsvWord {
    pub text: String,
    pub block: u32,
    pub paragraph: u32,
    pub line: u32,
    /// Confidence in 0..=100.
    pub confidence: f64,
}

impl TsvWord {
    fn line_id(&self) -> (u32, u32, u32) {
        (self.block, self.paragraph, self.line)
    }
}

/// A line of words with its mean confidence.
#[derive(Debug, Clone, PartialEq)]
pub struct TsvLine {
    pub text: String,
    pub confidence: f64,
}

/// Extract word rows with confidence at or above `min_confidence` (0..=100).
pub fn extract_words(tsv_data: &str, min_confidence: f64) -> Vec<TsvWord> {
    let mut words = Vec::new();

    for (line_num, line) in tsv_data.lines().enumerate() {
        if line_num == 0 {
            continue;
        }

        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < TSV_MIN_FIELDS {
            continue;
        }

        let level = fields[0].parse::<u32>().unwrap_or(0);
        if level != TSV_WORD_LEVEL {
            continue;
        }

        let confidence = fields[10].trim().parse::<f64>().unwrap_or(-1.0);
        if confidence < min_confidence {
            continue;
        }

        let text = fields[11].trim();
        if text.is_empty() {
            continue;
        }

        words.push(TsvWord {
            text: text.to_string(),
            block: fields[2].parse().unwrap_or(0),
            paragraph: fields[3].parse().unwrap_or(0),
            line: fields[4].parse().unwrap_or(0),
            confidence,
        });
    }

    words
}

/// Group consecutive words sharing block, paragraph and line number.
pub fn group_lines(words: &[TsvWord]) -> Vec<TsvLine> {
    let mut lines = Vec::new();
    let mut start = 0;

    while start < words.len() {
        let id = words[start].line_id();
        let end = words[start..]
            .iter()
            .position(|w| w.line_id() != id)
            .map(|offset| start + offset)
            .unwrap_or(words.len());

        let group = &words[start..end];
        let text = group.iter().map(|w| w.text.as_str()).collect::<Vec<_>>().join(" ");
        lines.push(TsvLine {
            text,
            confidence: mean_confidence(group),
        });

        start = end;
    }

    lines
}

/// Mean confidence over `words`, or 0 when empty.
pub fn mean_confidence(words: &[TsvWord]) -> f64 {
    if words.is_empty() {
        return 0.0;
    }
    words.iter().map(|w| w.confidence).sum::<f64>() / words.len() as f64
}
