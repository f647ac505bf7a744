use crate::{OcrDataError, Result};

/// Map an ISO 639-1 code to the Tesseract traineddata name.
///
/// Three-letter codes and Tesseract script variants (`chi_sim`) pass through.
pub fn tesseract_language_code(code: &str) -> Option<&str> {
    let code = code.trim();
    let mapped = match code.to_ascii_lowercase().as_str() {
        "ja" => "jpn",
        "en" => "eng",
        "de" => "deu",
        "fr" => "fra",
        "es" => "spa",
        "it" => "ita",
        "pt" => "por",
        "nl" => "nld",
        "ru" => "rus",
        "ko" => "kor",
        "zh" | "ch_sim" => "chi_sim",
        "ch_tra" => "chi_tra",
        "ar" => "ara",
        "hi" => "hin",
        "th" => "tha",
        "vi" => "vie",
        _ if code.len() >= 3 && code.chars().all(|c| c.is_ascii_lowercase() || c == '_') => return Some(code),
        _ => return None,
    };
    Some(mapped)
}

/// Build the `-l` argument, e.g. `jpn+eng`.
pub fn tesseract_language_arg(codes: &[&str]) -> Result<String> {
    if codes.is_empty() {
        return Err(OcrDataError::validation("at least one target language is required"));
    }

    codes
        .iter()
        .map(|code| {
            tesseract_language_code(code)
                .ok_or_else(|| OcrDataError::validation(format!("Unsupported language code: '{code}'")))
        })
        .collect::<Result<Vec<_>>>()
        .map(|langs| langs.join("+"))
}
