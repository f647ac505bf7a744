//! Reading and writing the store file.
//!
//! The file is a JavaScript statement that a browser page can include directly:
//!
//! ```text
//! const OCR_DATA = {
//!   "images/a.webp": "detected text a.webp"
//! };
//! ```
use super::Store;
use crate::{OcrDataError, Result};
use std::io::Write;
use std::path::Path;

/// Variable declaration written before the JSON object.
pub const STORE_PREFIX: &str = "const OCR_DATA = ";

/// Statement terminator written after the JSON object.
pub const STORE_SUFFIX: &str = ";";

/// Decode store file contents.
///
/// Trailing whitespace after the terminator is accepted. Exactly one terminator
/// is stripped, so `};;` is rejected by the JSON decoder rather than silently
/// accepted.
pub fn decode(content: &str) -> Result<Store> {
    let body = content
        .strip_prefix(STORE_PREFIX)
        .ok_or_else(|| OcrDataError::parsing(format!("store does not start with '{}'", STORE_PREFIX.trim_end())))?;

    let body = body
        .trim_end()
        .strip_suffix(STORE_SUFFIX)
        .ok_or_else(|| OcrDataError::parsing(format!("store does not end with '{}'", STORE_SUFFIX)))?;

    serde_json::from_str(body.trim())
        .map_err(|e| OcrDataError::parsing_with_source("store body is not a JSON object of strings", e))
}

/// Encode a store as file contents.
///
/// JSON is pretty-printed with two-space indentation and non-ASCII text is
/// written as-is rather than `\u` escaped.
pub fn encode(store: &Store) -> Result<String> {
    let json = serde_json::to_string_pretty(store)?;
    Ok(format!("{STORE_PREFIX}{json}{STORE_SUFFIX}"))
}

/// Load the store at `path`.
///
/// Never fails: a missing file is an empty store, and a file that cannot be
/// read or decoded is logged and also treated as empty.
pub fn load(path: impl AsRef<Path>) -> Store {
    let path = path.as_ref();
    if !path.exists() {
        tracing::debug!("No store at {}, starting empty", path.display());
        return Store::new();
    }

    let result = std::fs::read_to_string(path)
        .map_err(OcrDataError::Io)
        .and_then(|content| decode(&content));

    match result {
        Ok(store) => store,
        Err(e) => {
            tracing::warn!("Could not load existing data from {}: {}", path.display(), e);
            Store::new()
        }
    }
}

/// Mode given to a store file that does not exist yet. The file is served to
/// browsers, so it must stay world-readable.
#[cfg(unix)]
const NEW_STORE_MODE: u32 = 0o644;

/// Permissions the replacement file should carry: those of the file being
/// replaced, or [`NEW_STORE_MODE`] for a new store.
fn target_permissions(path: &Path) -> Option<std::fs::Permissions> {
    match std::fs::metadata(path) {
        Ok(metadata) => Some(metadata.permissions()),
        #[cfg(unix)]
        Err(_) => {
            use std::os::unix::fs::PermissionsExt;
            Some(std::fs::Permissions::from_mode(NEW_STORE_MODE))
        }
        #[cfg(not(unix))]
        Err(_) => None,
    }
}

/// Write the store to `path`, replacing the file in full.
///
/// The contents are written to a temporary file in the same directory and
/// renamed over the target. The target's permissions are kept.
pub fn save(store: &Store, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let content = encode(store)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    temp.write_all(content.as_bytes())?;
    temp.flush()?;
    if let Some(permissions) = target_permissions(path) {
        temp.as_file().set_permissions(permissions)?;
    }
    temp.persist(path).map_err(|e| OcrDataError::Io(e.error))?;

    tracing::info!("Saved {} entries to {}", store.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_store() -> Store {
        [
            ("images/a.webp", "HELLO a.webp"),
            ("イラスト/猫.webp", "ねこ カフェ 猫.webp"),
            ("b.webp", "b.webp"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_encode_exact_format() {
        let store: Store = [("a.webp", "HELLO a.webp")].into_iter().collect();
        let encoded = encode(&store).unwrap();
        assert_eq!(encoded, "const OCR_DATA = {\n  \"a.webp\": \"HELLO a.webp\"\n};");
    }

    #[test]
    fn test_encode_empty_store() {
        assert_eq!(encode(&Store::new()).unwrap(), "const OCR_DATA = {};");
    }

    #[test]
    fn test_encode_keeps_non_ascii_literal() {
        let store: Store = [("猫.webp", "ねこ 猫.webp")].into_iter().collect();
        let encoded = encode(&store).unwrap();
        assert!(encoded.contains("ねこ 猫.webp"));
        assert!(!encoded.contains("\\u"));
    }

    #[test]
    fn test_decode_single_line() {
        let store = decode(r#"const OCR_DATA = {"images/a.webp": "detected text a.webp"};"#).unwrap();
        assert_eq!(store.get("images/a.webp"), Some("detected text a.webp"));
    }

    #[test]
    fn test_decode_tolerates_trailing_whitespace() {
        let store = decode("const OCR_DATA = {\"a.webp\": \"a.webp\"};\n\n").unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_decode_rejects_missing_prefix() {
        let err = decode(r#"{"a.webp": "a.webp"};"#).unwrap_err();
        assert!(matches!(err, OcrDataError::Parsing { .. }));
    }

    #[test]
    fn test_decode_rejects_missing_suffix() {
        let err = decode(r#"const OCR_DATA = {"a.webp": "a.webp"}"#).unwrap_err();
        assert!(matches!(err, OcrDataError::Parsing { .. }));
    }

    #[test]
    fn test_decode_strips_only_one_terminator() {
        assert!(decode(r#"const OCR_DATA = {"a.webp": "a.webp"};;"#).is_err());
    }

    #[test]
    fn test_decode_rejects_non_string_values() {
        assert!(decode(r#"const OCR_DATA = {"a.webp": 3};"#).is_err());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ocr_data.js");
        let store = sample_store();

        save(&store, &path).unwrap();
        assert_eq!(load(&path), store);
    }

    #[test]
    fn test_save_preserves_key_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ocr_data.js");
        let store = sample_store();

        save(&store, &path).unwrap();
        let keys: Vec<String> = load(&path).iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, vec!["images/a.webp", "イラスト/猫.webp", "b.webp"]);
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("site").join("data").join("ocr_data.js");

        save(&sample_store(), &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_save_overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ocr_data.js");
        std::fs::write(&path, "x".repeat(4096)).unwrap();

        let store: Store = [("a.webp", "a.webp")].into_iter().collect();
        save(&store, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, encode(&store).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_save_keeps_existing_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("ocr_data.js");
        std::fs::write(&path, "const OCR_DATA = {};").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o664)).unwrap();

        save(&sample_store(), &path).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o664);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_new_file_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("ocr_data.js");

        save(&sample_store(), &path).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        assert!(load(dir.path().join("absent.js")).is_empty());
    }

    #[test]
    fn test_load_corrupted_file_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ocr_data.js");
        std::fs::write(&path, "const OCR_DATA = {\"a.webp\": \"trunc").unwrap();

        assert!(load(&path).is_empty());
    }

    #[test]
    fn test_load_invalid_utf8_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ocr_data.js");
        std::fs::write(&path, [0xff, 0xfe, 0x00, 0x41]).unwrap();

        assert!(load(&path).is_empty());
    }
}
