//! Candidate image discovery.
//!
//! Walks the configured root once per run and produces every file with the
//! configured extension, paired with the key it is stored under.
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// An image found under the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    /// Path as found on disk, usable for reading.
    pub path: PathBuf,
    /// Path relative to the root with `/` separators.
    pub key: String,
}

impl ImageFile {
    /// Bare file name, appended to the extracted text as a search token.
    pub fn file_name(&self) -> &str {
        self.key.rsplit('/').next().unwrap_or(&self.key)
    }
}

/// Normalize a relative path into a store key.
///
/// Components are split on the platform's separators and joined with `/`, so
/// keys are identical on Windows and Unix. On Unix a backslash is an ordinary
/// file name character and is kept.
pub fn normalize_key(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_str().map(|s| s.starts_with('.')).unwrap_or(false)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

/// Find all files under `root` with `extension` (without the dot, any case).
///
/// Hidden files and directories below the root are skipped. Entries that cannot
/// be read are logged and skipped. A missing root yields no files. Results are
/// sorted by key.
pub fn discover_images(root: impl AsRef<Path>, extension: &str) -> Vec<ImageFile> {
    let root = root.as_ref();
    let extension = extension.trim_start_matches('.');

    let mut images: Vec<ImageFile> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && has_extension(entry.path(), extension))
        .filter_map(|entry| {
            let relative = entry.path().strip_prefix(root).ok()?;
            let key = normalize_key(relative);
            Some(ImageFile {
                path: entry.into_path(),
                key,
            })
        })
        .collect();

    images.sort_by(|a, b| a.key.cmp(&b.key));
    tracing::debug!("Discovered {} '.{}' files under {}", images.len(), extension, root.display());
    images
}
