//! Incremental batch processing.
//!
//! A run loads the store, discovers candidate images, skips every key already
//! present, and recognizes the rest one at a time. Progress is flushed every
//! [`CHECKPOINT_INTERVAL`] successful items and once more when the run ends,
//! whichever way it ends, so an interrupted run can be resumed by simply
//! running again.
use crate::config::{CHECKPOINT_INTERVAL, IndexerConfig};
use crate::discovery::{ImageFile, discover_images};
use crate::imaging::decode_rgb;
use crate::ocr::{OcrEngine, RecognitionParams};
use crate::store::{self, Store};
use crate::Result;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Images found under the root.
    pub discovered: usize,
    /// Images skipped because their key was already stored.
    pub already_present: usize,
    /// Images recognized and stored during this run.
    pub processed: usize,
    /// Images that failed to decode or recognize.
    pub failed: usize,
    /// Whether the run stopped early on cancellation.
    pub interrupted: bool,
    /// Store size after the final flush.
    pub entries: usize,
}

/// Owns the in-memory store and guarantees it is written exactly once more
/// when the run is over.
///
/// Call [`finish`](Self::finish) on the normal path to observe flush errors.
/// If the guard is dropped without finishing (early return, unwinding panic)
/// the store is flushed from `Drop` and any error is logged.
pub struct CheckpointedStore {
    store: Store,
    path: PathBuf,
    finished: bool,
}

impl CheckpointedStore {
    pub fn new(store: Store, path: impl Into<PathBuf>) -> Self {
        Self {
            store,
            path: path.into(),
            finished: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.store.insert(key, text);
    }

    /// Write the current state without ending the run.
    pub fn checkpoint(&self) -> Result<()> {
        store::save(&self.store, &self.path)
    }

    /// Perform the final flush and hand back the store.
    pub fn finish(mut self) -> Result<Store> {
        self.finished = true;
        store::save(&self.store, &self.path)?;
        Ok(std::mem::take(&mut self.store))
    }
}

impl Drop for CheckpointedStore {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        tracing::warn!("Run ended early, saving current progress to {}", self.path.display());
        if let Err(e) = store::save(&self.store, &self.path) {
            tracing::error!("Failed to save progress to {}: {}", self.path.display(), e);
        }
    }
}

/// Build the stored text for one image: fragments then the file name, joined
/// by single spaces.
pub fn compose_entry_text(fragments: &[String], file_name: &str) -> String {
    fragments
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(file_name))
        .collect::<Vec<_>>()
        .join(" ")
}

pub struct BatchProcessor<E> {
    engine: E,
    config: IndexerConfig,
}

impl<E: OcrEngine> BatchProcessor<E> {
    pub fn new(engine: E, config: IndexerConfig) -> Self {
        Self { engine, config }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn config(&self) -> &IndexerConfig {
        &self.config
    }

    /// Decode and recognize a single image, returning its entry text.
    pub fn process_image(&self, image: &ImageFile) -> Result<String> {
        let rgb = decode_rgb(&image.path)?;
        let fragments = self.engine.recognize(&rgb, &RecognitionParams::INDEXING)?;
        Ok(compose_entry_text(&fragments, image.file_name()))
    }

    /// Run one incremental pass.
    ///
    /// Only the final flush can fail the run. Store corruption and per-image
    /// failures are logged and absorbed.
    pub fn run(&self, cancel: &CancellationToken) -> Result<RunSummary> {
        let existing = store::load(&self.config.output);
        tracing::info!("Loaded {} entries from existing database", existing.len());
        let mut guard = CheckpointedStore::new(existing, &self.config.output);

        let candidates = discover_images(&self.config.root, &self.config.extension);
        let pending: Vec<&ImageFile> = candidates.iter().filter(|c| !guard.store().contains(&c.key)).collect();

        let mut summary = RunSummary {
            discovered: candidates.len(),
            already_present: candidates.len() - pending.len(),
            ..Default::default()
        };

        tracing::info!(
            "Found {} images total, {} new images to process",
            summary.discovered,
            pending.len()
        );
        if pending.is_empty() {
            tracing::info!("No new images to process");
        }

        self.process_pending(&mut guard, &pending, cancel, &mut summary);

        let store = guard.finish()?;
        summary.entries = store.len();
        tracing::info!(
            "Done: {} processed, {} failed, {} entries stored",
            summary.processed,
            summary.failed,
            summary.entries
        );
        Ok(summary)
    }

    fn process_pending(
        &self,
        guard: &mut CheckpointedStore,
        pending: &[&ImageFile],
        cancel: &CancellationToken,
        summary: &mut RunSummary,
    ) {
        let total = pending.len();

        for (index, image) in pending.iter().enumerate() {
            if cancel.is_cancelled() {
                tracing::info!("Process interrupted by user, saving current progress");
                summary.interrupted = true;
                break;
            }

            tracing::info!("Processing ({}/{}): {}", index + 1, total, image.key);

            match self.process_image(image) {
                Ok(text) => {
                    guard.insert(image.key.clone(), text);
                    summary.processed += 1;

                    if summary.processed % CHECKPOINT_INTERVAL == 0
                        && let Err(e) = guard.checkpoint()
                    {
                        tracing::warn!("Checkpoint to {} failed: {}", guard.path().display(), e);
                    }
                }
                Err(e) => {
                    summary.failed += 1;
                    tracing::warn!("Error processing {}: {}", image.path.display(), e);
                }
            }
        }
    }
}
