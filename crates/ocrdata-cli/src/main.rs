//! ocrdata command-line interface.
//!
//! With no arguments, indexes `*.webp` under the current directory into
//! `ocr_data.js`. Ctrl-C stops after the image in progress and saves.

use anyhow::{Context, Result};
use clap::Parser;
use ocrdata::{BatchProcessor, IndexerConfig, RunSummary, TesseractEngine};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ocrdata", version)]
#[command(about = "Index image text into a browser-loadable search store", long_about = None)]
struct Cli {
    /// Directory to scan for images
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Store file to read and update
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Image file extension to index
    #[arg(short, long)]
    extension: Option<String>,

    /// Configuration file (default: discover ocrdata.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Tesseract traineddata directory
    #[arg(long)]
    tessdata_dir: Option<PathBuf>,
}

impl Cli {
    fn resolve_config(&self) -> Result<IndexerConfig> {
        let cwd = std::env::current_dir().context("cannot determine current directory")?;
        self.resolve_config_from(&cwd)
    }

    /// Explicit `--config`, else `ocrdata.toml` discovered from `start`, then flags.
    fn resolve_config_from(&self, start: &Path) -> Result<IndexerConfig> {
        let mut config = match &self.config {
            Some(path) => IndexerConfig::from_toml_file(path)?,
            None => IndexerConfig::discover_from(start)?.unwrap_or_default(),
        };

        if let Some(root) = &self.root {
            config.root = root.clone();
        }
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if let Some(extension) = &self.extension {
            config.extension = extension.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn spawn_interrupt_listener(token: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Interrupt received, finishing current image");
                token.cancel();
            }
            Err(e) => tracing::warn!("Could not listen for Ctrl-C: {}", e),
        }
    });
}

fn print_summary(summary: &RunSummary) {
    println!(
        "{} images found, {} already indexed, {} processed, {} failed{}",
        summary.discovered,
        summary.already_present,
        summary.processed,
        summary.failed,
        if summary.interrupted { " (interrupted)" } else { "" }
    );
    println!("{} entries in store", summary.entries);
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    tracing::info!("Initializing tesseract engine");
    let mut engine = TesseractEngine::new()?;
    if let Some(dir) = &cli.tessdata_dir {
        engine = engine.with_tessdata_dir(dir);
    }

    let token = CancellationToken::new();
    spawn_interrupt_listener(token.clone());

    let processor = BatchProcessor::new(engine, config);
    let summary = tokio::task::spawn_blocking(move || processor.run(&token))
        .await
        .context("processing task failed")??;

    print_summary(&summary);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::tempdir;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults_without_config_file() {
        let dir = tempdir().unwrap();
        let cli = Cli::try_parse_from(["ocrdata"]).unwrap();

        assert_eq!(cli.resolve_config_from(dir.path()).unwrap(), IndexerConfig::default());
    }

    #[test]
    fn test_flags_override_config() {
        let dir = tempdir().unwrap();
        let cli = Cli::try_parse_from(["ocrdata", "--root", "public", "-o", "public/ocr_data.js", "-e", "png"]).unwrap();
        let config = cli.resolve_config_from(dir.path()).unwrap();

        assert_eq!(config.root, PathBuf::from("public"));
        assert_eq!(config.output, PathBuf::from("public/ocr_data.js"));
        assert_eq!(config.extension, "png");
    }

    #[test]
    fn test_config_file_then_flags() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ocrdata.toml");
        std::fs::write(&path, "root = \"gallery\"\nextension = \"jpg\"\n").unwrap();

        let args: Vec<std::ffi::OsString> = vec![
            "ocrdata".into(),
            "--config".into(),
            path.clone().into_os_string(),
            "-e".into(),
            "webp".into(),
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        let config = cli.resolve_config_from(dir.path()).unwrap();

        assert_eq!(config.root, dir.path().join("gallery"));
        assert_eq!(config.extension, "webp");
        assert_eq!(config.output, dir.path().join("ocr_data.js"));
    }

    #[test]
    fn test_discovered_config_from_subdirectory() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("ocrdata.toml"), "root = \"public\"\n").unwrap();
        let nested = dir.path().join("public").join("images");
        std::fs::create_dir_all(&nested).unwrap();

        let cli = Cli::try_parse_from(["ocrdata"]).unwrap();
        let config = cli.resolve_config_from(&nested).unwrap();

        assert_eq!(config.root, dir.path().join("public"));
        assert_eq!(config.output, dir.path().join("ocr_data.js"));
    }

    #[test]
    fn test_empty_extension_rejected() {
        let dir = tempdir().unwrap();
        let cli = Cli::try_parse_from(["ocrdata", "-e", ""]).unwrap();
        assert!(cli.resolve_config_from(dir.path()).is_err());
    }
}
