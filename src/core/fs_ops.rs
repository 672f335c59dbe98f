// src/core/fs_ops.rs
//! File system helpers for reading resume sources and writing conversions

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::info;

/// Path meaning "standard input / standard output"
pub const STDIO_PATH: &str = "-";

pub struct FsOps;

impl FsOps {
    pub async fn ensure_dir_exists(path: &Path) -> Result<()> {
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)
                .await
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
            info!("Created directory: {}", path.display());
        }
        Ok(())
    }

    pub async fn read_file_safe(path: &Path) -> Result<String> {
        fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))
    }

    pub async fn write_file_safe(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            Self::ensure_dir_exists(parent).await?;
        }

        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write file: {}", path.display()))?;

        info!("Written file: {}", path.display());
        Ok(())
    }

    /// Read a file, or stdin when the path is `-`
    pub async fn read_input(path: &Path) -> Result<String> {
        if path.as_os_str() == STDIO_PATH {
            let mut content = String::new();
            tokio::io::stdin()
                .read_to_string(&mut content)
                .await
                .context("Failed to read standard input")?;
            return Ok(content);
        }
        Self::read_file_safe(path).await
    }

    /// Write to a file (optionally backing up an existing one), or to stdout
    /// when no path is given
    pub async fn write_output(path: Option<&Path>, content: &str, backup_existing: bool) -> Result<()> {
        match path {
            Some(path) if path.as_os_str() != STDIO_PATH => {
                if backup_existing && path.exists() {
                    Self::backup_file(path).await?;
                }
                Self::write_file_safe(path, content).await
            }
            _ => {
                let mut stdout = tokio::io::stdout();
                stdout
                    .write_all(content.as_bytes())
                    .await
                    .context("Failed to write standard output")?;
                stdout.flush().await.context("Failed to flush standard output")
            }
        }
    }

    /// Copy `path` next to itself as `<stem>.backup.<timestamp>[.<ext>]`
    pub async fn backup_file(path: &Path) -> Result<PathBuf> {
        if !path.exists() {
            anyhow::bail!("File to backup does not exist: {}", path.display());
        }

        let backup_path = Self::backup_path(path, &chrono::Utc::now().format("%Y%m%d_%H%M%S").to_string());
        fs::copy(path, &backup_path)
            .await
            .with_context(|| format!("Failed to copy {} to {}", path.display(), backup_path.display()))?;

        info!("Backed up {} to {}", path.display(), backup_path.display());
        Ok(backup_path)
    }

    fn backup_path(path: &Path, timestamp: &str) -> PathBuf {
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("file");
        let name = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{}.backup.{}.{}", stem, timestamp, ext),
            None => format!("{}.backup.{}", stem, timestamp),
        };
        path.with_file_name(name)
    }
}
