// src/cli.rs
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::converter::{inspect, DocumentFormat, ResumeConverter};
use crate::core::fs_ops::STDIO_PATH;
use crate::core::{ConverterConfig, FsOps};
use crate::editor::blank_template;
use crate::web::start_web_server;

#[derive(Parser)]
#[command(name = "resume-converter")]
#[command(about = "Convert resumes between JSON, Markdown and HTML")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// YAML or TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Write JSON logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Convert a resume file (`-` reads stdin)
    Convert {
        input: PathBuf,
        #[arg(long)]
        to: DocumentFormat,
        /// Input format, detected from the extension when omitted
        #[arg(long)]
        from: Option<DocumentFormat>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write the blank starter resume
    New {
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        format: Option<DocumentFormat>,
    },
    /// Show which template and fields each item is classified with
    Inspect {
        input: PathBuf,
        #[arg(long)]
        from: Option<DocumentFormat>,
    },
    /// Run the HTTP API
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
}

/// Explicit format, else the path's extension, else JSON (stdin and
/// extensionless files)
pub fn resolve_format(explicit: Option<DocumentFormat>, path: Option<&Path>) -> DocumentFormat {
    if let Some(format) = explicit {
        return format;
    }

    match path {
        Some(path) if path.as_os_str() != STDIO_PATH => {
            DocumentFormat::from_path(path).unwrap_or_else(|| {
                warn!(
                    "Could not detect format of {}, assuming json",
                    path.display()
                );
                DocumentFormat::Json
            })
        }
        _ => DocumentFormat::Json,
    }
}

pub async fn handle_command(cli: Cli, mut config: ConverterConfig) -> Result<()> {
    let converter = ResumeConverter::new(config.html.clone());
    let backup = config.output.backup_existing;

    match cli.command {
        Command::Convert {
            input,
            to,
            from,
            output,
        } => {
            let from = resolve_format(from, Some(&input));
            let text = FsOps::read_input(&input).await?;
            let rendered = converter
                .convert(&text, from, to)
                .with_context(|| format!("Failed to convert {}", input.display()))?;

            FsOps::write_output(output.as_deref(), &rendered, backup).await?;
            info!("Converted {} ({} -> {})", input.display(), from, to);
        }

        Command::New { output, format } => {
            let format = resolve_format(format, output.as_deref());
            let rendered = converter.render(&blank_template(), format)?;

            FsOps::write_output(output.as_deref(), &rendered, backup).await?;
            info!("Created blank resume as {}", format);
        }

        Command::Inspect { input, from } => {
            let from = resolve_format(from, Some(&input));
            let text = FsOps::read_input(&input).await?;
            let doc = converter.parse(&text, from)?;

            let report = serde_json::to_string_pretty(&inspect(&doc))
                .context("Failed to serialize inspection report")?;
            FsOps::write_output(None, &format!("{}\n", report), false).await?;
        }

        Command::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            start_web_server(&config).await?;
        }
    }

    Ok(())
}
