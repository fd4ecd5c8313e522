//! imgsplit: split markdown documents without cutting image descriptions

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use imgsplit::config::{HeaderSplitterConfig, ParagraphSplitterConfig};
use imgsplit::{Chunk, Config, ImageAwareSplitter, ImageBlock, SplitterConfig, extract};
use serde::Serialize;
use serde_json::json;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::FmtSubscriber;
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "imgsplit")]
#[command(about = "Image-aware markdown segmentation")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "imgsplit.toml")]
    config: PathBuf,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Segment a markdown file or every markdown file under a directory
    Split {
        /// Path to document or directory
        path: PathBuf,

        /// Merge strategy (inline, separate, contextual)
        #[arg(short, long)]
        strategy: Option<String>,

        /// Merge threshold in characters
        #[arg(short, long)]
        threshold: Option<usize>,

        /// Delegate splitter
        #[arg(long, value_enum)]
        splitter: Option<SplitterKind>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,
    },

    /// Print the image blocks found in a document
    Extract {
        /// Path to document or directory
        path: PathBuf,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SplitterKind {
    Header,
    Paragraph,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Serialize)]
struct SegmentedDocument {
    source: String,
    sha256: String,
    chunks: Vec<Chunk>,
}

#[derive(Serialize)]
struct ExtractedDocument {
    source: String,
    blocks: Vec<ImageBlock>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Missing file means defaults; a broken one is an error
    let mut config = if cli.config.exists() {
        Config::load(&cli.config)?
    } else {
        Config::default()
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.logging.level.raised(cli.verbose).to_tracing())
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Split {
            path,
            strategy,
            threshold,
            splitter,
            format,
        } => {
            if let Some(strategy) = strategy {
                config.merge.strategy = strategy.parse()?;
            }
            if let Some(threshold) = threshold {
                config.merge.merge_threshold = threshold;
            }
            if let Some(kind) = splitter {
                select_splitter(&mut config, kind);
            }
            split_documents(&config, &path, format)
        }
        Commands::Extract { path } => extract_documents(&path),
    }
}

/// Switch the delegate kind, keeping configured settings when it already matches
fn select_splitter(config: &mut Config, kind: SplitterKind) {
    let unchanged = matches!(
        (kind, &config.splitter),
        (SplitterKind::Header, SplitterConfig::Header(_))
            | (SplitterKind::Paragraph, SplitterConfig::Paragraph(_))
    );
    if unchanged {
        return;
    }

    config.splitter = match kind {
        SplitterKind::Header => SplitterConfig::Header(HeaderSplitterConfig::default()),
        SplitterKind::Paragraph => SplitterConfig::Paragraph(ParagraphSplitterConfig::default()),
    };
}

fn split_documents(config: &Config, path: &Path, format: OutputFormat) -> Result<()> {
    let splitter = ImageAwareSplitter::from_config(config)?;
    info!(
        "Splitting with {} delegate, {} strategy, threshold {}",
        config.splitter.kind(),
        config.merge.strategy,
        config.merge.merge_threshold
    );

    let documents = collect_documents(path)?;
    let mut total_chunks = 0;

    for document in &documents {
        let bytes = fs::read(document)
            .with_context(|| format!("Failed to read file: {}", document.display()))?;
        let text = std::str::from_utf8(&bytes)
            .with_context(|| format!("File is not valid UTF-8: {}", document.display()))?;

        let mut chunks = splitter
            .split(text)
            .with_context(|| format!("Failed to segment {}", document.display()))?;
        for (index, chunk) in chunks.iter_mut().enumerate() {
            chunk.metadata.insert("chunk_index".to_string(), json!(index));
        }
        debug!("{}: {} chunks", document.display(), chunks.len());
        total_chunks += chunks.len();

        let output = SegmentedDocument {
            source: document.display().to_string(),
            sha256: hash_bytes(&bytes),
            chunks,
        };
        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output)?),
            OutputFormat::Text => print_text(&output)?,
        }
    }

    info!(
        "Segmented {} documents into {} chunks",
        documents.len(),
        total_chunks
    );
    Ok(())
}

fn extract_documents(path: &Path) -> Result<()> {
    for document in collect_documents(path)? {
        let text = fs::read_to_string(&document)
            .with_context(|| format!("Failed to read file: {}", document.display()))?;
        let blocks = extract(&text);
        info!("{}: {} image blocks", document.display(), blocks.len());

        let output = ExtractedDocument {
            source: document.display().to_string(),
            blocks,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    }
    Ok(())
}

fn print_text(document: &SegmentedDocument) -> Result<()> {
    println!("=== {} ({} chunks) ===", document.source, document.chunks.len());
    for (index, chunk) in document.chunks.iter().enumerate() {
        println!("\n--- Chunk {} ---", index + 1);
        let headers: serde_json::Map<_, _> = chunk
            .metadata
            .iter()
            .filter(|(key, _)| key.as_str() != "chunk_index")
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        if !headers.is_empty() {
            println!("metadata: {}", serde_json::to_string(&headers)?);
        }
        println!("{}", chunk.content);
    }
    println!();
    Ok(())
}

/// A single file, or every markdown file under a directory in name order
fn collect_documents(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    let mut documents = Vec::new();
    for entry in WalkDir::new(path).follow_links(false).sort_by_file_name() {
        let entry = entry.context("Failed to read directory entry")?;
        if entry.file_type().is_file() && is_markdown(entry.path()) {
            documents.push(entry.into_path());
        }
    }
    Ok(documents)
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("markdown"))
}

/// Hex SHA-256 of file contents
fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
