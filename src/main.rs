mod cli;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::output::{OutputConfig, format_size};
use cli::{Cli, Command};
use fb2epub::Document;
use fb2epub::epub::resources::ResourceMap;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Serialize)]
struct ConvertReport<'a> {
    input: String,
    output: String,
    title: &'a str,
    sections: usize,
    binaries: usize,
}

#[derive(Serialize)]
struct BookInfo<'a> {
    title: &'a str,
    authors: Vec<String>,
    language: &'a str,
    genres: &'a [String],
    annotation: Option<&'a str>,
    date: Option<&'a str>,
    publisher: Option<&'a str>,
    cover_image: Option<&'a str>,
    sections: usize,
    paragraphs: usize,
    binaries: Vec<BinaryInfo<'a>>,
}

#[derive(Serialize)]
struct BinaryInfo<'a> {
    id: &'a str,
    content_type: &'a str,
    size_bytes: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = OutputConfig::from_cli(&cli);
    init_tracing(&output);

    match cli.command {
        Command::Convert {
            input,
            output: target,
            max_size,
        } => handle_convert(&input, target, max_size, &output)?,
        Command::Info { input } => handle_info(&input, &output)?,
    }

    Ok(())
}

/// Log to stderr so stdout stays clean for `--json`.
fn init_tracing(output: &OutputConfig) {
    let default = if output.verbose {
        "fb2epub=debug"
    } else if output.quiet {
        "fb2epub=error"
    } else {
        "fb2epub=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(!output.no_color),
        )
        .init();
}

fn read_input(input: &Path, max_size: Option<u64>) -> Result<Vec<u8>> {
    if let Some(limit) = max_size {
        let size = std::fs::metadata(input)
            .with_context(|| format!("failed to read {}", input.display()))?
            .len();
        if size > limit {
            bail!(
                "{} is {size} bytes, larger than the {limit}-byte limit",
                input.display()
            );
        }
    }
    std::fs::read(input).with_context(|| format!("failed to read {}", input.display()))
}

/// `<slug(title)>.epub` beside the input, or `<input stem>.epub` without a usable title.
fn default_output_path(input: &Path, doc: &Document) -> PathBuf {
    let slug = slug::slugify(doc.metadata.title.trim());
    let name = if slug.is_empty() {
        input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "book".to_string())
    } else {
        slug
    };
    input.with_file_name(format!("{name}.epub"))
}

fn handle_convert(
    input: &Path,
    target: Option<PathBuf>,
    max_size: u64,
    output: &OutputConfig,
) -> Result<()> {
    let bytes = read_input(input, Some(max_size))?;
    let doc = fb2epub::parse_document(&bytes)
        .with_context(|| format!("failed to parse {}", input.display()))?;
    let path = target.unwrap_or_else(|| default_output_path(input, &doc));

    fb2epub::generate_epub(&doc, &path)
        .with_context(|| format!("failed to write {}", path.display()))?;

    let images = ResourceMap::new(&doc.binaries).len();
    if output.json {
        output.print_json(&ConvertReport {
            input: input.display().to_string(),
            output: path.display().to_string(),
            title: doc.metadata.display_title(),
            sections: doc.section_count(),
            binaries: images,
        })?;
    } else {
        output.status(&format!("Converted {} -> {}", input.display(), path.display()));
        output.detail(&format!("  {} sections, {images} images", doc.section_count()));
    }
    Ok(())
}

fn handle_info(input: &Path, output: &OutputConfig) -> Result<()> {
    let bytes = read_input(input, None)?;
    let doc = fb2epub::parse_document(&bytes)
        .with_context(|| format!("failed to parse {}", input.display()))?;
    let meta = &doc.metadata;
    let resources = ResourceMap::new(&doc.binaries);

    if output.json {
        output.print_json(&BookInfo {
            title: meta.display_title(),
            authors: meta.authors.iter().map(|a| a.display_name()).collect(),
            language: meta.display_language(),
            genres: &meta.genres,
            annotation: meta.annotation.as_deref(),
            date: meta.date.as_deref(),
            publisher: meta.publisher.as_deref(),
            cover_image: meta.cover_image.as_deref(),
            sections: doc.section_count(),
            paragraphs: doc.paragraph_count(),
            binaries: resources
                .iter()
                .map(|b| BinaryInfo {
                    id: &b.id,
                    content_type: &b.content_type,
                    size_bytes: b.data.len(),
                })
                .collect(),
        })?;
        return Ok(());
    }

    println!("Title:      {}", meta.display_title());
    println!("Authors:    {}", meta.display_authors());
    println!("Language:   {}", meta.display_language());
    if !meta.genres.is_empty() {
        println!("Genres:     {}", meta.genres.join(", "));
    }
    if let Some(ref date) = meta.date {
        println!("Date:       {date}");
    }
    if let Some(ref publisher) = meta.publisher {
        println!("Publisher:  {publisher}");
    }
    println!("Sections:   {}", doc.section_count());
    println!("Paragraphs: {}", doc.paragraph_count());
    let total: usize = resources.iter().map(|b| b.data.len()).sum();
    println!("Binaries:   {} ({})", resources.len(), format_size(total));

    if output.verbose {
        if let Some(ref annotation) = meta.annotation {
            println!("\n{annotation}");
        }
        let rows: Vec<Vec<String>> = resources
            .iter()
            .map(|b| vec![b.id.clone(), b.content_type.clone(), format_size(b.data.len())])
            .collect();
        if !rows.is_empty() {
            println!();
            output.print_table(&["ID", "TYPE", "SIZE"], &rows);
        }
    }
    Ok(())
}
