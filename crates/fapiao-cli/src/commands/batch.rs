//! Batch processing command with duplicate detection across the run.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use fapiao_core::{
    DocumentKind, InvoiceData, InvoiceExtractor, InvoiceKey, MemoryStore, Outcome,
};

use super::parse::{amount_cell, format_record, load_config, load_fields, type_label, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern (text files)
    #[arg(required = true)]
    input: String,

    /// Output directory for per-file records
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    invoice: Option<InvoiceData>,
    duplicate: bool,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    // Expand glob pattern; .fields.json sidecars are picked up per file,
    // never processed as inputs themselves.
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            ext.eq_ignore_ascii_case("txt")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching text files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let extractor = InvoiceExtractor::with_config(config);
    let mut store = MemoryStore::new();
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let result = process_single_file(&path, &extractor, &store);
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match result {
            Ok(Outcome::Fresh(report)) => {
                store.insert(InvoiceKey::from(&report.invoice));
                results.push(ProcessResult {
                    path: path.clone(),
                    invoice: Some(report.invoice),
                    duplicate: false,
                    error: None,
                    processing_time_ms,
                });
            }
            Ok(Outcome::Duplicate(report)) => {
                warn!(
                    "Duplicate invoice {} in {}",
                    report.invoice.invoice_number,
                    path.display()
                );
                results.push(ProcessResult {
                    path: path.clone(),
                    invoice: Some(report.invoice),
                    duplicate: true,
                    error: None,
                    processing_time_ms,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path: path.clone(),
                        invoice: None,
                        duplicate: false,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    let fresh: Vec<_> = results
        .iter()
        .filter(|r| r.invoice.is_some() && !r.duplicate)
        .collect();
    let duplicates: Vec<_> = results.iter().filter(|r| r.duplicate).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    // Duplicates get no per-file output; their record is already on disk
    // from the first sighting.
    for result in &fresh {
        if let (Some(invoice), Some(output_dir)) = (&result.invoice, &args.output_dir) {
            let output_name = result
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("invoice");

            let extension = match args.format {
                OutputFormat::Json => "json",
                OutputFormat::Csv => "csv",
                OutputFormat::Text => "txt",
            };

            let output_path = output_dir.join(format!("{}.{}", output_name, extension));
            fs::write(&output_path, format_record(invoice, args.format)?)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} new, {} duplicates, {} failed",
        style(fresh.len()).green(),
        style(duplicates.len()).yellow(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn process_single_file(
    path: &PathBuf,
    extractor: &InvoiceExtractor,
    store: &MemoryStore,
) -> anyhow::Result<Outcome> {
    let text = fs::read_to_string(path)?;
    if text.trim().is_empty() {
        anyhow::bail!("Input file is empty");
    }

    // A sidecar <stem>.fields.json carries provider-structured fields.
    let sidecar = path.with_extension("fields.json");
    let fields = if sidecar.exists() {
        Some(load_fields(&sidecar)?)
    } else {
        None
    };

    Ok(extractor.process(DocumentKind::Image, &text, fields.as_ref(), store)?)
}

fn write_summary(path: &PathBuf, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "invoice_number",
        "invoice_date",
        "invoice_type",
        "seller_name",
        "amount",
        "total_amount",
        "complete",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(invoice) = &result.invoice {
            let status = if result.duplicate { "duplicate" } else { "success" };
            wtr.write_record([
                filename,
                status,
                &invoice.invoice_number,
                &invoice.invoice_date,
                &type_label(invoice),
                &invoice.seller_name,
                &amount_cell(invoice.amount),
                &amount_cell(invoice.total_amount),
                if invoice.is_complete() { "yes" } else { "no" },
                &result.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                &result.processing_time_ms.to_string(),
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
