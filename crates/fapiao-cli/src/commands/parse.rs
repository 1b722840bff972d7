//! Parse command - extract fields from a single invoice text file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use rust_decimal::Decimal;
use tracing::{debug, info};

use fapiao_core::{
    DocumentKind, ExtractionConfig, InvoiceData, InvoiceExtractor, ProviderFields,
};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Input text file (OCR output or extracted PDF text)
    #[arg(required = true)]
    input: PathBuf,

    /// JSON file with provider-structured fields for the same invoice
    #[arg(long)]
    fields: Option<PathBuf>,

    /// Source document kind the text came from
    #[arg(short = 'k', long, value_enum, default_value = "image")]
    kind: SourceKind,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum SourceKind {
    Image,
    Pdf,
}

impl From<SourceKind> for DocumentKind {
    fn from(kind: SourceKind) -> Self {
        match kind {
            SourceKind::Image => DocumentKind::Image,
            SourceKind::Pdf => DocumentKind::Pdf,
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Parsing file: {}", args.input.display());

    let text = fs::read_to_string(&args.input)?;
    let fields = args.fields.as_deref().map(load_fields).transpose()?;

    let extractor = InvoiceExtractor::with_config(config);
    let report = extractor.extract(args.kind.into(), &text, fields.as_ref())?;

    if !report.warnings.is_empty() {
        eprintln!("{}", style("Warnings:").yellow());
        for warning in &report.warnings {
            eprintln!("  - {}", warning);
        }
    }

    let output = format_record(&report.invoice, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if report.invoice.is_complete() {
        eprintln!("{} Record is complete", style("✓").green());
    } else {
        eprintln!(
            "{} Record is incomplete (number, amount or date missing)",
            style("!").yellow()
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

pub fn load_config(config_path: Option<&str>) -> anyhow::Result<ExtractionConfig> {
    match config_path {
        Some(path) => Ok(ExtractionConfig::from_file(Path::new(path))?),
        None => Ok(ExtractionConfig::default()),
    }
}

/// Load provider-structured fields from a JSON file.
pub fn load_fields(path: &Path) -> anyhow::Result<ProviderFields> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Invalid fields file {}: {}", path.display(), e))
}

pub fn format_record(record: &InvoiceData, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => format_csv(record),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

pub fn type_label(record: &InvoiceData) -> String {
    serde_json::to_value(record.invoice_type)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

pub fn amount_cell(value: Option<Decimal>) -> String {
    value.map(|d| d.to_string()).unwrap_or_default()
}

fn format_csv(record: &InvoiceData) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "invoice_number",
        "invoice_content",
        "invoice_date",
        "invoice_type",
        "amount",
        "tax_amount",
        "total_amount",
        "seller_name",
        "seller_tax_id",
        "buyer_name",
        "buyer_tax_id",
    ])?;

    wtr.write_record([
        &record.invoice_number,
        &record.invoice_content,
        &record.invoice_date,
        &type_label(record),
        &amount_cell(record.amount),
        &amount_cell(record.tax_amount),
        &amount_cell(record.total_amount),
        &record.seller_name,
        &record.seller_tax_id,
        &record.buyer_name,
        &record.buyer_tax_id,
    ])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(record: &InvoiceData) -> String {
    let mut output = String::new();

    output.push_str(&format!("Invoice: {}\n", record.invoice_number));
    output.push_str(&format!("Date:    {}\n", record.invoice_date));
    output.push_str(&format!("Type:    {}\n", type_label(record)));
    output.push_str(&format!("Content: {}\n", record.invoice_content));
    output.push('\n');

    output.push_str("Seller:\n");
    output.push_str(&format!("  {}\n", record.seller_name));
    if !record.seller_tax_id.is_empty() {
        output.push_str(&format!("  Tax id: {}\n", record.seller_tax_id));
    }
    output.push('\n');

    output.push_str("Buyer:\n");
    output.push_str(&format!("  {}\n", record.buyer_name));
    if !record.buyer_tax_id.is_empty() {
        output.push_str(&format!("  Tax id: {}\n", record.buyer_tax_id));
    }
    output.push('\n');

    output.push_str("Amounts:\n");
    output.push_str(&format!("  Amount: {}\n", amount_cell(record.amount)));
    output.push_str(&format!("  Tax:    {}\n", amount_cell(record.tax_amount)));
    output.push_str(&format!("  Total:  {}\n", amount_cell(record.total_amount)));

    output
}
