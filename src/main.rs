//! fraudshield - command line front end
//!
//! Writes the input template, labels a single transaction or a CSV upload
//! with the configured classifier, and saves the PDF report.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fraudshield::{
    config::{AppConfig, ModelConfig},
    logging::init_logging,
    metrics::PipelineMetrics,
    report::{render_preview, table::ReportTable, RenderedDocument},
    template::template_document,
    Classifier, PipelineError, ReportPipeline, TransactionRecord, TransactionType,
};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "fraudshield")]
#[command(about = "Label transactions as fraudulent or legitimate and render PDF reports")]
#[command(version)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true, default_value = AppConfig::DEFAULT_PATH)]
    config: PathBuf,

    /// Override the configured log level
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the example input CSV for data providers
    Template {
        /// Output path (default: ./template.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Label one transaction entered on the command line
    Single {
        /// PAYMENT, TRANSFER, CASH_OUT or DEPOSIT
        #[arg(long = "type", value_parser = parse_type)]
        tx_type: TransactionType,
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        old_balance_sender: f64,
        #[arg(long)]
        new_balance_sender: f64,
        #[arg(long)]
        old_balance_receiver: f64,
        #[arg(long)]
        new_balance_receiver: f64,
        /// Classifier model file (overrides config)
        #[arg(long)]
        model: Option<PathBuf>,
        /// Report path (default: ./fraud_report.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Label every row of a CSV file
    Batch {
        /// Input CSV with a header row
        input: PathBuf,
        /// Classifier model file (overrides config)
        #[arg(long)]
        model: Option<PathBuf>,
        /// Report path (default: ./fraud_predictions.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Labelled rows to print (default from config)
        #[arg(long)]
        preview: Option<usize>,
    },
}

fn parse_type(value: &str) -> Result<TransactionType, String> {
    TransactionType::parse(value).ok_or_else(|| {
        format!(
            "unknown transaction type `{}` (expected one of PAYMENT, TRANSFER, CASH_OUT, DEPOSIT)",
            value
        )
    })
}

#[cfg(feature = "onnx")]
fn load_classifier(config: &ModelConfig) -> Result<Box<dyn Classifier>> {
    let classifier = fraudshield::models::OnnxClassifier::new(config)
        .with_context(|| format!("Failed to load classifier from {}", config.path.display()))?;
    Ok(Box::new(classifier))
}

#[cfg(not(feature = "onnx"))]
fn load_classifier(config: &ModelConfig) -> Result<Box<dyn Classifier>> {
    anyhow::bail!(
        "cannot load {}: this build has no model runtime (rebuild with `--features onnx`)",
        config.path.display()
    )
}

fn save(doc: &RenderedDocument, output: Option<&Path>) -> Result<PathBuf> {
    let written = match output {
        Some(path) => doc.write_to_path(path),
        None => doc.write_to("."),
    };
    written.with_context(|| format!("Failed to write {}", doc.filename))
}

fn run(cli: Cli, config: AppConfig, metrics: &Arc<PipelineMetrics>) -> Result<()> {
    let mut config = config;

    match cli.command {
        Commands::Template { output } => {
            let doc = template_document().context("Failed to build template")?;
            let path = save(&doc, output.as_deref())?;
            info!(path = %path.display(), "Template written");
            println!("Template written to {}", path.display());
        }
        Commands::Single {
            tx_type,
            amount,
            old_balance_sender,
            new_balance_sender,
            old_balance_receiver,
            new_balance_receiver,
            model,
            output,
        } => {
            if let Some(model) = model {
                config.model.path = model;
            }
            let classifier = load_classifier(&config.model)?;
            let pipeline = ReportPipeline::new(classifier.as_ref(), config.report.clone())
                .with_metrics(metrics.clone());

            let out = pipeline.process_record(TransactionRecord {
                tx_type,
                amount,
                old_balance_sender,
                new_balance_sender,
                old_balance_receiver,
                new_balance_receiver,
            })?;

            if let Some(label) = out.first_label() {
                println!("{}", label.verdict());
            }
            let path = save(&out.report, output.as_deref())?;
            println!("Report written to {}", path.display());
        }
        Commands::Batch {
            input,
            model,
            output,
            preview,
        } => {
            if let Some(model) = model {
                config.model.path = model;
            }
            let classifier = load_classifier(&config.model)?;
            let pipeline = ReportPipeline::new(classifier.as_ref(), config.report.clone())
                .with_metrics(metrics.clone());

            let file = File::open(&input)
                .with_context(|| format!("Failed to open {}", input.display()))?;
            info!(input = %input.display(), "Processing upload");
            let out = pipeline.process_csv(BufReader::new(file))?;

            let limit = preview.unwrap_or(config.report.preview_rows);
            if limit > 0 {
                print!("{}", render_preview(&ReportTable::from_batch(&out.labeled), limit));
            }
            println!(
                "{} row(s) labelled, {} fraudulent",
                out.labeled.len(),
                out.labeled.fraud_count()
            );
            let path = save(&out.report, output.as_deref())?;
            println!("Report written to {}", path.display());
        }
    }

    Ok(())
}

/// Print the structured detail behind a failed run.
fn print_failure(err: &anyhow::Error) {
    eprintln!("Error: {:#}", err);

    match err.downcast_ref::<PipelineError>() {
        Some(PipelineError::Schema(schema)) => {
            let missing = schema.missing_field_names();
            if !missing.is_empty() {
                eprintln!("Missing columns: {}", missing.join(", "));
            }
        }
        Some(PipelineError::TypeCoercion(coercion)) => {
            for failure in &coercion.failures {
                eprintln!("  {}", failure);
            }
        }
        _ => {}
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let (mut config, loaded) = AppConfig::load_or_default(&cli.config)?;
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }

    // Initialize logging
    init_logging(&config.logging)?;

    if loaded {
        info!(path = %cli.config.display(), "Configuration loaded");
    } else {
        info!(path = %cli.config.display(), "Configuration file not found, using defaults");
    }

    let metrics = Arc::new(PipelineMetrics::new());
    let labels_rows = !matches!(cli.command, Commands::Template { .. });

    let result = run(cli, config, &metrics);

    if labels_rows {
        metrics.print_summary();
    }

    if let Err(e) = result {
        print_failure(&e);
        std::process::exit(1);
    }

    Ok(())
}
