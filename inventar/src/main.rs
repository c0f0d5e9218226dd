use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use inventory_core::{AssetRecord, CsvStore, read_table};
use label_core::{LabelRenderer, PdfBackend, RenderOptions};
use std::path::PathBuf;

mod batch;
mod output;
mod print;
mod settings;

use batch::{BatchReport, Pipeline};
use print::{LpSpooler, Spooler};
use settings::{Schema, Settings};

/// Assign inventory numbers and generate 5 x 4 cm QR labels (PNG + PDF).
#[derive(Parser, Debug)]
#[command(name = "inventar", version)]
struct Cli {
    /// Settings file (default: ./inventar.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Output directory for labels and Inventar_DB.csv
    #[arg(long, global = true)]
    out_dir: Option<PathBuf>,
    #[arg(long, global = true, value_enum)]
    schema: Option<Schema>,
    /// First number of the sequential schema
    #[arg(long, global = true)]
    start: Option<u64>,
    /// Label resolution (203 or 300)
    #[arg(long, global = true)]
    dpi: Option<u32>,
    /// Printer name as known to CUPS
    #[arg(long, global = true)]
    printer: Option<String>,
    /// Print every label after it is generated
    #[arg(long, global = true)]
    auto_print: bool,
    /// PDF output: vector or raster
    #[arg(long, global = true, value_parser = parse_pdf_backend)]
    pdf: Option<PdfBackend>,
    /// More logging (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate labels for every row of a CSV file
    Batch { file: PathBuf },
    /// Generate the label for one device
    Add(AddArgs),
    /// Print the computed label layout as JSON
    Layout {
        #[arg(required = true)]
        lines: Vec<String>,
    },
    /// List available printers
    Printers,
}

#[derive(Args, Debug)]
struct AddArgs {
    #[arg(long, default_value = "")]
    rechnungsdatum: String,
    #[arg(long, default_value = "")]
    rechnungsnummer: String,
    #[arg(long, default_value = "")]
    bestellnummer: String,
    #[arg(long, default_value = "")]
    garantie: String,
    #[arg(long, alias = "händler", default_value = "")]
    haendler: String,
    /// Leave empty to assign automatically
    #[arg(long, default_value = "")]
    inventarnummer: String,
}

impl From<AddArgs> for AssetRecord {
    fn from(a: AddArgs) -> Self {
        AssetRecord {
            invoice_date: a.rechnungsdatum.trim().to_string(),
            invoice_number: a.rechnungsnummer.trim().to_string(),
            order_number: a.bestellnummer.trim().to_string(),
            warranty: a.garantie.trim().to_string(),
            vendor: a.haendler.trim().to_string(),
            inventory_number: a.inventarnummer.trim().to_string(),
        }
    }
}

fn parse_pdf_backend(s: &str) -> Result<PdfBackend, String> {
    match s.to_ascii_lowercase().as_str() {
        "vector" => Ok(PdfBackend::Vector),
        "raster" => Ok(PdfBackend::Raster),
        other => Err(format!("unknown PDF backend {other:?}; use vector or raster")),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn settings_from(cli: &Cli) -> Result<Settings> {
    let mut s = Settings::load(cli.config.as_deref()).context("loading settings")?;
    if let Some(dir) = &cli.out_dir {
        s.out_dir = dir.clone();
    }
    if let Some(schema) = cli.schema {
        s.schema = schema;
    }
    if let Some(start) = cli.start {
        s.start_number = start;
    }
    if let Some(dpi) = cli.dpi {
        s.dpi = dpi;
    }
    if let Some(printer) = &cli.printer {
        s.printer = Some(printer.clone());
    }
    if cli.auto_print {
        s.auto_print = true;
    }
    if let Some(pdf) = cli.pdf {
        s.pdf_backend = pdf;
    }
    Ok(s)
}

fn generate(settings: &Settings, records: Vec<AssetRecord>) -> Result<BatchReport> {
    anyhow::ensure!(settings.dpi > 0, "dpi must be positive");
    let renderer = LabelRenderer::new(RenderOptions {
        pdf_backend: settings.pdf_backend,
        ..Default::default()
    });
    let mut store = CsvStore::in_dir(&settings.out_dir);
    let report = Pipeline::new(settings, &mut store, &renderer, &LpSpooler).run(records)?;
    println!(
        "{} label(s) generated. Inventory table: {}",
        report.labels.len(),
        store.path().display()
    );
    for label in &report.labels {
        println!("  {}  {}", label.identifier, label.png.display());
    }
    Ok(report)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let settings = settings_from(&cli)?;

    match cli.command {
        Command::Batch { file } => {
            let records =
                read_table(&file).with_context(|| format!("reading {}", file.display()))?;
            generate(&settings, records)?;
        }
        Command::Add(args) => {
            generate(&settings, vec![args.into()])?;
        }
        Command::Layout { lines } => {
            let renderer = LabelRenderer::new(RenderOptions::default());
            let geometry = renderer.layout(&lines, settings.dpi);
            println!("{}", serde_json::to_string_pretty(&geometry)?);
        }
        Command::Printers => {
            let printers = LpSpooler.list_printers()?;
            if printers.is_empty() {
                println!("(no printers found)");
            }
            for p in printers {
                println!("{p}");
            }
        }
    }
    Ok(())
}
