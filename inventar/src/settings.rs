use config::{Config, ConfigError, Environment, File};
use inventory_core::NumberingPolicy;
use inventory_core::policy::DEFAULT_START;
use label_core::PdfBackend;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Numbering scheme as named in configuration and on the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Schema {
    /// Decimal numbers counting up from `start_number`.
    #[default]
    Sequential,
    /// `INV-<year>-NNN`, counted per invoice year.
    Year,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
    #[serde(default)]
    pub schema: Schema,
    #[serde(default = "default_start_number")]
    pub start_number: u64,
    #[serde(default = "default_dpi")]
    pub dpi: u32,
    #[serde(default)]
    pub printer: Option<String>,
    #[serde(default)]
    pub auto_print: bool,
    #[serde(default)]
    pub pdf_backend: PdfBackend,
}

fn default_out_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_start_number() -> u64 {
    DEFAULT_START
}

fn default_dpi() -> u32 {
    300
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            out_dir: default_out_dir(),
            schema: Schema::default(),
            start_number: default_start_number(),
            dpi: default_dpi(),
            printer: None,
            auto_print: false,
            pdf_backend: PdfBackend::default(),
        }
    }
}

impl Settings {
    /// Layer `inventar.toml` (or `path`, which must exist) and `INVENTAR__*`
    /// environment variables over the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name("inventar").required(false),
        };
        Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix("INVENTAR").separator("__"))
            .build()?
            .try_deserialize()
    }

    pub fn policy(&self) -> NumberingPolicy {
        match self.schema {
            Schema::Sequential => NumberingPolicy::Sequential {
                start: self.start_number,
            },
            Schema::Year => NumberingPolicy::YearCoded,
        }
    }

    /// The printer to use when labels should be printed right away.
    pub fn auto_printer(&self) -> Option<&str> {
        if !self.auto_print {
            return None;
        }
        self.printer.as_deref().map(str::trim).filter(|p| !p.is_empty())
    }
}
