//! Print spool boundary. Labels are handed to CUPS as finished PNG files.

use log::info;
use std::path::Path;
use std::process::Command;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrintError {
    #[error("printing unavailable: {0}")]
    Unavailable(String),
    #[error("{command} exited with {status}: {stderr}")]
    Failed {
        command: &'static str,
        status: i32,
        stderr: String,
    },
}

pub trait Spooler {
    fn list_printers(&self) -> Result<Vec<String>, PrintError>;
    fn print(&self, printer: &str, file: &Path) -> Result<(), PrintError>;
}

/// `lpstat`/`lp` from CUPS.
#[derive(Clone, Copy, Debug, Default)]
pub struct LpSpooler;

fn run(command: &'static str, args: &[&str]) -> Result<String, PrintError> {
    let out = Command::new(command)
        .args(args)
        .output()
        .map_err(|e| PrintError::Unavailable(format!("{command}: {e}")))?;
    if !out.status.success() {
        return Err(PrintError::Failed {
            command,
            status: out.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&out.stdout).to_string())
}

impl Spooler for LpSpooler {
    fn list_printers(&self) -> Result<Vec<String>, PrintError> {
        let out = run("lpstat", &["-e"])?;
        Ok(out
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn print(&self, printer: &str, file: &Path) -> Result<(), PrintError> {
        let file_arg = file.to_string_lossy().into_owned();
        run(
            "lp",
            &[
                "-d",
                printer,
                "-o",
                "media=Custom.50x40mm",
                "-o",
                "fit-to-page",
                file_arg.as_str(),
            ],
        )?;
        info!("sent {} to {printer}", file.display());
        Ok(())
    }
}
