//! Batch pipeline: number, render, print, persist.

use anyhow::{Context, Result};
use inventory_core::{AssetRecord, IdentifierAllocator, RecordStore};
use label_core::LabelRenderer;
use label_core::layout::SUPPORTED_DPI;
use log::{error, info, warn};
use std::fs;
use std::path::PathBuf;

use crate::output::label_paths;
use crate::print::Spooler;
use crate::settings::Settings;

/// Files written for one record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelFiles {
    pub identifier: String,
    pub png: PathBuf,
    pub pdf: PathBuf,
}

#[derive(Clone, Debug, Default)]
pub struct BatchReport {
    pub labels: Vec<LabelFiles>,
    pub print_failures: usize,
}

pub struct Pipeline<'a, S: RecordStore> {
    pub settings: &'a Settings,
    pub store: &'a mut S,
    pub renderer: &'a LabelRenderer,
    pub spooler: &'a dyn Spooler,
    pub allocator: IdentifierAllocator,
}

impl<'a, S: RecordStore> Pipeline<'a, S> {
    pub fn new(
        settings: &'a Settings,
        store: &'a mut S,
        renderer: &'a LabelRenderer,
        spooler: &'a dyn Spooler,
    ) -> Self {
        Self {
            settings,
            store,
            renderer,
            spooler,
            allocator: IdentifierAllocator::new(settings.policy()),
        }
    }

    /// Number every record, write its PNG and PDF label, print when
    /// configured, then merge the numbered batch into the store. The store
    /// is left untouched when a label fails to render.
    pub fn run(&mut self, records: Vec<AssetRecord>) -> Result<BatchReport> {
        let dpi = self.settings.dpi;
        if !SUPPORTED_DPI.contains(&dpi) {
            warn!("{dpi} dpi is not a supported label printer resolution {SUPPORTED_DPI:?}");
        }
        let out_dir = &self.settings.out_dir;
        fs::create_dir_all(out_dir)
            .with_context(|| format!("creating output directory {}", out_dir.display()))?;

        let existing = self.store.existing_identifiers();
        let records = self.allocator.assign(records, &existing);

        let printer = self.settings.auto_printer();
        if self.settings.auto_print && printer.is_none() {
            warn!("auto_print is set but no printer is configured");
        }

        let mut report = BatchReport::default();
        for rec in &records {
            let id = rec.identifier().to_string();
            info!("generating label {id}");
            let label = self
                .renderer
                .render(rec, dpi)
                .with_context(|| format!("rendering label {id}"))?;
            let (png, pdf) = label_paths(out_dir, &id);
            fs::write(&png, &label.png).with_context(|| format!("writing {}", png.display()))?;
            fs::write(&pdf, &label.pdf).with_context(|| format!("writing {}", pdf.display()))?;

            if let Some(printer) = printer {
                if let Err(e) = self.spooler.print(printer, &png) {
                    error!("printing {} failed: {e}", png.display());
                    report.print_failures += 1;
                }
            }
            report.labels.push(LabelFiles {
                identifier: id,
                png,
                pdf,
            });
        }

        self.store
            .merge(&records)
            .context("updating inventory store")?;
        info!("{} label(s) written to {}", report.labels.len(), out_dir.display());
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::print::PrintError;
    use crate::settings::Schema;
    use inventory_core::MemoryStore;
    use label_core::{FixedAdvance, PdfBackend, RenderOptions};
    use std::cell::RefCell;
    use std::path::Path;

    #[derive(Default)]
    struct RecordingSpooler {
        jobs: RefCell<Vec<(String, PathBuf)>>,
        fail: bool,
    }

    impl Spooler for RecordingSpooler {
        fn list_printers(&self) -> Result<Vec<String>, PrintError> {
            Ok(vec!["BP730i".into()])
        }

        fn print(&self, printer: &str, file: &Path) -> Result<(), PrintError> {
            if self.fail {
                return Err(PrintError::Unavailable("offline".into()));
            }
            self.jobs
                .borrow_mut()
                .push((printer.to_string(), file.to_path_buf()));
            Ok(())
        }
    }

    fn renderer() -> LabelRenderer {
        LabelRenderer::with_measure(
            RenderOptions {
                pdf_backend: PdfBackend::Raster,
                ..Default::default()
            },
            Box::new(FixedAdvance::default()),
        )
    }

    fn rec(date: &str, id: &str) -> AssetRecord {
        AssetRecord {
            invoice_date: date.into(),
            vendor: "Conrad".into(),
            inventory_number: id.into(),
            ..Default::default()
        }
    }

    fn settings(dir: &Path) -> Settings {
        Settings {
            out_dir: dir.to_path_buf(),
            dpi: 203,
            ..Default::default()
        }
    }

    #[test]
    fn numbers_renders_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        let mut store = MemoryStore::new();
        store.merge(&[rec("", "1000004")]).unwrap();
        let renderer = renderer();
        let spooler = RecordingSpooler::default();

        let report = Pipeline::new(&settings, &mut store, &renderer, &spooler)
            .run(vec![rec("", ""), rec("", "")])
            .unwrap();

        let ids: Vec<_> = report.labels.iter().map(|l| l.identifier.as_str()).collect();
        assert_eq!(ids, ["1000005", "1000006"]);
        for label in &report.labels {
            assert!(label.png.exists());
            assert!(label.pdf.exists());
        }
        assert_eq!(store.records().len(), 3);
        assert!(spooler.jobs.borrow().is_empty());
    }

    #[test]
    fn year_schema_and_rerun_versions_files() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            schema: Schema::Year,
            ..settings(dir.path())
        };
        let mut store = MemoryStore::new();
        let renderer = renderer();
        let spooler = RecordingSpooler::default();

        let first = Pipeline::new(&settings, &mut store, &renderer, &spooler)
            .run(vec![rec("03.04.2024", "")])
            .unwrap();
        assert_eq!(first.labels[0].identifier, "INV-2024-001");

        // Same identifier again: files get a version suffix, store keeps one row.
        let second = Pipeline::new(&settings, &mut store, &renderer, &spooler)
            .run(vec![rec("03.04.2024", "INV-2024-001")])
            .unwrap();
        assert_eq!(
            second.labels[0].png,
            dir.path().join("Inventar_INV-2024-001_v2.png")
        );
        assert_eq!(store.records().len(), 1);
    }

    #[test]
    fn prints_when_configured_and_tolerates_failures() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            auto_print: true,
            printer: Some("BP730i".into()),
            ..settings(dir.path())
        };
        let renderer = renderer();

        let mut store = MemoryStore::new();
        let spooler = RecordingSpooler::default();
        let report = Pipeline::new(&settings, &mut store, &renderer, &spooler)
            .run(vec![rec("", "")])
            .unwrap();
        assert_eq!(report.print_failures, 0);
        assert_eq!(spooler.jobs.borrow()[0].0, "BP730i");
        assert_eq!(spooler.jobs.borrow()[0].1, report.labels[0].png);

        let mut store = MemoryStore::new();
        let failing = RecordingSpooler {
            fail: true,
            ..Default::default()
        };
        let report = Pipeline::new(&settings, &mut store, &renderer, &failing)
            .run(vec![rec("", "")])
            .unwrap();
        assert_eq!(report.print_failures, 1);
        assert_eq!(store.records().len(), 1);
    }
}
