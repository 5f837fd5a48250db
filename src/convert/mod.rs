//! Conversion of a vendor export into a BIDS dataset.
//!
//! The export is expected to hold one folder per session,
//! `<export>/<subject>/<prefix>-<session>`, each containing one folder per
//! acquisition. Acquisition folders are classified by name (see
//! [`Modality`]) and handed to the matching converter.
//!
//! [`Modality`]: ../typedef/enum.Modality.html

pub mod anat;
pub mod fmap;
pub mod func;
pub mod physio;

pub use self::anat::{Defacer, Pydeface};

use crate::error::Result;
use crate::layout::{IdCorrection, SessionId, SessionLayout};
use crate::report::Report;
use crate::typedef::Modality;
use crate::util::{clean_directory, write_json};
use glob::Pattern;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// BIDS version declared in `dataset_description.json`.
pub const BIDS_VERSION: &str = "1.1-rc1";

/// Name of the file collecting sessions that could not be converted.
pub const ERROR_RECORD: &str = "error_record.txt";

/// Options of a conversion run.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    /// Skip sessions whose BIDS directory already exists.
    pub skip_complete: bool,
    /// Subject identifier corrections.
    pub id_correction: IdCorrection,
    /// Value of `BIDSVersion` in the dataset description.
    pub bids_version: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            skip_complete: false,
            id_correction: IdCorrection::default(),
            bids_version: BIDS_VERSION.to_string(),
        }
    }
}

impl ConvertOptions {
    /// Create the default set of options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether sessions already present in the dataset are skipped.
    pub fn skip_complete(mut self, skip_complete: bool) -> Self {
        self.skip_complete = skip_complete;
        self
    }

    /// Set the subject identifier corrections.
    pub fn id_correction(mut self, id_correction: IdCorrection) -> Self {
        self.id_correction = id_correction;
        self
    }

    /// Set the declared BIDS version.
    pub fn bids_version<S: Into<String>>(mut self, version: S) -> Self {
        self.bids_version = version.into();
        self
    }
}

/// What happened to one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The session was (re)converted.
    Converted,
    /// The session already existed and was left untouched.
    Skipped,
}

/// Tally of a dataset conversion.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DatasetSummary {
    /// Sessions converted.
    pub converted: usize,
    /// Sessions skipped because they were already complete.
    pub skipped: usize,
    /// Sessions which could not be found or converted.
    pub failed: usize,
}

/// Everything a modality converter needs to know about the session
/// being converted.
#[derive(Debug, Clone)]
pub struct SessionContext<'a> {
    /// Root of the BIDS dataset.
    pub bids_dir: &'a Path,
    /// Subject and session.
    pub id: SessionId,
    /// Directories of the session.
    pub layout: SessionLayout,
    /// `sub-<subject>_ses-<session>`
    pub base_file_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct DatasetDescription<'a> {
    name: &'a str,
    #[serde(rename = "BIDSVersion")]
    bids_version: &'a str,
}

/// Converts vendor sessions into a BIDS dataset rooted at `bids_dir`.
#[derive(Debug)]
pub struct Converter<D> {
    bids_dir: PathBuf,
    options: ConvertOptions,
    defacer: D,
}

impl<D: Defacer> Converter<D> {
    /// Create a converter writing into `bids_dir`, defacing anatomical
    /// images with `defacer`.
    pub fn new<P: Into<PathBuf>>(bids_dir: P, defacer: D) -> Self {
        Converter {
            bids_dir: bids_dir.into(),
            options: ConvertOptions::default(),
            defacer,
        }
    }

    /// Replace the conversion options.
    pub fn with_options(mut self, options: ConvertOptions) -> Self {
        self.options = options;
        self
    }

    /// Root of the BIDS dataset.
    pub fn bids_dir(&self) -> &Path {
        &self.bids_dir
    }

    /// The options in use.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Write `dataset_description.json` at the dataset root.
    pub fn write_dataset_description(&self, study_id: &str) -> Result<()> {
        let description = DatasetDescription {
            name: study_id,
            bids_version: &self.options.bids_version,
        };
        write_json(self.bids_dir.join("dataset_description.json"), &description)
    }

    /// Convert every session of a vendor export.
    ///
    /// Without a `selection`, every `<export_dir>/*/*` folder is a session.
    /// Otherwise each selected entry names one session by the tail of its
    /// path, such as `s999/ses-1`.
    ///
    /// Sessions which cannot be found or converted are noted, recorded
    /// in `error_record.txt` and counted as failed; the remaining sessions
    /// are still converted. Errors writing the dataset itself are returned.
    pub fn convert_dataset(
        &self,
        export_dir: &Path,
        study_id: &str,
        selection: Option<&[String]>,
        report: &mut dyn Report,
    ) -> Result<DatasetSummary> {
        fs::create_dir_all(&self.bids_dir)?;
        self.write_dataset_description(study_id)?;

        let mut summary = DatasetSummary::default();
        let mut sessions = match selection {
            None => find_dirs(export_dir, "*/*")?,
            Some(selected) => {
                let mut found = Vec::with_capacity(selected.len());
                for tail in selected {
                    match find_dirs(export_dir, &format!("*{}", tail))?.into_iter().next() {
                        Some(path) => found.push(path),
                        None => {
                            summary.failed += 1;
                            self.record_error(
                                &format!("Couldn't find session path for {}", tail),
                                report,
                            )?;
                        }
                    }
                }
                found
            }
        };
        sessions.sort();

        let total = sessions.len();
        for (i, session) in sessions.iter().enumerate() {
            report.note(&format!("BIDSifying path {} out of {}", i + 1, total));
            match self.convert_session(session, report) {
                Ok(SessionOutcome::Converted) => summary.converted += 1,
                Ok(SessionOutcome::Skipped) => summary.skipped += 1,
                Err(e) => {
                    summary.failed += 1;
                    log::warn!("session {} failed: {}", session.display(), e);
                    self.record_error(
                        &format!("Couldn't convert {}: {}", session.display(), e),
                        report,
                    )?;
                }
            }
        }

        physio::write_physio_sidecars(&self.bids_dir, report)?;
        let renamed = clean_directory(&self.bids_dir)?;
        log::debug!("renamed {} entries at the dataset root", renamed);
        Ok(summary)
    }

    /// Convert one vendor session folder.
    pub fn convert_session(
        &self,
        export: &Path,
        report: &mut dyn Report,
    ) -> Result<SessionOutcome> {
        let id = SessionId::from_export_path(export, &self.options.id_correction)?;
        let layout = SessionLayout::new(&self.bids_dir, &id);
        if self.options.skip_complete && layout.session.exists() {
            report.note(&format!(
                "Path {} already exists. Skipping.",
                layout.session.display()
            ));
            return Ok(SessionOutcome::Skipped);
        }

        report.note("********************************************");
        report.note(&format!("BIDSifying {}", layout.session.display()));
        report.note(&format!("Using export path: {}", export.display()));
        report.note("********************************************");

        fs::create_dir_all(&self.bids_dir)?;
        for dir in layout.dirs().iter() {
            create_dir(dir, report)?;
        }
        let session = SessionContext {
            bids_dir: &self.bids_dir,
            base_file_id: id.base_file_id(),
            id,
            layout,
        };

        let folders = classify_folders(export)?;

        report.note(&session.layout.anat.display().to_string());
        report.note("BIDSifying anatomy...");
        for (dir, modality) in folders.iter().rev() {
            if let Modality::Anat(kind) = modality {
                report.note(&format!("\t{}", dir.display()));
                anat::convert_anat(&session, dir, kind, &self.defacer, report)?;
            }
        }

        report.note("BIDSifying sbref...");
        for (dir, _) in folders.iter().rev().filter(|(_, m)| *m == Modality::Sbref) {
            report.note(&format!("\t{}", dir.display()));
            func::convert_sbref(&session, dir, report)?;
        }

        report.note("BIDSifying task...");
        for (dir, _) in folders.iter().filter(|(_, m)| *m == Modality::Task) {
            report.note(&format!("\t{}", dir.display()));
            func::convert_task(&session, dir, report)?;
        }

        let renamed = clean_directory(&session.layout.func)?;
        log::debug!("renamed {} functional files", renamed);

        report.note("BIDSifying fmap...");
        for (dir, _) in folders.iter().rev().filter(|(_, m)| *m == Modality::Fieldmap) {
            report.note(&format!("\t{}", dir.display()));
            fmap::convert_fieldmap(&session, dir, report)?;
        }

        Ok(SessionOutcome::Converted)
    }

    fn record_error(&self, message: &str, report: &mut dyn Report) -> Result<()> {
        report.note(message);
        let mut record = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.bids_dir.join(ERROR_RECORD))?;
        writeln!(record, "{}", message)?;
        Ok(())
    }
}

/// Acquisition folders of a session paired with their modality, sorted
/// by path. Folders of no known modality are left out.
pub fn classify_folders(export: &Path) -> Result<Vec<(PathBuf, Modality)>> {
    let mut folders = Vec::new();
    for entry in fs::read_dir(export)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name();
        match Modality::classify(&name.to_string_lossy()) {
            Some(modality) => folders.push((entry.path(), modality)),
            None => log::debug!("ignoring folder {}", entry.path().display()),
        }
    }
    folders.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(folders)
}

/// Files (or folders) in `dir` matching a glob `pattern`, sorted.
pub(crate) fn find_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let full = format!(
        "{}/{}",
        Pattern::escape(&dir.to_string_lossy()),
        pattern
    );
    let mut matches: Vec<PathBuf> = glob::glob(&full)?.filter_map(|m| m.ok()).collect();
    matches.sort();
    Ok(matches)
}

fn find_dirs(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    Ok(find_files(dir, pattern)?
        .into_iter()
        .filter(|p| p.is_dir())
        .collect())
}

fn create_dir(dir: &Path, report: &mut dyn Report) -> Result<()> {
    match fs::create_dir(dir) {
        Ok(()) => Ok(()),
        Err(ref e) if e.kind() == ErrorKind::AlreadyExists => {
            report.note(&format!("Directory {} already existed", dir.display()));
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
