//! Physiological recordings (cardiac and respiratory traces) shipped as a
//! zip archive along a functional run.

use super::find_files;
use crate::error::{BidsError, Result};
use crate::report::Report;
use crate::typedef::PhysioKind;
use crate::util::{file_name, write_json};
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// Dataset-level sidecar of a physiological recording kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PhysioSidecar {
    /// Onset relative to the first volume, in seconds
    pub start_time: f64,
    /// Sampling interval as recorded by the vendor
    pub sampling_frequency: f64,
    /// Column names of the recording
    pub columns: Vec<String>,
}

impl From<PhysioKind> for PhysioSidecar {
    fn from(kind: PhysioKind) -> Self {
        PhysioSidecar {
            start_time: kind.start_time(),
            sampling_frequency: kind.sampling_frequency(),
            columns: vec![kind.label().to_string()],
        }
    }
}

/// Path of the recording of a BOLD run:
/// `<bold stem>_recording-<kind>_physio.tsv.gz`.
pub fn physio_path(bold: &Path, kind: PhysioKind) -> PathBuf {
    let name = file_name(bold);
    let stem = name.strip_suffix(".nii.gz").unwrap_or(&name);
    let stem = stem.strip_suffix("_bold").unwrap_or(stem);
    bold.with_file_name(format!("{}_recording-{}_physio.tsv.gz", stem, kind.label()))
}

/// Convert every data file of a physio archive into a gzipped TSV
/// recording next to `bold`. Returns the written files.
///
/// Data files are the archive entries with `Data` in their name;
/// respiratory traces are recognized by `RESP`, anything else is taken as
/// cardiac.
pub fn convert_physio_archive(archive: &Path, bold: &Path) -> Result<Vec<PathBuf>> {
    let mut zip = ZipArchive::new(BufReader::new(File::open(archive)?))?;
    let mut written = Vec::new();
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i)?;
        if entry.is_dir() {
            continue;
        }
        let entry_name = entry.name().to_string();
        let base = entry_name.rsplit('/').next().unwrap_or(&entry_name);
        if !base.contains("Data") {
            continue;
        }
        let kind = PhysioKind::from_file_name(base);

        let mut text = String::new();
        let _ = entry.read_to_string(&mut text)?;
        let samples = parse_samples(&text, &entry_name)?;

        let target = physio_path(bold, kind);
        write_tsv_gz(&target, &samples)?;
        written.push(target);
    }
    Ok(written)
}

/// Parse whitespace separated numeric rows. Blank lines and `#` comments
/// are skipped.
fn parse_samples(text: &str, source: &str) -> Result<Vec<Vec<f64>>> {
    let mut rows = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let row = line
            .split_whitespace()
            .map(|v| v.parse::<f64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| BidsError::InvalidPhysioSample(source.to_string(), i + 1))?;
        rows.push(row);
    }
    Ok(rows)
}

fn write_tsv_gz(path: &Path, rows: &[Vec<f64>]) -> Result<()> {
    let file = BufWriter::new(File::create(path)?);
    let mut e = GzEncoder::new(file, Compression::default());
    for row in rows {
        let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        writeln!(e, "{}", line.join("\t"))?;
    }
    let mut file = e.finish()?;
    file.flush()?;
    Ok(())
}

/// Write `recording-<kind>_physio.json` at the dataset root for every
/// recording kind present in some session and not described yet.
pub fn write_physio_sidecars(bids_dir: &Path, report: &mut dyn Report) -> Result<()> {
    for &kind in PhysioKind::ALL.iter() {
        let sidecar = bids_dir.join(format!("recording-{}_physio.json", kind.label()));
        if sidecar.exists() {
            continue;
        }
        let pattern = format!("sub-*/ses-*/func/*{}*", kind.label());
        if find_files(bids_dir, &pattern)?.is_empty() {
            continue;
        }
        report.note(&format!("Writing {}", sidecar.display()));
        write_json(&sidecar, &PhysioSidecar::from(kind))?;
    }
    Ok(())
}
