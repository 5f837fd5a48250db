//! Functional runs and their single-band references.
//!
//! Images are copied into `func/`. When a run was exported more than once,
//! the acquisition with the most volumes wins. Sidecar metadata is written
//! once per task at the dataset root, following the BIDS inheritance
//! principle.

use super::{find_files, physio, SessionContext};
use crate::error::{BidsError, Result};
use crate::functional::build_functional_metadata;
use crate::header::ImageHeader;
use crate::params::ScanParameters;
use crate::report::Report;
use crate::util::{clean_file_name, clean_path, file_name, strip_run_label, write_json};
use std::fs;
use std::path::{Path, PathBuf};

/// Copy the single-band reference image of a folder such as
/// `task-rest_run-1_sbref` to `func/<base>_task-rest_run-1_sbref.nii.gz`,
/// and write `task-rest_sbref.json` at the dataset root if missing.
///
/// Phase images are ignored. A folder without image is noted and
/// skipped.
pub fn convert_sbref(
    session: &SessionContext,
    dir: &Path,
    report: &mut dyn Report,
) -> Result<()> {
    const PATTERN: &str = "*.nii.gz";
    let folder = file_name(dir);
    let images: Vec<PathBuf> = find_files(dir, PATTERN)?
        .into_iter()
        .filter(|p| !file_name(p).contains("phase"))
        .collect();
    let image = match single_image(dir, PATTERN, images, report)? {
        Some(image) => image,
        None => return Ok(()),
    };

    let target = clean_path(
        &session
            .layout
            .func
            .join(format!("{}_{}.nii.gz", session.base_file_id, folder)),
    );
    if !should_replace(&target, &image, report)? {
        return Ok(());
    }
    let _ = fs::copy(&image, &target)?;

    let sidecar = clean_path(
        &session
            .bids_dir
            .join(format!("{}.json", strip_run_label(&folder))),
    );
    if !sidecar.exists() {
        write_sidecar(dir, &folder, &sidecar, report)?;
    }
    Ok(())
}

/// Copy the BOLD image of a task folder such as
/// `task-stopSignal_run-1_ssg` to
/// `func/<base>_task-stopSignal_run-1_bold.nii.gz`, write
/// `task-stopSignal_bold.json` at the dataset root if missing, and convert
/// the physiological recordings of the run.
///
/// Only images whose name ends in `1.nii.gz` are considered, fieldmaps
/// excluded. A folder without image is noted and skipped.
pub fn convert_task(session: &SessionContext, dir: &Path, report: &mut dyn Report) -> Result<()> {
    const PATTERN: &str = "*1.nii.gz";
    let folder = file_name(dir);
    let images: Vec<PathBuf> = find_files(dir, PATTERN)?
        .into_iter()
        .filter(|p| !file_name(p).contains("fieldmap"))
        .collect();
    let image = match single_image(dir, PATTERN, images, report)? {
        Some(image) => image,
        None => return Ok(()),
    };

    let bold_name = format!("{}_{}.nii.gz", session.base_file_id, folder).replace("_ssg", "_bold");
    let bold = clean_path(&session.layout.func.join(bold_name));
    if !should_replace(&bold, &image, report)? {
        return Ok(());
    }
    let _ = fs::copy(&image, &bold)?;

    let sidecar = clean_path(
        &session
            .bids_dir
            .join(format!("{}_bold.json", strip_run_label(&folder))),
    );
    if !sidecar.exists() {
        write_sidecar(dir, &folder, &sidecar, report)?;
    }

    const PHYSIO: &str = "*physio.zip";
    let archives = find_files(dir, PHYSIO)?;
    match archives.len() {
        0 => {}
        1 => {
            for written in physio::convert_physio_archive(&archives[0], &bold)? {
                log::debug!("wrote {}", written.display());
            }
        }
        n => {
            return Err(BidsError::UnexpectedFileCount(dir.to_path_buf(), PHYSIO, n));
        }
    }
    Ok(())
}

/// Pick the only image of a folder; `None` when there is none.
fn single_image(
    dir: &Path,
    pattern: &'static str,
    mut images: Vec<PathBuf>,
    report: &mut dyn Report,
) -> Result<Option<PathBuf>> {
    match images.len() {
        0 => {
            report.note(&format!("Skipping {}, no nii.gz file found", dir.display()));
            Ok(None)
        }
        1 => Ok(images.pop()),
        n => Err(BidsError::UnexpectedFileCount(dir.to_path_buf(), pattern, n)),
    }
}

/// Whether `incoming` should be copied over `target`: always when the
/// target does not exist yet, otherwise only if it has more volumes.
pub fn should_replace(target: &Path, incoming: &Path, report: &mut dyn Report) -> Result<bool> {
    if !target.exists() {
        return Ok(true);
    }
    report.note(&format!("{} already exists!", target.display()));
    let saved = ImageHeader::from_file(target)?;
    let current = ImageHeader::from_file(incoming)?;
    report.note(&format!("Dimensions of saved image: {:?}", saved.shape()));
    report.note(&format!("Dimensions of current image: {:?}", current.shape()));
    if current.time_points() <= saved.time_points() {
        report.note(
            "Current image has fewer or equal time points than saved image. Exiting...",
        );
        Ok(false)
    } else {
        report.note("Current image has more time points than saved image. Overwriting...");
        Ok(true)
    }
}

/// Build the functional sidecar from the first parameter record of the
/// folder (QA records excluded) and write it to `sidecar`.
fn write_sidecar(dir: &Path, task_label: &str, sidecar: &Path, report: &mut dyn Report) -> Result<()> {
    let record = find_files(dir, "*.json")?
        .into_iter()
        .find(|p| !file_name(p).contains("qa"));
    let record = match record {
        Some(record) => record,
        None => {
            report.note(&format!(
                "Metadata couldn't be created for {}",
                clean_file_name(task_label)
            ));
            return Ok(());
        }
    };
    let params = ScanParameters::from_file(&record)?;
    let metadata = build_functional_metadata(&params, task_label)?;
    write_json(sidecar, &metadata)
}
