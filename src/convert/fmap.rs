//! B0 fieldmaps, exported as a fieldmap image and its magnitude.

use super::{find_files, SessionContext};
use crate::error::{BidsError, Result};
use crate::report::Report;
use crate::util::{file_name, write_json};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Sidecar of a fieldmap image.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FieldmapSidecar {
    /// Unit of the fieldmap values
    pub units: String,
    /// Functional runs corrected with this fieldmap, relative to the
    /// subject directory
    pub intended_for: Vec<String>,
}

/// Copy the fieldmap and magnitude images of a folder to
/// `fmap/<base>_fieldmap.nii.gz` and `fmap/<base>_magnitude.nii.gz`, and
/// describe the fieldmap as intended for every BOLD run of the session.
///
/// Must run after the functional runs of the session were converted.
/// A fieldmap already in place is kept.
///
/// # Errors
///
/// - `BidsError::UnexpectedFileCount` unless the folder holds exactly two
/// gzipped NIfTI images.
pub fn convert_fieldmap(
    session: &SessionContext,
    dir: &Path,
    report: &mut dyn Report,
) -> Result<()> {
    const PATTERN: &str = "*.nii.gz";
    let images = find_files(dir, PATTERN)?;
    if images.len() != 2 {
        return Err(BidsError::UnexpectedFileCount(
            dir.to_path_buf(),
            PATTERN,
            images.len(),
        ));
    }
    let (fieldmap, magnitude) = if file_name(&images[1]).contains("fieldmap.nii.gz") {
        (&images[1], &images[0])
    } else {
        (&images[0], &images[1])
    };

    let fmap_dir = &session.layout.fmap;
    let base = &session.base_file_id;
    let fieldmap_target = fmap_dir.join(format!("{}_fieldmap.nii.gz", base));
    if fieldmap_target.exists() {
        report.note(&format!(
            "Did not save fmap_epi because {} already exists!",
            fieldmap_target.display()
        ));
        return Ok(());
    }
    let _ = fs::copy(fieldmap, &fieldmap_target)?;
    let _ = fs::copy(magnitude, fmap_dir.join(format!("{}_magnitude.nii.gz", base)))?;

    let intended_for = find_files(&session.layout.func, "*task*bold.nii.gz")?
        .iter()
        .map(|run| {
            session
                .layout
                .relative_to_subject(run)
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/")
        })
        .collect();
    let sidecar = FieldmapSidecar {
        units: "Hz".to_string(),
        intended_for,
    };
    write_json(fmap_dir.join(format!("{}_fieldmap.json", base)), &sidecar)
}
