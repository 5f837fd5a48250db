//! Structural images. These are never copied as-is: the face is removed
//! by an external tool on the way into the dataset.

use super::{find_files, SessionContext};
use crate::error::{BidsError, Result};
use crate::report::Report;
use std::path::Path;
use std::process::Command;

/// Removes facial features from a structural image, writing the result to
/// a new file.
pub trait Defacer {
    /// Deface `input`, writing the defaced image to `output`.
    fn deface(&self, input: &Path, output: &Path) -> Result<()>;
}

impl<F> Defacer for F
where
    F: Fn(&Path, &Path) -> Result<()>,
{
    fn deface(&self, input: &Path, output: &Path) -> Result<()> {
        self(input, output)
    }
}

/// Runs `pydeface` (or a program with the same command line) as a child
/// process: `<program> <input> --outfile <output>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pydeface {
    program: String,
}

impl Pydeface {
    /// Use the given program instead of `pydeface` from the `PATH`.
    pub fn with_program<S: Into<String>>(program: S) -> Self {
        Pydeface {
            program: program.into(),
        }
    }

    /// The program being run.
    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for Pydeface {
    fn default() -> Self {
        Pydeface::with_program("pydeface")
    }
}

impl Defacer for Pydeface {
    fn deface(&self, input: &Path, output: &Path) -> Result<()> {
        log::debug!("{} {} --outfile {}", self.program, input.display(), output.display());
        let status = Command::new(&self.program)
            .arg(input)
            .arg("--outfile")
            .arg(output)
            .status()?;
        if status.success() {
            Ok(())
        } else {
            Err(BidsError::DefacerFailed(self.program.clone(), status))
        }
    }
}

/// Deface the single image of an anatomical folder into
/// `anat/<base>_<kind>.nii.gz`. An image already in place is kept.
///
/// # Errors
///
/// - `BidsError::UnexpectedFileCount` unless the folder holds exactly one
/// gzipped NIfTI image.
/// - any error of the defacer.
pub fn convert_anat<D: Defacer + ?Sized>(
    session: &SessionContext,
    dir: &Path,
    kind: &str,
    defacer: &D,
    report: &mut dyn Report,
) -> Result<()> {
    const PATTERN: &str = "*nii.gz";
    let images = find_files(dir, PATTERN)?;
    if images.len() != 1 {
        return Err(BidsError::UnexpectedFileCount(
            dir.to_path_buf(),
            PATTERN,
            images.len(),
        ));
    }

    let target = session
        .layout
        .anat
        .join(format!("{}_{}.nii.gz", session.base_file_id, kind));
    if target.exists() {
        report.note(&format!(
            "Did not save anat because {} already exists!",
            target.display()
        ));
        return Ok(());
    }

    report.note("\tDefacing...");
    defacer.deface(&images[0], &target)
}
