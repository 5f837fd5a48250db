//! BIDS directory layout of a converted session, and the mapping from a
//! vendor export path to the subject and session it belongs to.

use crate::error::{BidsError, Result};
use crate::util::file_name;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Subject identifier corrections, keyed by the identifier used in the
/// vendor export.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct IdCorrection(HashMap<String, String>);

impl IdCorrection {
    /// Load corrections from a JSON object file mapping scanner ids to
    /// subject ids.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<IdCorrection> {
        IdCorrection::from_reader(BufReader::new(File::open(path)?))
    }

    /// Load corrections from a JSON object byte stream.
    pub fn from_reader<R: Read>(input: R) -> Result<IdCorrection> {
        Ok(IdCorrection(serde_json::from_reader(input)?))
    }

    /// Number of corrections.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no corrections at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The corrected id, or the given id if no correction applies.
    pub fn apply<'a>(&'a self, id: &'a str) -> &'a str {
        self.0.get(id).map(String::as_str).unwrap_or(id)
    }
}

impl From<HashMap<String, String>> for IdCorrection {
    fn from(map: HashMap<String, String>) -> Self {
        IdCorrection(map)
    }
}

/// Subject and session of one vendor session folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId {
    /// Subject identifier, without the `sub-` prefix
    pub subject: String,
    /// Session label, without the `ses-` prefix
    pub session: String,
}

impl SessionId {
    /// Derive the subject and session from a vendor session folder
    /// `<...>/<subject>/<prefix>-<session>`.
    ///
    /// # Errors
    ///
    /// - `BidsError::UnrecognizedLayout` if the folder has no parent or
    /// its name carries no `-` separated label.
    pub fn from_export_path(path: &Path, corrections: &IdCorrection) -> Result<SessionId> {
        let unrecognized = || BidsError::UnrecognizedLayout(path.to_path_buf());
        let session = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.split('-').nth(1))
            .filter(|label| !label.is_empty())
            .ok_or_else(unrecognized)?;
        let subject = path
            .parent()
            .and_then(|parent| parent.file_name())
            .and_then(|name| name.to_str())
            .filter(|name| !name.is_empty())
            .ok_or_else(unrecognized)?;

        Ok(SessionId {
            subject: corrections.apply(subject).to_string(),
            session: session.to_string(),
        })
    }

    /// `sub-<subject>`
    pub fn subject_dir(&self) -> String {
        format!("sub-{}", self.subject)
    }

    /// `ses-<session>`
    pub fn session_dir(&self) -> String {
        format!("ses-{}", self.session)
    }

    /// Prefix shared by every file of the session: `sub-<subject>_ses-<session>`.
    pub fn base_file_id(&self) -> String {
        format!("{}_{}", self.subject_dir(), self.session_dir())
    }
}

/// Directories of one session inside a BIDS dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionLayout {
    /// `<bids_dir>/sub-<subject>`
    pub subject: PathBuf,
    /// `<bids_dir>/sub-<subject>/ses-<session>`
    pub session: PathBuf,
    /// anatomical images
    pub anat: PathBuf,
    /// functional images and physiological recordings
    pub func: PathBuf,
    /// fieldmaps
    pub fmap: PathBuf,
}

impl SessionLayout {
    /// Layout of the given session under `bids_dir`.
    pub fn new(bids_dir: &Path, id: &SessionId) -> Self {
        let subject = bids_dir.join(id.subject_dir());
        let session = subject.join(id.session_dir());
        SessionLayout {
            anat: session.join("anat"),
            func: session.join("func"),
            fmap: session.join("fmap"),
            subject,
            session,
        }
    }

    /// All directories, parents first.
    pub fn dirs(&self) -> [&Path; 5] {
        [
            &self.subject,
            &self.session,
            &self.anat,
            &self.func,
            &self.fmap,
        ]
    }

    /// Path of a session file relative to the subject directory, as used
    /// by `IntendedFor` (`ses-<session>/func/<file>`).
    pub fn relative_to_subject(&self, path: &Path) -> PathBuf {
        match path.strip_prefix(&self.subject) {
            Ok(relative) => relative.to_path_buf(),
            Err(_) => PathBuf::from(file_name(path)),
        }
    }
}
