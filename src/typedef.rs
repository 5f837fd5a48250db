//! This module contains the small vocabularies shared by the converter:
//! phase encoding axes as coded by the vendor, the acquisition modalities
//! recognized in an export, and the kinds of physiological recording.
//! Primitive codes can be converted to these types and vice-versa.

use num_traits::FromPrimitive;
use std::fmt;

/// Spatial axis along which phase encoding is performed, as coded by the
/// vendor's `phase_encode_direction` parameter.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, FromPrimitive)]
pub enum PhaseEncodingAxis {
    /// First voxel axis.
    I = 0,
    /// Second voxel axis.
    J = 1,
    /// Third voxel axis.
    K = 2,
}

impl PhaseEncodingAxis {
    /// Obtain the axis for a vendor code, or `None` if out of range.
    pub fn from_code(code: i64) -> Option<Self> {
        FromPrimitive::from_i64(code)
    }

    /// The BIDS label of the axis.
    pub fn label(self) -> &'static str {
        match self {
            PhaseEncodingAxis::I => "i",
            PhaseEncodingAxis::J => "j",
            PhaseEncodingAxis::K => "k",
        }
    }

    /// The BIDS `PhaseEncodingDirection` value for this axis.
    ///
    /// The polarity is always negative: vendor records do not carry the
    /// sign of the phase encoding blips.
    pub fn bids_direction(self) -> String {
        format!("{}-", self.label())
    }
}

/// Kind of acquisition held by a folder of a vendor export.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum Modality {
    /// Structural image, with its BIDS suffix (`T1w`, `T2w`, ...).
    Anat(String),
    /// B0 fieldmap with its magnitude image.
    Fieldmap,
    /// Single-band reference image of a functional run.
    Sbref,
    /// Functional (BOLD) run.
    Task,
}

impl Modality {
    /// Classify an acquisition folder by its name.
    ///
    /// Folder names are composite labels such as `anat-T1w`,
    /// `task-rest_run-1_sbref`, `task-stopSignal_run-1_ssg` or
    /// `fmap-fieldmap`. Returns `None` for folders that are not part of
    /// the conversion.
    pub fn classify(folder_name: &str) -> Option<Modality> {
        if folder_name.contains("sbref") {
            Some(Modality::Sbref)
        } else if folder_name.contains("fieldmap") {
            Some(Modality::Fieldmap)
        } else if folder_name.contains("task") {
            Some(Modality::Task)
        } else if folder_name.contains("anat") {
            // the suffix is whatever follows the first '-'
            folder_name
                .split('-')
                .nth(1)
                .filter(|kind| !kind.is_empty())
                .map(|kind| Modality::Anat(kind.to_string()))
        } else {
            None
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Modality::Anat(kind) => write!(f, "anat ({})", kind),
            Modality::Fieldmap => f.write_str("fmap"),
            Modality::Sbref => f.write_str("sbref"),
            Modality::Task => f.write_str("task"),
        }
    }
}

/// Kind of physiological recording stored along a functional run.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum PhysioKind {
    /// Pulse oximetry / cardiac trace.
    Cardiac,
    /// Respiratory belt trace.
    Respiratory,
}

impl PhysioKind {
    /// All recording kinds, in the order their sidecars are written.
    pub const ALL: [PhysioKind; 2] = [PhysioKind::Cardiac, PhysioKind::Respiratory];

    /// Identify the recording kind from the name of a vendor data file.
    pub fn from_file_name(name: &str) -> PhysioKind {
        if name.contains("RESP") {
            PhysioKind::Respiratory
        } else {
            PhysioKind::Cardiac
        }
    }

    /// The BIDS `recording-<label>` entity value.
    pub fn label(self) -> &'static str {
        match self {
            PhysioKind::Cardiac => "cardiac",
            PhysioKind::Respiratory => "respiratory",
        }
    }

    /// Sampling interval of the vendor's recordings, in seconds.
    pub fn sampling_frequency(self) -> f64 {
        match self {
            PhysioKind::Cardiac => 0.01,
            PhysioKind::Respiratory => 0.04,
        }
    }

    /// Onset of the recording relative to the first volume, in seconds.
    pub fn start_time(self) -> f64 {
        -30.0
    }
}
