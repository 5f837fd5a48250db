//! Construction of the BIDS sidecar metadata of functional scans.

use crate::error::{BidsError, Result};
use crate::params::ScanParameters;
use crate::slice_timing::{compute_slice_timing, SliceTiming};
use crate::typedef::PhaseEncodingAxis;
use serde::{Deserialize, Serialize};

/// Sidecar metadata of a functional (BOLD or sbref) image.
///
/// Serializes to a JSON object with the BIDS key names, in the order the
/// fields are declared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FunctionalMetadata {
    /// Leading segment of the task label
    pub task_name: String,
    /// Effective echo spacing in seconds
    pub effective_echo_spacing: f64,
    /// Echo time
    pub echo_time: f64,
    /// Flip angle
    pub flip_angle: f64,
    /// Repetition time in seconds
    pub repetition_time: f64,
    /// Onset of each physical slice
    pub slice_timing: SliceTiming,
    /// Readout time in seconds
    pub total_readout_time: f64,
    /// Phase encoding axis and polarity, e.g. `"j-"`
    pub phase_encoding_direction: String,
}

/// Compose the functional sidecar metadata of a scan.
///
/// `task_label` is the composite label of the acquisition, such as
/// `stopSignal_run-1`; only the part before the first `_` is kept as the
/// task name.
///
/// # Errors
///
/// - `BidsError::InvalidSliceConfiguration` if the band and slice counts
/// or the repetition time cannot describe a volume.
/// - `BidsError::InvalidField` if the acquisition matrix is empty or the
/// phase encoding code is not one of 0, 1 or 2.
///
/// # Example
///
/// ```
/// use bidsify::{build_functional_metadata, ScanParameters};
/// # use bidsify::Result;
///
/// # fn run() -> Result<()> {
/// let params = ScanParameters {
///     num_bands: 1,
///     num_slices: 4,
///     repetition_time: 2.0,
///     echo_spacing: 0.0005,
///     echo_time: 0.03,
///     flip_angle: 90.,
///     acquisition_matrix_first_dim: 64,
///     phase_encode_direction: 1,
/// };
/// let meta = build_functional_metadata(&params, "rest_run-1")?;
/// assert_eq!(meta.task_name, "rest");
/// assert_eq!(meta.phase_encoding_direction, "j-");
/// # Ok(())
/// # }
/// # run().unwrap();
/// ```
pub fn build_functional_metadata(
    params: &ScanParameters,
    task_label: &str,
) -> Result<FunctionalMetadata> {
    let physical_slices = params
        .num_slices
        .checked_mul(params.num_bands)
        .ok_or_else(|| {
            BidsError::InvalidSliceConfiguration(format!(
                "{} slices in {} bands overflows",
                params.num_slices, params.num_bands
            ))
        })?;
    let slice_timing = compute_slice_timing(
        physical_slices,
        params.repetition_time,
        Some(params.num_bands),
    )?;

    if params.acquisition_matrix_first_dim == 0 {
        return Err(BidsError::InvalidField(
            "acquisition_matrix",
            "first dimension must be at least 1".to_string(),
        ));
    }
    let echo_train = (params.acquisition_matrix_first_dim - 1) as f64;
    let total_readout_time = echo_train * params.echo_spacing;

    let axis = PhaseEncodingAxis::from_code(params.phase_encode_direction).ok_or_else(|| {
        BidsError::InvalidField(
            "phase_encode_direction",
            format!("unknown axis code {}", params.phase_encode_direction),
        )
    })?;

    Ok(FunctionalMetadata {
        task_name: task_name(task_label).to_string(),
        effective_echo_spacing: params.echo_spacing,
        echo_time: params.echo_time,
        flip_angle: params.flip_angle,
        repetition_time: params.repetition_time,
        slice_timing,
        total_readout_time,
        phase_encoding_direction: axis.bids_direction(),
    })
}

/// The semantic task name of a composite label: everything before the
/// first `_`.
pub fn task_name(task_label: &str) -> &str {
    task_label.split('_').next().unwrap_or(task_label)
}
