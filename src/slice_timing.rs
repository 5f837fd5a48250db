//! Computation of per-slice acquisition onsets for EPI volumes.
//!
//! Slices are assumed to be acquired in interleaved ascending order: all
//! even slice indices first, then all odd ones. With simultaneous
//! multi-slice (multiplexed) acquisitions, the volume is split into
//! identical bands which are excited together, so every band shares the
//! same set of onsets.

use crate::error::{BidsError, Result};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Largest slice count a volume can have, bounded by the 16-bit NIfTI
/// `dim` field.
pub const MAX_SLICES: usize = u16::MAX as usize;

/// Acquisition onset of each slice of a volume, in seconds relative to the
/// start of the volume.
///
/// Values are indexed by physical slice position (not by acquisition
/// order), which is the layout of the BIDS `SliceTiming` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SliceTiming(Vec<f64>);

impl SliceTiming {
    /// Obtain the onsets as a slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Take the inner onset vector.
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl Deref for SliceTiming {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}

impl From<SliceTiming> for Vec<f64> {
    fn from(timing: SliceTiming) -> Self {
        timing.0
    }
}

/// Compute the onset of every physical slice of a volume.
///
/// `total_slices` is the number of physical slices, already multiplied by
/// the multiplex factor when there is one. Without multiplexing (`None` or
/// `Some(1)`), the k-th acquired slice starts at
/// `k / total_slices * repetition_time`. With a multiplex factor `M`, the
/// same schedule is computed over one band of `total_slices / M` slices
/// and slice `p` takes the onset of band-local slice `p % band_size`.
///
/// # Errors
///
/// - `BidsError::InvalidSliceConfiguration` if there are no slices or more
/// than `MAX_SLICES`, if the repetition time is not strictly positive, or
/// if the multiplex factor is zero or does not divide the slice count.
///
/// # Example
///
/// ```
/// use bidsify::slice_timing::compute_slice_timing;
/// # use bidsify::Result;
///
/// # fn run() -> Result<()> {
/// let timing = compute_slice_timing(8, 2.0, Some(2))?;
/// assert_eq!(timing.as_slice(), &[0.0, 1.0, 0.5, 1.5, 0.0, 1.0, 0.5, 1.5]);
/// # Ok(())
/// # }
/// # run().unwrap();
/// ```
pub fn compute_slice_timing(
    total_slices: usize,
    repetition_time: f64,
    multiplex_factor: Option<usize>,
) -> Result<SliceTiming> {
    if total_slices == 0 {
        return Err(BidsError::InvalidSliceConfiguration(
            "slice count must be positive".to_string(),
        ));
    }
    if total_slices > MAX_SLICES {
        return Err(BidsError::InvalidSliceConfiguration(format!(
            "{} slices exceed the limit of {}",
            total_slices, MAX_SLICES
        )));
    }
    // also rejects NaN
    if !(repetition_time > 0.) {
        return Err(BidsError::InvalidSliceConfiguration(format!(
            "repetition time must be positive, got {}",
            repetition_time
        )));
    }
    let bands = match multiplex_factor {
        None => 1,
        Some(0) => {
            return Err(BidsError::InvalidSliceConfiguration(
                "multiplex factor must be positive".to_string(),
            ))
        }
        Some(m) if total_slices % m != 0 => {
            return Err(BidsError::InvalidSliceConfiguration(format!(
                "{} slices cannot be split into {} bands",
                total_slices, m
            )))
        }
        Some(m) => m,
    };
    let band_size = total_slices / bands;

    let order = interleaved_ascending(band_size);
    let onsets = band_onsets(band_size, repetition_time);

    // (physical slice, onset) in band-major acquisition order
    let mut schedule: Vec<(usize, f64)> = (0..bands)
        .flat_map(|band| {
            order
                .iter()
                .zip(&onsets)
                .map(move |(&slice, &onset)| (band * band_size + slice, onset))
        })
        .collect();
    schedule.sort_by_key(|&(slice, _)| slice);

    Ok(SliceTiming(
        schedule.into_iter().map(|(_, onset)| onset).collect(),
    ))
}

/// Acquisition order of `n` slices: even indices ascending, then odd
/// indices ascending.
fn interleaved_ascending(n: usize) -> Vec<usize> {
    (0..n).step_by(2).chain((1..n).step_by(2)).collect()
}

/// Onset of the k-th acquisition slot, for `n` evenly spaced slots over
/// one repetition time.
fn band_onsets(n: usize, repetition_time: f64) -> Vec<f64> {
    (0..n)
        .map(|k| k as f64 / n as f64 * repetition_time)
        .collect()
}
