//! This module defines `ScanParameters`, the subset of a vendor
//! scan-parameter record needed to describe a functional acquisition.

use crate::error::{BidsError, Result};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Acquisition parameters of an EPI scan, as read from the vendor's JSON
/// parameter record.
///
/// # Example
///
/// ```
/// use bidsify::ScanParameters;
/// # use bidsify::Result;
///
/// # fn run() -> Result<()> {
/// let record = r#"{
///     "num_bands": 8, "num_slices": 9, "tr": 0.68,
///     "effective_echo_spacing": 0.00058, "te": 0.03, "flip_angle": 53,
///     "acquisition_matrix": [104, 104], "phase_encode_direction": 1
/// }"#;
/// let params = ScanParameters::from_reader(record.as_bytes())?;
/// assert_eq!(params.num_bands, 8);
/// assert_eq!(params.acquisition_matrix_first_dim, 104);
/// # Ok(())
/// # }
/// # run().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ScanParameters {
    /// Multiplex (simultaneous multi-slice) factor, `num_bands`
    pub num_bands: usize,
    /// Slices per multiplexed band, `num_slices`
    pub num_slices: usize,
    /// Time to acquire one volume in seconds, `tr`
    pub repetition_time: f64,
    /// Effective echo spacing in seconds, `effective_echo_spacing`
    pub echo_spacing: f64,
    /// Echo time, `te`
    pub echo_time: f64,
    /// Flip angle in degrees, `flip_angle`
    pub flip_angle: f64,
    /// First dimension of the acquisition matrix, `acquisition_matrix[0]`
    pub acquisition_matrix_first_dim: usize,
    /// Vendor code of the phase encoding axis, `phase_encode_direction`
    pub phase_encode_direction: i64,
}

impl ScanParameters {
    /// Read the parameter record from a JSON file in the file system.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<ScanParameters> {
        let file = BufReader::new(File::open(path)?);
        ScanParameters::from_reader(file)
    }

    /// Read the parameter record from a JSON byte stream.
    pub fn from_reader<R: Read>(input: R) -> Result<ScanParameters> {
        let value: Value = serde_json::from_reader(input)?;
        ScanParameters::from_value(&value)
    }

    /// Project an already parsed vendor record.
    ///
    /// Keys other than the ones listed in the field documentation are
    /// ignored. A key holding `null` counts as absent.
    ///
    /// # Errors
    ///
    /// - `BidsError::MissingField` if a required key is absent.
    /// - `BidsError::InvalidField` if a key holds a value of the wrong
    /// type, or if the record is not a JSON object.
    pub fn from_value(value: &Value) -> Result<ScanParameters> {
        let record = value.as_object().ok_or_else(|| {
            BidsError::InvalidField("<record>", "expected a JSON object".to_string())
        })?;

        let matrix = field(record, "acquisition_matrix")?
            .as_array()
            .ok_or_else(|| {
                BidsError::InvalidField("acquisition_matrix", "expected an array".to_string())
            })?;
        let first_dim = matrix
            .first()
            .ok_or(BidsError::MissingField("acquisition_matrix"))?;

        Ok(ScanParameters {
            num_bands: count_field(record, "num_bands")?,
            num_slices: count_field(record, "num_slices")?,
            repetition_time: float_field(record, "tr")?,
            echo_spacing: float_field(record, "effective_echo_spacing")?,
            echo_time: float_field(record, "te")?,
            flip_angle: float_field(record, "flip_angle")?,
            acquisition_matrix_first_dim: as_count("acquisition_matrix", first_dim)?,
            phase_encode_direction: int_field(record, "phase_encode_direction")?,
        })
    }
}

fn field<'a>(record: &'a Map<String, Value>, key: &'static str) -> Result<&'a Value> {
    record
        .get(key)
        .filter(|v| !v.is_null())
        .ok_or(BidsError::MissingField(key))
}

fn float_field(record: &Map<String, Value>, key: &'static str) -> Result<f64> {
    field(record, key)?
        .as_f64()
        .ok_or_else(|| BidsError::InvalidField(key, "expected a number".to_string()))
}

fn int_field(record: &Map<String, Value>, key: &'static str) -> Result<i64> {
    as_int(key, field(record, key)?)
}

fn count_field(record: &Map<String, Value>, key: &'static str) -> Result<usize> {
    as_count(key, field(record, key)?)
}

fn as_int(key: &'static str, value: &Value) -> Result<i64> {
    if let Some(v) = value.as_i64() {
        return Ok(v);
    }
    // some exports write integral parameters as floats
    match value.as_f64() {
        Some(v) if v.fract() == 0. && v.abs() < i64::MAX as f64 => Ok(v as i64),
        _ => Err(BidsError::InvalidField(key, format!("expected an integer, got {}", value))),
    }
}

fn as_count(key: &'static str, value: &Value) -> Result<usize> {
    let v = as_int(key, value)?;
    if v < 0 {
        return Err(BidsError::InvalidField(
            key,
            format!("expected a non-negative integer, got {}", v),
        ));
    }
    Ok(v as usize)
}
