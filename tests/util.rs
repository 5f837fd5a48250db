#![allow(dead_code)]

use bidsify::{Defacer, Result, ScanParameters};
use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::{json, Value};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// A vendor parameter record of a multiplexed EPI run.
pub fn vendor_record() -> Value {
    json!({
        "num_bands": 2,
        "num_slices": 4,
        "tr": 2.0,
        "effective_echo_spacing": 0.0005,
        "te": 0.03,
        "flip_angle": 77,
        "acquisition_matrix": [64, 64],
        "phase_encode_direction": 1,
        "series_description": "task-stopSignal_run-1_ssg"
    })
}

/// Known projection of `vendor_record`.
pub fn vendor_params_gt() -> ScanParameters {
    ScanParameters {
        num_bands: 2,
        num_slices: 4,
        repetition_time: 2.0,
        echo_spacing: 0.0005,
        echo_time: 0.03,
        flip_angle: 77.,
        acquisition_matrix_first_dim: 64,
        phase_encode_direction: 1,
    }
}

/// Raw bytes of a single-file NIfTI-1 header (plus empty extender) with
/// the given dimensions.
pub fn nifti_header_bytes(shape: &[u16], big_endian: bool) -> Vec<u8> {
    let mut raw = vec![0u8; 352];
    let i32_bytes = |v: i32| if big_endian { v.to_be_bytes() } else { v.to_le_bytes() };
    let u16_bytes = |v: u16| if big_endian { v.to_be_bytes() } else { v.to_le_bytes() };
    raw[0..4].copy_from_slice(&i32_bytes(348));
    raw[40..42].copy_from_slice(&u16_bytes(shape.len() as u16));
    for (i, &d) in shape.iter().enumerate() {
        let at = 42 + 2 * i;
        raw[at..at + 2].copy_from_slice(&u16_bytes(d));
    }
    raw[344..348].copy_from_slice(b"n+1\0");
    raw
}

/// Write a header-only NIfTI file, gzipped if the name ends with `.gz`.
pub fn write_nifti(path: &Path, shape: &[u16]) {
    let raw = nifti_header_bytes(shape, false);
    let file = File::create(path).unwrap();
    if path.to_string_lossy().ends_with(".gz") {
        let mut e = GzEncoder::new(file, Compression::default());
        e.write_all(&raw).unwrap();
        let _ = e.finish().unwrap();
    } else {
        let mut file = file;
        file.write_all(&raw).unwrap();
    }
}

pub fn write_json_file(path: &Path, value: &Value) {
    fs::write(path, serde_json::to_vec(value).unwrap()).unwrap();
}

pub fn read_json_file(path: &Path) -> Value {
    serde_json::from_slice(&fs::read(path).unwrap()).unwrap()
}

/// Write a physio archive holding a cardiac and a respiratory trace.
pub fn write_physio_zip(path: &Path) {
    use zip::write::{FileOptions, ZipWriter};

    let mut zip = ZipWriter::new(File::create(path).unwrap());
    zip.start_file("physio_run1/PPGData_epi_run1", FileOptions::default())
        .unwrap();
    zip.write_all(b"512\n530\n601\n").unwrap();
    zip.start_file("physio_run1/RESPData_epi_run1", FileOptions::default())
        .unwrap();
    zip.write_all(b"2048\n2100\n").unwrap();
    zip.start_file("physio_run1/Info_run1.log", FileOptions::default())
        .unwrap();
    zip.write_all(b"not data\n").unwrap();
    let _ = zip.finish().unwrap();
}

/// Defacer which copies the image unchanged.
#[derive(Debug, Default)]
pub struct CopyDefacer;

impl Defacer for CopyDefacer {
    fn deface(&self, input: &Path, output: &Path) -> Result<()> {
        let _ = fs::copy(input, output)?;
        Ok(())
    }
}

/// Populate `<root>/<subject>/ses-<session>` with one folder of each
/// modality, and return the session folder.
pub fn build_session(root: &Path, subject: &str, session: &str) -> std::path::PathBuf {
    let ses = root.join(subject).join(format!("ses-{}", session));

    let anat = ses.join("anat-T1w");
    fs::create_dir_all(&anat).unwrap();
    write_nifti(&anat.join("T1w_1.nii.gz"), &[64, 64, 32]);

    let sbref = ses.join("task-rest_run-1_sbref");
    fs::create_dir_all(&sbref).unwrap();
    write_nifti(&sbref.join("sbref.nii.gz"), &[64, 64, 8]);
    write_nifti(&sbref.join("sbref_phase.nii.gz"), &[64, 64, 8]);
    write_json_file(&sbref.join("params.json"), &vendor_record());
    write_json_file(&sbref.join("params_qa.json"), &json!({"snr": 12.5}));

    let task = ses.join("task-stopSignal_run-1_ssg");
    fs::create_dir_all(&task).unwrap();
    write_nifti(&task.join("bold_1.nii.gz"), &[64, 64, 8, 100]);
    write_json_file(&task.join("params.json"), &vendor_record());
    write_physio_zip(&task.join("run1_physio.zip"));

    let fmap = ses.join("fmap-fieldmap");
    fs::create_dir_all(&fmap).unwrap();
    write_nifti(&fmap.join("b0_fieldmap.nii.gz"), &[64, 64, 8]);
    write_nifti(&fmap.join("b0_mag.nii.gz"), &[64, 64, 8]);

    fs::create_dir_all(ses.join("localizer")).unwrap();
    ses
}
