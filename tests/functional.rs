extern crate bidsify;
#[macro_use]
extern crate pretty_assertions;

mod util;

use approx::assert_abs_diff_eq;
use bidsify::functional::task_name;
use bidsify::{build_functional_metadata, BidsError, FunctionalMetadata, ScanParameters};
use util::{vendor_params_gt, vendor_record};

fn plain_params() -> ScanParameters {
    ScanParameters {
        num_bands: 1,
        num_slices: 4,
        ..vendor_params_gt()
    }
}

#[test]
fn multiplexed_metadata() {
    let meta = build_functional_metadata(&vendor_params_gt(), "task-stopSignal_run-1_ssg").unwrap();
    assert_eq!(meta.task_name, "task-stopSignal");
    assert_eq!(meta.effective_echo_spacing, 0.0005);
    assert_eq!(meta.echo_time, 0.03);
    assert_eq!(meta.flip_angle, 77.);
    assert_eq!(meta.repetition_time, 2.0);
    assert_eq!(
        meta.slice_timing.as_slice(),
        &[0.0, 1.0, 0.5, 1.5, 0.0, 1.0, 0.5, 1.5]
    );
    assert_abs_diff_eq!(meta.total_readout_time, 0.0315, epsilon = 1e-12);
    assert_eq!(meta.phase_encoding_direction, "j-");
}

#[test]
fn single_band_metadata() {
    let meta = build_functional_metadata(&plain_params(), "rest").unwrap();
    assert_eq!(meta.task_name, "rest");
    assert_eq!(meta.slice_timing.as_slice(), &[0.0, 1.0, 0.5, 1.5]);
}

#[test]
fn readout_time() {
    let params = ScanParameters {
        acquisition_matrix_first_dim: 64,
        echo_spacing: 0.0005,
        ..plain_params()
    };
    let meta = build_functional_metadata(&params, "rest").unwrap();
    assert_abs_diff_eq!(meta.total_readout_time, 63. * 0.0005);

    let params = ScanParameters {
        acquisition_matrix_first_dim: 1,
        ..plain_params()
    };
    let meta = build_functional_metadata(&params, "rest").unwrap();
    assert_eq!(meta.total_readout_time, 0.);
}

#[test]
fn empty_acquisition_matrix_rejected() {
    let params = ScanParameters {
        acquisition_matrix_first_dim: 0,
        ..plain_params()
    };
    match build_functional_metadata(&params, "rest") {
        Err(BidsError::InvalidField("acquisition_matrix", _)) => {}
        other => panic!("unexpected result {:?}", other),
    }
}

#[test]
fn phase_encoding_directions() {
    for &(code, expected) in &[(0, "i-"), (1, "j-"), (2, "k-")] {
        let params = ScanParameters {
            phase_encode_direction: code,
            ..plain_params()
        };
        let meta = build_functional_metadata(&params, "rest").unwrap();
        assert_eq!(meta.phase_encoding_direction, expected);
    }
}

#[test]
fn unknown_phase_encoding_rejected() {
    for &code in &[3, -1] {
        let params = ScanParameters {
            phase_encode_direction: code,
            ..plain_params()
        };
        match build_functional_metadata(&params, "rest") {
            Err(BidsError::InvalidField("phase_encode_direction", _)) => {}
            other => panic!("code {} gave {:?}", code, other),
        }
    }
}

#[test]
fn slice_errors_propagate() {
    let params = ScanParameters {
        num_bands: 0,
        ..plain_params()
    };
    match build_functional_metadata(&params, "rest") {
        Err(BidsError::InvalidSliceConfiguration(_)) => {}
        other => panic!("unexpected result {:?}", other),
    }

    let params = ScanParameters {
        repetition_time: 0.,
        ..plain_params()
    };
    match build_functional_metadata(&params, "rest") {
        Err(BidsError::InvalidSliceConfiguration(_)) => {}
        other => panic!("unexpected result {:?}", other),
    }
}

#[test]
fn oversized_records_rejected() {
    let mut record = vendor_record();
    record["num_slices"] = serde_json::json!(1u64 << 40);
    let params = ScanParameters::from_value(&record).unwrap();
    match build_functional_metadata(&params, "rest") {
        Err(BidsError::InvalidSliceConfiguration(_)) => {}
        other => panic!("unexpected result {:?}", other),
    }

    let params = ScanParameters {
        num_bands: usize::MAX,
        num_slices: 2,
        ..plain_params()
    };
    match build_functional_metadata(&params, "rest") {
        Err(BidsError::InvalidSliceConfiguration(_)) => {}
        other => panic!("unexpected result {:?}", other),
    }
}

#[test]
fn task_names() {
    assert_eq!(task_name("stopSignal_run-1"), "stopSignal");
    assert_eq!(task_name("task-stopSignal_run-1"), "task-stopSignal");
    assert_eq!(task_name("rest"), "rest");
    assert_eq!(task_name(""), "");
}

#[test]
fn deterministic() {
    let a = build_functional_metadata(&vendor_params_gt(), "stopSignal_run-1").unwrap();
    let b = build_functional_metadata(&vendor_params_gt(), "stopSignal_run-1").unwrap();
    assert_eq!(a, b);
}

#[test]
fn sidecar_keys_in_order() {
    let meta = build_functional_metadata(&plain_params(), "stopSignal_run-1").unwrap();
    let json = serde_json::to_string(&meta).unwrap();
    let keys = [
        "\"TaskName\":\"stopSignal\"",
        "\"EffectiveEchoSpacing\"",
        "\"EchoTime\"",
        "\"FlipAngle\"",
        "\"RepetitionTime\"",
        "\"SliceTiming\":[0.0,1.0,0.5,1.5]",
        "\"TotalReadoutTime\"",
        "\"PhaseEncodingDirection\":\"j-\"",
    ];
    let positions: Vec<usize> = keys
        .iter()
        .map(|k| json.find(k).unwrap_or_else(|| panic!("{} missing from {}", k, json)))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{}", json);

    let back: FunctionalMetadata = serde_json::from_str(&json).unwrap();
    assert_eq!(back, meta);
}
