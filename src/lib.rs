//! Conversion of vendor MRI exports into the BIDS layout.
//!
//! The heart of the crate derives the sidecar metadata of functional
//! scans from the vendor's scan-parameter records: slice timing of
//! (possibly multiplexed) EPI acquisitions, readout time and phase
//! encoding direction. See [`compute_slice_timing`] and
//! [`build_functional_metadata`]. Both are pure functions.
//!
//! The [`convert`] module builds on them to reorganize a whole export,
//! one subject session at a time. Progress is reported through the
//! [`Report`] trait.
//!
//! # Example
//!
//! ```
//! use bidsify::{build_functional_metadata, ScanParameters};
//! # use bidsify::Result;
//!
//! # fn run() -> Result<()> {
//! let record = r#"{
//!     "num_bands": 2, "num_slices": 2, "tr": 2.0,
//!     "effective_echo_spacing": 0.0005, "te": 0.03, "flip_angle": 77,
//!     "acquisition_matrix": [64, 64], "phase_encode_direction": 1
//! }"#;
//! let params = ScanParameters::from_reader(record.as_bytes())?;
//! let meta = build_functional_metadata(&params, "rest_run-1")?;
//! assert_eq!(meta.slice_timing.as_slice(), &[0.0, 1.0, 0.0, 1.0]);
//! println!("{}", serde_json::to_string(&meta).unwrap());
//! # Ok(())
//! # }
//! # run().unwrap();
//! ```
//!
//! [`compute_slice_timing`]: slice_timing/fn.compute_slice_timing.html
//! [`build_functional_metadata`]: functional/fn.build_functional_metadata.html
//! [`convert`]: convert/index.html
//! [`Report`]: report/trait.Report.html
#![deny(missing_debug_implementations)]
#![warn(missing_docs, unused_extern_crates, trivial_casts, unused_results)]

#[macro_use]
extern crate quick_error;
#[macro_use]
extern crate num_derive;

pub mod convert;
pub mod error;
pub mod functional;
pub mod header;
pub mod layout;
pub mod params;
pub mod report;
pub mod slice_timing;
pub mod typedef;
mod util;

pub use convert::{ConvertOptions, Converter, DatasetSummary, Defacer, Pydeface};
pub use error::{BidsError, Result};
pub use functional::{build_functional_metadata, FunctionalMetadata};
pub use header::ImageHeader;
pub use layout::IdCorrection;
pub use params::ScanParameters;
pub use report::{LogReport, Report, WriteReport};
pub use slice_timing::{compute_slice_timing, SliceTiming};
pub use typedef::{Modality, PhaseEncodingAxis, PhysioKind};
pub use util::clean_file_name;
