//! This module defines `ImageHeader`, a minimal view over the NIFTI-1
//! header of the images being converted. Only what is needed to compare
//! two acquisitions of the same run is retained.

use crate::error::{BidsError, Result};
use crate::util::is_gz_file;
use byteordered::{ByteOrdered, Endianness};
use flate2::bufread::GzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Magic code for NIFTI-1 header files (extention ".hdr[.gz]").
pub const MAGIC_CODE_NI1: &[u8; 4] = b"ni1\0";
/// Magic code for full NIFTI-1 files (extention ".nii[.gz]").
pub const MAGIC_CODE_NIP1: &[u8; 4] = b"n+1\0";

/// Size of a NIFTI-1 header in bytes.
pub const HEADER_SIZE: usize = 348;

const DIM_OFFSET: usize = 40;
const MAGIC_OFFSET: usize = 344;

/// The parts of a NIFTI-1 header relevant to the conversion.
///
/// # Examples
///
/// ```no_run
/// use bidsify::ImageHeader;
/// # use bidsify::Result;
///
/// # fn run() -> Result<()> {
/// let saved = ImageHeader::from_file("sub-01_ses-1_task-rest_bold.nii.gz")?;
/// let incoming = ImageHeader::from_file("rest_run1.nii.gz")?;
/// if incoming.time_points() > saved.time_points() {
///     // replace the saved run
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ImageHeader {
    /// Data array dimensions, `dim[0]` being the number of dimensions
    pub dim: [u16; 8],
    /// Magic code. Must be `b"ni1\0"` or `b"n+1\0"`
    pub magic: [u8; 4],
    /// Original data Endianness
    pub endianness: Endianness,
}

impl ImageHeader {
    /// Retrieve a NIFTI header from a file in the file system.
    /// If the file's name ends with ".gz", the file is assumed to need GZip decoding.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<ImageHeader> {
        let gz = is_gz_file(&path);
        let file = BufReader::new(File::open(path)?);
        if gz {
            ImageHeader::from_reader(GzDecoder::new(file))
        } else {
            ImageHeader::from_reader(file)
        }
    }

    /// Read a NIfTI-1 header, along with its byte order, from the given byte stream.
    /// It is assumed that the input is currently at the start of the
    /// NIFTI header.
    pub fn from_reader<S: Read>(mut input: S) -> Result<ImageHeader> {
        let mut raw = [0u8; HEADER_SIZE];
        input.read_exact(&mut raw)?;

        // try the system's native endianness first
        let dim0 = ByteOrdered::native(&raw[DIM_OFFSET..DIM_OFFSET + 2]).read_u16()?;
        let endianness = if dim0 > 7 {
            Endianness::native().to_opposite()
        } else {
            Endianness::native()
        };

        let sizeof_hdr = ByteOrdered::runtime(&raw[0..4], endianness).read_i32()?;
        if sizeof_hdr as usize != HEADER_SIZE {
            return Err(BidsError::InvalidFormat);
        }

        let mut dim = [0u16; 8];
        let mut dims = ByteOrdered::runtime(&raw[DIM_OFFSET..DIM_OFFSET + 16], endianness);
        for v in &mut dim {
            *v = dims.read_u16()?;
        }
        if dim[0] > 7 {
            return Err(BidsError::InvalidFormat);
        }

        let mut magic = [0u8; 4];
        magic.copy_from_slice(&raw[MAGIC_OFFSET..MAGIC_OFFSET + 4]);
        if &magic != MAGIC_CODE_NI1 && &magic != MAGIC_CODE_NIP1 {
            return Err(BidsError::InvalidFormat);
        }

        Ok(ImageHeader {
            dim,
            magic,
            endianness,
        })
    }

    /// Get the effective dimensions of the image. Unlike how NIFTI-1
    /// stores dimensions, the returned slice does not include
    /// `dim[0]` and is clipped to the effective number of dimensions.
    pub fn shape(&self) -> &[u16] {
        &self.dim[1..=self.dim[0] as usize]
    }

    /// Length of the last dimension, which is the number of volumes of a
    /// 4D series. Zero for a header without dimensions.
    pub fn time_points(&self) -> u16 {
        self.shape().last().copied().unwrap_or(0)
    }
}
