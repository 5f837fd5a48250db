//! Types for error handling go here.
use std::io::Error as IOError;
use std::path::PathBuf;
use std::process::ExitStatus;

quick_error! {
    /// Error type for all error variants originated by this crate.
    #[derive(Debug)]
    pub enum BidsError {
        /// The slice count, repetition time or multiplex factor cannot
        /// describe a valid acquisition.
        InvalidSliceConfiguration(reason: String) {
            display("Invalid slice configuration: {}", reason)
        }
        /// A required scan parameter is absent from the vendor record.
        MissingField(field: &'static str) {
            display("Missing scan parameter `{}`", field)
        }
        /// A scan parameter is present but cannot be used.
        InvalidField(field: &'static str, reason: String) {
            display("Invalid scan parameter `{}`: {}", field, reason)
        }
        /// Read an invalid NIfTI-1 header
        InvalidFormat {
            display("Invalid NIfTI-1 file")
        }
        /// An acquisition folder holds an unexpected number of matching files.
        UnexpectedFileCount(dir: PathBuf, pattern: &'static str, found: usize) {
            display("Found {} files matching `{}` in {}", found, pattern, dir.display())
        }
        /// Subject or session could not be derived from the given path.
        UnrecognizedLayout(path: PathBuf) {
            display("Could not derive subject and session from {}", path.display())
        }
        /// The external defacing tool did not succeed.
        DefacerFailed(program: String, status: ExitStatus) {
            display("Defacing program `{}` failed with {}", program, status)
        }
        /// A physiological recording contains a value which is not a number.
        InvalidPhysioSample(file: String, line: usize) {
            display("Invalid physio sample in {} at line {}", file, line)
        }
        /// I/O Error
        Io(err: IOError) {
            from()
            source(err)
            display("I/O error: {}", err)
        }
        /// JSON (de)serialization error
        Json(err: serde_json::Error) {
            from()
            source(err)
            display("JSON error: {}", err)
        }
        /// Malformed glob pattern
        Pattern(err: glob::PatternError) {
            from()
            source(err)
            display("Invalid search pattern: {}", err)
        }
        /// Error reading a physio archive
        Archive(err: zip::result::ZipError) {
            from()
            source(err)
            display("Archive error: {}", err)
        }
    }
}

/// Alias type for results originated from this crate.
pub type Result<T> = ::std::result::Result<T, BidsError>;
