//! Private utility module
use crate::error::Result;
use regex::Regex;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Whether the file at the given path is GZip encoded, judging by its
/// name alone.
pub fn is_gz_file<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .file_name()
        .map(|a| a.to_string_lossy().ends_with(".gz"))
        .unwrap_or(false)
}

/// Normalize the entity separators of a vendor file name:
/// `task_` and `run_` become `task-` and `run-`, and the `_ssg` marker
/// is dropped.
pub fn clean_file_name(name: &str) -> String {
    name.replace("task_", "task-")
        .replace("run_", "run-")
        .replace("_ssg", "")
}

/// Apply `clean_file_name` to the last component of a path.
pub fn clean_path(path: &Path) -> PathBuf {
    match path.file_name() {
        Some(name) => path.with_file_name(clean_file_name(&name.to_string_lossy())),
        None => path.to_path_buf(),
    }
}

/// Remove the first run entity (`_run-N` or `_run_N`) from a label, so
/// that metadata can be shared by all runs of a task.
pub fn strip_run_label(label: &str) -> String {
    static RUN: OnceLock<Regex> = OnceLock::new();
    let re = RUN.get_or_init(|| Regex::new("_run[-_][0-9]").expect("valid run pattern"));
    re.replace(label, "").into_owned()
}

/// Name of the last component of a path, lossily converted.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Serialize a value as a JSON document at the given path.
pub fn write_json<T: Serialize, P: AsRef<Path>>(path: P, value: &T) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

/// Rename every entry directly under `dir` to its normalized name.
/// Returns the number of renamed entries.
pub fn clean_directory(dir: &Path) -> Result<usize> {
    let mut renamed = 0;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let cleaned = clean_path(&path);
        if cleaned != path {
            fs::rename(&path, &cleaned)?;
            renamed += 1;
        }
    }
    Ok(renamed)
}

#[cfg(test)]
mod tests {
    use super::{clean_file_name, clean_path, is_gz_file, strip_run_label};
    use std::path::Path;

    #[test]
    fn gz_files() {
        assert!(is_gz_file("/path/to/something.nii.gz"));
        assert!(is_gz_file("input.gz"));
        assert!(!is_gz_file("/path/to/image.nii"));
        assert!(!is_gz_file("/path/to/gz/"));
        assert!(!is_gz_file("gz"));
    }

    #[test]
    fn clean_names() {
        assert_eq!(
            clean_file_name("sub-01_ses-1_task_rest_run_1_ssg.nii.gz"),
            "sub-01_ses-1_task-rest_run-1.nii.gz"
        );
        assert_eq!(clean_file_name("task-rest_bold.json"), "task-rest_bold.json");
    }

    #[test]
    fn clean_only_the_file_name() {
        assert_eq!(
            clean_path(Path::new("study_task_a/task_rest_ssg.json")),
            Path::new("study_task_a/task-rest.json")
        );
    }

    #[test]
    fn strip_run() {
        assert_eq!(strip_run_label("task-rest_run-1_sbref"), "task-rest_sbref");
        assert_eq!(strip_run_label("task_rest_run_2_ssg"), "task_rest_ssg");
        assert_eq!(strip_run_label("task-rest"), "task-rest");
    }
}
