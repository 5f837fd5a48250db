use std::path::{Path, PathBuf};

/// Reorganize a vendor MRI export into a BIDS dataset.
#[derive(clap::Parser, Debug)]
#[command(name = "bidsify", version)]
pub struct BidsifyArgs {
    /// Directory of the vendor export (`<subject>/<session>/<acquisition>`)
    pub fly_dir: PathBuf,
    /// Root of the BIDS dataset to write
    pub bids_dir: PathBuf,
    /// Study name; defaults to the first component of the export directory
    #[arg(long)]
    pub study_id: Option<String>,
    /// JSON object mapping scanner subject ids to corrected ids
    #[arg(long)]
    pub id_correction: Option<PathBuf>,
    /// Convert only these sessions, given by the tail of their path (e.g. s999/ses-1)
    #[arg(long, num_args = 1..)]
    pub fly_paths: Option<Vec<String>>,
    /// Run log file; defaults to `<study_id>_FLY_to_BIDS.txt`
    #[arg(long)]
    pub write_out: Option<PathBuf>,
    /// Skip sessions already present in the dataset
    #[arg(long)]
    pub skip_complete: bool,
    /// Program used to deface anatomical images
    #[arg(long, default_value = "pydeface")]
    pub defacer: String,
}

impl BidsifyArgs {
    /// The study id, given or derived from the export directory.
    pub fn study_id(&self) -> String {
        match &self.study_id {
            Some(id) => id.clone(),
            None => default_study_id(&self.fly_dir),
        }
    }

    /// The run log path, given or derived from the study id.
    pub fn write_out(&self, study_id: &str) -> PathBuf {
        match &self.write_out {
            Some(path) => path.clone(),
            None => PathBuf::from(format!("{}_FLY_to_BIDS.txt", study_id)),
        }
    }
}

fn default_study_id(fly_dir: &Path) -> String {
    fly_dir
        .components()
        .filter_map(|c| match c {
            std::path::Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .next()
        .unwrap_or_else(|| "study".to_string())
}

#[cfg(test)]
mod tests {
    use super::BidsifyArgs;
    use clap::Parser;
    use std::path::Path;

    #[test]
    fn defaults() {
        let args = BidsifyArgs::parse_from(["bidsify", "uh2aim4/", "uh2aim4_BIDS"]);
        assert_eq!(args.study_id(), "uh2aim4");
        assert_eq!(args.write_out("uh2aim4"), Path::new("uh2aim4_FLY_to_BIDS.txt"));
        assert_eq!(args.defacer, "pydeface");
        assert!(!args.skip_complete);
        assert!(args.fly_paths.is_none());
    }

    #[test]
    fn selected_sessions() {
        let args = BidsifyArgs::parse_from([
            "bidsify",
            "study",
            "bids",
            "--fly-paths",
            "s1/ses-1",
            "s2/ses-1",
            "--skip-complete",
            "--study-id",
            "uh2",
        ]);
        assert_eq!(args.study_id(), "uh2");
        assert_eq!(
            args.fly_paths,
            Some(vec!["s1/ses-1".to_string(), "s2/ses-1".to_string()])
        );
        assert!(args.skip_complete);
    }
}
