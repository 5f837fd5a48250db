//! An application for converting a vendor MRI export into a BIDS dataset.

mod args;

use crate::args::BidsifyArgs;
use bidsify::{ConvertOptions, Converter, IdCorrection, Pydeface, Report, WriteReport};
use clap::Parser;
use std::fs::File;
use std::io::BufWriter;
use std::process;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = BidsifyArgs::parse();
    if let Err(e) = run(&args) {
        log::error!("{}", e);
        process::exit(1);
    }
}

fn run(args: &BidsifyArgs) -> bidsify::Result<()> {
    let study_id = args.study_id();
    let mut report = WriteReport::new(BufWriter::new(File::create(args.write_out(&study_id))?));

    let mut options = ConvertOptions::new().skip_complete(args.skip_complete);
    if let Some(path) = &args.id_correction {
        options = options.id_correction(IdCorrection::from_file(path)?);
        report.note(&format!("Using ID correction json file: {}", path.display()));
    }

    let converter =
        Converter::new(&args.bids_dir, Pydeface::with_program(args.defacer.as_str()))
            .with_options(options);
    let summary = converter.convert_dataset(
        &args.fly_dir,
        &study_id,
        args.fly_paths.as_deref(),
        &mut report,
    )?;
    report.flush()?;

    log::info!(
        "{} sessions converted, {} skipped, {} failed",
        summary.converted,
        summary.skipped,
        summary.failed
    );
    Ok(())
}
