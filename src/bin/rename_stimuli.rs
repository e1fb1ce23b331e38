use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use namefix::{rename_screening_batch, ScreeningConfig};

#[derive(Parser)]
#[command(
    name = "rename_stimuli",
    about = "Re-encode screening stimulus image names into canonical form"
)]
struct Args {
    /// Gallery directory holding the source images
    #[arg(long)]
    input: PathBuf,

    /// Destination directory for the canonical names
    #[arg(long)]
    output: PathBuf,

    /// Keep existing outputs and resume the id counter after them
    /// (default: purge the output directory and restart at 0)
    #[arg(long)]
    keep_existing: bool,

    /// Image file extension
    #[arg(long, default_value = ".jpg")]
    extension: String,

    /// Run-log CSV path
    #[arg(long, default_value = "images_rename_log.csv")]
    log: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let cfg = ScreeningConfig {
        file_extension: args.extension,
        delete_existing: !args.keep_existing,
        ..ScreeningConfig::default()
    };

    let log = rename_screening_batch(&args.input, &args.output, &cfg)?;

    let summary = log.summary();
    println!("Processed {} images: {}", summary.total(), summary);
    for rec in log.anomalies() {
        if rec.detail.is_empty() {
            eprintln!("{}: {}", rec.outcome, rec.source.display());
        } else {
            eprintln!("{}: {} ({})", rec.outcome, rec.source.display(), rec.detail);
        }
    }

    log.write_csv(&args.log)?;
    println!("Log written → {}", args.log.display());

    Ok(())
}
