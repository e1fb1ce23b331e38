use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use namefix::{default_log_name, fix_montage_tree, MontageFixConfig};

#[derive(Parser)]
#[command(
    name = "fix_montage",
    about = "Correct montage-shifted channel files into a renamed copy of a recording tree"
)]
struct Args {
    /// Source recording root (the subject directory)
    #[arg(long)]
    root: PathBuf,

    /// Suffix appended to the root's name for the destination tree
    #[arg(long, default_value = "_renamed")]
    suffix: String,

    /// Directory-name prefix marking sessions that need correction
    #[arg(long, default_value = "EXP")]
    prefix: String,

    /// Channel file extension
    #[arg(long, default_value = ".ncs")]
    extension: String,

    /// Re-copy files whose destination already exists
    #[arg(long)]
    overwrite: bool,

    /// Run-log CSV path (default: fix_montage_<timestamp>.csv)
    #[arg(long)]
    log: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let cfg = MontageFixConfig {
        needs_fix_prefix: args.prefix,
        renamed_suffix: args.suffix,
        channel_extension: args.extension,
        skip_existing: !args.overwrite,
        ..MontageFixConfig::default()
    };

    let log = fix_montage_tree(&args.root, &cfg)?;

    let summary = log.summary();
    println!("Processed {} entries: {}", summary.total(), summary);
    for rec in log.anomalies() {
        if rec.detail.is_empty() {
            eprintln!("{}: {}", rec.outcome, rec.source.display());
        } else {
            eprintln!("{}: {} ({})", rec.outcome, rec.source.display(), rec.detail);
        }
    }

    let log_path = args
        .log
        .unwrap_or_else(|| PathBuf::from(default_log_name("fix_montage")));
    log.write_csv(&log_path)?;
    println!("Log written → {}", log_path.display());

    Ok(())
}
