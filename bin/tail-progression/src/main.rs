//! CLI for `rgs_audit::check_tail_progression`. Mirrors
//! `tail_progression.py`'s baseline-regression gate.
use clap::Parser;
use rgs_audit::check_tail_progression;
use rgs_audit::read_csv_row;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(about = "Check an audit run for tail regression against a baseline")]
struct Args {
    #[arg(long)]
    run: PathBuf,

    #[arg(long)]
    baseline: PathBuf,
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    let run = read_csv_row(&args.run)?
        .ok_or_else(|| anyhow::anyhow!("no row found in {}", args.run.display()))?;
    let baseline = read_csv_row(&args.baseline)?
        .ok_or_else(|| anyhow::anyhow!("no row found in {}", args.baseline.display()))?;

    let report = check_tail_progression(&run, &baseline);
    for check in &report.checks {
        println!(
            "{} run={:.4} baseline={:.4} tolerance={:.4} -> {}",
            check.field,
            check.run_value,
            check.baseline_value,
            check.tolerance,
            if check.passed { "PASS" } else { "REGRESSION" }
        );
    }
    Ok(if report.passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
