//! CLI for `rgs_audit::diff_rows`. Mirrors `diff_audit.py`'s two-file
//! comparison, exiting non-zero if any critical difference is found.
use clap::Parser;
use rgs_audit::diff_rows;
use rgs_audit::read_csv_row;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(about = "Diff two audit CSV rows")]
struct Args {
    a: PathBuf,
    b: PathBuf,
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    let a = read_csv_row(&args.a)?
        .ok_or_else(|| anyhow::anyhow!("no row found in {}", args.a.display()))?;
    let b = read_csv_row(&args.b)?
        .ok_or_else(|| anyhow::anyhow!("no row found in {}", args.b.display()))?;

    let report = diff_rows(&a, &b);
    if report.identical {
        println!("identical (within tolerance)");
        return Ok(ExitCode::SUCCESS);
    }

    let mut had_critical = false;
    for diff in &report.differences {
        let prefix = if diff.critical {
            had_critical = true;
            "CRITICAL"
        } else {
            "diff"
        };
        println!("{prefix}: {} a={} b={}", diff.field, diff.a, diff.b);
    }
    Ok(if had_critical {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
