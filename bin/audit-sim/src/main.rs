//! CLI for `rgs_audit::run_simulation`. Mirrors `audit_sim.py`'s
//! `--mode`/`--rounds`/`--seed`/`--out` flags.
use clap::Parser;
use rgs_audit::AuditMode;
use rgs_audit::AuditRow;
use rgs_audit::run_simulation;
use rgs_audit::write_csv;
use rgs_config::Configuration;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Run a headless audit batch and write a CSV row")]
struct Args {
    /// One of base, buy, hype.
    #[arg(long)]
    mode: String,

    #[arg(long, default_value_t = 100_000)]
    rounds: u64,

    #[arg(long)]
    seed: String,

    #[arg(long, default_value = "audit_result.csv")]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mode = AuditMode::parse(&args.mode)
        .ok_or_else(|| anyhow::anyhow!("unknown mode: {} (expected base, buy, hype)", args.mode))?;
    let config = Configuration::from_env();

    let stats = run_simulation(mode, args.rounds, &args.seed, &config);
    let row = AuditRow::from_stats(mode, args.rounds, &args.seed, &stats, &config);
    write_csv(&args.out, &row)?;

    println!(
        "{} rounds of {} (seed {}) -> rtp={:.2}% hit_freq={:.2}% max_win_x={:.1} -> {}",
        row.rounds,
        row.mode,
        row.seed,
        row.rtp,
        row.hit_freq,
        row.max_win_x,
        args.out.display()
    );
    Ok(())
}
