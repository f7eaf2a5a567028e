//! CLI for `rgs_audit::hunt_seeds`. Mirrors `seed_hunt.py`'s
//! `--target {cap,high}` search, used to prove `maxWinTotalX` is reachable
//! under the configured paytable.
use clap::Parser;
use clap::ValueEnum;
use rgs_audit::AuditMode;
use rgs_audit::SeedHuntTarget;
use rgs_audit::hunt_seeds;
use rgs_config::Configuration;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromStr;
use std::path::PathBuf;

#[derive(ValueEnum, Debug, Clone, Copy)]
enum TargetArg {
    Cap,
    High,
}

#[derive(Parser, Debug)]
#[command(about = "Hunt deterministic seeds for a target win condition")]
struct Args {
    #[arg(long)]
    mode: String,

    #[arg(long, default_value = "1000")]
    min_win_x: String,

    #[arg(long, value_enum, default_value = "high")]
    target: TargetArg,

    #[arg(long, default_value_t = 100_000)]
    max_seeds: u32,

    #[arg(long, default_value = "SEED")]
    prefix: String,

    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mode = AuditMode::parse(&args.mode)
        .ok_or_else(|| anyhow::anyhow!("unknown mode: {} (expected base, buy, hype)", args.mode))?;
    let target = match args.target {
        TargetArg::Cap => SeedHuntTarget::Cap,
        TargetArg::High => SeedHuntTarget::High,
    };
    let min_win_x = Decimal::from_str(&args.min_win_x)
        .map_err(|e| anyhow::anyhow!("invalid --min-win-x: {e}"))?;
    let config = Configuration::from_env();

    let report = hunt_seeds(mode, min_win_x, target, args.max_seeds, &args.prefix, &config);
    println!(
        "found={} count_1000x_plus={} count_10000x_plus={} count_capped={} max_found_win_x={}",
        report.found.len(),
        report.count_1000x_plus,
        report.count_10000x_plus,
        report.count_capped,
        report.max_found_win_x
    );

    if let Some(out) = args.out {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(&out, json)?;
        println!("wrote {}", out.display());
    }
    Ok(())
}
