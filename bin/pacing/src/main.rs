//! CLI for `rgs_audit::run_pacing_report`. Mirrors `pacing_report.py`'s
//! human-facing drought/quantile dump; diagnostic only, never gates CI.
use clap::Parser;
use rgs_audit::AuditMode;
use rgs_audit::run_pacing_report;
use rgs_config::Configuration;

#[derive(Parser, Debug)]
#[command(about = "Run a diagnostic pacing report for a mode")]
struct Args {
    #[arg(long)]
    mode: String,

    #[arg(long, default_value_t = 100_000)]
    rounds: u64,

    #[arg(long)]
    seed: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mode = AuditMode::parse(&args.mode)
        .ok_or_else(|| anyhow::anyhow!("unknown mode: {} (expected base, buy, hype)", args.mode))?;
    let config = Configuration::from_env();

    let report = run_pacing_report(mode, args.rounds, &args.seed, &config);
    println!("mode={} rounds={}", report.mode, report.rounds);
    println!("rtp={:.2}% win_rate={:.2}% bonus_entry_rate={:.2}%", report.rtp, report.win_rate, report.bonus_entry_rate);
    println!("avg_win_x={:.2} p95_win_x={:.2} p99_win_x={:.2}", report.avg_win_x, report.p95_win_x, report.p99_win_x);
    println!(
        "spins_between_wins p50={:.0} p90={:.0} p99={:.0}",
        report.spins_between_wins_p50, report.spins_between_wins_p90, report.spins_between_wins_p99
    );
    println!(
        "spins_between_bonuses p50={:.0} p90={:.0} p99={:.0}",
        report.spins_between_bonuses_p50, report.spins_between_bonuses_p90, report.spins_between_bonuses_p99
    );
    println!(
        "bonus_drought_gt_300_rate={:.2}% bonus_drought_gt_500_rate={:.2}%",
        report.bonus_drought_gt_300_rate, report.bonus_drought_gt_500_rate
    );
    Ok(())
}
