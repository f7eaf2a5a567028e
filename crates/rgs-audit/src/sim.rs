use rgs_config::Configuration;
use rgs_core::Mode;
use rgs_dto::SpinEvent;
use rgs_dto::SpinMode;
use rgs_rng::Rng;
use rgs_rng::SeededRng;
use rgs_state::PlayerState;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;
use serde::Deserialize;
use serde::Serialize;
use std::path::Path;
use std::process::Command;

/// The three simulation modes the audit driver accepts (§4.9). `Hype`
/// is the ante-bet surcharge mode, distinct from the `hypeMode` request
/// flag's name collision with the buy-feature `SpinMode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditMode {
    Base,
    Buy,
    Hype,
}

impl AuditMode {
    pub fn as_str(self) -> &'static str {
        match self {
            AuditMode::Base => "base",
            AuditMode::Buy => "buy",
            AuditMode::Hype => "hype",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "base" => Some(AuditMode::Base),
            "buy" => Some(AuditMode::Buy),
            "hype" => Some(AuditMode::Hype),
            _ => None,
        }
    }
}

/// Raw counters accumulated while driving the engine. `rounds` are audit
/// units: one spin in base/hype mode, one full bonus session in buy mode
/// (the session starting spin plus every continuation spin it consumes).
#[derive(Debug, Clone, Default)]
pub struct SimulationStats {
    pub rounds: u64,
    pub spins_executed: u64,
    pub total_wagered: Decimal,
    pub total_won: Decimal,
    pub wins: u64,
    pub capped_count: u64,
    pub vip_buy_entries: u64,
    pub standard_entries: u64,
    pub win_x_values: Vec<Decimal>,
    pub max_win_x_observed: Decimal,
}

/// One audit round, in buy mode: the bonus-opening spin plus every
/// free-spins continuation until the session returns to `BASE`. Mirrors
/// `seed_hunt.py::run_single_round`'s buy-mode branch, which is the
/// session accounting spec.md §4.9 names explicitly (`audit_sim.py`
/// itself never leaves the continuous single-spin-per-round model, but
/// spec.md's "one audit round equals one full bonus session" overrides
/// it for buy mode).
fn run_buy_session(
    state: &PlayerState,
    config: &Configuration,
    rng: &mut dyn Rng,
    bet: Decimal,
) -> (PlayerState, Decimal, bool, u64) {
    let mut round_win = Decimal::ZERO;
    let mut capped = false;
    let mut spins = 0u64;

    let outcome = rgs_engine::spin(state, config, rng, bet, false, SpinMode::BuyFeature);
    spins += 1;
    round_win += outcome.total_win;
    capped |= outcome.is_capped;
    let mut next = outcome.next_state;

    while next.mode == Mode::FreeSpins {
        let outcome = rgs_engine::spin(&next, config, rng, bet, false, SpinMode::Normal);
        spins += 1;
        round_win += outcome.total_win;
        capped |= outcome.is_capped;
        next = outcome.next_state;
    }

    (next, round_win, capped, spins)
}

/// Runs `rounds` audit rounds of `mode`, returning the raw counters a CSV
/// row is built from. Grounded on `audit_sim.py::run_simulation`, with
/// the buy-mode session accounting corrected per spec.md §4.9 (see
/// [`run_buy_session`]).
pub fn run_simulation(
    mode: AuditMode,
    rounds: u64,
    seed_str: &str,
    config: &Configuration,
) -> SimulationStats {
    let mut rng = SeededRng::from_seed_string(seed_str);
    let bet = dec!(1);
    let mut stats = SimulationStats {
        rounds,
        ..SimulationStats::default()
    };
    let mut state = PlayerState::default();

    match mode {
        AuditMode::Buy => {
            for _ in 0..rounds {
                let (next, round_win, capped, spins) =
                    run_buy_session(&state, config, &mut rng, bet);
                state = next;
                stats.spins_executed += spins;
                stats.total_wagered += bet * Decimal::from(config.buy_feature_cost_multiplier);
                stats.total_won += round_win;
                if round_win > Decimal::ZERO {
                    stats.wins += 1;
                }
                if capped {
                    stats.capped_count += 1;
                }
                stats.vip_buy_entries += 1;
                let round_win_x = round_win / bet;
                stats.win_x_values.push(round_win_x);
                if round_win_x > stats.max_win_x_observed {
                    stats.max_win_x_observed = round_win_x;
                }
            }
        }
        AuditMode::Base | AuditMode::Hype => {
            let hype_flag = matches!(mode, AuditMode::Hype);
            // Matches `audit_sim.py`/`pacing_report.py`: every round charges
            // a full bet (scaled by the hype surcharge), whether or not the
            // round happens to land on a naturally-triggered free spin. Only
            // the buy-mode session (§4.9) exempts continuation spins.
            let debit = if hype_flag {
                bet * (Decimal::ONE + config.hype_mode_cost_increase)
            } else {
                bet
            };
            for _ in 0..rounds {
                let outcome =
                    rgs_engine::spin(&state, config, &mut rng, bet, hype_flag, SpinMode::Normal);
                stats.spins_executed += 1;
                stats.total_wagered += debit;
                stats.total_won += outcome.total_win;
                if outcome.total_win > Decimal::ZERO {
                    stats.wins += 1;
                }
                if outcome.is_capped {
                    stats.capped_count += 1;
                }
                for event in &outcome.events {
                    if let SpinEvent::EnterFreeSpins { bonus_variant, .. } = event {
                        if bonus_variant == "vip_buy" {
                            stats.vip_buy_entries += 1;
                        } else {
                            stats.standard_entries += 1;
                        }
                    }
                }
                stats.win_x_values.push(outcome.total_win_x);
                if outcome.total_win_x > stats.max_win_x_observed {
                    stats.max_win_x_observed = outcome.total_win_x;
                }
                state = outcome.next_state;
            }
        }
    }

    stats
}

fn percentile(values: &[Decimal], pct: f64) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    let mut sorted = values.to_vec();
    sorted.sort();
    let idx = ((sorted.len() as f64) * pct / 100.0) as usize;
    sorted[idx.min(sorted.len() - 1)]
}

fn rate(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        (count as f64 / total as f64) * 100.0
    }
}

/// The exact CSV row from spec.md §4.9. Numeric fields are written as
/// `f64`/`Decimal` text the way `csv::Writer::serialize` renders them;
/// `scatter_chance_*` carries full precision since the diff tool compares
/// it for exact string equality (`diff_audit.py::SCATTER_EXACT_FIELDS`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRow {
    pub timestamp: String,
    pub git_commit: String,
    pub config_hash: String,
    pub mode: String,
    pub rounds: u64,
    pub seed: String,
    pub debit_multiplier: f64,
    pub scatter_chance_base: f64,
    pub scatter_chance_effective: f64,
    pub scatter_chance_multiplier: f64,
    pub rtp: f64,
    pub hit_freq: f64,
    pub bonus_entry_rate: f64,
    pub vip_buy_bonus_rate: f64,
    pub standard_bonus_rate: f64,
    pub avg_debit: f64,
    pub avg_credit: f64,
    pub p95_win_x: f64,
    pub p99_win_x: f64,
    pub max_win_x: f64,
    pub rate_1000x_plus: f64,
    pub rate_10000x_plus: f64,
    pub capped_rate: f64,
}

impl AuditRow {
    pub fn from_stats(
        mode: AuditMode,
        rounds: u64,
        seed_str: &str,
        stats: &SimulationStats,
        config: &Configuration,
    ) -> Self {
        let hype_flag = matches!(mode, AuditMode::Hype);
        let scatter_base = rgs_engine::BASE_WEIGHTS[rgs_engine::Symbol::Scatter as usize];
        let scatter_multiplier = if hype_flag {
            config.hype_mode_bonus_chance_multiplier.to_f64().unwrap_or(1.0)
        } else {
            1.0
        };
        let scatter_effective = if hype_flag {
            rgs_engine::hype_adjusted_weights(scatter_multiplier)
                [rgs_engine::Symbol::Scatter as usize]
        } else {
            scatter_base
        };

        let total_wagered_f = stats.total_wagered.to_f64().unwrap_or(0.0);
        let total_won_f = stats.total_won.to_f64().unwrap_or(0.0);
        let rtp = if total_wagered_f > 0.0 {
            total_won_f / total_wagered_f * 100.0
        } else {
            0.0
        };
        let avg_debit = if stats.rounds > 0 {
            total_wagered_f / stats.rounds as f64
        } else {
            0.0
        };
        let avg_credit = if stats.rounds > 0 {
            total_won_f / stats.rounds as f64
        } else {
            0.0
        };
        let bonus_entries = stats.vip_buy_entries + stats.standard_entries;
        let rate_1000x_plus = stats
            .win_x_values
            .iter()
            .filter(|x| **x >= Decimal::from(1000))
            .count() as u64;
        let rate_10000x_plus = stats
            .win_x_values
            .iter()
            .filter(|x| **x >= Decimal::from(10_000))
            .count() as u64;

        Self {
            timestamp: timestamp_iso(),
            git_commit: git_commit(),
            config_hash: config.config_hash(),
            mode: mode.as_str().to_string(),
            rounds: stats.rounds,
            seed: seed_str.to_string(),
            debit_multiplier: if stats.rounds > 0 {
                avg_debit
            } else {
                1.0
            },
            scatter_chance_base: scatter_base,
            scatter_chance_effective: scatter_effective,
            scatter_chance_multiplier: scatter_multiplier,
            rtp,
            hit_freq: rate(stats.wins, stats.spins_executed),
            bonus_entry_rate: rate(bonus_entries, stats.rounds),
            vip_buy_bonus_rate: rate(stats.vip_buy_entries, stats.rounds),
            standard_bonus_rate: rate(stats.standard_entries, stats.rounds),
            avg_debit,
            avg_credit,
            p95_win_x: percentile(&stats.win_x_values, 95.0).to_f64().unwrap_or(0.0),
            p99_win_x: percentile(&stats.win_x_values, 99.0).to_f64().unwrap_or(0.0),
            max_win_x: stats.max_win_x_observed.to_f64().unwrap_or(0.0),
            rate_1000x_plus: rate(rate_1000x_plus, stats.rounds),
            rate_10000x_plus: rate(rate_10000x_plus, stats.rounds),
            capped_rate: rate(stats.capped_count, stats.rounds),
        }
    }
}

/// Short git commit hash, matching `audit_sim.py`'s `get_git_commit`.
/// Returns `"unknown"` outside a git checkout or if the binary is
/// missing, never an error — this is diagnostic metadata, not a gate.
pub fn git_commit() -> String {
    Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

pub fn timestamp_iso() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

pub fn write_csv(path: &Path, row: &AuditRow) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    writer.serialize(row)?;
    writer.flush()?;
    Ok(())
}

pub fn read_csv_row(path: &Path) -> anyhow::Result<Option<AuditRow>> {
    if !path.exists() {
        return Ok(None);
    }
    let mut reader = csv::Reader::from_path(path)?;
    let row = reader.deserialize::<AuditRow>().next().transpose()?;
    Ok(row)
}
