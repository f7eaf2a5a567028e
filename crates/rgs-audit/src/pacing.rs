use crate::sim::AuditMode;
use crate::sim::run_simulation;
use rgs_config::Configuration;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

fn percentile_usize(values: &[usize], pct: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let idx = ((sorted.len() as f64) * pct / 100.0) as usize;
    sorted[idx.min(sorted.len() - 1)] as f64
}

/// Intervals (in rounds) between wins. Grounded on
/// `pacing_report.py::compute_spins_between_wins`.
fn spins_between_wins(win_x_values: &[Decimal]) -> Vec<usize> {
    let mut intervals = Vec::new();
    let mut last_win_idx: Option<usize> = None;
    for (i, wx) in win_x_values.iter().enumerate() {
        if *wx > Decimal::ZERO {
            if let Some(last) = last_win_idx {
                intervals.push(i - last);
            }
            last_win_idx = Some(i);
        }
    }
    intervals
}

/// Intervals between successive entries in `event_rounds` (0-based round
/// indices), plus a trailing interval from the last event to
/// `total_rounds` if it hasn't yet closed. Grounded on
/// `pacing_report.py::calculate_intervals`.
fn calculate_intervals(event_rounds: &[usize], total_rounds: usize) -> Vec<usize> {
    if event_rounds.is_empty() {
        return Vec::new();
    }
    let mut sorted = event_rounds.to_vec();
    sorted.sort_unstable();
    let mut intervals = Vec::with_capacity(sorted.len());
    let mut prev = 0usize;
    for &r in &sorted {
        intervals.push(r - prev);
        prev = r;
    }
    if let Some(&last) = sorted.last() {
        if last < total_rounds {
            intervals.push(total_rounds - last);
        }
    }
    intervals
}

/// Diagnostic-only pacing metrics for one mode (§4.9's "pacing tool").
/// Non-gate: wider tolerances than the tail-progression gate, meant for
/// human review rather than CI pass/fail.
#[derive(Debug, Clone)]
pub struct PacingReport {
    pub mode: String,
    pub rounds: u64,
    pub rtp: f64,
    pub win_rate: f64,
    pub bonus_entry_rate: f64,
    pub avg_win_x: f64,
    pub p95_win_x: f64,
    pub p99_win_x: f64,
    pub spins_between_wins_p50: f64,
    pub spins_between_wins_p90: f64,
    pub spins_between_wins_p99: f64,
    pub spins_between_bonuses_p50: f64,
    pub spins_between_bonuses_p90: f64,
    pub spins_between_bonuses_p99: f64,
    pub bonus_drought_gt_300_rate: f64,
    pub bonus_drought_gt_500_rate: f64,
}

/// Runs one pacing pass for `mode`. Re-derives the same per-round stream
/// `run_simulation` produces but additionally tracks the round index of
/// every win and every bonus entry so drought quantiles can be computed,
/// matching `pacing_report.py::run_pacing_simulation`.
pub fn run_pacing_report(mode: AuditMode, rounds: u64, seed_str: &str, config: &Configuration) -> PacingReport {
    use rgs_core::Mode;
    use rgs_dto::SpinEvent;
    use rgs_dto::SpinMode;
    use rgs_rng::SeededRng;
    use rgs_state::PlayerState;
    use rust_decimal_macros::dec;

    let mut rng = SeededRng::from_seed_string(seed_str);
    let bet = dec!(1);
    let mut state = PlayerState::default();

    let mut total_wagered = Decimal::ZERO;
    let mut total_won = Decimal::ZERO;
    let mut wins = 0u64;
    let mut bonus_entries = 0u64;
    let mut win_x_values: Vec<Decimal> = Vec::new();
    let mut bonus_entry_rounds: Vec<usize> = Vec::new();

    let hype_flag = matches!(mode, AuditMode::Hype);
    for round_idx in 0..rounds as usize {
        if matches!(mode, AuditMode::Buy) {
            let cost = bet * Decimal::from(config.buy_feature_cost_multiplier);
            let mut round_win = Decimal::ZERO;
            let mut entered = false;

            let outcome = rgs_engine::spin(&state, config, &mut rng, bet, false, SpinMode::BuyFeature);
            round_win += outcome.total_win;
            if outcome
                .events
                .iter()
                .any(|e| matches!(e, SpinEvent::EnterFreeSpins { .. }))
            {
                entered = true;
            }
            state = outcome.next_state;

            while state.mode == Mode::FreeSpins {
                let outcome = rgs_engine::spin(&state, config, &mut rng, bet, false, SpinMode::Normal);
                round_win += outcome.total_win;
                state = outcome.next_state;
            }

            total_wagered += cost;
            total_won += round_win;
            if round_win > Decimal::ZERO {
                wins += 1;
            }
            if entered {
                bonus_entries += 1;
                bonus_entry_rounds.push(round_idx);
            }
            win_x_values.push(round_win / bet);
        } else {
            let debit = if hype_flag {
                bet * (Decimal::ONE + config.hype_mode_cost_increase)
            } else {
                bet
            };
            let outcome = rgs_engine::spin(&state, config, &mut rng, bet, hype_flag, SpinMode::Normal);
            total_wagered += debit;
            total_won += outcome.total_win;
            if outcome.total_win > Decimal::ZERO {
                wins += 1;
            }
            if outcome
                .events
                .iter()
                .any(|e| matches!(e, SpinEvent::EnterFreeSpins { .. }))
            {
                bonus_entries += 1;
                bonus_entry_rounds.push(round_idx);
            }
            win_x_values.push(outcome.total_win_x);
            state = outcome.next_state;
        }
    }

    let rounds_f = rounds as f64;
    let rtp = if total_wagered > Decimal::ZERO {
        (total_won / total_wagered * Decimal::from(100)).to_f64().unwrap_or(0.0)
    } else {
        0.0
    };
    let win_rate = if rounds > 0 { wins as f64 / rounds_f * 100.0 } else { 0.0 };
    let bonus_entry_rate = if rounds > 0 {
        bonus_entries as f64 / rounds_f * 100.0
    } else {
        0.0
    };
    let avg_win_x = if !win_x_values.is_empty() {
        let sum: Decimal = win_x_values.iter().sum();
        (sum / Decimal::from(win_x_values.len() as i64)).to_f64().unwrap_or(0.0)
    } else {
        0.0
    };
    let mut sorted_win_x = win_x_values.clone();
    sorted_win_x.sort();
    let p95_win_x = sorted_win_x
        .get((sorted_win_x.len() as f64 * 0.95) as usize)
        .or_else(|| sorted_win_x.last())
        .copied()
        .unwrap_or(Decimal::ZERO)
        .to_f64()
        .unwrap_or(0.0);
    let p99_win_x = sorted_win_x
        .get((sorted_win_x.len() as f64 * 0.99) as usize)
        .or_else(|| sorted_win_x.last())
        .copied()
        .unwrap_or(Decimal::ZERO)
        .to_f64()
        .unwrap_or(0.0);

    let sbw = spins_between_wins(&win_x_values);
    let sbb = if matches!(mode, AuditMode::Buy) {
        Vec::new()
    } else {
        calculate_intervals(&bonus_entry_rounds, rounds as usize)
    };
    let drought_gt_300 = sbb.iter().filter(|i| **i > 300).count();
    let drought_gt_500 = sbb.iter().filter(|i| **i > 500).count();

    PacingReport {
        mode: mode.as_str().to_string(),
        rounds,
        rtp,
        win_rate,
        bonus_entry_rate,
        avg_win_x,
        p95_win_x,
        p99_win_x,
        spins_between_wins_p50: percentile_usize(&sbw, 50.0),
        spins_between_wins_p90: percentile_usize(&sbw, 90.0),
        spins_between_wins_p99: percentile_usize(&sbw, 99.0),
        spins_between_bonuses_p50: percentile_usize(&sbb, 50.0),
        spins_between_bonuses_p90: percentile_usize(&sbb, 90.0),
        spins_between_bonuses_p99: percentile_usize(&sbb, 99.0),
        bonus_drought_gt_300_rate: if sbb.is_empty() {
            0.0
        } else {
            drought_gt_300 as f64 / sbb.len() as f64 * 100.0
        },
        bonus_drought_gt_500_rate: if sbb.is_empty() {
            0.0
        } else {
            drought_gt_500 as f64 / sbb.len() as f64 * 100.0
        },
    }
}
