use crate::sim::AuditMode;
use rgs_config::Configuration;
use rgs_core::Mode;
use rgs_dto::CapReason;
use rgs_dto::SpinEvent;
use rgs_dto::SpinMode;
use rgs_rng::SeededRng;
use rgs_state::PlayerState;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// What a hunted seed must satisfy. Grounded on `seed_hunt.py`'s
/// `--target {cap,high}` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedHuntTarget {
    /// Only seeds whose round was capped.
    Cap,
    /// Any seed whose round's `totalWinX` reaches the threshold.
    High,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeedHuntResult {
    pub seed: String,
    pub total_win_x: Decimal,
    pub is_capped: bool,
    pub cap_reason: Option<CapReason>,
    pub bonus_variant: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeedHuntReport {
    pub found: Vec<SeedHuntResult>,
    pub count_1000x_plus: usize,
    pub count_10000x_plus: usize,
    pub count_capped: usize,
    pub max_found_win_x: Decimal,
}

/// Runs one deterministic round under `seed_str` and `mode`, returning
/// its outcome. In buy mode this plays the whole bonus session, matching
/// `seed_hunt.py::run_single_round`.
fn run_single_round(mode: AuditMode, seed_str: &str, config: &Configuration) -> SeedHuntResult {
    let mut rng = SeededRng::from_seed_string(seed_str);
    let bet = dec!(1);

    if matches!(mode, AuditMode::Buy) {
        let mut state = PlayerState::default();
        let mut round_win = Decimal::ZERO;
        let mut is_capped = false;
        let mut cap_reason = None;
        let mut bonus_variant = "vip_buy".to_string();

        let outcome = rgs_engine::spin(&state, config, &mut rng, bet, false, SpinMode::BuyFeature);
        round_win += outcome.total_win;
        if outcome.is_capped {
            is_capped = true;
            cap_reason = outcome.cap_reason;
        }
        for event in &outcome.events {
            if let SpinEvent::EnterFreeSpins { bonus_variant: bv, .. } = event {
                bonus_variant = bv.clone();
            }
        }
        state = outcome.next_state;

        while state.mode == Mode::FreeSpins {
            let outcome = rgs_engine::spin(&state, config, &mut rng, bet, false, SpinMode::Normal);
            round_win += outcome.total_win;
            if outcome.is_capped {
                is_capped = true;
                cap_reason = outcome.cap_reason;
            }
            state = outcome.next_state;
        }

        SeedHuntResult {
            seed: seed_str.to_string(),
            total_win_x: round_win / bet,
            is_capped,
            cap_reason,
            bonus_variant,
        }
    } else {
        let hype_flag = matches!(mode, AuditMode::Hype);
        let state = PlayerState::default();
        let outcome = rgs_engine::spin(&state, config, &mut rng, bet, hype_flag, SpinMode::Normal);
        let mut bonus_variant = "standard".to_string();
        for event in &outcome.events {
            if let SpinEvent::EnterFreeSpins { bonus_variant: bv, .. } = event {
                bonus_variant = bv.clone();
            }
        }
        SeedHuntResult {
            seed: seed_str.to_string(),
            total_win_x: outcome.total_win_x,
            is_capped: outcome.is_capped,
            cap_reason: outcome.cap_reason,
            bonus_variant,
        }
    }
}

/// Searches `seed_prefix_000000`, `seed_prefix_000001`, ... up to
/// `max_seeds` deterministic seeds for rounds meeting `target`, used to
/// prove `maxWinTotalX` is reachable under the configured paytable (§8
/// property 1's cap-reachability regression). Grounded on
/// `seed_hunt.py::hunt_seeds`.
pub fn hunt_seeds(
    mode: AuditMode,
    min_win_x: Decimal,
    target: SeedHuntTarget,
    max_seeds: u32,
    seed_prefix: &str,
    config: &Configuration,
) -> SeedHuntReport {
    let mut found = Vec::new();
    for i in 0..max_seeds {
        let seed_str = format!("{seed_prefix}_{i:06}");
        let result = run_single_round(mode, &seed_str, config);
        let hits = match target {
            SeedHuntTarget::Cap => result.is_capped,
            SeedHuntTarget::High => result.total_win_x >= min_win_x,
        };
        if hits {
            found.push(result);
        }
    }

    found.sort_by(|a, b| b.total_win_x.cmp(&a.total_win_x));
    let count_1000x_plus = found.iter().filter(|r| r.total_win_x >= Decimal::from(1000)).count();
    let count_10000x_plus = found
        .iter()
        .filter(|r| r.total_win_x >= Decimal::from(10_000))
        .count();
    let count_capped = found.iter().filter(|r| r.is_capped).count();
    let max_found_win_x = found.first().map(|r| r.total_win_x).unwrap_or(Decimal::ZERO);

    SeedHuntReport {
        found,
        count_1000x_plus,
        count_10000x_plus,
        count_capped,
        max_found_win_x,
    }
}
