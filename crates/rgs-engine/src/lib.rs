//! The deterministic spin engine (§4.2, §4.3): a single pure function of
//! `(state, configuration, rng, bet, hypeFlag, spinMode)`. Given the same
//! inputs and the same RNG draw sequence it always produces the same
//! `SpinOutcome` — the property the audit simulator and every
//! reproducibility test depend on.
mod grid;
mod lines;
mod symbols;

pub use symbols::BASE_WEIGHTS;
pub use symbols::Symbol;
pub use symbols::hype_adjusted_weights;

use rgs_config::Configuration;
use rgs_core::FREE_SPINS_WIN_MULTIPLIER;
use rgs_core::HEAT_LEVEL_MAX;
use rgs_core::Mode;
use rgs_core::Money;
use rgs_core::WIN_TIER_BIG;
use rgs_core::WIN_TIER_EPIC;
use rgs_core::WIN_TIER_MEGA;
use rgs_core::WinMultiple;
use rgs_dto::CapReason;
use rgs_dto::SpinEvent;
use rgs_dto::SpinMode;
use rgs_rng::Rng;
use rgs_state::PlayerState;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Full result of one engine invocation. `events` is the final, ordered
/// sequence ready to ship on the wire.
pub struct SpinOutcome {
    pub grid: Vec<Vec<i32>>,
    pub base_win: Money,
    pub total_win: Money,
    pub total_win_x: WinMultiple,
    pub is_capped: bool,
    pub cap_reason: Option<CapReason>,
    pub events: Vec<SpinEvent>,
    pub next_state: PlayerState,
    pub win_tier: Option<&'static str>,
    pub scatter_count: usize,
    pub wild_count: usize,
    pub spotlight_positions: Vec<usize>,
}

fn win_tier_for(total_win_x: WinMultiple) -> Option<&'static str> {
    if total_win_x >= Decimal::from(WIN_TIER_EPIC) {
        Some("epic")
    } else if total_win_x >= Decimal::from(WIN_TIER_MEGA) {
        Some("mega")
    } else if total_win_x >= Decimal::from(WIN_TIER_BIG) {
        Some("big")
    } else {
        None
    }
}

/// Runs one spin to completion. `state` is the player's state entering
/// the request; the returned outcome's `next_state` is what the caller
/// must persist (or delete, if `next_state.mode == Mode::Base`).
pub fn spin(
    state: &PlayerState,
    config: &Configuration,
    rng: &mut dyn Rng,
    bet: Money,
    hype_flag: bool,
    spin_mode: SpinMode,
) -> SpinOutcome {
    let mut next = state.clone();
    let original_mode = state.mode;

    // Step 1: mode transition on buy-feature entry.
    let buy_feature_triggered = matches!(spin_mode, SpinMode::BuyFeature)
        && original_mode == Mode::Base
        && config.enable_buy_feature;
    if buy_feature_triggered {
        next.mode = Mode::FreeSpins;
        next.bonus_is_bought = true;
        next.free_spins_remaining = rgs_core::BUY_FEATURE_FREE_SPINS;
        next.rage_active = false;
        next.rage_spins_left = 0;
        next.afterparty_meter = 0;
    }

    // Step 2: grid generation, hype-adjusted scatter weighting.
    let weights = if hype_flag && config.enable_hype_mode_ante_bet {
        let multiplier = config
            .hype_mode_bonus_chance_multiplier
            .to_f64()
            .unwrap_or(1.0);
        symbols::hype_adjusted_weights(multiplier)
    } else {
        symbols::BASE_WEIGHTS
    };
    let mut grid_cells = grid::generate_grid(rng, &weights);
    let mut events = vec![SpinEvent::Reveal {
        grid: grid_cells.clone(),
    }];

    // Step 3: spotlight wilds.
    let mut spotlight_positions = Vec::new();
    if rng.uniform() < config.spotlight_wilds_frequency {
        spotlight_positions = grid::apply_spotlight_wilds(&mut grid_cells, rng);
        events.push(SpinEvent::SpotlightWilds {
            positions: spotlight_positions.clone(),
            count: spotlight_positions.len(),
        });
    }

    // Step 4: count specials on the post-spotlight grid.
    let scatter_count = grid::count_symbol(&grid_cells, Symbol::Scatter);
    let wild_count = grid::count_symbol(&grid_cells, Symbol::Wild);

    // Step 5: line evaluation.
    let (line_wins, base_win) = lines::evaluate_paylines(&grid_cells, bet, scatter_count);
    for win in &line_wins {
        let win_x = if bet.is_zero() { Decimal::ZERO } else { win.amount / bet };
        events.push(SpinEvent::WinLine {
            line_id: win.line_id,
            amount: win.amount,
            win_x,
        });
    }

    // Step 6: apply multipliers.
    let mut multiplier = Decimal::ONE;
    if next.mode == Mode::FreeSpins && next.bonus_is_bought {
        multiplier *= Decimal::from(FREE_SPINS_WIN_MULTIPLIER);
    }
    let rage_active_on_entry = state.rage_active && state.rage_spins_left > 0;
    if rage_active_on_entry {
        multiplier *= config.rage_multiplier;
    }
    let mut total_win = base_win * multiplier;
    let mut total_win_x = if bet.is_zero() {
        Decimal::ZERO
    } else {
        total_win / bet
    };

    // Step 7: cap enforcement.
    let mut is_capped = false;
    let mut cap_reason = None;
    let max_win_total_x = Decimal::from(config.max_win_total_x);
    if total_win_x > max_win_total_x {
        is_capped = true;
        cap_reason = Some(if next.mode == Mode::Base {
            CapReason::MaxWinBase
        } else {
            CapReason::MaxWinBonus
        });
        total_win_x = max_win_total_x;
        total_win = total_win_x * bet;
    }

    // Step 8: afterparty meter — only in BASE when rage was not already active.
    if next.mode == Mode::Base && !rage_active_on_entry {
        let mut meter = next.afterparty_meter;
        if total_win > Decimal::ZERO {
            meter += config.meter_inc_on_any_win;
        }
        if wild_count > 0 {
            meter += config.meter_inc_on_wild_present;
        }
        if scatter_count == 2 {
            meter += config.meter_inc_on_two_scatters;
        }
        meter = meter.min(config.meter_max);

        let mut rage_triggered_now = false;
        if meter >= config.meter_max && next.rage_cooldown_remaining == 0 {
            next.rage_active = true;
            next.rage_spins_left = config.rage_spins;
            meter = 0;
            rage_triggered_now = true;
        }
        next.afterparty_meter = meter;
        events.push(SpinEvent::AfterpartyMeterUpdate {
            level: meter,
            triggered: rage_triggered_now,
        });
        if rage_triggered_now {
            events.push(SpinEvent::EventStart {
                event_type: "afterpartyRage".to_string(),
                reason: "meter_max".to_string(),
                duration_spins: config.rage_spins,
            });
        }
    }

    // Step 9: streak counters (BASE only).
    if next.mode == Mode::Base {
        if total_win == Decimal::ZERO {
            next.deadspins_streak += 1;
            next.smallwins_streak = 0;
        } else if total_win_x <= Decimal::from(2) {
            next.smallwins_streak += 1;
            next.deadspins_streak = 0;
        } else {
            next.deadspins_streak = 0;
            next.smallwins_streak = 0;
        }
    }

    // Step 10: cooldown decrement.
    if next.rage_cooldown_remaining > 0 {
        next.rage_cooldown_remaining -= 1;
    }

    // Step 11: rage progression. The `EventEnd` itself is deferred past step
    // 12 so that any non-rage `EventStart` triggered by this same spin (e.g.
    // the rage multiplier inflating the win past `explosiveTriggerWinX`)
    // precedes it in the emitted sequence, per §3's event ordering.
    let mut rage_ended_now = false;
    if rage_active_on_entry {
        next.rage_spins_left -= 1;
        if next.rage_spins_left == 0 {
            next.rage_active = false;
            next.afterparty_meter = 0;
            next.rage_cooldown_remaining = config.rage_cooldown_spins;
            rage_ended_now = true;
        }
    }

    // Step 12: non-rage event triggers, subject to rolling-window rate caps.
    if next.mode == Mode::Base {
        if next.smallwins_streak >= config.boost_trigger_smallwins
            && next.events_in_window < config.event_max_rate_per_100_spins
            && next.boost_in_window < config.boost_max_rate_per_100_spins
        {
            events.push(SpinEvent::EventStart {
                event_type: "boost".to_string(),
                reason: "smallwins".to_string(),
                duration_spins: config.boost_spins,
            });
            next.smallwins_streak = 0;
            next.events_in_window += 1;
            next.boost_in_window += 1;
        }
        if total_win_x >= config.explosive_trigger_win_x
            && next.events_in_window < config.event_max_rate_per_100_spins
            && next.explosive_in_window < config.explosive_max_rate_per_100_spins
        {
            events.push(SpinEvent::EventStart {
                event_type: "explosive".to_string(),
                reason: "win_threshold".to_string(),
                duration_spins: config.explosive_spins,
            });
            next.events_in_window += 1;
            next.explosive_in_window += 1;
        }
        next.spins_in_window += 1;
        if next.spins_in_window >= rgs_core::EVENT_RATE_WINDOW {
            next.spins_in_window = 0;
            next.events_in_window = 0;
            next.boost_in_window = 0;
            next.explosive_in_window = 0;
        }
    }
    if rage_ended_now {
        events.push(SpinEvent::EventEnd {
            event_type: "afterpartyRage".to_string(),
        });
    }

    // Buy-feature entry events, deferred from step 1 so `reveal` stays first.
    if buy_feature_triggered {
        events.push(SpinEvent::EnterFreeSpins {
            reason: "buy_feature".to_string(),
            bonus_variant: "vip_buy".to_string(),
            count: rgs_core::BUY_FEATURE_FREE_SPINS,
        });
        next.heat_level = 1;
        events.push(SpinEvent::HeatUpdate { level: 1 });
    }

    // Step 13: natural free-spins trigger.
    if next.mode == Mode::Base && scatter_count >= 3 {
        let count = rgs_core::BUY_FEATURE_FREE_SPINS + 2 * (scatter_count as i32 - 3);
        next.mode = Mode::FreeSpins;
        next.free_spins_remaining = count;
        next.heat_level = 1;
        next.rage_active = false;
        next.rage_spins_left = 0;
        next.afterparty_meter = 0;
        events.push(SpinEvent::EnterFreeSpins {
            reason: "scatter".to_string(),
            bonus_variant: "standard".to_string(),
            count,
        });
        events.push(SpinEvent::HeatUpdate { level: 1 });
    }

    // Step 14: free-spins progression (only for a spin that started inside
    // an already-running bonus).
    if original_mode == Mode::FreeSpins {
        next.free_spins_remaining = (next.free_spins_remaining - 1).max(0);
        if total_win > Decimal::ZERO && next.heat_level < HEAT_LEVEL_MAX {
            next.heat_level += 1;
            events.push(SpinEvent::HeatUpdate {
                level: next.heat_level,
            });
        }
        if next.free_spins_remaining == 0 {
            let finale_path = if next.heat_level >= HEAT_LEVEL_MAX {
                "upgrade"
            } else if total_win_x >= Decimal::from(20) {
                "multiplier"
            } else {
                "standard"
            };
            let bonus_is_bought = next.bonus_is_bought;
            events.push(SpinEvent::BonusEnd {
                bonus_type: "freespins".to_string(),
                finale_path: finale_path.to_string(),
                total_win_x,
                bonus_variant: bonus_is_bought.then(|| "vip_buy".to_string()),
                bonus_multiplier_applied: bonus_is_bought.then_some(FREE_SPINS_WIN_MULTIPLIER),
                total_win_x_pre_multiplier: bonus_is_bought
                    .then(|| total_win_x / Decimal::from(FREE_SPINS_WIN_MULTIPLIER)),
            });
            next.mode = Mode::Base;
            next.heat_level = 0;
            next.bonus_is_bought = false;
            next.free_spins_remaining = 0;
            next.afterparty_meter = 0;
        }
    }

    // Step 15: win tier, always last.
    let win_tier = win_tier_for(total_win_x);
    if let Some(tier) = win_tier {
        events.push(SpinEvent::WinTier {
            tier: tier.to_string(),
            win_x: total_win_x,
        });
    }

    SpinOutcome {
        grid: grid_cells,
        base_win,
        total_win,
        total_win_x,
        is_capped,
        cap_reason,
        events,
        next_state: next,
        win_tier,
        scatter_count,
        wild_count,
        spotlight_positions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rgs_rng::SeededRng;

    fn config() -> Configuration {
        Configuration::from_env()
    }

    #[test]
    fn reveal_is_always_first_event() {
        let state = PlayerState::default();
        let mut rng = SeededRng::new(1);
        let outcome = spin(
            &state,
            &config(),
            &mut rng,
            Decimal::ONE,
            false,
            SpinMode::Normal,
        );
        assert!(matches!(outcome.events[0], SpinEvent::Reveal { .. }));
    }

    #[test]
    fn win_tier_is_always_last_when_present() {
        let state = PlayerState::default();
        let mut rng = SeededRng::new(1);
        let mut found_big_win = false;
        for seed in 0..500u32 {
            let mut rng_try = SeededRng::new(seed);
            let outcome = spin(
                &state,
                &config(),
                &mut rng_try,
                Decimal::ONE,
                false,
                SpinMode::Normal,
            );
            if outcome.win_tier.is_some() {
                assert!(matches!(outcome.events.last().unwrap(), SpinEvent::WinTier { .. }));
                found_big_win = true;
                break;
            }
        }
        let _ = &mut rng;
        assert!(found_big_win, "expected at least one big win across 500 seeded spins");
    }

    #[test]
    fn buy_feature_entry_sets_ten_free_spins_and_does_not_consume_one() {
        let state = PlayerState::default();
        let mut rng = SeededRng::new(7);
        let outcome = spin(
            &state,
            &config(),
            &mut rng,
            Decimal::ONE,
            false,
            SpinMode::BuyFeature,
        );
        assert_eq!(outcome.next_state.mode, Mode::FreeSpins);
        assert_eq!(outcome.next_state.free_spins_remaining, 10);
        assert!(outcome.next_state.bonus_is_bought);
        assert!(outcome.events.iter().any(|e| matches!(
            e,
            SpinEvent::EnterFreeSpins { reason, bonus_variant, count }
                if reason == "buy_feature" && bonus_variant == "vip_buy" && *count == 10
        )));
    }

    #[test]
    fn buy_feature_is_ignored_as_trigger_during_an_active_bonus() {
        let state = PlayerState {
            mode: Mode::FreeSpins,
            free_spins_remaining: 3,
            ..PlayerState::default()
        };
        let mut rng = SeededRng::new(9);
        let outcome = spin(
            &state,
            &config(),
            &mut rng,
            Decimal::ONE,
            false,
            SpinMode::BuyFeature,
        );
        assert!(!outcome.events.iter().any(|e| matches!(
            e,
            SpinEvent::EnterFreeSpins { reason, .. } if reason == "buy_feature"
        )));
    }

    #[test]
    fn cap_enforcement_clamps_total_win_x() {
        let mut cfg = config();
        cfg.max_win_total_x = 1;
        let state = PlayerState::default();
        let mut saw_a_cap = false;
        for seed in 0..500u32 {
            let mut rng = SeededRng::new(seed);
            let outcome = spin(&state, &cfg, &mut rng, Decimal::ONE, false, SpinMode::Normal);
            assert!(outcome.total_win_x <= Decimal::from(1));
            if outcome.is_capped {
                saw_a_cap = true;
                assert_eq!(outcome.cap_reason, Some(CapReason::MaxWinBase));
            }
        }
        assert!(saw_a_cap, "expected at least one capped spin across 500 seeds at max_win_total_x=1");
    }

    #[test]
    fn determinism_same_seed_same_outcome() {
        let state = PlayerState::default();
        let cfg = config();
        let mut rng_a = SeededRng::new(42);
        let mut rng_b = SeededRng::new(42);
        let a = spin(&state, &cfg, &mut rng_a, Decimal::ONE, false, SpinMode::Normal);
        let b = spin(&state, &cfg, &mut rng_b, Decimal::ONE, false, SpinMode::Normal);
        assert_eq!(a.grid, b.grid);
        assert_eq!(a.total_win, b.total_win);
        assert_eq!(a.events.len(), b.events.len());
    }

    #[test]
    fn rage_event_end_never_precedes_a_same_spin_event_start() {
        use rust_decimal_macros::dec;
        let mut cfg = config();
        cfg.explosive_trigger_win_x = dec!(0.01);
        let state = PlayerState {
            mode: Mode::Base,
            rage_active: true,
            rage_spins_left: 1,
            ..PlayerState::default()
        };
        let mut found = false;
        for seed in 0..2000u32 {
            let mut rng = SeededRng::new(seed);
            let outcome = spin(&state, &cfg, &mut rng, Decimal::ONE, false, SpinMode::Normal);
            let end_idx = outcome
                .events
                .iter()
                .position(|e| matches!(e, SpinEvent::EventEnd { event_type } if event_type == "afterpartyRage"));
            let Some(end_idx) = end_idx else { continue };
            let start_idx = outcome.events.iter().position(|e| {
                matches!(e, SpinEvent::EventStart { event_type, .. } if event_type == "explosive")
            });
            if let Some(start_idx) = start_idx {
                assert!(start_idx < end_idx, "explosive EventStart must precede the rage EventEnd");
                found = true;
                break;
            }
        }
        assert!(found, "expected at least one spin ending rage while also triggering explosive");
    }

    #[test]
    fn afterparty_meter_resets_on_bonus_entry_and_bonus_end() {
        let mut state = PlayerState {
            afterparty_meter: 77,
            ..PlayerState::default()
        };
        let mut rng = SeededRng::new(3);
        let outcome = spin(
            &state,
            &config(),
            &mut rng,
            Decimal::ONE,
            false,
            SpinMode::BuyFeature,
        );
        assert_eq!(outcome.next_state.afterparty_meter, 0);

        state = PlayerState {
            mode: Mode::FreeSpins,
            free_spins_remaining: 1,
            afterparty_meter: 50,
            ..PlayerState::default()
        };
        let mut rng = SeededRng::new(5);
        let outcome = spin(
            &state,
            &config(),
            &mut rng,
            Decimal::ONE,
            false,
            SpinMode::Normal,
        );
        assert_eq!(outcome.next_state.mode, Mode::Base);
        assert_eq!(outcome.next_state.afterparty_meter, 0);
    }

    #[test]
    fn free_spins_progression_decrements_and_ends_bonus() {
        let mut state = PlayerState {
            mode: Mode::FreeSpins,
            free_spins_remaining: 1,
            bonus_is_bought: true,
            ..PlayerState::default()
        };
        let mut rng = SeededRng::new(5);
        let outcome = spin(
            &state,
            &config(),
            &mut rng,
            Decimal::ONE,
            false,
            SpinMode::Normal,
        );
        assert_eq!(outcome.next_state.mode, Mode::Base);
        assert_eq!(outcome.next_state.free_spins_remaining, 0);
        assert!(outcome.events.iter().any(|e| matches!(e, SpinEvent::BonusEnd { .. })));
        state.free_spins_remaining = 0;
        let _ = state;
    }
}
