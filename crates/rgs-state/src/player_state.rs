use rgs_core::Mode;
use serde::Deserialize;
use serde::Serialize;

/// Per-player state, keyed by player id (§3). Created on first spin that
/// enters `FREE_SPINS`, mutated by every subsequent spin, destroyed on
/// bonus end or transition back to `BASE`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub mode: Mode,
    pub free_spins_remaining: i32,
    pub heat_level: i32,
    pub bonus_is_bought: bool,
    pub bonus_continuation_count: i32,

    pub afterparty_meter: i32,
    pub rage_active: bool,
    pub rage_spins_left: i32,
    pub rage_cooldown_remaining: i32,

    pub deadspins_streak: i32,
    pub smallwins_streak: i32,

    pub spins_in_window: i32,
    pub events_in_window: i32,
    pub boost_in_window: i32,
    pub explosive_in_window: i32,
}

impl Default for PlayerState {
    /// The all-zero, `BASE`-mode state a brand new player starts from.
    fn default() -> Self {
        Self {
            mode: Mode::Base,
            free_spins_remaining: 0,
            heat_level: 0,
            bonus_is_bought: false,
            bonus_continuation_count: 0,
            afterparty_meter: 0,
            rage_active: false,
            rage_spins_left: 0,
            rage_cooldown_remaining: 0,
            deadspins_streak: 0,
            smallwins_streak: 0,
            spins_in_window: 0,
            events_in_window: 0,
            boost_in_window: 0,
            explosive_in_window: 0,
        }
    }
}

impl PlayerState {
    /// True when this spin is a continuation of an already-running bonus.
    pub fn is_bonus_continuation(&self) -> bool {
        self.mode == Mode::FreeSpins && self.free_spins_remaining > 0
    }

    /// Whether the invariants in §3 hold. Used defensively in tests; never
    /// called on the hot path since the engine is the only writer.
    pub fn invariants_hold(&self, meter_max: i32) -> bool {
        if self.mode == Mode::Base
            && (self.free_spins_remaining != 0 || self.heat_level != 0 || self.bonus_is_bought)
        {
            return false;
        }
        if self.rage_active && (self.rage_spins_left == 0 || self.mode != Mode::Base) {
            return false;
        }
        if self.afterparty_meter > meter_max || self.afterparty_meter < 0 {
            return false;
        }
        true
    }
}
