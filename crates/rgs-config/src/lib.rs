//! Immutable process configuration, loaded once from `APP_`-prefixed
//! environment variables, plus the audit-relevant `ConfigHash`.
use rgs_core::Money;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromStr;
use sha2::Digest;
use sha2::Sha256;
use std::env;

/// All tunables from the data model (§3), loaded once at process startup
/// and shared by reference from then on.
#[derive(Debug, Clone)]
pub struct Configuration {
    pub protocol_version: String,
    pub currency: String,

    pub max_win_total_x: i64,
    pub allowed_bets: Vec<Money>,

    pub enable_buy_feature: bool,
    pub buy_feature_cost_multiplier: i64,
    pub enable_turbo: bool,
    pub enable_hype_mode_ante_bet: bool,
    pub enable_afterparty_meter: bool,
    pub hype_mode_cost_increase: Decimal,
    pub hype_mode_bonus_chance_multiplier: Decimal,

    // Afterparty meter tunables
    pub meter_max: i32,
    pub rage_spins: i32,
    pub rage_multiplier: Decimal,
    pub meter_inc_on_any_win: i32,
    pub meter_inc_on_wild_present: i32,
    pub meter_inc_on_two_scatters: i32,
    pub rage_cooldown_spins: i32,

    // Event-trigger tunables
    pub boost_trigger_smallwins: i32,
    pub explosive_trigger_win_x: Decimal,
    pub boost_spins: i32,
    pub explosive_spins: i32,
    pub event_max_rate_per_100_spins: i32,
    pub boost_max_rate_per_100_spins: i32,
    pub explosive_max_rate_per_100_spins: i32,

    // Base-game modifier tunables
    pub spotlight_wilds_frequency: f64,

    // TTLs (seconds)
    pub player_state_ttl_seconds: u64,
    pub idempotency_ttl_seconds: u64,
    pub lock_ttl_seconds: u64,
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_or_decimal(key: &str, default: &str) -> Decimal {
    env::var(key)
        .ok()
        .and_then(|v| Decimal::from_str(&v).ok())
        .unwrap_or_else(|| Decimal::from_str(default).expect("valid default decimal"))
}

fn env_or_bets(key: &str, default: &[&str]) -> Vec<Money> {
    match env::var(key) {
        Ok(raw) => raw
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| Decimal::from_str(s.trim()).expect("valid bet amount in env var"))
            .collect(),
        Err(_) => default
            .iter()
            .map(|s| Decimal::from_str(s).expect("valid default bet"))
            .collect(),
    }
}

impl Configuration {
    /// Load configuration from `APP_`-prefixed environment variables,
    /// falling back to the defaults documented in the data model.
    pub fn from_env() -> Self {
        Self {
            protocol_version: env::var("APP_PROTOCOL_VERSION")
                .unwrap_or_else(|_| "1.0".to_string()),
            currency: env::var("APP_CURRENCY").unwrap_or_else(|_| "USD".to_string()),

            max_win_total_x: env_or("APP_MAX_WIN_TOTAL_X", 25_000),
            allowed_bets: env_or_bets(
                "APP_ALLOWED_BETS",
                &["0.10", "0.20", "0.50", "1.00", "2.00", "5.00", "10.00"],
            ),

            enable_buy_feature: env_or("APP_ENABLE_BUY_FEATURE", true),
            buy_feature_cost_multiplier: env_or("APP_BUY_FEATURE_COST_MULTIPLIER", 100),
            enable_turbo: env_or("APP_ENABLE_TURBO", true),
            enable_hype_mode_ante_bet: env_or("APP_ENABLE_HYPE_MODE_ANTE_BET", true),
            enable_afterparty_meter: env_or("APP_ENABLE_AFTERPARTY_METER", true),
            hype_mode_cost_increase: env_or_decimal("APP_HYPE_MODE_COST_INCREASE", "0.25"),
            hype_mode_bonus_chance_multiplier: env_or_decimal(
                "APP_HYPE_MODE_BONUS_CHANCE_MULTIPLIER",
                "1.75",
            ),

            meter_max: env_or("APP_METER_MAX", 100),
            rage_spins: env_or("APP_RAGE_SPINS", 10),
            rage_multiplier: env_or_decimal("APP_RAGE_MULTIPLIER", "3"),
            meter_inc_on_any_win: env_or("APP_METER_INC_ON_ANY_WIN", 5),
            meter_inc_on_wild_present: env_or("APP_METER_INC_ON_WILD_PRESENT", 3),
            meter_inc_on_two_scatters: env_or("APP_METER_INC_ON_TWO_SCATTERS", 10),
            rage_cooldown_spins: env_or("APP_RAGE_COOLDOWN_SPINS", 20),

            boost_trigger_smallwins: env_or("APP_BOOST_TRIGGER_SMALLWINS", 5),
            explosive_trigger_win_x: env_or_decimal("APP_EXPLOSIVE_TRIGGER_WIN_X", "20"),
            boost_spins: env_or("APP_BOOST_SPINS", 5),
            explosive_spins: env_or("APP_EXPLOSIVE_SPINS", 3),
            event_max_rate_per_100_spins: env_or("APP_EVENT_MAX_RATE_PER_100_SPINS", 15),
            boost_max_rate_per_100_spins: env_or("APP_BOOST_MAX_RATE_PER_100_SPINS", 10),
            explosive_max_rate_per_100_spins: env_or("APP_EXPLOSIVE_MAX_RATE_PER_100_SPINS", 8),

            spotlight_wilds_frequency: env_or("APP_SPOTLIGHT_WILDS_FREQUENCY", 0.03),

            player_state_ttl_seconds: env_or("APP_PLAYER_STATE_TTL_SECONDS", 86_400),
            idempotency_ttl_seconds: env_or("APP_IDEMPOTENCY_TTL_SECONDS", 3_600),
            lock_ttl_seconds: env_or("APP_LOCK_TTL_SECONDS", 30),
        }
    }

    /// Compute the 16-hex-character `ConfigHash`: the first 16 hex
    /// characters of the SHA-256 of the audit-relevant configuration
    /// subset, serialized with sorted keys and no whitespace.
    ///
    /// This MUST hash exactly `{max_win_total_x, allowed_bets,
    /// enable_buy_feature, enable_hype_mode_ante_bet}` per §6.
    pub fn config_hash(&self) -> String {
        // serde_json::Map sorts keys when the `preserve_order` feature is
        // off (the default), which is what gives us the canonical ordering.
        let mut snapshot = serde_json::Map::new();
        snapshot.insert(
            "max_win_total_x".to_string(),
            serde_json::Value::from(self.max_win_total_x),
        );
        snapshot.insert(
            "allowed_bets".to_string(),
            serde_json::Value::from(
                self.allowed_bets
                    .iter()
                    .map(|d| d.to_string())
                    .collect::<Vec<_>>(),
            ),
        );
        snapshot.insert(
            "enable_buy_feature".to_string(),
            serde_json::Value::from(self.enable_buy_feature),
        );
        snapshot.insert(
            "enable_hype_mode_ante_bet".to_string(),
            serde_json::Value::from(self.enable_hype_mode_ante_bet),
        );
        let canonical =
            serde_json::to_string(&serde_json::Value::Object(snapshot)).expect("serializable");
        let digest = Sha256::digest(canonical.as_bytes());
        hex::encode(digest)[..16].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_hash_is_deterministic() {
        let a = Configuration::from_env();
        let b = Configuration::from_env();
        assert_eq!(a.config_hash(), b.config_hash());
        assert_eq!(a.config_hash().len(), 16);
    }

    #[test]
    fn config_hash_changes_with_hashed_fields() {
        let mut a = Configuration::from_env();
        let base_hash = a.config_hash();
        a.max_win_total_x += 1;
        assert_ne!(a.config_hash(), base_hash);
    }

    #[test]
    fn config_hash_ignores_non_hashed_fields() {
        let mut a = Configuration::from_env();
        let base_hash = a.config_hash();
        a.lock_ttl_seconds += 1;
        a.meter_max += 1;
        assert_eq!(a.config_hash(), base_hash);
    }

    #[test]
    fn default_allowed_bets_match_spec() {
        let cfg = Configuration::from_env();
        assert_eq!(cfg.allowed_bets.len(), 7);
        assert_eq!(cfg.allowed_bets[0].to_string(), "0.10");
    }
}
