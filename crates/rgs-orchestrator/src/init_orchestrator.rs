use rgs_config::Configuration;
use rgs_core::Mode;
use rgs_dto::ConfigurationView;
use rgs_dto::InitResponse;
use rgs_dto::RestoreState;
use rgs_state::InMemoryStore;
use rgs_telemetry::InitServedEvent;
use rgs_telemetry::TelemetryService;
use std::sync::Arc;

/// The read-only `/init` path (§4.6).
pub struct InitOrchestrator {
    config: Arc<Configuration>,
    store: Arc<InMemoryStore>,
    telemetry: Arc<TelemetryService>,
}

impl InitOrchestrator {
    pub fn new(
        config: Arc<Configuration>,
        store: Arc<InMemoryStore>,
        telemetry: Arc<TelemetryService>,
    ) -> Self {
        Self {
            config,
            store,
            telemetry,
        }
    }

    pub fn init(&self, player_id: &str) -> InitResponse {
        let state = self.store.get_player_state(player_id);
        let restore = state
            .filter(|s| s.mode == Mode::FreeSpins && s.free_spins_remaining > 0)
            .map(|s| RestoreState {
                mode: s.mode,
                spins_remaining: s.free_spins_remaining,
                heat_level: s.heat_level,
            });

        self.telemetry.emit_init_served(&InitServedEvent {
            player_id: player_id.to_string(),
            restore_state_present: restore.is_some(),
            restore_mode: if restore.is_some() {
                "FREE_SPINS".to_string()
            } else {
                "NONE".to_string()
            },
            spins_remaining: restore.as_ref().map(|r| r.spins_remaining),
        });

        InitResponse {
            protocol_version: self.config.protocol_version.clone(),
            configuration: ConfigurationView {
                currency: self.config.currency.clone(),
                allowed_bets: self.config.allowed_bets.clone(),
                enable_buy_feature: self.config.enable_buy_feature,
                buy_feature_cost_multiplier: self.config.buy_feature_cost_multiplier,
                enable_turbo: self.config.enable_turbo,
                enable_hype_mode_ante_bet: self.config.enable_hype_mode_ante_bet,
                hype_mode_cost_increase: self.config.hype_mode_cost_increase,
            },
            restore_state: restore,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rgs_state::PlayerState;
    use std::time::Duration;

    fn orchestrator() -> (InitOrchestrator, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new(
            Duration::from_secs(3600),
            Duration::from_secs(30),
        ));
        let orchestrator = InitOrchestrator::new(
            Arc::new(Configuration::from_env()),
            store.clone(),
            Arc::new(TelemetryService::default()),
        );
        (orchestrator, store)
    }

    #[test]
    fn fresh_player_has_no_restore_state() {
        let (orchestrator, _store) = orchestrator();
        let response = orchestrator.init("player-1");
        assert!(response.restore_state.is_none());
    }

    #[test]
    fn player_mid_bonus_gets_exactly_three_restore_fields() {
        let (orchestrator, store) = orchestrator();
        store.save_player_state(
            "player-1",
            &PlayerState {
                mode: Mode::FreeSpins,
                free_spins_remaining: 7,
                heat_level: 3,
                ..PlayerState::default()
            },
            Duration::from_secs(60),
        );
        let response = orchestrator.init("player-1");
        let restore = response.restore_state.unwrap();
        assert_eq!(restore.spins_remaining, 7);
        assert_eq!(restore.heat_level, 3);
        assert_eq!(restore.mode, Mode::FreeSpins);
    }

    #[test]
    fn zero_remaining_free_spins_is_not_a_restore_state() {
        let (orchestrator, store) = orchestrator();
        store.save_player_state(
            "player-1",
            &PlayerState {
                mode: Mode::FreeSpins,
                free_spins_remaining: 0,
                ..PlayerState::default()
            },
            Duration::from_secs(60),
        );
        let response = orchestrator.init("player-1");
        assert!(response.restore_state.is_none());
    }
}
