use rgs_config::Configuration;
use rgs_core::Mode;
use rgs_dto::CapReason;
use rgs_dto::Context;
use rgs_dto::NextState;
use rgs_dto::Outcome;
use rgs_dto::SpinMode;
use rgs_dto::SpinRequest;
use rgs_dto::SpinResponse;
use rgs_errors::ErrorCode;
use rgs_errors::GameError;
use rgs_rng::Rng;
use rgs_state::InMemoryStore;
use rgs_state::PlayerState;
use rgs_telemetry::SpinProcessedEvent;
use rgs_telemetry::SpinRejectedEvent;
use rgs_telemetry::TelemetryService;
use std::sync::Arc;
use std::time::Duration;

fn mode_wire_string(mode: SpinMode) -> &'static str {
    match mode {
        SpinMode::Normal => "NORMAL",
        SpinMode::BuyFeature => "BUY_FEATURE",
    }
}

fn telemetry_mode_label(request: &SpinRequest) -> &'static str {
    if matches!(request.mode, SpinMode::BuyFeature) {
        "buy"
    } else if request.hype_mode {
        "hype"
    } else {
        "base"
    }
}

fn idempotency_payload(request: &SpinRequest) -> serde_json::Value {
    serde_json::json!({
        "betAmount": request.bet_amount.to_string(),
        "mode": mode_wire_string(request.mode),
        "hypeMode": request.hype_mode,
    })
}

/// Composes configuration, the state store, the engine and telemetry
/// behind the write order that makes the system crash-safe (§4.5): the
/// idempotency record is always written before the state is written or
/// deleted.
pub struct SpinOrchestrator {
    config: Arc<Configuration>,
    store: Arc<InMemoryStore>,
    telemetry: Arc<TelemetryService>,
}

impl SpinOrchestrator {
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

    pub fn process_spin(
        &self,
        player_id: &str,
        request: &SpinRequest,
        rng: &mut dyn Rng,
    ) -> Result<SpinResponse, GameError> {
        if player_id.trim().is_empty() {
            return Err(GameError::new(
                ErrorCode::InvalidRequest,
                "a non-empty player id is required",
            ));
        }
        if !self.config.allowed_bets.contains(&request.bet_amount) {
            return Err(GameError::new(
                ErrorCode::InvalidBet,
                format!("{} is not an allowed bet", request.bet_amount),
            ));
        }
        if matches!(request.mode, SpinMode::BuyFeature) && !self.config.enable_buy_feature {
            return Err(GameError::new(
                ErrorCode::FeatureDisabled,
                "the buy feature is disabled",
            ));
        }
        if request.hype_mode && !self.config.enable_hype_mode_ante_bet {
            return Err(GameError::new(
                ErrorCode::FeatureDisabled,
                "hype mode is disabled",
            ));
        }

        let payload = idempotency_payload(request);

        // Fast path: outside the lock, no telemetry on a hit.
        if let Some(cached) = self
            .store
            .check_idempotency(&request.client_request_id, &payload)?
        {
            return Ok(decode_response(cached));
        }

        let (lock, metrics) = match self.store.acquire_player_lock(player_id) {
            Ok(v) => v,
            Err(err) => {
                self.telemetry.emit_spin_rejected(&SpinRejectedEvent {
                    player_id: player_id.to_string(),
                    client_request_id: Some(request.client_request_id.clone()),
                    reason: err.code.as_str().to_string(),
                    lock_acquire_ms: 0.0,
                    lock_wait_retries: 0,
                });
                return Err(err);
            }
        };

        // Slow path, under the lock: another in-flight request for the
        // same clientRequestId may have completed while we waited.
        if let Some(cached) = self
            .store
            .check_idempotency(&request.client_request_id, &payload)?
        {
            return Ok(decode_response(cached));
        }

        let state = self
            .store
            .get_player_state(player_id)
            .unwrap_or_default();
        let is_bonus_continuation = state.is_bonus_continuation();
        let new_bonus_continuation_count = if is_bonus_continuation {
            state.bonus_continuation_count + 1
        } else {
            0
        };

        let outcome = rgs_engine::spin(
            &state,
            &self.config,
            rng,
            request.bet_amount,
            request.hype_mode,
            request.mode,
        );
        let round_id = uuid::Uuid::new_v4().to_string();

        let mut next_state = PlayerState {
            bonus_continuation_count: new_bonus_continuation_count,
            ..outcome.next_state
        };

        let response = SpinResponse {
            protocol_version: self.config.protocol_version.clone(),
            round_id: round_id.clone(),
            context: Context {
                currency: self.config.currency.clone(),
            },
            outcome: Outcome {
                total_win: outcome.total_win,
                total_win_x: outcome.total_win_x,
                is_capped: outcome.is_capped,
                cap_reason: outcome.cap_reason,
            },
            events: outcome.events,
            next_state: NextState {
                mode: next_state.mode,
                spins_remaining: next_state.free_spins_remaining,
                heat_level: next_state.heat_level,
            },
        };

        let response_value = serde_json::to_value(&response).expect("response is serializable");
        // Mandatory order: idempotency record before the state write/delete.
        self.store
            .store_idempotency(&request.client_request_id, &payload, &response_value);

        if next_state.mode == Mode::Base || next_state.free_spins_remaining == 0 {
            next_state.bonus_continuation_count = 0;
            self.store.clear_player_state(player_id);
        } else {
            self.store.save_player_state(
                player_id,
                &next_state,
                Duration::from_secs(self.config.player_state_ttl_seconds),
            );
        }

        lock.release();

        let bonus_variant = response
            .events
            .iter()
            .find_map(|event| match event {
                rgs_dto::SpinEvent::EnterFreeSpins { bonus_variant, .. } => {
                    Some(bonus_variant.clone())
                }
                _ => None,
            });
        self.telemetry.emit_spin_processed(&SpinProcessedEvent {
            player_id: player_id.to_string(),
            client_request_id: request.client_request_id.clone(),
            lock_acquire_ms: metrics.acquire_ms,
            lock_wait_retries: metrics.wait_retries,
            is_bonus_continuation,
            bonus_continuation_count: new_bonus_continuation_count,
            config_hash: self.config.config_hash(),
            mode: telemetry_mode_label(request).to_string(),
            round_id,
            bonus_variant,
        });

        Ok(response)
    }
}

fn decode_response(cached: serde_json::Value) -> SpinResponse {
    serde_json::from_value(cached).expect("cached idempotency response is a valid SpinResponse")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rgs_rng::SeededRng;
    use rust_decimal_macros::dec;

    fn orchestrator() -> SpinOrchestrator {
        SpinOrchestrator::new(
            Arc::new(Configuration::from_env()),
            Arc::new(InMemoryStore::new(
                Duration::from_secs(3600),
                Duration::from_secs(30),
            )),
            Arc::new(TelemetryService::default()),
        )
    }

    fn request(client_request_id: &str) -> SpinRequest {
        SpinRequest {
            client_request_id: client_request_id.to_string(),
            bet_amount: dec!(1.00),
            mode: SpinMode::Normal,
            hype_mode: false,
        }
    }

    #[test]
    fn empty_player_id_is_rejected() {
        let orchestrator = orchestrator();
        let mut rng = SeededRng::new(1);
        let err = orchestrator
            .process_spin("", &request("req-1"), &mut rng)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }

    #[test]
    fn bet_not_in_allowed_list_is_rejected() {
        let orchestrator = orchestrator();
        let mut rng = SeededRng::new(1);
        let mut req = request("req-1");
        req.bet_amount = dec!(3.33);
        let err = orchestrator.process_spin("player-1", &req, &mut rng).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidBet);
    }

    #[test]
    fn replaying_the_same_request_returns_the_same_round_id() {
        let orchestrator = orchestrator();
        let mut rng_a = SeededRng::new(1);
        let req = request("req-1");
        let first = orchestrator.process_spin("player-1", &req, &mut rng_a).unwrap();

        let mut rng_b = SeededRng::new(999); // different RNG must not matter on replay
        let second = orchestrator.process_spin("player-1", &req, &mut rng_b).unwrap();
        assert_eq!(first.round_id, second.round_id);
    }

    #[test]
    fn same_request_id_with_different_payload_conflicts() {
        let orchestrator = orchestrator();
        let mut rng = SeededRng::new(1);
        let req_a = request("req-1");
        orchestrator.process_spin("player-1", &req_a, &mut rng).unwrap();

        let mut req_b = request("req-1");
        req_b.bet_amount = dec!(2.00);
        let err = orchestrator.process_spin("player-1", &req_b, &mut rng).unwrap_err();
        assert_eq!(err.code, ErrorCode::IdempotencyConflict);
    }

    #[test]
    fn buy_feature_rejected_when_disabled() {
        let mut config = Configuration::from_env();
        config.enable_buy_feature = false;
        let orchestrator = SpinOrchestrator::new(
            Arc::new(config),
            Arc::new(InMemoryStore::new(Duration::from_secs(3600), Duration::from_secs(30))),
            Arc::new(TelemetryService::default()),
        );
        let mut rng = SeededRng::new(1);
        let mut req = request("req-1");
        req.mode = SpinMode::BuyFeature;
        let err = orchestrator.process_spin("player-1", &req, &mut rng).unwrap_err();
        assert_eq!(err.code, ErrorCode::FeatureDisabled);
    }

    #[test]
    fn base_mode_outcome_clears_persisted_state() {
        let orchestrator = orchestrator();
        let mut rng = SeededRng::new(1);
        let response = orchestrator
            .process_spin("player-1", &request("req-1"), &mut rng)
            .unwrap();
        if response.next_state.mode == Mode::Base {
            assert_eq!(
                orchestrator
                    .store
                    .get_player_state("player-1"),
                None
            );
        }
    }
}
