use crate::event::SpinEvent;
pub use rgs_core::Mode as GameMode;
use rgs_core::Money;
use rgs_core::WinMultiple;
use serde::Deserialize;
use serde::Serialize;

/// Client-requested entry path for a spin (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpinMode {
    #[serde(rename = "NORMAL")]
    Normal,
    #[serde(rename = "BUY_FEATURE")]
    BuyFeature,
}

/// `POST /spin` request body.
#[derive(Debug, Clone, Deserialize)]
pub struct SpinRequest {
    #[serde(rename = "clientRequestId")]
    pub client_request_id: String,
    #[serde(rename = "betAmount")]
    pub bet_amount: Money,
    pub mode: SpinMode,
    #[serde(rename = "hypeMode")]
    pub hype_mode: bool,
}

/// `nextState` block in the spin success response / `restoreState` in init.
#[derive(Debug, Clone, Serialize)]
pub struct NextState {
    pub mode: GameMode,
    #[serde(rename = "spinsRemaining")]
    pub spins_remaining: i32,
    #[serde(rename = "heatLevel")]
    pub heat_level: i32,
}

/// `restoreState` block — exactly these three fields, nothing more, per §4.6.
#[derive(Debug, Clone, Serialize)]
pub struct RestoreState {
    pub mode: GameMode,
    #[serde(rename = "spinsRemaining")]
    pub spins_remaining: i32,
    #[serde(rename = "heatLevel")]
    pub heat_level: i32,
}

/// Reason a win was clamped to `maxWinTotalX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CapReason {
    #[serde(rename = "max_win_base")]
    MaxWinBase,
    #[serde(rename = "max_win_bonus")]
    MaxWinBonus,
    #[serde(rename = "max_exposure")]
    MaxExposure,
}

#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    #[serde(rename = "totalWin")]
    pub total_win: Money,
    #[serde(rename = "totalWinX")]
    pub total_win_x: WinMultiple,
    #[serde(rename = "isCapped")]
    pub is_capped: bool,
    #[serde(rename = "capReason")]
    pub cap_reason: Option<CapReason>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Context {
    pub currency: String,
}

/// `POST /spin` success response.
#[derive(Debug, Clone, Serialize)]
pub struct SpinResponse {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    #[serde(rename = "roundId")]
    pub round_id: String,
    pub context: Context,
    pub outcome: Outcome,
    pub events: Vec<SpinEvent>,
    #[serde(rename = "nextState")]
    pub next_state: NextState,
}

/// Public configuration block returned by `GET /init`.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigurationView {
    pub currency: String,
    #[serde(rename = "allowedBets")]
    pub allowed_bets: Vec<Money>,
    #[serde(rename = "enableBuyFeature")]
    pub enable_buy_feature: bool,
    #[serde(rename = "buyFeatureCostMultiplier")]
    pub buy_feature_cost_multiplier: i64,
    #[serde(rename = "enableTurbo")]
    pub enable_turbo: bool,
    #[serde(rename = "enableHypeModeAnteBet")]
    pub enable_hype_mode_ante_bet: bool,
    #[serde(rename = "hypeModeCostIncrease")]
    pub hype_mode_cost_increase: rust_decimal::Decimal,
}

/// `GET /init` response.
#[derive(Debug, Clone, Serialize)]
pub struct InitResponse {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    pub configuration: ConfigurationView,
    #[serde(rename = "restoreState")]
    pub restore_state: Option<RestoreState>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spin_mode_round_trips_through_json() {
        let json = serde_json::to_value(SpinMode::BuyFeature).unwrap();
        assert_eq!(json, "BUY_FEATURE");
        let back: SpinMode = serde_json::from_value(json).unwrap();
        assert_eq!(back, SpinMode::BuyFeature);
    }

    #[test]
    fn spin_request_deserializes_from_camel_case() {
        let body = serde_json::json!({
            "clientRequestId": "abc-123",
            "betAmount": "1.00",
            "mode": "NORMAL",
            "hypeMode": false
        });
        let req: SpinRequest = serde_json::from_value(body).unwrap();
        assert_eq!(req.client_request_id, "abc-123");
        assert_eq!(req.mode, SpinMode::Normal);
        assert!(!req.hype_mode);
    }

    #[test]
    fn init_response_omits_restore_state_when_none() {
        let resp = InitResponse {
            protocol_version: "1.0".to_string(),
            configuration: ConfigurationView {
                currency: "USD".to_string(),
                allowed_bets: vec![],
                enable_buy_feature: true,
                buy_feature_cost_multiplier: 100,
                enable_turbo: true,
                enable_hype_mode_ante_bet: true,
                hype_mode_cost_increase: rust_decimal::Decimal::new(25, 2),
            },
            restore_state: None,
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json["restoreState"].is_null());
    }
}
