use rgs_core::WinMultiple;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::Serialize;

/// The ordered, closed set of spin events (§3, §4.3). Implementers MUST
/// NOT reorder events within a response; `reveal` is always first and
/// `winTier` (if present) is always last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SpinEvent {
    #[serde(rename = "reveal")]
    Reveal { grid: Vec<Vec<i32>> },

    #[serde(rename = "spotlightWilds")]
    SpotlightWilds { positions: Vec<usize>, count: usize },

    #[serde(rename = "winLine")]
    WinLine {
        #[serde(rename = "lineId")]
        line_id: i32,
        amount: Decimal,
        #[serde(rename = "winX")]
        win_x: WinMultiple,
    },

    #[serde(rename = "afterpartyMeterUpdate")]
    AfterpartyMeterUpdate { level: i32, triggered: bool },

    #[serde(rename = "eventStart")]
    EventStart {
        #[serde(rename = "eventType")]
        event_type: String,
        reason: String,
        #[serde(rename = "durationSpins")]
        duration_spins: i32,
    },

    #[serde(rename = "eventEnd")]
    EventEnd {
        #[serde(rename = "eventType")]
        event_type: String,
    },

    #[serde(rename = "enterFreeSpins")]
    EnterFreeSpins {
        reason: String,
        #[serde(rename = "bonusVariant")]
        bonus_variant: String,
        count: i32,
    },

    #[serde(rename = "heatUpdate")]
    HeatUpdate { level: i32 },

    #[serde(rename = "bonusEnd")]
    BonusEnd {
        #[serde(rename = "bonusType")]
        bonus_type: String,
        #[serde(rename = "finalePath")]
        finale_path: String,
        #[serde(rename = "totalWinX")]
        total_win_x: WinMultiple,
        #[serde(rename = "bonusVariant", skip_serializing_if = "Option::is_none")]
        bonus_variant: Option<String>,
        #[serde(
            rename = "bonusMultiplierApplied",
            skip_serializing_if = "Option::is_none"
        )]
        bonus_multiplier_applied: Option<i64>,
        #[serde(
            rename = "totalWinXPreMultiplier",
            skip_serializing_if = "Option::is_none"
        )]
        total_win_x_pre_multiplier: Option<WinMultiple>,
    },

    #[serde(rename = "winTier")]
    WinTier {
        tier: String,
        #[serde(rename = "winX")]
        win_x: WinMultiple,
    },
}

impl SpinEvent {
    /// The event's wire `type` discriminant, e.g. `"reveal"`.
    pub fn kind(&self) -> &'static str {
        match self {
            SpinEvent::Reveal { .. } => "reveal",
            SpinEvent::SpotlightWilds { .. } => "spotlightWilds",
            SpinEvent::WinLine { .. } => "winLine",
            SpinEvent::AfterpartyMeterUpdate { .. } => "afterpartyMeterUpdate",
            SpinEvent::EventStart { .. } => "eventStart",
            SpinEvent::EventEnd { .. } => "eventEnd",
            SpinEvent::EnterFreeSpins { .. } => "enterFreeSpins",
            SpinEvent::HeatUpdate { .. } => "heatUpdate",
            SpinEvent::BonusEnd { .. } => "bonusEnd",
            SpinEvent::WinTier { .. } => "winTier",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveal_serializes_with_type_tag() {
        let event = SpinEvent::Reveal {
            grid: vec![vec![0, 1, 2]],
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "reveal");
    }

    #[test]
    fn bonus_end_omits_absent_optional_fields() {
        let event = SpinEvent::BonusEnd {
            bonus_type: "freespins".to_string(),
            finale_path: "standard".to_string(),
            total_win_x: WinMultiple::from(5),
            bonus_variant: None,
            bonus_multiplier_applied: None,
            total_win_x_pre_multiplier: None,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert!(json.get("bonusVariant").is_none());
        assert!(json.get("bonusMultiplierApplied").is_none());
    }
}
