use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// The ten slot symbols, ordered from wild through low-pay. The integer
/// value is exactly what appears in the `reveal` grid on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Symbol {
    Wild = 0,
    Scatter = 1,
    High1 = 2,
    High2 = 3,
    High3 = 4,
    Mid1 = 5,
    Mid2 = 6,
    Low1 = 7,
    Low2 = 8,
    Low3 = 9,
}

pub const ALL_SYMBOLS: [Symbol; 10] = [
    Symbol::Wild,
    Symbol::Scatter,
    Symbol::High1,
    Symbol::High2,
    Symbol::High3,
    Symbol::Mid1,
    Symbol::Mid2,
    Symbol::Low1,
    Symbol::Low2,
    Symbol::Low3,
];

impl Symbol {
    pub fn from_i32(v: i32) -> Self {
        ALL_SYMBOLS[v as usize]
    }

    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

/// Base per-cell symbol weights (sum to 1.0). Calibrated so the base
/// scatter rate yields a natural free-spins entry rate in the low single
/// digits per hundred spins.
pub const BASE_WEIGHTS: [f64; 10] = [
    0.03, // WILD
    0.03, // SCATTER
    0.07, // HIGH1
    0.09, // HIGH2
    0.11, // HIGH3
    0.13, // MID1
    0.15, // MID2
    0.13, // LOW1
    0.13, // LOW2
    0.13, // LOW3
];

/// Per-cell weights with the SCATTER slot scaled by
/// `hypeModeBonusChanceMultiplier` and every other weight rescaled
/// proportionally so the distribution still sums to 1 (§4.3 step 2).
pub fn hype_adjusted_weights(hype_multiplier: f64) -> [f64; 10] {
    let mut weights = BASE_WEIGHTS;
    let scatter_idx = Symbol::Scatter as usize;
    let base_scatter = BASE_WEIGHTS[scatter_idx];
    let new_scatter = (base_scatter * hype_multiplier).min(1.0);
    let other_mass_before: f64 = 1.0 - base_scatter;
    let other_mass_after = 1.0 - new_scatter;
    let scale = if other_mass_before > 0.0 {
        other_mass_after / other_mass_before
    } else {
        0.0
    };
    for (i, w) in weights.iter_mut().enumerate() {
        if i == scatter_idx {
            *w = new_scatter;
        } else {
            *w *= scale;
        }
    }
    weights
}

/// Pay multiplier for `symbol` at `run_length` (3, 4 or 5), in units of
/// the base bet. `WILD` pays at the top tier when a run is entirely wild.
pub fn line_multiplier(symbol: Symbol, run_length: usize) -> Decimal {
    let table: [Decimal; 3] = match symbol {
        Symbol::Wild | Symbol::High3 => [dec!(5), dec!(20), dec!(50)],
        Symbol::High2 => [dec!(3), dec!(12), dec!(30)],
        Symbol::High1 => [dec!(2), dec!(8), dec!(20)],
        Symbol::Mid2 => [dec!(1), dec!(4), dec!(10)],
        Symbol::Mid1 => [dec!(0.8), dec!(3), dec!(8)],
        Symbol::Low3 => [dec!(0.5), dec!(2), dec!(5)],
        Symbol::Low2 => [dec!(0.4), dec!(1.5), dec!(4)],
        Symbol::Low1 => [dec!(0.3), dec!(1), dec!(3)],
        Symbol::Scatter => return Decimal::ZERO,
    };
    match run_length {
        3 => table[0],
        4 => table[1],
        5 => table[2],
        _ => Decimal::ZERO,
    }
}

/// Scatter pay (in units of base bet) for a scatter count of 3, 4 or 5.
pub fn scatter_pay(scatter_count: usize) -> Decimal {
    match scatter_count {
        3 => dec!(2),
        4 => dec!(10),
        5 => dec!(50),
        _ => Decimal::ZERO,
    }
}

/// Ten fixed paylines, each a row index per reel (5 entries).
pub const PAYLINES: [[usize; 5]; 10] = [
    [1, 1, 1, 1, 1],
    [0, 0, 0, 0, 0],
    [2, 2, 2, 2, 2],
    [0, 1, 2, 1, 0],
    [2, 1, 0, 1, 2],
    [0, 0, 1, 2, 2],
    [2, 2, 1, 0, 0],
    [1, 0, 0, 0, 1],
    [1, 2, 2, 2, 1],
    [0, 1, 0, 1, 0],
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_weights_sum_to_one() {
        let sum: f64 = BASE_WEIGHTS.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn hype_adjusted_weights_still_sum_to_one() {
        let weights = hype_adjusted_weights(1.75);
        let sum: f64 = weights.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn hype_multiplier_strictly_increases_scatter_weight() {
        let base = hype_adjusted_weights(1.0);
        let hyped = hype_adjusted_weights(1.75);
        assert!(hyped[Symbol::Scatter as usize] > base[Symbol::Scatter as usize]);
    }

    #[test]
    fn payline_count_matches_spec() {
        assert_eq!(PAYLINES.len(), rgs_core::PAYLINE_COUNT);
    }
}
