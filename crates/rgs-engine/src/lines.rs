use crate::symbols::PAYLINES;
use crate::symbols::Symbol;
use crate::symbols::line_multiplier;
use crate::symbols::scatter_pay;
use rgs_core::MIN_RUN_LENGTH;
use rust_decimal::Decimal;

/// One awarded line, ready to become a `winLine` event.
pub struct LineWin {
    pub line_id: i32,
    pub amount: Decimal,
}

/// The longest left-anchored run on a single line: WILD substitutes
/// freely for any symbol, SCATTER always breaks the run. Returns the
/// paying symbol (WILD itself if the run is entirely wild) and the run
/// length, or `None` if the run never forms (reel 0 is SCATTER).
fn longest_run(line_symbols: [i32; 5]) -> Option<(Symbol, usize)> {
    let mut base: Option<Symbol> = None;
    let mut count = 0usize;
    for raw in line_symbols {
        let symbol = Symbol::from_i32(raw);
        match symbol {
            Symbol::Scatter => break,
            Symbol::Wild => count += 1,
            other => match base {
                None => {
                    base = Some(other);
                    count += 1;
                }
                Some(b) if b == other => count += 1,
                Some(_) => break,
            },
        }
    }
    if count == 0 {
        None
    } else {
        Some((base.unwrap_or(Symbol::Wild), count))
    }
}

/// Evaluates all ten fixed paylines plus the scatter-pay line, returning
/// each winning line and the total base win in units of `bet` (§4.3
/// step 5). `grid` is `grid[reel][row]`.
pub fn evaluate_paylines(grid: &[Vec<i32>], bet: Decimal, scatter_count: usize) -> (Vec<LineWin>, Decimal) {
    let mut wins = Vec::new();
    let mut total = Decimal::ZERO;

    for (line_id, line) in PAYLINES.iter().enumerate() {
        let cells: [i32; 5] = std::array::from_fn(|reel| grid[reel][line[reel]]);
        if let Some((symbol, run_length)) = longest_run(cells) {
            if run_length >= MIN_RUN_LENGTH {
                let amount = bet * line_multiplier(symbol, run_length);
                if amount > Decimal::ZERO {
                    total += amount;
                    wins.push(LineWin {
                        line_id: line_id as i32,
                        amount,
                    });
                }
            }
        }
    }

    if matches!(scatter_count, 3 | 4 | 5) {
        let amount = bet * scatter_pay(scatter_count);
        total += amount;
        wins.push(LineWin {
            line_id: -1,
            amount,
        });
    }

    (wins, total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_high3_line_pays_top_tier() {
        let high3 = Symbol::High3.as_i32();
        let grid: Vec<Vec<i32>> = (0..5).map(|_| vec![high3; 3]).collect();
        let (wins, total) = evaluate_paylines(&grid, Decimal::ONE, 0);
        assert_eq!(wins.len(), PAYLINES.len());
        assert_eq!(total, Decimal::from(5) * Decimal::from(10));
    }

    #[test]
    fn scatter_breaks_the_run() {
        let mut grid: Vec<Vec<i32>> = (0..5).map(|_| vec![Symbol::Low1.as_i32(); 3]).collect();
        grid[1][1] = Symbol::Scatter.as_i32();
        let (wins, _total) = evaluate_paylines(&grid, Decimal::ONE, 0);
        // Line 0 is the middle row [1,1,1,1,1]; scatter at reel 1 breaks it
        // to a run of length 1, below MIN_RUN_LENGTH.
        assert!(wins.iter().all(|w| w.line_id != 0));
    }

    #[test]
    fn three_scatters_award_scatter_pay_on_line_id_negative_one() {
        let grid: Vec<Vec<i32>> = (0..5).map(|_| vec![Symbol::Low1.as_i32(); 3]).collect();
        let (wins, _total) = evaluate_paylines(&grid, Decimal::ONE, 3);
        assert!(wins.iter().any(|w| w.line_id == -1));
    }

    #[test]
    fn all_wild_run_pays_top_tier() {
        let wild = Symbol::Wild.as_i32();
        let grid: Vec<Vec<i32>> = (0..5).map(|_| vec![wild; 3]).collect();
        let (wins, _total) = evaluate_paylines(&grid, Decimal::ONE, 0);
        let middle = wins.iter().find(|w| w.line_id == 0).unwrap();
        assert_eq!(middle.amount, Decimal::from(50));
    }
}
