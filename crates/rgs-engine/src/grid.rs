use crate::symbols::Symbol;
use rgs_core::CELL_COUNT;
use rgs_core::REEL_COUNT;
use rgs_core::ROWS;
use rgs_rng::Rng;

fn sample_symbol(rng: &mut dyn Rng, weights: &[f64; 10]) -> Symbol {
    let draw = rng.uniform();
    let mut cumulative = 0.0;
    for (i, w) in weights.iter().enumerate() {
        cumulative += w;
        if draw < cumulative {
            return Symbol::from_i32(i as i32);
        }
    }
    // Floating-point rounding can leave `draw` just past the last boundary.
    Symbol::from_i32(9)
}

/// Generates the 5x3 grid, `grid[reel][row]`, one draw per cell from
/// `weights` (§4.3 step 2).
pub fn generate_grid(rng: &mut dyn Rng, weights: &[f64; 10]) -> Vec<Vec<i32>> {
    (0..REEL_COUNT)
        .map(|_| (0..ROWS).map(|_| sample_symbol(rng, weights).as_i32()).collect())
        .collect()
}

/// Converts `k` distinct random cells to WILD, where `k` is drawn
/// uniformly from `[1,3]` (§4.3 step 3). Returns the flat cell indices
/// touched, in draw order.
pub fn apply_spotlight_wilds(grid: &mut [Vec<i32>], rng: &mut dyn Rng) -> Vec<usize> {
    let k = rng.int_inclusive(1, 3) as usize;
    let mut touched = Vec::with_capacity(k);
    while touched.len() < k && touched.len() < CELL_COUNT {
        let cell = rng.int_inclusive(0, CELL_COUNT as i64 - 1) as usize;
        if touched.contains(&cell) {
            continue;
        }
        touched.push(cell);
        let reel = cell / ROWS;
        let row = cell % ROWS;
        grid[reel][row] = Symbol::Wild.as_i32();
    }
    touched
}

/// Counts occurrences of `target` across the whole grid.
pub fn count_symbol(grid: &[Vec<i32>], target: Symbol) -> usize {
    grid.iter()
        .flatten()
        .filter(|&&cell| cell == target.as_i32())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rgs_rng::SeededRng;

    #[test]
    fn generated_grid_has_correct_shape() {
        let mut rng = SeededRng::new(1);
        let grid = generate_grid(&mut rng, &crate::symbols::BASE_WEIGHTS);
        assert_eq!(grid.len(), REEL_COUNT);
        assert!(grid.iter().all(|reel| reel.len() == ROWS));
    }

    #[test]
    fn spotlight_wilds_touches_between_one_and_three_cells() {
        let mut rng = SeededRng::new(2);
        let mut grid = generate_grid(&mut rng, &crate::symbols::BASE_WEIGHTS);
        let touched = apply_spotlight_wilds(&mut grid, &mut rng);
        assert!(!touched.is_empty() && touched.len() <= 3);
        for &cell in &touched {
            let reel = cell / ROWS;
            let row = cell % ROWS;
            assert_eq!(grid[reel][row], Symbol::Wild.as_i32());
        }
    }

    #[test]
    fn spotlight_wilds_touches_distinct_cells() {
        let mut rng = SeededRng::new(3);
        let mut grid = generate_grid(&mut rng, &crate::symbols::BASE_WEIGHTS);
        let touched = apply_spotlight_wilds(&mut grid, &mut rng);
        let unique: std::collections::HashSet<_> = touched.iter().collect();
        assert_eq!(unique.len(), touched.len());
    }
}
