use crate::sim::AuditRow;

pub const DEFAULT_TOLERANCE_RTP: f64 = 0.02;
pub const DEFAULT_TOLERANCE_HIT_FREQ: f64 = 0.02;
pub const DEFAULT_TOLERANCE_BONUS_RATE: f64 = 0.0002;
pub const DEFAULT_TOLERANCE_TAIL_RATE: f64 = 0.0002;
pub const DEFAULT_TOLERANCE_QUANTILES: f64 = 0.01;

/// One flagged discrepancy between two audit runs. `critical` mirrors
/// `diff_audit.py`'s `CRITICAL:`-prefixed lines for fields that must
/// match exactly (config hash, mode, rounds, seed).
#[derive(Debug, Clone)]
pub struct Difference {
    pub field: String,
    pub critical: bool,
    pub a: String,
    pub b: String,
}

#[derive(Debug, Clone)]
pub struct DiffReport {
    pub identical: bool,
    pub differences: Vec<Difference>,
}

/// Compares two audit rows run with identical parameters, reporting any
/// discrepancy beyond the per-field tolerance. Grounded on
/// `diff_audit.py::compare_results`: critical fields (config hash, mode,
/// rounds, seed) must match exactly; numeric fields allow a small
/// tolerance to absorb floating-point summation order; the
/// `scatter_chance_*` fields require exact string-equivalent values
/// (`diff_audit.py::SCATTER_EXACT_FIELDS`).
pub fn diff_rows(a: &AuditRow, b: &AuditRow) -> DiffReport {
    let mut differences = Vec::new();

    let mut critical_check = |field: &str, av: String, bv: String| {
        if av != bv {
            differences.push(Difference {
                field: field.to_string(),
                critical: true,
                a: av,
                b: bv,
            });
        }
    };
    critical_check("config_hash", a.config_hash.clone(), b.config_hash.clone());
    critical_check("mode", a.mode.clone(), b.mode.clone());
    critical_check("rounds", a.rounds.to_string(), b.rounds.to_string());
    critical_check("seed", a.seed.clone(), b.seed.clone());

    let mut numeric_check = |field: &str, av: f64, bv: f64, tolerance: f64| {
        if (av - bv).abs() > tolerance {
            differences.push(Difference {
                field: field.to_string(),
                critical: false,
                a: format!("{av:.4}"),
                b: format!("{bv:.4}"),
            });
        }
    };
    numeric_check("rtp", a.rtp, b.rtp, DEFAULT_TOLERANCE_RTP);
    numeric_check("hit_freq", a.hit_freq, b.hit_freq, DEFAULT_TOLERANCE_HIT_FREQ);
    numeric_check(
        "bonus_entry_rate",
        a.bonus_entry_rate,
        b.bonus_entry_rate,
        DEFAULT_TOLERANCE_BONUS_RATE,
    );
    numeric_check("avg_debit", a.avg_debit, b.avg_debit, 0.0001);
    numeric_check("avg_credit", a.avg_credit, b.avg_credit, 0.0001);
    numeric_check(
        "p95_win_x",
        a.p95_win_x,
        b.p95_win_x,
        DEFAULT_TOLERANCE_QUANTILES,
    );
    numeric_check(
        "p99_win_x",
        a.p99_win_x,
        b.p99_win_x,
        DEFAULT_TOLERANCE_QUANTILES,
    );
    numeric_check(
        "max_win_x",
        a.max_win_x,
        b.max_win_x,
        DEFAULT_TOLERANCE_QUANTILES,
    );
    numeric_check(
        "rate_1000x_plus",
        a.rate_1000x_plus,
        b.rate_1000x_plus,
        DEFAULT_TOLERANCE_TAIL_RATE,
    );
    numeric_check(
        "rate_10000x_plus",
        a.rate_10000x_plus,
        b.rate_10000x_plus,
        DEFAULT_TOLERANCE_TAIL_RATE,
    );
    numeric_check(
        "capped_rate",
        a.capped_rate,
        b.capped_rate,
        DEFAULT_TOLERANCE_TAIL_RATE,
    );

    for field in ["scatter_chance_base", "scatter_chance_effective", "scatter_chance_multiplier"] {
        let (av, bv) = match field {
            "scatter_chance_base" => (a.scatter_chance_base, b.scatter_chance_base),
            "scatter_chance_effective" => (a.scatter_chance_effective, b.scatter_chance_effective),
            _ => (a.scatter_chance_multiplier, b.scatter_chance_multiplier),
        };
        if av.to_bits() != bv.to_bits() {
            differences.push(Difference {
                field: field.to_string(),
                critical: false,
                a: av.to_string(),
                b: bv.to_string(),
            });
        }
    }

    DiffReport {
        identical: differences.is_empty(),
        differences,
    }
}
