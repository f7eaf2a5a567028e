use crate::sim::AuditRow;

pub const DEFAULT_TOLERANCE_RATE_1000X_PLUS: f64 = 0.2;
pub const DEFAULT_TOLERANCE_RATE_10000X_PLUS: f64 = 0.01;
pub const DEFAULT_TOLERANCE_MAX_WIN_X: f64 = 100.0;

#[derive(Debug, Clone)]
pub struct TailCheck {
    pub field: String,
    pub run_value: f64,
    pub baseline_value: f64,
    pub tolerance: f64,
    pub passed: bool,
}

#[derive(Debug, Clone)]
pub struct TailProgressionReport {
    pub passed: bool,
    pub checks: Vec<TailCheck>,
}

/// Checks `run` for regression against `baseline` on the three rare-event
/// fields. Grounded on `tail_progression.py::check_tail_regression`:
/// regression means `run < baseline - tolerance` (the tail got worse —
/// fewer big wins), with a baseline-is-zero field passing trivially when
/// the run also observed zero.
pub fn check_tail_progression(run: &AuditRow, baseline: &AuditRow) -> TailProgressionReport {
    let fields: [(&str, f64, f64, f64); 3] = [
        (
            "rate_1000x_plus",
            run.rate_1000x_plus,
            baseline.rate_1000x_plus,
            DEFAULT_TOLERANCE_RATE_1000X_PLUS,
        ),
        (
            "rate_10000x_plus",
            run.rate_10000x_plus,
            baseline.rate_10000x_plus,
            DEFAULT_TOLERANCE_RATE_10000X_PLUS,
        ),
        (
            "max_win_x",
            run.max_win_x,
            baseline.max_win_x,
            DEFAULT_TOLERANCE_MAX_WIN_X,
        ),
    ];

    let mut checks = Vec::with_capacity(fields.len());
    let mut all_passed = true;
    for (field, run_value, baseline_value, tolerance) in fields {
        let passed = if baseline_value == 0.0 && run_value == 0.0 {
            true
        } else {
            run_value >= baseline_value - tolerance
        };
        all_passed &= passed;
        checks.push(TailCheck {
            field: field.to_string(),
            run_value,
            baseline_value,
            tolerance,
            passed,
        });
    }

    TailProgressionReport {
        passed: all_passed,
        checks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::AuditMode;
    use crate::sim::run_simulation;
    use rgs_config::Configuration;

    #[test]
    fn identical_rerun_against_itself_always_passes() {
        let config = Configuration::from_env();
        let stats = run_simulation(AuditMode::Buy, 300, "TAIL_TEST", &config);
        let row = AuditRow::from_stats(AuditMode::Buy, 300, "TAIL_TEST", &stats, &config);
        let report = check_tail_progression(&row, &row);
        assert!(report.passed);
    }

    #[test]
    fn a_large_drop_in_max_win_x_is_flagged() {
        let config = Configuration::from_env();
        let stats = run_simulation(AuditMode::Buy, 300, "TAIL_TEST2", &config);
        let mut run = AuditRow::from_stats(AuditMode::Buy, 300, "TAIL_TEST2", &stats, &config);
        let mut baseline = run.clone();
        baseline.max_win_x = run.max_win_x + 10_000.0;
        run.max_win_x = 0.0;
        let report = check_tail_progression(&run, &baseline);
        assert!(!report.passed);
        assert!(
            report
                .checks
                .iter()
                .any(|c| c.field == "max_win_x" && !c.passed)
        );
    }

    #[test]
    fn zero_baseline_and_zero_run_is_not_a_regression() {
        let config = Configuration::from_env();
        let stats = run_simulation(AuditMode::Base, 50, "TAIL_ZERO", &config);
        let mut row = AuditRow::from_stats(AuditMode::Base, 50, "TAIL_ZERO", &stats, &config);
        row.rate_10000x_plus = 0.0;
        let mut baseline = row.clone();
        baseline.rate_10000x_plus = 0.0;
        let report = check_tail_progression(&row, &baseline);
        assert!(
            report
                .checks
                .iter()
                .find(|c| c.field == "rate_10000x_plus")
                .unwrap()
                .passed
        );
    }
}
