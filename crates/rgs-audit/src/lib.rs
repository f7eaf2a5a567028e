//! The headless batch driver and its companion analyses (§4.9): the audit
//! simulator, plus diff, tail-progression, pacing and seed-hunt, grounded on
//! `scripts/audit_sim.py`, `scripts/diff_audit.py`,
//! `scripts/tail_progression.py`, `scripts/pacing_report.py` and
//! `scripts/seed_hunt.py` from the original service.
mod diff;
mod pacing;
mod seed_hunt;
mod sim;
mod tail_progression;

pub use diff::DEFAULT_TOLERANCE_BONUS_RATE;
pub use diff::DEFAULT_TOLERANCE_HIT_FREQ;
pub use diff::DEFAULT_TOLERANCE_QUANTILES;
pub use diff::DEFAULT_TOLERANCE_RTP;
pub use diff::DEFAULT_TOLERANCE_TAIL_RATE;
pub use diff::DiffReport;
pub use diff::diff_rows;
pub use pacing::PacingReport;
pub use pacing::run_pacing_report;
pub use seed_hunt::SeedHuntReport;
pub use seed_hunt::SeedHuntTarget;
pub use seed_hunt::SeedHuntResult;
pub use seed_hunt::hunt_seeds;
pub use sim::AuditMode;
pub use sim::AuditRow;
pub use sim::SimulationStats;
pub use sim::git_commit;
pub use sim::read_csv_row;
pub use sim::run_simulation;
pub use sim::timestamp_iso;
pub use sim::write_csv;
pub use tail_progression::DEFAULT_TOLERANCE_MAX_WIN_X;
pub use tail_progression::DEFAULT_TOLERANCE_RATE_10000X_PLUS;
pub use tail_progression::DEFAULT_TOLERANCE_RATE_1000X_PLUS;
pub use tail_progression::TailProgressionReport;
pub use tail_progression::check_tail_progression;
