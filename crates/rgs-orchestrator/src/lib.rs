//! Composes configuration, RNG, the spin engine, the state store and
//! telemetry into the two orchestrators the HTTP layer calls: `/spin`
//! (write path, crash-safe ordering) and `/init` (read-only restore).
mod init_orchestrator;
mod spin_orchestrator;

pub use init_orchestrator::InitOrchestrator;
pub use spin_orchestrator::SpinOrchestrator;
