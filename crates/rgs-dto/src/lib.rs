//! Wire-level DTOs shared between the orchestrator and the HTTP layer:
//! the `/init` and `/spin` request/response shapes and the ordered
//! `SpinEvent` union.
mod event;
mod protocol;

pub use event::SpinEvent;
pub use protocol::CapReason;
pub use protocol::ConfigurationView;
pub use protocol::Context;
pub use protocol::GameMode;
pub use protocol::InitResponse;
pub use protocol::NextState;
pub use protocol::Outcome;
pub use protocol::RestoreState;
pub use protocol::SpinMode;
pub use protocol::SpinRequest;
pub use protocol::SpinResponse;
