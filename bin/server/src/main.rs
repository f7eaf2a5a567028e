//! Remote game server binary.
//!
//! Runs on `BIND_ADDR` (e.g. `0.0.0.0:8080`).

#[tokio::main]
async fn main() {
    rgs_core::log();
    rgs_core::kys();
    rgs_server::run().await.unwrap();
}
