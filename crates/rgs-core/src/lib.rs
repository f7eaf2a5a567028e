//! Core type aliases, identity types, and constants for the RGS workspace.
//!
//! This crate provides the foundational types shared by every other
//! `rgs-*` crate: money representation, player/round identity, and the
//! fixed game-shape constants that do not vary with configuration.
#![allow(dead_code)]

use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::hash::Hash;
use std::hash::Hasher;
use std::marker::PhantomData;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Monetary amounts: bets, wins, cost multiples. Always exact decimal.
pub type Money = rust_decimal::Decimal;
/// Win expressed as a multiple of the base bet (`totalWin / baseBet`).
pub type WinMultiple = rust_decimal::Decimal;
/// Row index within a reel (0..ROWS).
pub type Row = usize;
/// Reel index (0..REEL_COUNT).
pub type Reel = usize;
/// Flat cell index into the 5x3 grid, `reel * ROWS + row`.
pub type Cell = usize;
/// Player identifier as carried in the `X-Player-Id` header.
pub type PlayerId = String;

// ============================================================================
// TRAITS
// ============================================================================
/// Unique identifier trait for domain entities.
pub trait Unique<T = Self> {
    fn id(&self) -> ID<T>;
}

// ============================================================================
// IDENTITY TYPES
// ============================================================================
/// Generic ID wrapper providing compile-time type safety over `uuid::Uuid`.
pub struct ID<T> {
    inner: uuid::Uuid,
    marker: PhantomData<T>,
}

impl<T> ID<T> {
    pub fn inner(&self) -> uuid::Uuid {
        self.inner
    }
    /// Cast `ID<T>` to `ID<U>` while preserving the underlying UUID.
    pub fn cast<U>(self) -> ID<U> {
        ID {
            inner: self.inner,
            marker: PhantomData,
        }
    }
}

impl<T> From<ID<T>> for uuid::Uuid {
    fn from(id: ID<T>) -> Self {
        id.inner()
    }
}
impl<T> From<uuid::Uuid> for ID<T> {
    fn from(inner: uuid::Uuid) -> Self {
        Self {
            inner,
            marker: PhantomData,
        }
    }
}

impl<T> Default for ID<T> {
    fn default() -> Self {
        Self {
            inner: uuid::Uuid::now_v7(),
            marker: PhantomData,
        }
    }
}

impl<T> Copy for ID<T> {}
impl<T> Clone for ID<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Eq for ID<T> {}
impl<T> PartialEq for ID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T> Ord for ID<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<T> PartialOrd for ID<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Hash for ID<T> {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        self.inner.hash(state);
    }
}

impl<T> Debug for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ID").field(&self.inner).finish()
    }
}
impl<T> Display for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.inner, f)
    }
}

/// Marker type for `ID<Round>` — a server-allocated opaque round identifier.
#[derive(Debug)]
pub struct Round;

/// The two player modes. Free-spins rounds never cost additional wager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Mode {
    #[serde(rename = "BASE")]
    Base,
    #[serde(rename = "FREE_SPINS")]
    FreeSpins,
}

// ============================================================================
// GRID SHAPE
// ============================================================================
/// Number of reels (columns) in the grid.
pub const REEL_COUNT: usize = 5;
/// Number of visible rows per reel.
pub const ROWS: usize = 3;
/// Total cells in the grid.
pub const CELL_COUNT: usize = REEL_COUNT * ROWS;
/// Number of fixed paylines evaluated per spin.
pub const PAYLINE_COUNT: usize = 10;
/// Minimum run length (of identical/WILD symbols) that pays on a line.
pub const MIN_RUN_LENGTH: usize = 3;

// ============================================================================
// BONUS / FEATURE CONSTANTS
// ============================================================================
/// Fixed free-spins budget granted by the buy-feature entry path.
pub const BUY_FEATURE_FREE_SPINS: i32 = 10;
/// Calibrated integer win multiplier applied through a bought bonus.
pub const FREE_SPINS_WIN_MULTIPLIER: i64 = 11;
/// Heat level ceiling (inclusive).
pub const HEAT_LEVEL_MAX: i32 = 10;
/// Width of the rolling event-rate window, in spins.
pub const EVENT_RATE_WINDOW: i32 = 100;

// ============================================================================
// WIN TIER THRESHOLDS (in units of totalWinX)
// ============================================================================
pub const WIN_TIER_BIG: i64 = 20;
pub const WIN_TIER_MEGA: i64 = 200;
pub const WIN_TIER_EPIC: i64 = 1000;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with timestamped log files.
#[cfg(feature = "server")]
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves forward")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}

/// Register a Ctrl+C handler for graceful shutdown coordination.
#[cfg(feature = "server")]
pub fn kys() {
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        log::warn!("interrupt received, shutting down");
        std::process::exit(0);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_shape_is_15_cells() {
        assert_eq!(CELL_COUNT, 15);
    }

    #[test]
    fn id_cast_preserves_uuid() {
        let id: ID<Round> = ID::default();
        let raw: uuid::Uuid = id.inner();
        let back: ID<Round> = ID::from(raw);
        assert_eq!(id, back);
    }

    #[test]
    fn id_ordering_matches_uuid_ordering() {
        let a: ID<Round> = ID::from(uuid::Uuid::nil());
        let b: ID<Round> = ID::default();
        assert!(a < b);
    }
}
