//! Per-player persisted state, the idempotency cache, and the per-player
//! lock — the key-value substrate described in §4.4. Keys are conceptually
//! `state:player:{id}`, `idem:{clientRequestId}`, and `lock:player:{id}`.
mod player_state;

pub use player_state::PlayerState;

use dashmap::DashMap;
use rgs_errors::ErrorCode;
use rgs_errors::GameError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sha2::Digest;
use sha2::Sha256;
use std::time::Duration;
use std::time::Instant;

/// A cached idempotency entry: the hash of the payload that produced it,
/// the opaque response, and when it expires.
struct IdempotencyRecord {
    payload_hash: String,
    response: serde_json::Value,
    expires_at: Instant,
}

struct StateRecord {
    value: serde_json::Value,
    expires_at: Instant,
}

struct LockRecord {
    token: u128,
    expires_at: Instant,
}

/// Telemetry-facing metrics from a single lock acquisition.
#[derive(Debug, Clone, Copy)]
pub struct LockMetrics {
    pub acquire_ms: f64,
    pub wait_retries: u32,
}

/// A held per-player lock. Released on every exit path — success, error,
/// or panic — via `Drop`, so callers never need a `finally`-style guard.
pub struct PlayerLock<'a> {
    store: &'a InMemoryStore,
    player_id: String,
    token: u128,
}

impl<'a> PlayerLock<'a> {
    /// Releases the lock early. Equivalent to simply dropping the guard;
    /// kept as a named call for call sites that want the release to read
    /// explicitly.
    pub fn release(self) {
        drop(self);
    }
}

impl<'a> Drop for PlayerLock<'a> {
    fn drop(&mut self) {
        self.store.release_player_lock(&self.player_id, self.token);
    }
}

/// In-memory, TTL-aware key-value substrate backing player state,
/// idempotency records, and per-player locks. A single process-wide
/// instance is shared behind an `Arc` by the orchestrator.
pub struct InMemoryStore {
    state: DashMap<String, StateRecord>,
    idempotency: DashMap<String, IdempotencyRecord>,
    locks: DashMap<String, LockRecord>,
    idempotency_ttl: Duration,
    lock_ttl: Duration,
}

fn now_expired(expires_at: Instant) -> bool {
    Instant::now() >= expires_at
}

fn payload_hash<T: Serialize>(payload: &T) -> String {
    let canonical = serde_json::to_string(
        &serde_json::to_value(payload).expect("payload is serializable"),
    )
    .expect("value is serializable");
    let digest = Sha256::digest(canonical.as_bytes());
    hex::encode(digest)[..16].to_string()
}

impl InMemoryStore {
    pub fn new(idempotency_ttl: Duration, lock_ttl: Duration) -> Self {
        Self {
            state: DashMap::new(),
            idempotency: DashMap::new(),
            locks: DashMap::new(),
            idempotency_ttl,
            lock_ttl,
        }
    }

    /// Checks the idempotency cache for `request_id`. Returns the cached
    /// response on a hit with a matching payload, `None` on a miss, and
    /// `IDEMPOTENCY_CONFLICT` if `request_id` was seen before with a
    /// different payload.
    pub fn check_idempotency<T: Serialize>(
        &self,
        request_id: &str,
        payload: &T,
    ) -> Result<Option<serde_json::Value>, GameError> {
        let Some(entry) = self.idempotency.get(request_id) else {
            return Ok(None);
        };
        if now_expired(entry.expires_at) {
            drop(entry);
            self.idempotency.remove(request_id);
            return Ok(None);
        }
        let current_hash = payload_hash(payload);
        if entry.payload_hash != current_hash {
            return Err(GameError::new(
                ErrorCode::IdempotencyConflict,
                "Same clientRequestId used with different payload.",
            ));
        }
        Ok(Some(entry.response.clone()))
    }

    pub fn store_idempotency<T: Serialize>(
        &self,
        request_id: &str,
        payload: &T,
        response: &serde_json::Value,
    ) {
        self.idempotency.insert(
            request_id.to_string(),
            IdempotencyRecord {
                payload_hash: payload_hash(payload),
                response: response.clone(),
                expires_at: Instant::now() + self.idempotency_ttl,
            },
        );
    }

    /// Attempts to acquire the per-player lock, returning a guard on
    /// success or `ROUND_IN_PROGRESS` if another spin already holds it.
    /// The lock's value is a random 128-bit token; release is
    /// compare-and-delete on that token, mirroring a Lua-script-backed
    /// Redis release.
    pub fn acquire_player_lock(
        &self,
        player_id: &str,
    ) -> Result<(PlayerLock<'_>, LockMetrics), GameError> {
        let t0 = Instant::now();
        self.expire_lock_if_stale(player_id);

        let token: u128 = uuid::Uuid::new_v4().as_u128();
        let acquired = match self.locks.entry(player_id.to_string()) {
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(LockRecord {
                    token,
                    expires_at: Instant::now() + self.lock_ttl,
                });
                true
            }
            dashmap::mapref::entry::Entry::Occupied(_) => false,
        };

        if !acquired {
            return Err(GameError::new(
                ErrorCode::RoundInProgress,
                "Another spin is in progress for this player.",
            ));
        }

        let acquire_ms = t0.elapsed().as_secs_f64() * 1000.0;
        Ok((
            PlayerLock {
                store: self,
                player_id: player_id.to_string(),
                token,
            },
            LockMetrics {
                acquire_ms,
                wait_retries: 0,
            },
        ))
    }

    fn expire_lock_if_stale(&self, player_id: &str) {
        let stale = self
            .locks
            .get(player_id)
            .map(|l| now_expired(l.expires_at))
            .unwrap_or(false);
        if stale {
            self.locks.remove(player_id);
        }
    }

    /// Compare-and-delete under one shard lock, so a lock that expired and
    /// was re-acquired by another holder between our last read and this
    /// call is never removed out from under that new holder (§4.4).
    fn release_player_lock(&self, player_id: &str, token: u128) -> bool {
        self.locks
            .remove_if(player_id, |_, l| l.token == token)
            .is_some()
    }

    pub fn get_player_state(&self, player_id: &str) -> Option<PlayerState> {
        let entry = self.state.get(player_id)?;
        if now_expired(entry.expires_at) {
            drop(entry);
            self.state.remove(player_id);
            return None;
        }
        serde_json::from_value(entry.value.clone()).ok()
    }

    pub fn save_player_state(&self, player_id: &str, state: &PlayerState, ttl: Duration) {
        self.state.insert(
            player_id.to_string(),
            StateRecord {
                value: serde_json::to_value(state).expect("state is serializable"),
                expires_at: Instant::now() + ttl,
            },
        );
    }

    pub fn clear_player_state(&self, player_id: &str) {
        self.state.remove(player_id);
    }
}

/// Convenience helper for anything that needs to round-trip an opaque
/// cached response back into a concrete DTO type.
pub fn decode_cached<T: DeserializeOwned>(value: &serde_json::Value) -> Option<T> {
    serde_json::from_value(value.clone()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn store() -> InMemoryStore {
        InMemoryStore::new(Duration::from_secs(3600), Duration::from_secs(30))
    }

    #[test]
    fn idempotency_hit_returns_cached_response_on_matching_payload() {
        let store = store();
        let payload = serde_json::json!({"betAmount": "1.00"});
        let response = serde_json::json!({"roundId": "abc"});
        store.store_idempotency("req-1", &payload, &response);

        let cached = store.check_idempotency("req-1", &payload).unwrap();
        assert_eq!(cached, Some(response));
    }

    #[test]
    fn idempotency_conflict_on_mismatched_payload() {
        let store = store();
        let payload_a = serde_json::json!({"betAmount": "1.00"});
        let payload_b = serde_json::json!({"betAmount": "2.00"});
        store.store_idempotency("req-1", &payload_a, &serde_json::json!({}));

        let err = store.check_idempotency("req-1", &payload_b).unwrap_err();
        assert_eq!(err.code, ErrorCode::IdempotencyConflict);
    }

    #[test]
    fn idempotency_miss_returns_none() {
        let store = store();
        let payload = serde_json::json!({"betAmount": "1.00"});
        assert!(store.check_idempotency("never-seen", &payload).unwrap().is_none());
    }

    #[test]
    fn second_lock_acquisition_fails_while_first_is_held() {
        let store = store();
        let (_guard, _metrics) = store.acquire_player_lock("player-1").unwrap();
        let err = store.acquire_player_lock("player-1").unwrap_err();
        assert_eq!(err.code, ErrorCode::RoundInProgress);
    }

    #[test]
    fn releasing_a_lock_allows_reacquisition() {
        let store = store();
        let (guard, _) = store.acquire_player_lock("player-1").unwrap();
        guard.release();
        assert!(store.acquire_player_lock("player-1").is_ok());
    }

    #[test]
    fn locks_are_independent_per_player() {
        let store = store();
        let (_a, _) = store.acquire_player_lock("player-1").unwrap();
        assert!(store.acquire_player_lock("player-2").is_ok());
    }

    #[test]
    fn player_state_round_trips_and_clears() {
        let store = store();
        let state = PlayerState::default();
        store.save_player_state("player-1", &state, Duration::from_secs(60));
        assert_eq!(store.get_player_state("player-1"), Some(state));

        store.clear_player_state("player-1");
        assert_eq!(store.get_player_state("player-1"), None);
    }

    #[test]
    fn releasing_a_stale_token_does_not_evict_a_newer_holder() {
        let store = InMemoryStore::new(Duration::from_secs(3600), Duration::from_millis(5));
        let (guard, _) = store.acquire_player_lock("player-1").unwrap();
        let stale_token = guard.token;
        thread::sleep(Duration::from_millis(20));
        let (_new_guard, _) = store.acquire_player_lock("player-1").unwrap();

        assert!(!store.release_player_lock("player-1", stale_token));
        assert!(store.acquire_player_lock("player-1").is_err());
    }

    #[test]
    fn stale_lock_can_be_stolen_after_ttl_expiry() {
        let store = InMemoryStore::new(Duration::from_secs(3600), Duration::from_millis(5));
        let (_guard, _) = store.acquire_player_lock("player-1").unwrap();
        thread::sleep(Duration::from_millis(20));
        assert!(store.acquire_player_lock("player-1").is_ok());
    }
}
