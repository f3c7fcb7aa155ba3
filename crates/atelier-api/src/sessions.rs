//! Session registry
//!
//! Maps a client-supplied session id to its [`ReservationFlow`]. Flows are
//! created lazily on first use and kept behind an async mutex so each
//! session's requests are serialized while distinct sessions run
//! concurrently.
//!
//! Session ids come from untrusted clients, so the registry is bounded:
//! entries idle longer than the TTL are swept on insert, and when the map is
//! still at capacity the least recently used entry is evicted. An evicted
//! session simply starts a fresh flow on its next request; the promo flag
//! lives in the durable store, not here.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::sync::Mutex as AsyncMutex;
use tracing::debug;

use atelier_core::traits::{CalendarGateway, PromoStore};
use atelier_services::ReservationFlow;

/// Default cap on concurrently tracked sessions
const DEFAULT_MAX_SESSIONS: usize = 10_000;

/// Default idle time after which a session is evictable
const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(2 * 60 * 60);

type FlowHandle = Arc<AsyncMutex<ReservationFlow>>;

struct SessionEntry {
    flow: FlowHandle,
    last_seen: Instant,
}

pub struct SessionRegistry {
    gateway: Arc<dyn CalendarGateway>,
    promo: Arc<dyn PromoStore>,
    flows: Mutex<HashMap<String, SessionEntry>>,
    max_sessions: usize,
    idle_ttl: Duration,
}

impl SessionRegistry {
    pub fn new(gateway: Arc<dyn CalendarGateway>, promo: Arc<dyn PromoStore>) -> Self {
        Self::with_limits(gateway, promo, DEFAULT_MAX_SESSIONS, DEFAULT_IDLE_TTL)
    }

    /// Registry with explicit capacity and idle TTL
    pub fn with_limits(
        gateway: Arc<dyn CalendarGateway>,
        promo: Arc<dyn PromoStore>,
        max_sessions: usize,
        idle_ttl: Duration,
    ) -> Self {
        Self {
            gateway,
            promo,
            flows: Mutex::new(HashMap::new()),
            max_sessions,
            idle_ttl,
        }
    }

    /// Fetch the flow for a session, creating it on first use
    ///
    /// The session id doubles as the customer key for promo lookups. The
    /// registry lock is never held across the async flow construction; a
    /// concurrent first request for the same id keeps whichever flow landed
    /// in the map first.
    pub async fn flow(&self, session_id: &str) -> FlowHandle {
        {
            let mut flows = self.flows.lock();
            if let Some(entry) = flows.get_mut(session_id) {
                entry.last_seen = Instant::now();
                return Arc::clone(&entry.flow);
            }
        }

        debug!(session = %session_id, "Creating reservation flow");
        let flow = ReservationFlow::start(
            Arc::clone(&self.gateway),
            Arc::clone(&self.promo),
            session_id.to_string(),
        )
        .await;
        let handle = Arc::new(AsyncMutex::new(flow));

        let mut flows = self.flows.lock();
        if !flows.contains_key(session_id) && flows.len() >= self.max_sessions {
            Self::evict(&mut flows, self.idle_ttl, self.max_sessions);
        }

        let entry = flows
            .entry(session_id.to_string())
            .or_insert(SessionEntry {
                flow: handle,
                last_seen: Instant::now(),
            });
        Arc::clone(&entry.flow)
    }

    /// Drop idle entries; if the map is still full, drop the least recently
    /// used one so the insert always has room.
    fn evict(flows: &mut HashMap<String, SessionEntry>, idle_ttl: Duration, cap: usize) {
        let before = flows.len();
        flows.retain(|_, entry| entry.last_seen.elapsed() < idle_ttl);

        if flows.len() >= cap {
            if let Some(oldest) = flows
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(id, _)| id.clone())
            {
                flows.remove(&oldest);
            }
        }

        debug!(
            "Session registry eviction: {} -> {} entries",
            before,
            flows.len()
        );
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.flows.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;

    use atelier_core::models::{AvailabilityOutcome, HoldOutcome, HoldRequest, SlotQuery};
    use atelier_core::AppError;
    use atelier_promo::MemoryPromoStore;

    struct OpenGateway;

    #[async_trait]
    impl CalendarGateway for OpenGateway {
        async fn check_availability(
            &self,
            _query: &SlotQuery,
        ) -> Result<AvailabilityOutcome, AppError> {
            Ok(AvailabilityOutcome::Open)
        }

        async fn create_hold(&self, _request: &HoldRequest) -> Result<HoldOutcome, AppError> {
            Ok(HoldOutcome::Rejected { reason: None })
        }
    }

    fn bounded_registry(cap: usize, ttl: Duration) -> SessionRegistry {
        SessionRegistry::with_limits(
            Arc::new(OpenGateway),
            Arc::new(MemoryPromoStore::new()),
            cap,
            ttl,
        )
    }

    #[tokio::test]
    async fn test_same_session_reuses_flow() {
        let registry = bounded_registry(10, Duration::from_secs(3600));

        let first = registry.flow("s-1").await;
        let second = registry.flow("s-1").await;

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_registry_never_exceeds_capacity() {
        let registry = bounded_registry(3, Duration::from_secs(3600));

        for i in 0..10 {
            registry.flow(&format!("s-{}", i)).await;
        }

        assert!(registry.len() <= 3);
    }

    #[tokio::test]
    async fn test_full_registry_evicts_least_recently_used() {
        let registry = bounded_registry(2, Duration::from_secs(3600));

        registry.flow("s-old").await;
        registry.flow("s-new").await;
        // Touch the old one so "s-new" becomes the LRU entry.
        registry.flow("s-old").await;

        let before_evict = registry.flow("s-old").await;
        registry.flow("s-extra").await;

        // The touched session survived the eviction.
        let after_evict = registry.flow("s-old").await;
        assert!(Arc::ptr_eq(&before_evict, &after_evict));
        assert!(registry.len() <= 2);
    }

    #[tokio::test]
    async fn test_idle_sessions_swept_before_lru() {
        let registry = bounded_registry(2, Duration::from_millis(1));

        registry.flow("s-1").await;
        registry.flow("s-2").await;
        tokio::time::sleep(Duration::from_millis(10)).await;

        // Both existing entries are past the TTL; the insert sweeps them
        // instead of evicting by recency.
        registry.flow("s-3").await;
        assert_eq!(registry.len(), 1);
    }
}
