//! Stale-request supersession for live search.
//!
//! A browser fires one fragment request per keystroke. Without coordination a
//! slow response for "al" can land after the response for "alien" and
//! overwrite it. Each client therefore tags its requests with a key (`sid`)
//! and an increasing generation (`gen`). The tracker keeps the newest
//! generation per key:
//!
//! - a request older than (or equal to) the newest one is refused up front
//! - starting a newer request cancels the one still in flight
//! - a finished or abandoned request leaves its generation behind, so a late
//!   straggler from before it is still refused

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

/// Idle clients are forgotten after this long, once the map is large
const RETAIN_IDLE_FOR: Duration = Duration::from_secs(600);
const PRUNE_ABOVE: usize = 1024;

/// Newest request seen for one client
#[derive(Debug)]
struct Slot {
    generation: u64,
    token: CancellationToken,
    active: bool,
    touched: Instant,
}

type Slots = Arc<Mutex<HashMap<String, Slot>>>;

fn lock(slots: &Slots) -> MutexGuard<'_, HashMap<String, Slot>> {
    // Slot updates never panic midway, so a poisoned map is still consistent.
    slots.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Permission to run one generation of a client's request
///
/// Dropping the ticket releases the client's slot, whether the work finished
/// or the request was abandoned (for example the browser aborted the fetch
/// and axum dropped the handler future).
#[derive(Debug)]
pub struct Ticket {
    key: String,
    generation: u64,
    token: CancellationToken,
    slots: Slots,
}

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True once a newer request from the same client has started
    pub fn is_superseded(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Runs `fut` unless this ticket is superseded first
    ///
    /// Returns `None` when a newer request started before or while `fut` ran;
    /// a result computed just before the newer request arrived is still stale.
    pub async fn run<F, T>(self, fut: F) -> Option<T>
    where
        F: Future<Output = T>,
    {
        let outcome = tokio::select! {
            biased;
            _ = self.token.cancelled() => None,
            value = fut => Some(value),
        };

        if self.is_superseded() {
            None
        } else {
            outcome
        }
    }
}

impl Drop for Ticket {
    /// Marks the client idle if this ticket is still the latest
    ///
    /// The generation is kept so a late, older request is still refused.
    fn drop(&mut self) {
        let mut slots = lock(&self.slots);
        if let Some(slot) = slots
            .get_mut(&self.key)
            .filter(|slot| slot.generation == self.generation)
        {
            slot.active = false;
            slot.touched = Instant::now();
        }
    }
}

/// Tracks the newest request per client so stale search responses are dropped
#[derive(Default)]
pub struct RequestTracker {
    slots: Slots,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a request, or returns `None` if it must not run
    ///
    /// A request is refused when the client already started the same or a
    /// newer generation. Without an explicit generation the one after the
    /// current slot is used; a client already at `u64::MAX` has no next
    /// generation and is refused as well.
    pub fn begin(&self, key: &str, generation: Option<u64>) -> Option<Ticket> {
        let mut slots = lock(&self.slots);

        // Keep the map bounded: drop clients idle for a while.
        if slots.len() > PRUNE_ABOVE {
            slots.retain(|_, slot| slot.active || slot.touched.elapsed() < RETAIN_IDLE_FOR);
        }
        let current = slots.get(key).map(|slot| slot.generation);

        let generation = match (generation, current) {
            (Some(requested), Some(current)) if requested <= current => {
                tracing::debug!(
                    client = %key,
                    requested,
                    current,
                    "Refusing stale request"
                );
                return None;
            }
            (Some(requested), _) => requested,
            (None, Some(current)) => match current.checked_add(1) {
                Some(next) => next,
                None => {
                    tracing::warn!(client = %key, "Generation exhausted, refusing request");
                    return None;
                }
            },
            (None, None) => 1,
        };

        // Replace the slot; whoever held it is cancelled if still running.
        let token = CancellationToken::new();
        if let Some(previous) = slots.insert(
            key.to_string(),
            Slot {
                generation,
                token: token.clone(),
                active: true,
                touched: Instant::now(),
            },
        ) {
            if previous.active {
                previous.token.cancel();
                tracing::debug!(
                    client = %key,
                    superseded = previous.generation,
                    generation,
                    "Superseded in-flight request"
                );
            }
        }

        Some(Ticket {
            key: key.to_string(),
            generation,
            token,
            slots: Arc::clone(&self.slots),
        })
    }

    /// Number of clients with a request in flight
    pub fn in_flight(&self) -> usize {
        lock(&self.slots).values().filter(|slot| slot.active).count()
    }
}
