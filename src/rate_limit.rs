use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

// Fixed window policy: max admitted requests per window per key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub max_requests: u32,
    pub window: Duration,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            max_requests: 60,
            window: Duration::from_secs(60 * 60),
        }
    }
}

// Rate limit entry - tracks requests per client key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitEntry {
    pub count: u32,
    pub window_reset_at: Instant,
}

/// Source of the current time for the limiter.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
pub struct ManualClock {
    origin: Instant,
    offset_ms: AtomicU64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset_ms: AtomicU64::new(0),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.offset_ms
            .fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + Duration::from_millis(self.offset_ms.load(Ordering::SeqCst))
    }
}

/// Per-key counter storage behind the rate limiter.
///
/// `update` must give the closure exclusive access to the key's slot for the
/// whole read-modify-write, so concurrent requests from one client never lose
/// an increment. Setting the slot to `None` removes the entry.
pub trait RateLimitStore: Send + Sync {
    fn get(&self, key: &str) -> Option<RateLimitEntry>;
    fn update(&self, key: &str, f: &mut dyn FnMut(&mut Option<RateLimitEntry>) -> bool) -> bool;
    fn reset(&self, key: &str);
    fn client_count(&self) -> usize;
}

/// In-process store. Entries are never evicted, one per distinct key.
#[derive(Default)]
pub struct MemoryStore {
    entries: DashMap<String, RateLimitEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RateLimitStore for MemoryStore {
    fn get(&self, key: &str) -> Option<RateLimitEntry> {
        self.entries.get(key).map(|entry| *entry)
    }

    fn update(&self, key: &str, f: &mut dyn FnMut(&mut Option<RateLimitEntry>) -> bool) -> bool {
        // the shard stays locked while the entry guard is alive
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                let mut slot = Some(*occupied.get());
                let result = f(&mut slot);
                match slot {
                    Some(entry) => *occupied.get_mut() = entry,
                    None => {
                        occupied.remove();
                    }
                }
                result
            }
            Entry::Vacant(vacant) => {
                let mut slot = None;
                let result = f(&mut slot);
                if let Some(entry) = slot {
                    vacant.insert(entry);
                }
                result
            }
        }
    }

    fn reset(&self, key: &str) {
        self.entries.remove(key);
    }

    fn client_count(&self) -> usize {
        self.entries.len()
    }
}

/// Fixed-window request counter keyed by client address.
///
/// A client may burst up to twice the limit across a window boundary.
#[derive(Clone)]
pub struct RateLimiter {
    policy: RateLimitPolicy,
    store: Arc<dyn RateLimitStore>,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self::with_parts(policy, Arc::new(MemoryStore::new()), Arc::new(SystemClock))
    }

    pub fn with_parts(
        policy: RateLimitPolicy,
        store: Arc<dyn RateLimitStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            policy,
            store,
            clock,
        }
    }

    pub fn policy(&self) -> RateLimitPolicy {
        self.policy
    }

    /// Records a request for `key`, returning whether it is admitted.
    /// Rejected requests do not count against the window.
    pub fn admit(&self, key: &str) -> bool {
        let now = self.clock.now();
        let policy = self.policy;

        self.store.update(key, &mut |slot: &mut Option<RateLimitEntry>| match *slot {
            Some(ref mut entry) if now <= entry.window_reset_at => {
                if entry.count >= policy.max_requests {
                    return false;
                }
                entry.count += 1;
                true
            }
            // first request, or window expired
            _ => {
                *slot = Some(RateLimitEntry {
                    count: 1,
                    window_reset_at: now + policy.window,
                });
                true
            }
        })
    }

    pub fn entry(&self, key: &str) -> Option<RateLimitEntry> {
        self.store.get(key)
    }

    pub fn reset(&self, key: &str) {
        self.store.reset(key);
    }

    pub fn tracked_clients(&self) -> usize {
        self.store.client_count()
    }
}
