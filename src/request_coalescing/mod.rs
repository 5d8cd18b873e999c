// Request Coalescing Module
//
// Deduplicates concurrent conversions of the same drawing.
// When several requests miss the cache for the same key at once:
// - First request (leader): runs the conversion and publishes the bytes it served
// - Subsequent requests (followers): wait for the leader and reuse those bytes
//
// The bytes travel through the channel rather than the cache, so followers
// share placeholder answers too. Without coalescing every concurrent miss
// runs the full fetch/rasterize/crop sequence; the end state is the same
// either way, so coalescing is opt-in.

use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;

use crate::cache::CacheKey;

/// State of one in-flight conversion as seen by its followers
#[derive(Debug, Clone)]
enum Outcome {
    Pending,
    /// Bytes the leader answered with (artifact or placeholder)
    Ready(Bytes),
    /// The leader gave up without an answer (e.g. the cache failed)
    Abandoned,
}

/// Request coalescing manager
/// Tracks in-flight conversions and deduplicates concurrent requests for the same key
#[derive(Debug, Clone, Default)]
pub struct RequestCoalescer {
    /// Map of in-flight conversions: key -> watch sender
    /// The leader publishes its outcome on completion to wake all waiters
    in_flight: Arc<Mutex<HashMap<CacheKey, Arc<watch::Sender<Outcome>>>>>,
}

impl RequestCoalescer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire a coalescing slot for a request
    ///
    /// Returns `CoalescingSlot::Leader` if no conversion for `key` is running.
    /// The leader should produce its answer and hand it to
    /// [`LeaderGuard::complete`].
    ///
    /// Returns `CoalescingSlot::Follower` once the running conversion has
    /// finished, carrying the leader's bytes. `Follower(None)` means the
    /// leader failed without an answer and the follower is on its own.
    pub async fn acquire(&self, key: CacheKey) -> CoalescingSlot {
        let mut receiver = {
            let mut in_flight = self.in_flight.lock();
            match in_flight.get(&key) {
                Some(sender) => sender.subscribe(),
                None => {
                    let sender = Arc::new(watch::channel(Outcome::Pending).0);
                    in_flight.insert(key, Arc::clone(&sender));
                    return CoalescingSlot::Leader(LeaderGuard {
                        key,
                        coalescer: self.clone(),
                        sender,
                        result: None,
                    });
                }
            }
        };

        let outcome = match receiver
            .wait_for(|outcome| !matches!(outcome, Outcome::Pending))
            .await
        {
            Ok(outcome) => outcome.clone(),
            Err(_) => Outcome::Abandoned,
        };
        match outcome {
            Outcome::Ready(bytes) => CoalescingSlot::Follower(Some(bytes)),
            Outcome::Pending | Outcome::Abandoned => CoalescingSlot::Follower(None),
        }
    }

    /// Get current number of in-flight conversions
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.lock().len()
    }

    fn remove_in_flight(&self, key: &CacheKey) {
        self.in_flight.lock().remove(key);
    }
}

/// Result of acquiring a coalescing slot
#[derive(Debug)]
pub enum CoalescingSlot {
    /// First request for the key - produce the answer and complete the guard.
    /// Dropping the guard without completing tells followers to fend for themselves.
    Leader(LeaderGuard),

    /// Another request was converting the same key and has now finished.
    Follower(Option<Bytes>),
}

impl CoalescingSlot {
    pub fn is_leader(&self) -> bool {
        matches!(self, CoalescingSlot::Leader(_))
    }

    pub fn is_follower(&self) -> bool {
        matches!(self, CoalescingSlot::Follower(_))
    }
}

/// Guard held by the leader request
/// When dropped, wakes all waiting followers and frees the key
#[derive(Debug)]
pub struct LeaderGuard {
    key: CacheKey,
    coalescer: RequestCoalescer,
    sender: Arc<watch::Sender<Outcome>>,
    result: Option<Bytes>,
}

impl LeaderGuard {
    /// Share `bytes` with every waiting follower and release the key
    pub fn complete(mut self, bytes: Bytes) {
        self.result = Some(bytes);
    }
}

impl Drop for LeaderGuard {
    fn drop(&mut self) {
        // Free the key first so later requests start a fresh conversion
        // instead of subscribing to a finished one
        self.coalescer.remove_in_flight(&self.key);
        let outcome = match self.result.take() {
            Some(bytes) => Outcome::Ready(bytes),
            None => Outcome::Abandoned,
        };
        self.sender.send_replace(outcome);
    }
}
