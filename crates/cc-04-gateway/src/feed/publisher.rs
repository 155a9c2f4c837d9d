//! # Feed Publisher
//!
//! Fans committed events out to subscriber queues.
//!
//! Each subscriber owns a bounded queue. Publishing never blocks: when a
//! queue is full its oldest event is dropped and counted. Subscribers that
//! have gone away are pruned on the next publish.
//!
//! The backlog lock is held across "record in backlog" and "snapshot the
//! subscriber set", and a new subscriber copies the backlog under the same
//! lock, so every event reaches a subscriber exactly once: either through
//! its backlog copy or through its queue.

use crate::domain::FeedEvent;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{debug, warn};
use uuid::Uuid;

/// A single subscriber's bounded, drop-oldest queue.
#[derive(Debug)]
pub struct SubscriberQueue {
    events: Mutex<VecDeque<Arc<FeedEvent>>>,
    capacity: usize,
    notify: Notify,
    closed: AtomicBool,
    dropped: AtomicU64,
}

impl SubscriberQueue {
    fn new(capacity: usize) -> Self {
        Self {
            events: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            notify: Notify::new(),
            closed: AtomicBool::new(false),
            dropped: AtomicU64::new(0),
        }
    }

    /// Enqueue, evicting the oldest event if full. Returns `true` if an
    /// event was dropped.
    pub fn push(&self, event: Arc<FeedEvent>) -> bool {
        let evicted = {
            let mut events = self.events.lock();
            let evicted = if events.len() >= self.capacity {
                events.pop_front().is_some()
            } else {
                false
            };
            events.push_back(event);
            evicted
        };
        if evicted {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
        self.notify.notify_one();
        evicted
    }

    /// Next event in commit order; `None` once closed and drained.
    pub async fn recv(&self) -> Option<Arc<FeedEvent>> {
        loop {
            {
                let mut events = self.events.lock();
                if let Some(event) = events.pop_front() {
                    return Some(event);
                }
                if self.is_closed() {
                    return None;
                }
            }
            self.notify.notified().await;
        }
    }

    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.notify.notify_one();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Events evicted on overflow so far.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// A live subscription. Dropping it closes the queue.
#[derive(Debug)]
pub struct FeedSubscription {
    id: Uuid,
    queue: Arc<SubscriberQueue>,
}

impl FeedSubscription {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub async fn recv(&self) -> Option<Arc<FeedEvent>> {
        self.queue.recv().await
    }

    pub fn dropped(&self) -> u64 {
        self.queue.dropped()
    }
}

impl Drop for FeedSubscription {
    fn drop(&mut self) {
        self.queue.close();
    }
}

pub struct FeedPublisher {
    subscribers: DashMap<Uuid, Arc<SubscriberQueue>>,
    backlog: Mutex<VecDeque<Arc<FeedEvent>>>,
    backlog_len: usize,
    queue_capacity: usize,
}

impl FeedPublisher {
    pub fn new(queue_capacity: usize, backlog_len: usize) -> Self {
        Self {
            subscribers: DashMap::new(),
            backlog: Mutex::new(VecDeque::with_capacity(backlog_len)),
            backlog_len,
            queue_capacity: queue_capacity.max(1),
        }
    }

    /// Register a subscriber, preloaded with the most recent backlog.
    pub fn subscribe(&self) -> FeedSubscription {
        let id = Uuid::new_v4();
        let queue = Arc::new(SubscriberQueue::new(self.queue_capacity));
        {
            let backlog = self.backlog.lock();
            for event in backlog.iter() {
                queue.push(event.clone());
            }
            self.subscribers.insert(id, queue.clone());
        }
        debug!(subscriber = %id, subscribers = self.subscribers.len(), "Feed subscriber added");
        FeedSubscription { id, queue }
    }

    /// Deliver an event to every live subscriber. Returns the number of
    /// subscribers it was queued for.
    pub fn publish(&self, event: FeedEvent) -> usize {
        let event = Arc::new(event);
        let targets: Vec<(Uuid, Arc<SubscriberQueue>)> = {
            let mut backlog = self.backlog.lock();
            if self.backlog_len > 0 {
                if backlog.len() >= self.backlog_len {
                    backlog.pop_front();
                }
                backlog.push_back(event.clone());
            }
            self.subscribers
                .iter()
                .map(|entry| (*entry.key(), entry.value().clone()))
                .collect()
        };

        let mut delivered = 0;
        let mut closed = Vec::new();
        for (id, queue) in targets {
            if queue.is_closed() {
                closed.push(id);
                continue;
            }
            if queue.push(event.clone()) {
                warn!(
                    subscriber = %id,
                    dropped = queue.dropped(),
                    "Feed queue full, dropped oldest event"
                );
            }
            delivered += 1;
        }
        for id in closed {
            self.subscribers.remove(&id);
            debug!(subscriber = %id, "Pruned closed feed subscriber");
        }
        delivered
    }

    /// Close every subscriber queue, ending their streams.
    pub fn close_all(&self) {
        for entry in self.subscribers.iter() {
            entry.value().close();
        }
        self.subscribers.clear();
    }

    /// Registered subscribers, including closed ones not yet pruned.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn backlog(&self) -> Vec<Arc<FeedEvent>> {
        self.backlog.lock().iter().cloned().collect()
    }
}
