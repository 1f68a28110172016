//! Queue carrying routed MIDI actions to the instrument
//!
//! Device callbacks run on the MIDI backend's threads, so actions pass
//! through a lock-free ring buffer. The producer side is wrapped in a Mutex
//! for multi-producer access (one callback per connected port). The consumer
//! uses try_lock so a UI or audio thread never blocks on it.

use parking_lot::Mutex;
use ringbuf::{traits::*, HeapRb};

use super::dispatch::MidiAction;

/// Thread-safe MIDI action queue using a lock-free ring buffer
pub struct MidiActionQueue {
    producer: Mutex<ringbuf::HeapProd<MidiAction>>,
    consumer: Mutex<ringbuf::HeapCons<MidiAction>>,
    /// Capacity for logging overflow warnings
    capacity: usize,
}

impl MidiActionQueue {
    pub fn new(capacity: usize) -> Self {
        let rb = HeapRb::new(capacity.max(1));
        let (producer, consumer) = rb.split();
        Self {
            producer: Mutex::new(producer),
            consumer: Mutex::new(consumer),
            capacity: capacity.max(1),
        }
    }

    /// Push an action. Returns false if the queue is full or the action is
    /// `Ignored`.
    pub fn push(&self, action: MidiAction) -> bool {
        if action.is_ignored() {
            return false;
        }
        let mut producer = self.producer.lock();
        if producer.try_push(action).is_ok() {
            return true;
        }
        // Dropping beats stalling a device callback
        log::debug!("MIDI queue full (capacity: {}), action dropped", self.capacity);
        false
    }

    /// Drain all actions into a reusable buffer.
    ///
    /// Returns 0 without waiting if another consumer holds the lock.
    pub fn drain_into(&self, buffer: &mut Vec<MidiAction>) -> usize {
        buffer.clear();
        if let Some(mut consumer) = self.consumer.try_lock() {
            while let Some(action) = consumer.try_pop() {
                buffer.push(action);
            }
        }
        buffer.len()
    }

    #[inline]
    pub fn pop(&self) -> Option<MidiAction> {
        self.consumer.try_lock()?.try_pop()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.consumer.try_lock().map(|c| c.is_empty()).unwrap_or(true)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.consumer.try_lock().map(|c| c.occupied_len()).unwrap_or(0)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
