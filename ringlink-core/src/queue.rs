//! Fixed-capacity single-producer/single-consumer queue
//!
//! A power-of-two ring with two free-running indices and one reserved slot,
//! so "empty" (`head == tail`) and "full" (`head + 1 == tail`) can be told
//! apart without a shared counter. A queue of capacity `N` holds `N - 1`
//! elements.
//!
//! # Concurrency
//!
//! One context may call [`RingQueue::insert`] and one other context may call
//! [`RingQueue::remove`]/[`RingQueue::peek`] at the same time without any
//! locking: the producer only ever stores `head`, the consumer only ever
//! stores `tail`. Calling `insert` (or `remove`) from two contexts at once
//! breaks that contract.
//!
//! Reading `head` and `tail` together (`size`, `is_full`, `is_empty`) is
//! done inside a critical section so the pair is never torn on targets that
//! cannot load a word atomically with respect to the interrupt.

#![allow(unsafe_code)]

use core::cell::UnsafeCell;
use core::fmt;
use core::mem::MaybeUninit;

use portable_atomic::{AtomicUsize, Ordering};

/// Lock-free SPSC ring buffer with inline storage
pub struct RingQueue<T: Copy, const N: usize> {
    /// Next slot the producer writes
    head: AtomicUsize,
    /// Next slot the consumer reads
    tail: AtomicUsize,
    slots: [UnsafeCell<MaybeUninit<T>>; N],
}

// SAFETY: a slot is written only by the producer while it is outside the
// `tail..head` window and read only by the consumer while it is inside it.
// The release store of `head` (resp. `tail`) publishes the slot to the
// other side, so no slot is ever accessed from both contexts at once.
unsafe impl<T: Copy + Send, const N: usize> Sync for RingQueue<T, N> {}

impl<T: Copy, const N: usize> RingQueue<T, N> {
    const MASK: usize = N - 1;

    const VALID_CAPACITY: () = assert!(
        N > 1 && N.is_power_of_two(),
        "RingQueue capacity must be a power of two greater than one"
    );

    /// Create an empty queue
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID_CAPACITY;

        Self {
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            slots: [const { UnsafeCell::new(MaybeUninit::uninit()) }; N],
        }
    }

    /// Number of usable slots (`N - 1`)
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    /// Append a value at the head
    ///
    /// Returns the value back if the queue is full. Producer side only.
    pub fn insert(&self, value: T) -> Result<(), T> {
        let head = self.head.load(Ordering::Relaxed);
        let next = (head + 1) & Self::MASK;

        if next == self.tail.load(Ordering::Acquire) {
            return Err(value);
        }

        // SAFETY: `head` is outside the consumer's window until the store below
        unsafe { (*self.slots[head].get()).write(value) };
        self.head.store(next, Ordering::Release);
        Ok(())
    }

    /// Pop the oldest value
    ///
    /// Consumer side only.
    pub fn remove(&self) -> Option<T> {
        let tail = self.tail.load(Ordering::Relaxed);

        if tail == self.head.load(Ordering::Acquire) {
            return None;
        }

        // SAFETY: the acquire load of `head` makes the producer's write visible,
        // and the producer won't reuse this slot until `tail` moves past it
        let value = unsafe { (*self.slots[tail].get()).assume_init_read() };
        self.tail.store((tail + 1) & Self::MASK, Ordering::Release);
        Some(value)
    }

    /// Copy the oldest value without removing it
    ///
    /// Consumer side only.
    pub fn peek(&self) -> Option<T> {
        let tail = self.tail.load(Ordering::Relaxed);

        if tail == self.head.load(Ordering::Acquire) {
            return None;
        }

        // SAFETY: see `remove`
        Some(unsafe { (*self.slots[tail].get()).assume_init_read() })
    }

    /// Number of queued elements
    pub fn size(&self) -> usize {
        let (head, tail) = self.indices();
        head.wrapping_sub(tail) & Self::MASK
    }

    /// Check if no further insert can succeed
    pub fn is_full(&self) -> bool {
        let (head, tail) = self.indices();
        ((head + 1) & Self::MASK) == tail
    }

    /// Check if there is nothing to remove
    pub fn is_empty(&self) -> bool {
        let (head, tail) = self.indices();
        head == tail
    }

    /// Discard everything queued
    ///
    /// Moves `head` back onto `tail`. Intended for use while the other
    /// context is quiescent (peripheral disabled).
    pub fn reset(&self) {
        critical_section::with(|_| {
            let tail = self.tail.load(Ordering::Acquire);
            self.head.store(tail, Ordering::Release);
        });
    }

    fn indices(&self) -> (usize, usize) {
        critical_section::with(|_| {
            (
                self.head.load(Ordering::Acquire),
                self.tail.load(Ordering::Acquire),
            )
        })
    }
}

impl<T: Copy, const N: usize> Default for RingQueue<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy, const N: usize> fmt::Debug for RingQueue<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingQueue")
            .field("capacity", &self.capacity())
            .field("size", &self.size())
            .finish()
    }
}
