//! Per-row and per-column reader/writer lock state.
//!
//! Every row index and every column index owns an [`AxisLock`]: an
//! admission mutex guarding the live-reader count, and an exclusion
//! [`Gate`] held either by one writer or collectively by the readers of
//! that axis instance.
//!
//! # Protocol
//!
//! ```text
//! begin_read:  lock admission; readers += 1; if readers == 1 { gate.acquire(Readers) }; unlock
//! end_read:    lock admission; readers -= 1; if readers == 0 { gate.release(Readers) }; unlock
//! exclusive:   gate.acquire(Writer) ... gate.release(Writer)
//! ```
//!
//! Each axis instance releases on its own reader count alone; the row
//! cohort and the column cohort of a cell never gate each other.
//!
//! A writer never holds the admission mutex while it waits on the gate:
//! readers leaving a cohort need admission to decrement the count.
//!
//! # Ordering
//!
//! Callers acquire rows before columns, and ascending indices within an
//! axis. [`AxisLocks::acquire_exclusive_many`] sorts for them.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use smallvec::SmallVec;
use tessera_core::{Axis, SheetError};

/// Who currently holds a [`Gate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Holder {
    /// Nobody; the next acquirer proceeds.
    Free,
    /// A single writer or structural operation.
    Writer,
    /// The reader cohort of the axis instance, on behalf of all its members.
    Readers,
}

/// The exclusion lock of one axis instance.
///
/// A binary semaphore rather than a `std::sync::Mutex`: the reader cohort
/// takes it on whichever thread arrives first and releases it on whichever
/// thread leaves last, so ownership is not tied to a thread.
pub struct Gate {
    state: Mutex<Holder>,
    freed: Condvar,
}

// Compile-time assertion: Gate must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<Gate>();
};

impl Default for Gate {
    fn default() -> Self {
        Self::new()
    }
}

impl Gate {
    /// Create a free gate.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(Holder::Free),
            freed: Condvar::new(),
        }
    }

    /// Block until the gate is free, then take it as `holder`.
    ///
    /// # Panics
    ///
    /// Panics if `holder` is [`Holder::Free`].
    pub fn acquire(&self, holder: Holder) {
        assert_ne!(holder, Holder::Free, "gate cannot be acquired as Free");
        let mut state = lock(&self.state);
        while *state != Holder::Free {
            state = self
                .freed
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *state = holder;
    }

    /// Release the gate previously taken as `holder`.
    ///
    /// # Panics
    ///
    /// Panics if the gate is not currently held by `holder`. That is a
    /// lock-protocol violation inside the engine and cannot be recovered.
    pub fn release(&self, holder: Holder) {
        let mut state = lock(&self.state);
        assert_eq!(
            *state, holder,
            "lock protocol violation: releasing gate held by {:?} as {:?}",
            *state, holder
        );
        *state = Holder::Free;
        drop(state);
        self.freed.notify_one();
    }

    /// Current holder, for diagnostics and tests.
    pub fn holder(&self) -> Holder {
        *lock(&self.state)
    }
}

/// Lock state of one row or one column.
pub struct AxisLock {
    /// Live reader count; also serializes the cohort's take/release decisions.
    admission: Mutex<usize>,
    exclusion: Gate,
}

// Compile-time assertion: AxisLock must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<AxisLock>();
};

impl Default for AxisLock {
    fn default() -> Self {
        Self::new()
    }
}

impl AxisLock {
    /// Fresh state: no readers, gate free.
    pub fn new() -> Self {
        Self {
            admission: Mutex::new(0),
            exclusion: Gate::new(),
        }
    }

    /// Join the reader cohort, taking the gate if this is the first reader.
    ///
    /// The first reader keeps the admission mutex while it waits on the
    /// gate; later readers of the same axis queue behind it.
    pub fn begin_read(&self) -> ReadGuard<'_> {
        let mut readers = lock(&self.admission);
        *readers += 1;
        if *readers == 1 {
            self.exclusion.acquire(Holder::Readers);
        }
        drop(readers);
        ReadGuard { lock: self }
    }

    fn end_read(&self) {
        let mut readers = lock(&self.admission);
        assert!(
            *readers > 0,
            "lock protocol violation: end_read with no live readers"
        );
        *readers -= 1;
        if *readers == 0 {
            self.exclusion.release(Holder::Readers);
        }
    }

    /// Take exclusive access to the whole axis instance.
    pub fn acquire_exclusive(&self) -> WriteGuard<'_> {
        self.exclusion.acquire(Holder::Writer);
        WriteGuard { lock: self }
    }

    fn release_exclusive(&self) {
        self.exclusion.release(Holder::Writer);
    }

    /// Number of readers currently inside a read critical section.
    pub fn live_readers(&self) -> usize {
        *lock(&self.admission)
    }

    /// Current holder of the exclusion gate.
    pub fn holder(&self) -> Holder {
        self.exclusion.holder()
    }
}

/// Membership in an axis reader cohort. Leaving on drop.
#[must_use = "the read section ends when the guard is dropped"]
pub struct ReadGuard<'a> {
    lock: &'a AxisLock,
}

impl Drop for ReadGuard<'_> {
    fn drop(&mut self) {
        self.lock.end_read();
    }
}

/// Exclusive access to an axis instance. Released on drop.
#[must_use = "exclusive access ends when the guard is dropped"]
pub struct WriteGuard<'a> {
    lock: &'a AxisLock,
}

impl Drop for WriteGuard<'_> {
    fn drop(&mut self) {
        self.lock.release_exclusive();
    }
}

/// Lock table for every index of one axis.
pub struct AxisLocks {
    axis: Axis,
    locks: Vec<AxisLock>,
}

impl AxisLocks {
    /// Create `len` fresh axis locks.
    pub fn new(axis: Axis, len: usize) -> Self {
        Self {
            axis,
            locks: (0..len).map(|_| AxisLock::new()).collect(),
        }
    }

    /// Number of axis instances.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }

    /// Append fresh state for a new trailing index and return that index.
    pub fn push(&mut self) -> usize {
        self.locks.push(AxisLock::new());
        self.locks.len() - 1
    }

    /// The lock for `index`, or an out-of-range error.
    pub fn get(&self, index: usize) -> Result<&AxisLock, SheetError> {
        self.locks.get(index).ok_or(SheetError::IndexOutOfRange {
            axis: self.axis,
            index,
            len: self.locks.len(),
        })
    }

    /// Join the reader cohort of `index`.
    pub fn begin_read(&self, index: usize) -> Result<ReadGuard<'_>, SheetError> {
        Ok(self.get(index)?.begin_read())
    }

    /// Take exclusive access to `index`.
    pub fn acquire_exclusive(&self, index: usize) -> Result<WriteGuard<'_>, SheetError> {
        Ok(self.get(index)?.acquire_exclusive())
    }

    /// Take exclusive access to several indices in ascending order.
    ///
    /// Indices are sorted and deduplicated first. All indices are
    /// validated before any gate is touched. Guards are returned in
    /// acquisition order and released in that same order when dropped.
    pub fn acquire_exclusive_many(
        &self,
        indices: &[usize],
    ) -> Result<SmallVec<[WriteGuard<'_>; 2]>, SheetError> {
        let mut sorted: SmallVec<[usize; 4]> = indices.iter().copied().collect();
        sorted.sort_unstable();
        sorted.dedup();
        for &index in &sorted {
            self.get(index)?;
        }
        Ok(sorted
            .iter()
            .map(|&index| self.locks[index].acquire_exclusive())
            .collect())
    }

    /// Join the reader cohort of every index, ascending.
    pub fn begin_read_all(&self) -> Vec<ReadGuard<'_>> {
        self.locks.iter().map(AxisLock::begin_read).collect()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
