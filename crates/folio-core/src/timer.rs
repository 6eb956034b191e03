#![forbid(unsafe_code)]

//! Deferred reactions: fixed-delay timers, debouncing, and frame throttling.
//!
//! Three small primitives cover every suspension-like construct on the page:
//!
//! - [`TimerQueue`]: fire-and-forget deadlines (auto-dismiss of tooltips,
//!   notifications, form messages). Not cancelable.
//! - [`Debouncer`]: latest-wins deferral. A call inside the quiet window
//!   replaces the pending one and restarts the wait.
//! - [`FrameGate`]: at most one pending animation frame.
//!
//! All of them are driven by the caller's clock; nothing here reads wall time.
//!
//! # Usage
//!
//! ```
//! use core::time::Duration;
//! use folio_core::timer::Debouncer;
//!
//! let mut resize = Debouncer::new(Duration::from_millis(250));
//! resize.call(500.0_f64, Duration::from_millis(0));
//! resize.call(700.0, Duration::from_millis(100));
//!
//! // Quiet window measured from the latest call.
//! assert_eq!(resize.poll(Duration::from_millis(300)), None);
//! assert_eq!(resize.poll(Duration::from_millis(350)), Some(700.0));
//! assert_eq!(resize.poll(Duration::from_millis(900)), None);
//! ```

use core::time::Duration;

/// Handle of a scheduled timer entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct TimerEntry<T> {
    deadline: Duration,
    id: TimerId,
    payload: T,
}

/// Fixed-delay timers keyed by absolute deadline.
///
/// Due entries are returned in deadline order; entries sharing a deadline
/// come back in scheduling order.
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    entries: Vec<TimerEntry<T>>,
    next_id: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    /// Schedule `payload` to fire at `now + delay`.
    pub fn schedule(&mut self, now: Duration, delay: Duration, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let deadline = now.saturating_add(delay);
        // Keep the vector sorted by (deadline, id); ids grow monotonically so
        // inserting after every entry with deadline <= ours preserves FIFO ties.
        let idx = self.entries.partition_point(|e| e.deadline <= deadline);
        self.entries.insert(
            idx,
            TimerEntry {
                deadline,
                id,
                payload,
            },
        );
        id
    }

    /// Remove and return every entry whose deadline is `<= now`.
    pub fn pop_due(&mut self, now: Duration) -> Vec<T> {
        let due = self.entries.partition_point(|e| e.deadline <= now);
        self.entries.drain(..due).map(|e| e.payload).collect()
    }

    /// Earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.first().map(|e| e.deadline)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Latest-wins debouncer, generic over the wrapped callback's arguments.
///
/// The wrapped callback itself stays with the caller: `poll` hands back the
/// arguments of the winning call once the quiet window has elapsed.
#[derive(Debug, Clone)]
pub struct Debouncer<A> {
    wait: Duration,
    pending: Option<(Duration, A)>,
    superseded: u64,
}

impl<A> Debouncer<A> {
    #[must_use]
    pub const fn new(wait: Duration) -> Self {
        Self {
            wait,
            pending: None,
            superseded: 0,
        }
    }

    /// Record a call. Any pending call is discarded and the wait restarts.
    pub fn call(&mut self, args: A, now: Duration) {
        if self.pending.is_some() {
            self.superseded += 1;
        }
        self.pending = Some((now.saturating_add(self.wait), args));
    }

    /// Take the pending arguments if the quiet window has elapsed.
    pub fn poll(&mut self, now: Duration) -> Option<A> {
        match &self.pending {
            Some((deadline, _)) if *deadline <= now => self.pending.take().map(|(_, a)| a),
            _ => None,
        }
    }

    /// Deadline of the pending call, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Duration> {
        self.pending.as_ref().map(|(d, _)| *d)
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Number of calls discarded because a newer one replaced them.
    #[must_use]
    pub fn superseded(&self) -> u64 {
        self.superseded
    }

    #[must_use]
    pub fn wait(&self) -> Duration {
        self.wait
    }
}

/// Throttle for work that should run at most once per animation frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct FrameGate {
    pending: bool,
}

impl FrameGate {
    #[must_use]
    pub const fn new() -> Self {
        Self { pending: false }
    }

    /// Mark work as pending. Returns `true` when the host must schedule a new
    /// frame, `false` when one is already scheduled.
    pub fn request(&mut self) -> bool {
        !core::mem::replace(&mut self.pending, true)
    }

    /// Consume the pending request on frame delivery.
    pub fn take(&mut self) -> bool {
        core::mem::take(&mut self.pending)
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending
    }
}
