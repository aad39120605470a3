//! Frame-callback host abstraction.
//!
//! The engine never owns a clock or a render loop. A [`FrameHost`] supplies
//! the current time and a "call me before the next repaint" primitive; a
//! windowing backend implements it over its redraw requests, and
//! [`ManualFrameHost`] implements it over a virtual clock for headless use
//! and tests.

use std::cell::{Cell, RefCell};

use rune_config::SchedulerConfig;

/// Callback invoked with the frame timestamp in milliseconds.
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// Cancellation handle for a requested frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// The frame-scheduling primitive the engine consumes.
///
/// Callbacks run at most once, strictly after `request_frame` returns.
pub trait FrameHost {
    /// Current time in milliseconds.
    fn now_ms(&self) -> f64;

    /// Ask for `callback` to run before the next repaint.
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle;

    /// Drop a pending request. Unknown or already-run handles are ignored.
    fn cancel_frame(&self, handle: FrameHandle);

    /// Hint that nothing is visible, so animations may skip to their end.
    fn is_offscreen(&self) -> bool {
        false
    }
}

/// Deterministic host driven by explicit calls to [`ManualFrameHost::advance`].
pub struct ManualFrameHost {
    now: Cell<f64>,
    next_id: Cell<u64>,
    requests: Cell<usize>,
    offscreen: Cell<bool>,
    frame_interval_ms: f64,
    pending: RefCell<Vec<(FrameHandle, FrameCallback)>>,
}

impl Default for ManualFrameHost {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualFrameHost {
    pub fn new() -> Self {
        Self::with_frame_interval(SchedulerConfig::default().frame_interval_ms)
    }

    pub fn with_frame_interval(frame_interval_ms: f64) -> Self {
        Self {
            now: Cell::new(0.0),
            next_id: Cell::new(1),
            requests: Cell::new(0),
            offscreen: Cell::new(false),
            frame_interval_ms,
            pending: RefCell::new(Vec::new()),
        }
    }

    pub fn from_config(config: &SchedulerConfig) -> Self {
        Self::with_frame_interval(config.frame_interval_ms)
    }

    pub fn frame_interval_ms(&self) -> f64 {
        self.frame_interval_ms
    }

    /// Total number of `request_frame` calls so far.
    pub fn request_count(&self) -> usize {
        self.requests.get()
    }

    /// Requests that have neither run nor been cancelled.
    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn set_offscreen(&self, offscreen: bool) {
        self.offscreen.set(offscreen);
    }

    /// Move the clock forward by `ms` and run every callback that was
    /// pending at the time of the call, in request order.
    ///
    /// Callbacks requested while this runs wait for the next advance.
    pub fn advance(&self, ms: f64) {
        let now = self.now.get() + ms;
        self.now.set(now);
        let cutoff = self.next_id.get();

        loop {
            let next = {
                let mut pending = self.pending.borrow_mut();
                pending
                    .iter()
                    .position(|(handle, _)| handle.0 < cutoff)
                    .map(|index| pending.remove(index))
            };
            match next {
                Some((_, callback)) => callback(now),
                None => break,
            }
        }
    }

    /// Advance by one nominal frame interval.
    pub fn advance_frame(&self) {
        self.advance(self.frame_interval_ms);
    }
}

impl FrameHost for ManualFrameHost {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }

    fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
        let handle = FrameHandle(self.next_id.get());
        self.next_id.set(handle.0 + 1);
        self.requests.set(self.requests.get() + 1);
        self.pending.borrow_mut().push((handle, callback));
        handle
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        self.pending.borrow_mut().retain(|(h, _)| *h != handle);
    }

    fn is_offscreen(&self) -> bool {
        self.offscreen.get()
    }
}
