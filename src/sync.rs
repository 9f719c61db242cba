use std::time::{Duration, Instant};

use crate::input::DeviceClass;

pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(250);

// Touch keyboards redraw the screen on every scroll, so back off harder there.
const TOUCH_SCROLL_GAP: Duration = Duration::from_millis(120);
const KEY_SCROLL_GAP: Duration = Duration::from_millis(16);

/// Decouples the fast-mutating buffer from the render snapshot (debounce)
/// and rate-limits scroll-to-end requests (throttle).
pub struct SyncScheduler {
    debounce: Duration,
    snapshot_due: Option<Instant>,
    scroll_gap: Duration,
    last_scroll: Option<Instant>,
    scroll_pending: bool,
}

impl SyncScheduler {
    pub fn new(device: DeviceClass) -> Self {
        let scroll_gap = match device {
            DeviceClass::Touch => TOUCH_SCROLL_GAP,
            DeviceClass::Keyboard => KEY_SCROLL_GAP,
        };
        Self {
            debounce: DEBOUNCE_WINDOW,
            snapshot_due: None,
            scroll_gap,
            last_scroll: None,
            scroll_pending: false,
        }
    }

    // Every edit restarts the window; only the most recent schedule fires.
    pub fn note_edit(&mut self, now: Instant) {
        self.snapshot_due = Some(now + self.debounce);
    }

    /// Consumes the snapshot deadline if it has come due.
    pub fn snapshot_ready(&mut self, now: Instant) -> bool {
        match self.snapshot_due {
            Some(due) if now >= due => {
                self.snapshot_due = None;
                true
            }
            _ => false,
        }
    }

    // Requests inside the minimum gap are dropped, not queued; the next
    // accepted request targets the end of content anyway.
    pub fn request_scroll(&mut self, now: Instant) {
        if let Some(last) = self.last_scroll {
            if now.duration_since(last) < self.scroll_gap {
                return;
            }
        }
        self.last_scroll = Some(now);
        self.scroll_pending = true;
    }

    /// Consumes the single pending scroll execution, if any.
    pub fn take_scroll(&mut self) -> bool {
        std::mem::take(&mut self.scroll_pending)
    }

    pub fn cancel(&mut self) {
        self.snapshot_due = None;
        self.scroll_pending = false;
    }
}
