use std::time::{Duration, Instant};

pub const IDLE_DELAY: Duration = Duration::from_millis(1200);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

/// Hides chrome while typing and restores it after a quiet period.
pub struct VisibilityController {
    state: Visibility,
    idle_delay: Duration,
    return_due: Option<Instant>,
}

impl VisibilityController {
    pub fn new(idle_delay: Duration) -> Self {
        Self {
            state: Visibility::Visible,
            idle_delay,
            return_due: None,
        }
    }

    pub fn state(&self) -> Visibility {
        self.state
    }

    // Re-arming replaces any pending deadline, so only one timer is ever live.
    pub fn note_typing(&mut self, now: Instant) {
        self.state = Visibility::Hidden;
        self.return_due = Some(now + self.idle_delay);
    }

    /// Returns true when the idle deadline fired and the state changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.return_due {
            Some(due) if now >= due => {
                self.return_due = None;
                self.state = Visibility::Visible;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.return_due = None;
    }
}
