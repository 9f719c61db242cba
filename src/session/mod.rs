use crossterm::event::Event;
use ropey::{Rope, RopeSlice};
use std::time::Instant;
use unicode_width::UnicodeWidthChar;

use crate::input::{channel_for, DeviceClass, EditOp, InputChannel};
use crate::sync::SyncScheduler;
use crate::visibility::{Visibility, VisibilityController, IDLE_DELAY};

mod buffer;

pub use buffer::TextBuffer;

/// One editing session: the authoritative buffer, the input channel picked
/// for this device, and the timers that pace everything around it.
pub struct Session {
    buffer: TextBuffer,
    snapshot: Rope,
    channel: Box<dyn InputChannel>,
    visibility: VisibilityController,
    sync: SyncScheduler,
    scroll_offset: usize,
}

impl Session {
    pub fn new(device: DeviceClass) -> Self {
        Self {
            buffer: TextBuffer::new(),
            snapshot: Rope::new(),
            channel: channel_for(device),
            visibility: VisibilityController::new(IDLE_DELAY),
            sync: SyncScheduler::new(device),
            scroll_offset: 0,
        }
    }

    /// Feeds one raw terminal event through the active channel. Returns true
    /// if it produced an accepted edit.
    pub fn handle_event(&mut self, event: &Event, now: Instant) -> bool {
        let Some(op) = self.channel.translate(event) else {
            return false;
        };
        self.apply(op, now);
        true
    }

    // Mutate first, then notify: visibility reset, debounced snapshot
    // refresh, throttled scroll request.
    pub fn apply(&mut self, op: EditOp, now: Instant) {
        match op {
            EditOp::Insert(ch) => self.buffer.insert_char(ch),
            EditOp::DeleteLast => self.buffer.delete_last(),
            EditOp::Newline => self.buffer.insert_newline(),
            EditOp::AppendRun(run) => self.buffer.append_run(&run),
        }
        self.visibility.note_typing(now);
        self.sync.note_edit(now);
        self.sync.request_scroll(now);
    }

    /// Fires any timers that have come due. Returns true if something
    /// observable changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = self.visibility.tick(now);
        if self.sync.snapshot_ready(now) {
            self.snapshot = self.buffer.snapshot();
            changed = true;
        }
        changed
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility.state()
    }

    pub fn snapshot(&self) -> &Rope {
        &self.snapshot
    }

    /// The exact current buffer value. Export reads this, never the
    /// debounced snapshot, so the freshest keystroke makes it to the page.
    pub fn export_text(&self) -> String {
        self.buffer.current_value()
    }

    pub fn take_scroll(&mut self) -> bool {
        self.sync.take_scroll()
    }

    pub fn scroll_to_end(&mut self, viewport_width: usize, viewport_height: usize) {
        let total = visual_line_count(&self.snapshot, viewport_width);
        self.scroll_offset = total.saturating_sub(viewport_height);
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Caret cell for the end of the snapshot, in unscrolled visual space.
    pub fn caret(&self, viewport_width: usize) -> (usize, usize) {
        if viewport_width == 0 {
            return (0, 0);
        }
        let lines = self.snapshot.len_lines();
        let mut row = 0;
        for idx in 0..lines.saturating_sub(1) {
            row += rows_for_width(line_width(self.snapshot.line(idx)), viewport_width);
        }
        let last = line_width(self.snapshot.line(lines - 1));
        row += last / viewport_width;
        (row, last % viewport_width)
    }

    pub fn teardown(&mut self) {
        self.visibility.cancel();
        self.sync.cancel();
    }
}

/// Height of the snapshot in visual lines once wrapped to `width` cells.
pub fn visual_line_count(text: &Rope, width: usize) -> usize {
    if width == 0 {
        return text.len_lines();
    }
    text.lines()
        .map(|line| rows_for_width(line_width(line), width))
        .sum()
}

fn rows_for_width(cells: usize, width: usize) -> usize {
    if cells == 0 {
        1
    } else {
        cells.div_ceil(width)
    }
}

fn line_width(line: RopeSlice) -> usize {
    line.chars()
        .filter(|ch| *ch != '\n')
        .map(|ch| ch.width().unwrap_or(0))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn edit(session: &mut Session, op: EditOp, at: Instant) {
        session.apply(op, at);
    }

    #[test]
    fn accepted_edits_mutate_then_notify() {
        let mut session = Session::new(DeviceClass::Keyboard);
        let t0 = Instant::now();

        edit(&mut session, EditOp::Insert('h'), t0);
        edit(&mut session, EditOp::Insert('i'), t0);
        edit(&mut session, EditOp::Newline, t0);
        edit(&mut session, EditOp::Insert('x'), t0);

        assert_eq!(session.export_text(), "hi\nx");
        assert_eq!(session.visibility(), Visibility::Hidden);
        // The snapshot has not been refreshed inside the debounce window.
        assert_eq!(session.snapshot().to_string(), "");
    }

    #[test]
    fn snapshot_converges_after_the_debounce_window() {
        let mut session = Session::new(DeviceClass::Keyboard);
        let t0 = Instant::now();

        edit(&mut session, EditOp::AppendRun("burst".into()), t0);
        edit(&mut session, EditOp::Insert('!'), t0 + Duration::from_millis(100));

        assert!(!session.tick(t0 + Duration::from_millis(200)));
        assert_eq!(session.snapshot().to_string(), "");

        assert!(session.tick(t0 + Duration::from_millis(400)));
        assert_eq!(session.snapshot().to_string(), "burst!");
    }

    #[test]
    fn export_reads_the_live_value_inside_the_window() {
        let mut session = Session::new(DeviceClass::Keyboard);
        let t0 = Instant::now();
        edit(&mut session, EditOp::Insert('a'), t0);
        assert_eq!(session.export_text(), "a");
        assert_eq!(session.snapshot().to_string(), "");
    }

    #[test]
    fn idle_return_fires_through_tick() {
        let mut session = Session::new(DeviceClass::Keyboard);
        let t0 = Instant::now();
        edit(&mut session, EditOp::Insert('a'), t0);
        // Let the snapshot refresh fire first, then watch the idle return.
        session.tick(t0 + Duration::from_millis(300));
        assert!(!session.tick(t0 + Duration::from_millis(500)));
        assert_eq!(session.visibility(), Visibility::Hidden);
        assert!(session.tick(t0 + Duration::from_millis(1500)));
        assert_eq!(session.visibility(), Visibility::Visible);
    }

    #[test]
    fn scroll_lands_at_the_end_of_content() {
        let mut session = Session::new(DeviceClass::Keyboard);
        let t0 = Instant::now();
        for _ in 0..9 {
            edit(&mut session, EditOp::Newline, t0);
        }
        session.tick(t0 + Duration::from_millis(300));

        // Ten logical lines in a five-line viewport.
        assert!(session.take_scroll());
        session.scroll_to_end(80, 5);
        assert_eq!(session.scroll_offset(), 5);
    }

    #[test]
    fn wrapped_lines_count_toward_visual_height() {
        let mut rope = Rope::new();
        rope.insert(0, "aaaaaaaaaa\nbb\n");
        // Width 4: "aaaaaaaaaa" needs 3 rows, "bb" one, trailing line one.
        assert_eq!(visual_line_count(&rope, 4), 5);
    }

    #[test]
    fn caret_tracks_the_snapshot_end() {
        let mut session = Session::new(DeviceClass::Keyboard);
        let t0 = Instant::now();
        edit(&mut session, EditOp::AppendRun("hello\nworld".into()), t0);
        session.tick(t0 + Duration::from_millis(300));
        assert_eq!(session.caret(80), (1, 5));
    }

    #[test]
    fn teardown_cancels_outstanding_timers() {
        let mut session = Session::new(DeviceClass::Keyboard);
        let t0 = Instant::now();
        edit(&mut session, EditOp::Insert('a'), t0);
        session.teardown();
        assert!(!session.tick(t0 + Duration::from_millis(2000)));
        assert_eq!(session.visibility(), Visibility::Hidden);
        assert_eq!(session.snapshot().to_string(), "");
    }
}
