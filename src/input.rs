use std::env;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceClass {
    Keyboard,
    Touch,
}

/// Classified once at startup; the result is held by the session, never
/// re-evaluated per event.
pub fn classify_device() -> DeviceClass {
    // Android terminals (Termux and friends) type through an on-screen
    // keyboard, the closest thing a terminal has to a touch device.
    if env::var_os("TERMUX_VERSION").is_some() || env::var_os("ANDROID_ROOT").is_some() {
        DeviceClass::Touch
    } else {
        DeviceClass::Keyboard
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditOp {
    Insert(char),
    DeleteLast,
    Newline,
    AppendRun(String),
}

/// A raw input source translated into edit operations. Events that do not
/// map to an operation return `None` and keep their native behavior.
pub trait InputChannel {
    fn translate(&mut self, event: &Event) -> Option<EditOp>;
}

pub fn channel_for(device: DeviceClass) -> Box<dyn InputChannel> {
    match device {
        DeviceClass::Keyboard => Box::new(DirectKeyChannel),
        DeviceClass::Touch => Box::new(RelayChannel),
    }
}

const PASS_THROUGH: KeyModifiers = KeyModifiers::CONTROL
    .union(KeyModifiers::ALT)
    .union(KeyModifiers::SUPER)
    .union(KeyModifiers::META);

// Shared classification so both channels apply identical edit semantics.
fn classify_key(key: &KeyEvent) -> Option<EditOp> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    // Shortcuts stay with the host; everything modified passes through.
    if key.modifiers.intersects(PASS_THROUGH) {
        return None;
    }
    match key.code {
        KeyCode::Backspace => Some(EditOp::DeleteLast),
        KeyCode::Enter => Some(EditOp::Newline),
        KeyCode::Char(c) => Some(EditOp::Insert(c)),
        _ => None,
    }
}

/// Direct key capture for physical keyboards.
pub struct DirectKeyChannel;

impl InputChannel for DirectKeyChannel {
    fn translate(&mut self, event: &Event) -> Option<EditOp> {
        match event {
            Event::Key(key) => classify_key(key),
            _ => None,
        }
    }
}

/// Indirect relay for touch devices. Backspace and Enter still arrive as
/// discrete key signals; composed or autocorrected input lands as a
/// bracketed-paste chunk carrying only the newly inserted text.
pub struct RelayChannel;

impl InputChannel for RelayChannel {
    fn translate(&mut self, event: &Event) -> Option<EditOp> {
        match event {
            Event::Key(key) => classify_key(key),
            Event::Paste(run) => Some(EditOp::AppendRun(run.clone())),
            _ => None,
        }
    }
}
