use once_cell::sync::Lazy;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};
use std::sync::Mutex;

pub enum Notice {
    Info(String),
    Error(String),
}

pub struct NoticeBoard {
    current: Option<Notice>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        NoticeBoard { current: None }
    }

    pub fn set_info(&mut self, message: String) {
        self.current = Some(Notice::Info(message));
    }

    pub fn set_error(&mut self, message: String) {
        self.current = Some(Notice::Error(message));
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

pub static NOTICES: Lazy<Mutex<NoticeBoard>> = Lazy::new(|| Mutex::new(NoticeBoard::new()));

pub fn render_notice(f: &mut Frame, area: Rect) {
    let board = NOTICES.lock().unwrap();
    if let Some(notice) = &board.current {
        let paragraph = match notice {
            Notice::Info(message) => {
                Paragraph::new(message.as_str()).style(Style::default().fg(Color::DarkGray))
            }
            Notice::Error(message) => {
                Paragraph::new(message.as_str()).style(Style::default().fg(Color::Red))
            }
        };
        f.render_widget(paragraph, area);
    }
}

pub fn set_info(message: String) {
    NOTICES.lock().unwrap().set_info(message);
}

pub fn set_error(message: String) {
    NOTICES.lock().unwrap().set_error(message);
}

pub fn clear() {
    NOTICES.lock().unwrap().clear();
}
