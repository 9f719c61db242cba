use anyhow::Result;
use crossterm::{
    event::{
        self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Position},
    prelude::CrosstermBackend,
    style::{Color, Style},
    text::Line,
    widgets::{Paragraph, Wrap},
    Terminal,
};
use std::{
    io,
    time::{Duration, Instant},
};

mod export;
mod input;
mod notice;
mod session;
mod sync;
mod visibility;

use export::{PaginationExporter, APP_NAME};
use input::classify_device;
use session::Session;
use visibility::Visibility;

const TICK: Duration = Duration::from_millis(16);

fn main() -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut session = Session::new(classify_device());
    let mut exporter = PaginationExporter::new();

    let result = run(&mut terminal, &mut session, &mut exporter);

    session.teardown();
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    session: &mut Session,
    exporter: &mut PaginationExporter,
) -> Result<()> {
    loop {
        terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints(
                    [
                        Constraint::Length(1),
                        Constraint::Min(1),
                        Constraint::Length(1),
                    ]
                    .as_ref(),
                )
                .split(f.area());

            let content_area = chunks[1];
            let width = content_area.width as usize;
            let height = content_area.height as usize;

            // Scroll execution is deferred to the draw, never run inside the
            // input handler.
            if session.take_scroll() {
                session.scroll_to_end(width, height);
            }

            if session.visibility() == Visibility::Visible {
                let menu = Line::styled(
                    format!(" {APP_NAME}   ^E export   ^Q quit"),
                    Style::default().fg(Color::DarkGray),
                );
                f.render_widget(menu, chunks[0]);
            }

            let content = Paragraph::new(session.snapshot().to_string())
                .wrap(Wrap { trim: false })
                .scroll((session.scroll_offset() as u16, 0));
            f.render_widget(content, content_area);

            // Caret at the end of the snapshot; the row is an estimate when
            // word wrapping shortens visual lines.
            let (row, col) = session.caret(width);
            if row >= session.scroll_offset() {
                let y = row - session.scroll_offset();
                if y < height {
                    f.set_cursor_position(Position::new(
                        content_area.x + (col as u16).min(content_area.width.saturating_sub(1)),
                        content_area.y + y as u16,
                    ));
                }
            }

            notice::render_notice(f, chunks[2]);
        })?;

        if event::poll(TICK)? {
            let ev = event::read()?;
            let now = Instant::now();
            match &ev {
                Event::Key(key) if is_ctrl(key, 'q') => break,
                Event::Key(key) if is_ctrl(key, 'e') => {
                    match exporter.export(&session.export_text()) {
                        Ok(path) => notice::set_info(format!("saved {}", path.display())),
                        Err(err) => notice::set_error(format!("export failed: {err}")),
                    }
                }
                _ => {
                    if session.handle_event(&ev, now) {
                        notice::clear();
                    }
                }
            }
        }

        session.tick(Instant::now());
    }

    Ok(())
}

fn is_ctrl(key: &KeyEvent, ch: char) -> bool {
    key.kind != KeyEventKind::Release
        && key.modifiers.contains(KeyModifiers::CONTROL)
        && key.code == KeyCode::Char(ch)
}
