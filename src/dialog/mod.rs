//! Modal Dialog Module
//!
//! Blocking informational dialogs for the terminal. The TUI presenter draws
//! a centered box over an alternate screen and waits for a dismissing key;
//! the console presenter just prints, for `--plain` and non-interactive runs.

use std::io::IsTerminal;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};

/// A modal dialog: title, body text, optional cancel affordance
#[derive(Debug, Clone)]
pub struct Modal {
    pub title: String,
    pub content: String,
    pub show_cancel: bool,
}

impl Modal {
    /// Informational modal without a cancel option
    pub fn info(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            show_cancel: false,
        }
    }
}

/// Presents modals to the user
pub trait Presenter {
    /// Show the modal, blocking until it is dismissed
    fn show(&self, modal: &Modal) -> Result<()>;
}

/// Pick a presenter for the current run
pub fn default_presenter(plain: bool) -> Box<dyn Presenter> {
    if plain || !std::io::stdout().is_terminal() {
        Box::new(ConsolePresenter)
    } else {
        Box::new(TuiPresenter)
    }
}

// ========================================
// Console presenter
// ========================================

/// Prints the modal to stdout, no interaction
pub struct ConsolePresenter;

impl Presenter for ConsolePresenter {
    fn show(&self, modal: &Modal) -> Result<()> {
        println!("== {} ==", modal.title);
        println!("{}", modal.content.trim_end());
        Ok(())
    }
}

// ========================================
// TUI presenter
// ========================================

/// Draws a centered blocking modal box, dismissed with Enter/Esc/q
pub struct TuiPresenter;

impl Presenter for TuiPresenter {
    fn show(&self, modal: &Modal) -> Result<()> {
        // 1. Setup Terminal
        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // 2. Draw + wait loop
        let result = run_modal(&mut terminal, modal);

        // 3. Restore Terminal (always, even if drawing failed)
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }
}

fn run_modal<B: Backend>(terminal: &mut Terminal<B>, modal: &Modal) -> Result<()> {
    loop {
        terminal.draw(|f| draw_modal(f, modal))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') => break,
                    _ => {}
                }
            }
        }
    }
    Ok(())
}

fn draw_modal(f: &mut Frame, modal: &Modal) {
    let area = modal_area(f.area(), &modal.content);

    let footer = if modal.show_cancel {
        "Enter: OK | Esc: Cancel"
    } else {
        "Press Enter to close"
    };

    let text = format!("{}\n\n{}", modal.content.trim_end(), footer);
    let body = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(modal.title.clone()));

    f.render_widget(Clear, area);
    f.render_widget(body, area);
}

/// Center the modal box; size follows the content within screen bounds
fn modal_area(screen: Rect, content: &str) -> Rect {
    let content_width = content.lines().map(|l| l.chars().count()).max().unwrap_or(0) as u16;
    let content_height = content.lines().count() as u16;

    // borders + footer line + blank spacer
    let width = (content_width + 4).clamp(30, screen.width.saturating_sub(2).max(30));
    let height = (content_height + 5).clamp(5, screen.height.saturating_sub(2).max(5));

    let x = screen.x + screen.width.saturating_sub(width) / 2;
    let y = screen.y + screen.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(screen.width), height.min(screen.height))
}
