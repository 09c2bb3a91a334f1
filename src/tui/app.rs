//! Application loop and key routing.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use jiff::civil::Date;
use ratatui::{DefaultTerminal, Frame};
use tracing::error;

use crate::mail::Handoff;
use crate::wizard::{State, Wizard};

use super::screens::{FormScreen, HomeScreen, success};

/// Shown when the mail composer could not be opened.
pub const HANDOFF_ALERT: &str = "Failed to schedule interview. Please try again.";

/// Longest wait between redraws while the success view counts down.
const TICK: Duration = Duration::from_secs(1);

/// Whether the loop should keep going after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// The wizard plus everything the terminal needs to drive it.
pub struct App<'a> {
    wizard: Wizard,
    handoff: &'a dyn Handoff,
    today: fn() -> Date,
    home: HomeScreen,
    form: Option<FormScreen>,
    alert: Option<&'static str>,
}

impl<'a> App<'a> {
    pub fn new(wizard: Wizard, handoff: &'a dyn Handoff, home: HomeScreen, today: fn() -> Date) -> Self {
        Self {
            wizard,
            handoff,
            today,
            home,
            form: None,
            alert: None,
        }
    }

    pub fn wizard(&self) -> &Wizard {
        &self.wizard
    }

    pub fn alert(&self) -> Option<&'static str> {
        self.alert
    }

    /// Route one key press.
    pub fn on_key(&mut self, key: KeyEvent) -> Flow {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Flow::Quit;
        }

        if self.alert.take().is_some() {
            return Flow::Continue;
        }

        match self.wizard.state() {
            State::Closed => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Flow::Quit,
                KeyCode::Enter => self.open(),
                _ => {}
            },
            State::Editing(_) => self.on_editing_key(key),
            State::Submitting => {}
            State::Submitted => self.wizard.close(),
        }

        if !self.wizard.is_open() {
            self.form = None;
        }
        Flow::Continue
    }

    /// Fire the pending reset timer if it is due.
    pub fn on_tick(&mut self, now: Instant) {
        if let Some(timer) = self.wizard.pending_reset()
            && self.wizard.fire_reset(timer, now)
        {
            self.form = None;
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        if self.wizard.is_submitted()
            && let Some(draft) = self.wizard.draft()
        {
            let remaining = self
                .wizard
                .pending_reset()
                .map(|t| t.remaining(Instant::now()));
            success::render(frame, draft, remaining);
            return;
        }

        match &self.form {
            Some(form) if self.wizard.is_open() => form.render(frame, &self.wizard, self.alert()),
            _ => self.home.render(frame),
        }
    }

    fn open(&mut self) {
        self.wizard.open((self.today)());
        self.form = self.wizard.min_date().map(FormScreen::new);
    }

    fn on_editing_key(&mut self, key: KeyEvent) {
        let Some(form) = self.form.as_mut() else {
            // Editing without a form can only mean state drifted; start over.
            self.wizard.close();
            return;
        };

        match key.code {
            KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.wizard.close();
            }
            KeyCode::Esc => {
                self.wizard.back();
            }
            KeyCode::Enter => {
                if let Err(e) = self.wizard.submit(self.handoff, Instant::now()) {
                    error!(session = ?self.wizard.session_id(), error = %e, "failed to hand off interview request");
                    self.alert = Some(HANDOFF_ALERT);
                }
            }
            KeyCode::Tab => form.focus_next(&self.wizard),
            KeyCode::BackTab => form.focus_previous(&self.wizard),
            KeyCode::Up => form.on_up(&self.wizard),
            KeyCode::Down => form.on_down(&self.wizard),
            KeyCode::Left => form.on_left(&self.wizard),
            KeyCode::Right => form.on_right(&self.wizard),
            KeyCode::Backspace => form.on_backspace(&mut self.wizard),
            KeyCode::Char(c) => form.on_char(&mut self.wizard, c),
            _ => {}
        }
    }
}

/// Runs the TUI event loop until the user quits.
pub fn run(app: &mut App<'_>) -> io::Result<()> {
    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, app);
    ratatui::restore();
    result
}

fn event_loop(terminal: &mut DefaultTerminal, app: &mut App<'_>) -> io::Result<()> {
    loop {
        terminal.draw(|frame| app.render(frame))?;

        // Wake up for the reset timer even if no key arrives.
        let ready = match app.wizard().pending_reset() {
            Some(timer) => event::poll(timer.remaining(Instant::now()).min(TICK))?,
            None => true,
        };

        if ready
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && app.on_key(key) == Flow::Quit
        {
            return Ok(());
        }

        app.on_tick(Instant::now());
    }
}
