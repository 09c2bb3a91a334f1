//! The wizard form: contact details, date and time, message.

use jiff::ToSpan;
use jiff::civil::Date;
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap},
};
use tracing::debug;

use crate::model::{Field, MIN_MESSAGE_CHARS, Step, TimeSlot, long_date};
use crate::wizard::Wizard;

/// Slot grid width.
const SLOT_COLUMNS: u8 = 3;

/// Days in a calendar row.
const WEEK: i64 = 7;

const ACCENT: Color = Color::Cyan;

/// Which half of the schedule step has the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScheduleFocus {
    Calendar,
    Slots,
}

/// Cursor and focus state for the form. The draft itself lives in the wizard.
pub struct FormScreen {
    contact_focus: usize,
    schedule_focus: ScheduleFocus,
    calendar_cursor: Date,
    slot_cursor: usize,
}

impl FormScreen {
    /// A form whose calendar starts on the earliest selectable date.
    pub fn new(min_date: Date) -> Self {
        Self {
            contact_focus: 0,
            schedule_focus: ScheduleFocus::Calendar,
            calendar_cursor: min_date,
            slot_cursor: 0,
        }
    }

    // ── Input ──

    pub fn focus_next(&mut self, wizard: &Wizard) {
        match wizard.step() {
            Some(Step::Contact) => self.move_contact_focus(1),
            Some(Step::Schedule) => self.toggle_schedule_focus(),
            _ => {}
        }
    }

    pub fn focus_previous(&mut self, wizard: &Wizard) {
        match wizard.step() {
            Some(Step::Contact) => self.move_contact_focus(-1),
            Some(Step::Schedule) => self.toggle_schedule_focus(),
            _ => {}
        }
    }

    pub fn on_up(&mut self, wizard: &Wizard) {
        match wizard.step() {
            Some(Step::Contact) => self.move_contact_focus(-1),
            Some(Step::Schedule) => self.move_schedule_cursor(wizard, -WEEK, -isize::from(SLOT_COLUMNS)),
            _ => {}
        }
    }

    pub fn on_down(&mut self, wizard: &Wizard) {
        match wizard.step() {
            Some(Step::Contact) => self.move_contact_focus(1),
            Some(Step::Schedule) => self.move_schedule_cursor(wizard, WEEK, isize::from(SLOT_COLUMNS)),
            _ => {}
        }
    }

    pub fn on_left(&mut self, wizard: &Wizard) {
        if wizard.step() == Some(Step::Schedule) {
            self.move_schedule_cursor(wizard, -1, -1);
        }
    }

    pub fn on_right(&mut self, wizard: &Wizard) {
        if wizard.step() == Some(Step::Schedule) {
            self.move_schedule_cursor(wizard, 1, 1);
        }
    }

    /// Type a character. On the schedule step, space picks what the cursor is on.
    pub fn on_char(&mut self, wizard: &mut Wizard, c: char) {
        match wizard.step() {
            Some(Step::Schedule) => {
                if c == ' ' {
                    self.pick(wizard);
                }
            }
            Some(_) => {
                if let Some(field) = self.text_field(wizard) {
                    edit_text(wizard, field, |text| text.push(c));
                }
            }
            None => {}
        }
    }

    pub fn on_backspace(&mut self, wizard: &mut Wizard) {
        if let Some(field) = self.text_field(wizard) {
            edit_text(wizard, field, |text| {
                text.pop();
            });
        }
    }

    /// The text field receiving keystrokes, if any.
    fn text_field(&self, wizard: &Wizard) -> Option<Field> {
        match wizard.step()? {
            Step::Contact => Step::Contact.fields().get(self.contact_focus).copied(),
            Step::Schedule => None,
            Step::Message => Some(Field::Message),
        }
    }

    fn move_contact_focus(&mut self, delta: isize) {
        let count = Step::Contact.fields().len();
        self.contact_focus = self
            .contact_focus
            .saturating_add_signed(delta)
            .min(count - 1);
    }

    fn toggle_schedule_focus(&mut self) {
        self.schedule_focus = match self.schedule_focus {
            ScheduleFocus::Calendar => ScheduleFocus::Slots,
            ScheduleFocus::Slots => ScheduleFocus::Calendar,
        };
    }

    fn move_schedule_cursor(&mut self, wizard: &Wizard, days: i64, slots: isize) {
        match self.schedule_focus {
            ScheduleFocus::Calendar => {
                let min = wizard.min_date().unwrap_or(self.calendar_cursor);
                let moved = self
                    .calendar_cursor
                    .checked_add(days.days())
                    .unwrap_or(self.calendar_cursor);
                self.calendar_cursor = moved.max(min);
            }
            ScheduleFocus::Slots => {
                let last = TimeSlot::ALL.len() - 1;
                self.slot_cursor = self
                    .slot_cursor
                    .saturating_add_signed(slots)
                    .min(last);
            }
        }
    }

    fn pick(&self, wizard: &mut Wizard) {
        let result = match self.schedule_focus {
            ScheduleFocus::Calendar => wizard.set_date(self.calendar_cursor.into()),
            ScheduleFocus::Slots => wizard.select_time(TimeSlot::ALL[self.slot_cursor]),
        };
        if let Err(e) = result {
            debug!(error = %e, "pick refused");
        }
    }

    // ── Rendering ──

    pub fn render(&self, frame: &mut Frame, wizard: &Wizard, alert: Option<&str>) {
        let area = frame.area();

        let chunks = Layout::vertical([
            Constraint::Length(3), // header
            Constraint::Length(2), // progress
            Constraint::Min(0),    // content
            Constraint::Length(1), // footer
        ])
        .split(area);

        let header = Paragraph::new(Line::from(vec![Span::styled(
            "Schedule Technical Interview",
            highlight(),
        )]))
        .block(Block::default().padding(Padding::new(2, 0, 1, 0)));
        frame.render_widget(header, chunks[0]);

        let current = wizard.step().unwrap_or(Step::Message);
        frame.render_widget(
            Paragraph::new(progress_line(current))
                .block(Block::default().padding(Padding::horizontal(2))),
            chunks[1],
        );

        let content_block = Block::default().padding(Padding::new(2, 2, 0, 0));
        let inner = content_block.inner(chunks[2]);
        match current {
            Step::Contact => self.render_contact(frame, inner, wizard),
            Step::Schedule => self.render_schedule(frame, inner, wizard),
            Step::Message => render_message(frame, inner, wizard),
        }

        frame.render_widget(Paragraph::new(footer_line(wizard, current)), chunks[3]);

        if let Some(message) = alert {
            render_alert(frame, message);
        }
    }

    fn render_contact(&self, frame: &mut Frame, area: Rect, wizard: &Wizard) {
        let draft = wizard.draft();
        let mut lines = Vec::new();
        for (i, field) in Step::Contact.fields().iter().enumerate() {
            let focused = i == self.contact_focus;
            let value = draft.and_then(|d| d.text(*field)).unwrap_or_default();
            lines.push(Line::from(Span::styled(
                format!("{} *", field.label()),
                if focused { highlight() } else { muted() },
            )));
            lines.push(input_line(value, placeholder(*field), focused));
            lines.push(Line::default());
        }
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_schedule(&self, frame: &mut Frame, area: Rect, wizard: &Wizard) {
        let chunks = Layout::vertical([
            Constraint::Length(10), // calendar
            Constraint::Length(6),  // slots
            Constraint::Min(0),     // selection summary
        ])
        .split(area);

        let draft = wizard.draft();
        let picked_date = draft.and_then(|d| d.date);
        let picked_time = draft.and_then(|d| d.time);
        let min = wizard.min_date().unwrap_or(self.calendar_cursor);

        let calendar_focused = self.schedule_focus == ScheduleFocus::Calendar;
        let mut lines = vec![Line::from(Span::styled(
            "Select Date *",
            if calendar_focused { highlight() } else { muted() },
        ))];
        lines.extend(calendar_lines(
            self.calendar_cursor,
            min,
            picked_date,
            calendar_focused,
        ));
        frame.render_widget(Paragraph::new(lines), chunks[0]);

        let slots_focused = self.schedule_focus == ScheduleFocus::Slots;
        let mut lines = vec![Line::from(Span::styled(
            "Select Time *",
            if slots_focused { highlight() } else { muted() },
        ))];
        for row in TimeSlot::ALL.chunks(usize::from(SLOT_COLUMNS)) {
            let spans: Vec<Span> = row
                .iter()
                .map(|slot| {
                    let mut style = if picked_time == Some(*slot) {
                        Style::default().fg(Color::Black).bg(ACCENT)
                    } else {
                        Style::default().fg(Color::Gray)
                    };
                    if slots_focused && slot.index() == self.slot_cursor {
                        style = style.add_modifier(Modifier::REVERSED);
                    }
                    Span::styled(format!(" {slot} "), style)
                })
                .flat_map(|span| [span, Span::raw("  ")])
                .collect();
            lines.push(Line::from(spans));
        }
        frame.render_widget(Paragraph::new(lines), chunks[1]);

        if let (Some(date), Some(time)) = (picked_date, picked_time) {
            let summary = vec![
                Line::from(Span::styled("Selected Schedule:", highlight())),
                Line::from(Span::styled(
                    format!("{} at {time}", long_date(date)),
                    Style::default().fg(Color::Gray),
                )),
            ];
            frame.render_widget(Paragraph::new(summary), chunks[2]);
        }
    }
}

fn render_message(frame: &mut Frame, area: Rect, wizard: &Wizard) {
    let message = wizard
        .draft()
        .map(|d| d.message.as_str())
        .unwrap_or_default();
    let count = message.chars().count();

    let mut lines = vec![
        Line::from(Span::styled("Additional Message *", highlight())),
        input_line(message, placeholder(Field::Message), true),
        Line::default(),
    ];
    let hint_style = if count > MIN_MESSAGE_CHARS {
        Style::default().fg(Color::Green)
    } else {
        muted()
    };
    lines.push(Line::from(Span::styled(
        format!("Minimum {MIN_MESSAGE_CHARS} characters required ({count} so far)"),
        hint_style,
    )));

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

/// `① ── ② ── ③` with finished steps checked.
fn progress_line(current: Step) -> Line<'static> {
    let mut spans = Vec::new();
    for step in Step::ALL {
        let reached = current >= step;
        let marker = if current > step {
            " ✓ ".to_string()
        } else {
            format!(" {} ", step.number())
        };
        let style = if reached {
            Style::default().fg(Color::Black).bg(ACCENT)
        } else {
            muted()
        };
        spans.push(Span::styled(marker, style));
        if step.next().is_some() {
            let bar = if current > step {
                Style::default().fg(ACCENT)
            } else {
                muted()
            };
            spans.push(Span::styled(" ──── ", bar));
        }
    }
    spans.push(Span::styled(format!("  {}", current.title()), muted()));
    Line::from(spans)
}

fn footer_line(wizard: &Wizard, current: Step) -> Line<'static> {
    let back = if current == Step::Contact {
        "Cancel"
    } else {
        "Back"
    };
    let forward = if wizard.is_submitting() {
        "Scheduling..."
    } else if current == Step::Message {
        "Schedule Interview"
    } else {
        "Continue"
    };
    let forward_style = if wizard.can_advance() {
        highlight()
    } else {
        muted()
    };

    let hint = match current {
        Step::Contact => "  tab next field",
        Step::Schedule => "  tab date/time  ←↑↓→ move  space pick",
        Step::Message => "",
    };

    Line::from(vec![
        Span::styled(format!(" esc {back}"), muted()),
        Span::styled("   ^W Close", muted()),
        Span::raw("   "),
        Span::styled(format!("⏎ {forward}"), forward_style),
        Span::styled(hint, muted()),
    ])
}

/// A month grid around `cursor`, Monday first.
fn calendar_lines(cursor: Date, min: Date, picked: Option<Date>, focused: bool) -> Vec<Line<'static>> {
    let first = cursor.first_of_month();
    let offset = usize::try_from(first.weekday().to_monday_zero_offset()).unwrap_or(0);
    let days = usize::try_from(first.days_in_month()).unwrap_or(0);

    let mut lines = vec![
        Line::from(Span::styled(
            cursor.strftime("%B %Y").to_string(),
            Style::default().fg(Color::White),
        )),
        Line::from(Span::styled("Mo Tu We Th Fr Sa Su", muted())),
    ];

    let mut week: Vec<Span> = vec![Span::raw("   "); offset];
    for (date, day) in first.series(1.day()).zip(1..=days) {
        let mut style = if date < min {
            Style::default().fg(Color::DarkGray)
        } else if picked == Some(date) {
            Style::default().fg(Color::Black).bg(ACCENT)
        } else {
            Style::default().fg(Color::Gray)
        };
        if focused && date == cursor {
            style = style.add_modifier(Modifier::REVERSED);
        }
        week.push(Span::styled(format!("{day:>2}"), style));
        week.push(Span::raw(" "));

        if (offset + day) % 7 == 0 {
            lines.push(Line::from(std::mem::take(&mut week)));
        }
    }
    if !week.is_empty() {
        lines.push(Line::from(week));
    }
    lines
}

fn input_line(value: &str, placeholder: &str, focused: bool) -> Line<'static> {
    let mut spans = vec![Span::styled(" › ", if focused { highlight() } else { muted() })];
    if value.is_empty() && !focused {
        spans.push(Span::styled(placeholder.to_string(), muted()));
    } else {
        spans.push(Span::styled(value.to_string(), Style::default().fg(Color::White)));
    }
    if focused {
        spans.push(Span::styled("█", muted()));
    }
    Line::from(spans)
}

fn placeholder(field: Field) -> &'static str {
    match field {
        Field::Name => "Your full name",
        Field::Email => "your.email@company.com",
        Field::Company => "Company name",
        Field::Position => "e.g., Senior Backend Developer",
        Field::Message => "Topics you'd like to discuss, technologies to focus on...",
        Field::Date | Field::Time => "",
    }
}

fn render_alert(frame: &mut Frame, message: &str) {
    let [area] = Layout::vertical([Constraint::Length(5)])
        .flex(Flex::Center)
        .areas(frame.area());
    let [area] = Layout::horizontal([Constraint::Length(56)])
        .flex(Flex::Center)
        .areas(area);

    let alert = Paragraph::new(vec![
        Line::from(Span::styled(message.to_string(), Style::default().fg(Color::White))),
        Line::from(Span::styled("press any key", muted())),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(Clear, area);
    frame.render_widget(alert, area);
}

/// Rewrite one text field of the draft through `edit`.
fn edit_text(wizard: &mut Wizard, field: Field, edit: impl FnOnce(&mut String)) {
    let mut text = wizard
        .draft()
        .and_then(|d| d.text(field))
        .unwrap_or_default()
        .to_string();
    edit(&mut text);
    if let Err(e) = wizard.set_text(field, text) {
        debug!(%field, error = %e, "edit refused");
    }
}

fn muted() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn highlight() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::civil::date;

    const TODAY: Date = date(2026, 10, 16);

    fn opened() -> (Wizard, FormScreen) {
        let mut wizard = Wizard::default();
        wizard.open(TODAY);
        let form = FormScreen::new(wizard.min_date().unwrap());
        (wizard, form)
    }

    fn type_str(form: &mut FormScreen, wizard: &mut Wizard, s: &str) {
        for c in s.chars() {
            form.on_char(wizard, c);
        }
    }

    #[test]
    fn typing_goes_to_focused_contact_field() {
        let (mut wizard, mut form) = opened();
        type_str(&mut form, &mut wizard, "Jane");
        form.focus_next(&wizard);
        type_str(&mut form, &mut wizard, "jane@co.com");
        form.on_backspace(&mut wizard);

        let draft = wizard.draft().unwrap();
        assert_eq!(draft.name, "Jane");
        assert_eq!(draft.email, "jane@co.co");
    }

    #[test]
    fn contact_focus_stays_in_bounds() {
        let (wizard, mut form) = opened();
        form.on_up(&wizard);
        assert_eq!(form.contact_focus, 0);
        for _ in 0..10 {
            form.on_down(&wizard);
        }
        assert_eq!(form.contact_focus, 3);
    }

    #[test]
    fn calendar_never_moves_before_minimum() {
        let (mut wizard, mut form) = opened();
        for (field, value) in [
            (Field::Name, "Jane"),
            (Field::Email, "j@co.com"),
            (Field::Company, "Acme"),
            (Field::Position, "CTO"),
        ] {
            wizard.update(field, value).unwrap();
        }
        wizard.advance();

        form.on_left(&wizard);
        form.on_up(&wizard);
        assert_eq!(form.calendar_cursor, date(2026, 10, 17));

        form.on_down(&wizard);
        form.on_right(&wizard);
        assert_eq!(form.calendar_cursor, date(2026, 10, 25));

        form.on_char(&mut wizard, ' ');
        assert_eq!(wizard.draft().unwrap().date, Some(date(2026, 10, 25)));
    }

    #[test]
    fn slot_cursor_walks_the_grid() {
        let (mut wizard, mut form) = opened();
        for (field, value) in [
            (Field::Name, "Jane"),
            (Field::Email, "j@co.com"),
            (Field::Company, "Acme"),
            (Field::Position, "CTO"),
        ] {
            wizard.update(field, value).unwrap();
        }
        wizard.advance();

        form.focus_next(&wizard);
        form.on_down(&wizard);
        form.on_down(&wizard);
        form.on_right(&wizard);
        form.on_char(&mut wizard, ' ');
        assert_eq!(wizard.draft().unwrap().time, Some(TimeSlot::TwoThirty));

        for _ in 0..20 {
            form.on_right(&wizard);
        }
        form.on_char(&mut wizard, ' ');
        assert_eq!(wizard.draft().unwrap().time, Some(TimeSlot::FourThirty));
    }

    #[test]
    fn non_space_keys_do_nothing_on_schedule() {
        let (mut wizard, mut form) = opened();
        for (field, value) in [
            (Field::Name, "Jane"),
            (Field::Email, "j@co.com"),
            (Field::Company, "Acme"),
            (Field::Position, "CTO"),
        ] {
            wizard.update(field, value).unwrap();
        }
        wizard.advance();
        type_str(&mut form, &mut wizard, "abc");
        form.on_backspace(&mut wizard);

        let draft = wizard.draft().unwrap();
        assert_eq!(draft.date, None);
        assert_eq!(draft.position, "CTO");
    }

    #[test]
    fn calendar_grid_covers_the_month() {
        // October 2026 starts on a Thursday and has 31 days.
        let lines = calendar_lines(date(2026, 10, 17), date(2026, 10, 17), None, true);
        assert_eq!(lines[0].to_string(), "October 2026");
        let week_rows = &lines[2..];
        assert_eq!(week_rows.len(), 5);
        assert!(week_rows[0].to_string().starts_with("          "));
        assert!(week_rows[4].to_string().contains("31"));
    }

    #[test]
    fn footer_offers_close_on_every_step() {
        let (mut wizard, _) = opened();
        let line = footer_line(&wizard, Step::Contact).to_string();
        assert!(line.contains("esc Cancel"));
        assert!(line.contains("^W Close"));

        for (field, value) in [
            (Field::Name, "Jane"),
            (Field::Email, "j@co.com"),
            (Field::Company, "Acme"),
            (Field::Position, "CTO"),
        ] {
            wizard.update(field, value).unwrap();
        }
        wizard.advance();
        let line = footer_line(&wizard, Step::Schedule).to_string();
        assert!(line.contains("esc Back"));
        assert!(line.contains("^W Close"));
    }

    #[test]
    fn progress_marks_finished_steps() {
        let line = progress_line(Step::Message).to_string();
        assert_eq!(line.matches('✓').count(), 2);
        assert!(line.contains(" 3 "));
    }
}
