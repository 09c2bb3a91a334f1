//! Success view shown after the hand-off.

use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Padding, Paragraph, Wrap};

use crate::model::{Draft, long_date};

pub fn render(frame: &mut Frame, draft: &Draft, remaining: Option<Duration>) {
    let area = frame.area();

    let chunks = Layout::vertical([
        Constraint::Length(3), // header
        Constraint::Min(0),    // details
        Constraint::Length(1), // help
    ])
    .split(area);

    let muted = Style::default().fg(Color::DarkGray);
    let normal = Style::default().fg(Color::Gray);
    let highlight = Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);

    let header = Paragraph::new(Line::from(Span::styled("Interview Scheduled!", highlight)))
        .block(Block::default().padding(Padding::new(2, 0, 1, 0)));
    frame.render_widget(header, chunks[0]);

    let lines: Vec<Line> = [
        Line::from(Span::styled(
            "✓ Interview Scheduled Successfully!",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(
            format!(
                "I've received your interview request and will contact you shortly at {} to confirm the details.",
                draft.email
            ),
            normal,
        )),
        Line::default(),
        Line::from(Span::styled("Interview Details:", highlight)),
    ]
    .into_iter()
    .chain(detail_lines(draft).into_iter().map(|l| Line::from(Span::styled(l, normal))))
    .collect();

    let content = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().padding(Padding::new(2, 2, 0, 0)));
    frame.render_widget(content, chunks[1]);

    let closing = remaining.map_or_else(String::new, |d| {
        format!("  closing in {}s", d.as_secs() + u64::from(d.subsec_nanos() > 0))
    });
    let help = Paragraph::new(Line::from(Span::styled(
        format!(" any key close{closing}"),
        muted,
    )));
    frame.render_widget(help, chunks[2]);
}

fn detail_lines(draft: &Draft) -> Vec<String> {
    vec![
        format!("Date: {}", draft.date.map(long_date).unwrap_or_default()),
        format!(
            "Time: {}",
            draft.time.map(|t| t.to_string()).unwrap_or_default()
        ),
        format!("Position: {}", draft.position),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::civil::date;

    use crate::model::TimeSlot;

    #[test]
    fn details_show_long_date_time_and_position() {
        let draft = Draft {
            position: "CTO".to_string(),
            date: Some(date(2026, 10, 17)),
            time: Some(TimeSlot::Ten),
            ..Draft::default()
        };
        assert_eq!(
            detail_lines(&draft),
            [
                "Date: Saturday, October 17, 2026",
                "Time: 10:00 AM",
                "Position: CTO",
            ]
        );
    }
}
