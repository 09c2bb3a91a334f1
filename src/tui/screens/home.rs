//! Home screen: the entry point into the wizard.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Padding, Paragraph};

pub struct HomeScreen {
    recipient: String,
}

impl HomeScreen {
    pub fn new(recipient: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::vertical([
            Constraint::Length(3), // title
            Constraint::Min(0),    // action
            Constraint::Length(1), // help
        ])
        .split(area);

        let title = Paragraph::new(Line::from(vec![Span::styled(
            "Interview",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )]))
        .block(Block::default().padding(Padding::new(2, 0, 1, 0)));
        frame.render_widget(title, chunks[0]);

        let muted = Style::default().fg(Color::DarkGray);
        let highlight = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        let lines = vec![
            Line::from(vec![
                Span::styled("› ", highlight),
                Span::styled("Schedule a Technical Interview", highlight),
            ]),
            Line::default(),
            Line::from(Span::styled(
                format!("  Requests are composed as mail to {}", self.recipient),
                muted,
            )),
        ];
        let content = Paragraph::new(lines).block(Block::default().padding(Padding::new(2, 2, 0, 0)));
        frame.render_widget(content, chunks[1]);

        let help = Paragraph::new(Line::from(vec![Span::styled(
            " ⏎ open  q quit",
            muted,
        )]));
        frame.render_widget(help, chunks[2]);
    }
}
