use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::engine::catalog::get_chapter;
use crate::engine::trainer::SessionSummary;
use crate::ui::theme::Theme;

pub struct Summary<'a> {
    pub summary: &'a SessionSummary,
    pub theme: &'a Theme,
}

impl<'a> Summary<'a> {
    pub fn new(summary: &'a SessionSummary, theme: &'a Theme) -> Self {
        Self { summary, theme }
    }

    fn headline(&self) -> &'static str {
        let s = self.summary;
        if s.attempted == 0 {
            "Nothing to practice this time"
        } else if s.missed == 0 {
            "Perfect session!"
        } else if s.correct >= s.missed {
            "Great job!"
        } else {
            "Good practice!"
        }
    }
}

impl Widget for Summary<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Session Complete ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(inner);

        Paragraph::new(Line::from(Span::styled(
            self.headline(),
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(layout[0], buf);

        let stat = |label: &str, value: String, color: Color| {
            Line::from(vec![
                Span::styled(format!("  {label:<16}"), Style::default().fg(colors.fg())),
                Span::styled(value, Style::default().fg(color).add_modifier(Modifier::BOLD)),
            ])
        };
        let s = self.summary;
        Paragraph::new(stat("Words practiced", s.attempted.to_string(), colors.fg()))
            .render(layout[1], buf);
        Paragraph::new(stat("Got it", s.correct.to_string(), colors.success()))
            .render(layout[2], buf);
        Paragraph::new(stat("Needed help", s.missed.to_string(), colors.warning()))
            .render(layout[3], buf);
        Paragraph::new(stat("Points", format!("+{}", s.points), colors.accent()))
            .render(layout[4], buf);

        if !s.unlocked.is_empty() {
            let lines: Vec<Line> = s
                .unlocked
                .iter()
                .filter_map(|id| get_chapter(*id))
                .map(|c| {
                    Line::from(Span::styled(
                        format!("  \u{1f389} New chapter: {} {}", c.id, c.name),
                        Style::default().fg(colors.success()),
                    ))
                })
                .collect();
            Paragraph::new(lines).render(layout[5], buf);
        }

        Paragraph::new(Line::from(Span::styled(
            "  [Enter] Finish  [s] Practice again",
            Style::default().fg(colors.accent()),
        )))
        .render(layout[6], buf);
    }
}
