use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::theme::Theme;

/// Letters separated by spaces so short words read large on a terminal.
pub fn spaced(word: &str) -> String {
    let mut out = String::with_capacity(word.len() * 2);
    for (i, ch) in word.chars().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

pub struct WordCard<'a> {
    pub word: &'a str,
    /// Some(true) after "got it", Some(false) after "need help".
    pub feedback: Option<bool>,
    pub countdown: Option<u64>,
    pub listening: bool,
    pub theme: &'a Theme,
}

impl<'a> WordCard<'a> {
    pub fn new(word: &'a str, theme: &'a Theme) -> Self {
        Self {
            word,
            feedback: None,
            countdown: None,
            listening: false,
            theme,
        }
    }
}

impl Widget for WordCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let border = match self.feedback {
            Some(true) => colors.success(),
            Some(false) => colors.warning(),
            None => colors.border_focused(),
        };
        let block = Block::bordered()
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Fill(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Fill(1),
                Constraint::Length(1),
            ])
            .split(inner);

        let word_style = Style::default()
            .fg(colors.word())
            .add_modifier(Modifier::BOLD);
        Paragraph::new(Line::from(Span::styled(spaced(self.word), word_style)))
            .alignment(Alignment::Center)
            .render(rows[1], buf);

        let bold = |color: Color| Style::default().fg(color).add_modifier(Modifier::BOLD);
        let icon = match self.feedback {
            Some(true) => Span::styled("\u{2713}", bold(colors.success())),
            Some(false) => Span::styled("\u{25cb}", bold(colors.warning())),
            None => Span::raw(""),
        };
        Paragraph::new(Line::from(icon))
            .alignment(Alignment::Center)
            .render(rows[3], buf);

        let status = if self.listening {
            Span::styled("Listening...", Style::default().fg(colors.accent()))
        } else if let Some(secs) = self.countdown {
            Span::styled(
                format!("I'll read it to you in {secs}"),
                Style::default().fg(colors.muted()),
            )
        } else {
            Span::raw("")
        };
        Paragraph::new(Line::from(status))
            .alignment(Alignment::Center)
            .render(rows[5], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spaced() {
        assert_eq!(spaced("the"), "t h e");
        assert_eq!(spaced("i"), "i");
        assert_eq!(spaced(""), "");
    }

    #[test]
    fn test_renders_word_and_countdown() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 30, 9);
        let mut buf = Buffer::empty(area);
        let mut card = WordCard::new("said", &theme);
        card.countdown = Some(3);
        card.render(area, &mut buf);

        let text: String = (0..area.height)
            .map(|y| (0..area.width).map(|x| buf[(x, y)].symbol().to_string()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n");
        assert!(text.contains("s a i d"));
        assert!(text.contains("in 3"));
    }
}
