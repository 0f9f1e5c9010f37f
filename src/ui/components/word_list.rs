use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::engine::catalog::get_chapter;
use crate::engine::word::{Word, WordState};
use crate::ui::components::chapter_list::scroll_offset;
use crate::ui::theme::Theme;

pub fn state_label(state: WordState) -> &'static str {
    match state {
        WordState::New => "New",
        WordState::Learning => "Learning",
        WordState::Mastered => "Mastered",
        WordState::Disabled => "Disabled",
    }
}

pub fn word_details(word: &Word) -> String {
    let origin = match word.chapter_id.and_then(get_chapter) {
        Some(c) => format!("Chapter {}: {}", c.id, c.name),
        None => "Custom Word".to_string(),
    };
    format!(
        "Correct: {} | Missed: {} | {origin}",
        word.correct_count, word.missed_count
    )
}

pub struct WordList<'a> {
    pub words: Vec<&'a Word>,
    /// Highlighted row, if the list is interactive.
    pub selected: Option<usize>,
    pub empty_message: &'a str,
    pub theme: &'a Theme,
}

impl<'a> WordList<'a> {
    pub fn new(words: Vec<&'a Word>, empty_message: &'a str, theme: &'a Theme) -> Self {
        Self {
            words,
            selected: None,
            empty_message,
            theme,
        }
    }

    pub fn selected(mut self, selected: usize) -> Self {
        self.selected = Some(selected);
        self
    }
}

impl Widget for WordList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        if self.words.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                format!("  {}", self.empty_message),
                Style::default().fg(colors.muted()),
            )))
            .render(area, buf);
            return;
        }

        let visible = area.height as usize;
        let offset = scroll_offset(self.selected.unwrap_or(0), visible);
        let text_width = self
            .words
            .iter()
            .map(|w| w.text.chars().count())
            .max()
            .unwrap_or(0)
            .min(16);

        let lines: Vec<Line> = self
            .words
            .iter()
            .enumerate()
            .skip(offset)
            .take(visible)
            .map(|(i, word)| {
                let is_selected = self.selected == Some(i);
                let indicator = if is_selected { ">" } else { " " };
                let text_style = Style::default()
                    .fg(if is_selected { colors.accent() } else { colors.fg() })
                    .add_modifier(Modifier::BOLD);
                Line::from(vec![
                    Span::styled(format!("{indicator} {:<text_width$}  ", word.text), text_style),
                    Span::styled(
                        format!("{:<9}", state_label(word.state)),
                        Style::default().fg(colors.state(word.state)),
                    ),
                    Span::styled(word_details(word), Style::default().fg(colors.muted())),
                ])
            })
            .collect();

        Paragraph::new(lines).render(area, buf);
    }
}
