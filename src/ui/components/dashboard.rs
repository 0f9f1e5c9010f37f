use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::app::{DashboardState, DashboardTab};
use crate::engine::catalog::ALL_CHAPTERS;
use crate::engine::trainer::Trainer;
use crate::engine::word::{Word, WordState};
use crate::ui::components::chapter_list::{ChapterList, ChapterRow};
use crate::ui::components::word_list::{WordList, state_label};
use crate::ui::theme::Theme;

/// Parent view: headline counters, then one of chapters / challenge deck /
/// all words.
pub struct Dashboard<'a> {
    pub trainer: &'a Trainer,
    pub state: &'a DashboardState,
    /// Word list after the state filter, in store order.
    pub words: Vec<&'a Word>,
    pub theme: &'a Theme,
}

impl<'a> Dashboard<'a> {
    pub fn new(
        trainer: &'a Trainer,
        state: &'a DashboardState,
        words: Vec<&'a Word>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            trainer,
            state,
            words,
            theme,
        }
    }

    fn render_counters(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let counters = [
            (
                "Words Mastered",
                self.trainer.words().count_in_state(WordState::Mastered),
            ),
            ("Sessions", self.trainer.stats().total_sessions as usize),
            ("Challenge Words", self.trainer.deck().len()),
        ];
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 3); 3])
            .split(area);

        for ((label, value), cell) in counters.iter().zip(cells.iter()) {
            let block = Block::bordered()
                .title(format!(" {label} "))
                .border_style(Style::default().fg(colors.border()));
            let inner = block.inner(*cell);
            block.render(*cell, buf);
            Paragraph::new(Line::from(Span::styled(
                value.to_string(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center)
            .render(inner, buf);
        }
    }

    fn render_tabs(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let mut spans = Vec::new();
        for (i, tab) in DashboardTab::ALL.iter().enumerate() {
            let active = *tab == self.state.tab;
            let style = if active {
                Style::default()
                    .fg(colors.header_fg())
                    .bg(colors.accent_dim())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.muted())
            };
            spans.push(Span::styled(format!(" {} {} ", i + 1, tab.title()), style));
            spans.push(Span::raw(" "));
        }
        if self.state.tab == DashboardTab::Words {
            let filter = self.state.word_filter.map(state_label).unwrap_or("All");
            spans.push(Span::styled(
                format!("  Showing: {filter}"),
                Style::default().fg(colors.fg()),
            ));
        }
        Paragraph::new(Line::from(spans)).render(area, buf);
    }

    fn render_input(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let Some(text) = &self.state.new_word else {
            return;
        };
        Paragraph::new(Line::from(vec![
            Span::styled(" New word: ", Style::default().fg(colors.accent())),
            Span::styled(
                format!("{text}\u{2581}"),
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            ),
        ]))
        .render(area, buf);
    }
}

impl Widget for Dashboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Parent Dashboard ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let input_height = if self.state.new_word.is_some() { 1 } else { 0 };
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(input_height),
            ])
            .split(inner);

        self.render_counters(layout[0], buf);
        self.render_tabs(layout[1], buf);
        self.render_input(layout[4], buf);

        let content = layout[3];
        match self.state.tab {
            DashboardTab::Chapters => {
                let chapters = self.trainer.chapters();
                let rows = ALL_CHAPTERS
                    .iter()
                    .map(|c| ChapterRow {
                        chapter: c,
                        unlocked: chapters.is_unlocked(c.id),
                        progress: self.trainer.chapter_progress(c.id),
                    })
                    .collect();
                ChapterList::new(rows, self.state.chapter_selected, self.theme)
                    .render(content, buf);
            }
            DashboardTab::Challenge => {
                let words = self.trainer.words();
                let deck: Vec<&Word> = self
                    .trainer
                    .deck()
                    .members()
                    .iter()
                    .filter_map(|t| words.get(t))
                    .collect();
                WordList::new(deck, "No words in challenge deck yet!", self.theme)
                    .selected(self.state.word_selected)
                    .render(content, buf);
            }
            DashboardTab::Words => {
                WordList::new(self.words, "No words match this filter.", self.theme)
                    .selected(self.state.word_selected)
                    .render(content, buf);
            }
        }
    }
}
