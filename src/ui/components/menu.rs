use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    StartSession,
    Dashboard,
    Quit,
}

pub struct MenuItem {
    pub key: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub action: MenuAction,
}

/// Welcome screen: title plus the three entry points.
pub struct Menu<'a> {
    pub items: Vec<MenuItem>,
    pub selected: usize,
    /// One-line greeting shown under the title, e.g. lifetime points.
    pub tagline: String,
    pub theme: &'a Theme,
}

impl<'a> Menu<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self {
            items: vec![
                MenuItem {
                    key: "s",
                    label: "Start Practice",
                    description: "Read a handful of words out loud",
                    action: MenuAction::StartSession,
                },
                MenuItem {
                    key: "d",
                    label: "Parent Dashboard",
                    description: "Chapters, tricky words and word list",
                    action: MenuAction::Dashboard,
                },
                MenuItem {
                    key: "q",
                    label: "Quit",
                    description: "See you next time",
                    action: MenuAction::Quit,
                },
            ],
            selected: 0,
            tagline: String::new(),
            theme,
        }
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % self.items.len();
    }

    pub fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = self.items.len() - 1;
        }
    }

    pub fn selected_action(&self) -> MenuAction {
        self.items
            .get(self.selected)
            .map(|i| i.action)
            .unwrap_or(MenuAction::StartSession)
    }
}

impl Widget for &Menu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Sight Words",
                Style::default()
                    .fg(colors.word())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Learn to read, one word at a time",
                Style::default().fg(colors.fg()),
            )),
            Line::from(Span::styled(
                &*self.tagline,
                Style::default().fg(colors.muted()),
            )),
        ];
        Paragraph::new(title_lines)
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        let menu_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                self.items
                    .iter()
                    .map(|_| Constraint::Length(3))
                    .collect::<Vec<_>>(),
            )
            .split(layout[2]);

        for (i, item) in self.items.iter().enumerate() {
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };

            let label_text = format!(" {indicator} [{}] {}", item.key, item.label);
            let desc_text = format!("     {}", item.description);

            let label_style = Style::default()
                .fg(if is_selected { colors.accent() } else { colors.fg() })
                .add_modifier(if is_selected {
                    Modifier::BOLD
                } else {
                    Modifier::empty()
                });

            let lines = vec![
                Line::from(Span::styled(label_text, label_style)),
                Line::from(Span::styled(desc_text, Style::default().fg(colors.muted()))),
            ];

            if i < menu_layout.len() {
                Paragraph::new(lines).render(menu_layout[i], buf);
            }
        }
    }
}
