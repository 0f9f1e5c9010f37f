use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::engine::catalog::{ChapterDefinition, ChapterProgress};
use crate::engine::word::WordState;
use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::theme::Theme;

const ROW_HEIGHT: u16 = 4;

/// Coaching line for an unlocked chapter, by share of mastered words.
pub fn recommendation(chapter_id: u32, progress: &ChapterProgress) -> Option<&'static str> {
    if progress.total == 0 {
        return None;
    }
    let pct = progress.mastered_ratio() * 100.0;
    if pct >= 80.0 {
        Some("Great progress! Keep practicing to master all words.")
    } else if pct >= 50.0 {
        Some("You're doing well! Practice the remaining words to unlock the next chapter.")
    } else if pct >= 20.0 {
        Some("Keep going! Regular practice will help you progress faster.")
    } else if progress.learning > 0 {
        Some("Just getting started! Try practicing these words daily.")
    } else if chapter_id > 1 {
        Some("Having trouble? Consider reviewing previous chapters.")
    } else {
        None
    }
}

pub struct ChapterRow {
    pub chapter: &'static ChapterDefinition,
    pub unlocked: bool,
    pub progress: ChapterProgress,
}

pub struct ChapterList<'a> {
    pub rows: Vec<ChapterRow>,
    pub selected: usize,
    pub theme: &'a Theme,
}

impl<'a> ChapterList<'a> {
    pub fn new(rows: Vec<ChapterRow>, selected: usize, theme: &'a Theme) -> Self {
        Self { rows, selected, theme }
    }
}

/// First row index to draw so `selected` stays in view.
pub fn scroll_offset(selected: usize, visible: usize) -> usize {
    if visible == 0 {
        return selected;
    }
    selected.saturating_sub(visible - 1)
}

impl Widget for ChapterList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let visible = (area.height / ROW_HEIGHT) as usize;
        let offset = scroll_offset(self.selected, visible);

        let rows = self.rows.iter().enumerate().skip(offset).take(visible);
        for (slot, (i, row)) in rows.enumerate() {
            let y = area.y + slot as u16 * ROW_HEIGHT;
            let is_selected = i == self.selected;
            let p = &row.progress;

            let lock = if row.unlocked { "\u{1f513}" } else { "\u{1f512}" };
            let indicator = if is_selected { ">" } else { " " };
            let title_style = Style::default()
                .fg(if is_selected { colors.accent() } else { colors.fg() })
                .add_modifier(if is_selected { Modifier::BOLD } else { Modifier::empty() });
            let title = Line::from(vec![
                Span::styled(
                    format!("{indicator} {lock} Chapter {}: {}", row.chapter.id, row.chapter.name),
                    title_style,
                ),
                Span::styled(
                    format!("   [{}]", if row.unlocked { "Lock" } else { "Unlock" }),
                    Style::default().fg(colors.muted()),
                ),
            ]);
            Paragraph::new(title).render(Rect::new(area.x, y, area.width, 1), buf);

            let counts = Line::from(vec![
                Span::styled(
                    format!("    {}  ", row.chapter.description),
                    Style::default().fg(colors.muted()),
                ),
                Span::styled(
                    format!("New: {} ", p.new),
                    Style::default().fg(colors.state(WordState::New)),
                ),
                Span::styled(
                    format!("Learning: {} ", p.learning),
                    Style::default().fg(colors.state(WordState::Learning)),
                ),
                Span::styled(
                    format!("Mastered: {}", p.mastered),
                    Style::default().fg(colors.state(WordState::Mastered)),
                ),
            ]);
            Paragraph::new(counts).render(Rect::new(area.x, y + 1, area.width, 1), buf);

            let bar_width = area.width.saturating_sub(4).min(40);
            ProgressBar::new(p.mastered_ratio(), self.theme)
                .caption(format!("{}/{} mastered", p.mastered, p.total))
                .render(Rect::new(area.x + 4, y + 2, bar_width, 1), buf);

            if row.unlocked {
                if let Some(tip) = recommendation(row.chapter.id, p) {
                    let tip_x = area.x + 4 + bar_width + 2;
                    let tip_w = area.width.saturating_sub(bar_width + 6);
                    if tip_w > 0 {
                        Paragraph::new(Line::from(Span::styled(
                            format!("\u{1f4a1} {tip}"),
                            Style::default().fg(colors.warning()),
                        )))
                        .render(Rect::new(tip_x, y + 2, tip_w, 1), buf);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(total: usize, mastered: usize, learning: usize) -> ChapterProgress {
        ChapterProgress {
            total,
            mastered,
            learning,
            new: total - mastered - learning,
        }
    }

    #[test]
    fn test_recommendation_thresholds() {
        assert!(recommendation(1, &progress(10, 8, 0)).unwrap().starts_with("Great progress"));
        assert!(recommendation(1, &progress(10, 5, 0)).unwrap().starts_with("You're doing well"));
        assert!(recommendation(1, &progress(10, 2, 0)).unwrap().starts_with("Keep going"));
        assert!(
            recommendation(1, &progress(10, 1, 3))
                .unwrap()
                .starts_with("Just getting started")
        );
        assert!(recommendation(3, &progress(10, 0, 0)).unwrap().starts_with("Having trouble"));
        assert_eq!(recommendation(1, &progress(10, 0, 0)), None);
        assert_eq!(recommendation(4, &progress(0, 0, 0)), None);
    }

    #[test]
    fn test_scroll_offset_keeps_selection_visible() {
        assert_eq!(scroll_offset(0, 4), 0);
        assert_eq!(scroll_offset(3, 4), 0);
        assert_eq!(scroll_offset(7, 4), 4);
        assert_eq!(scroll_offset(5, 0), 5);
    }
}
