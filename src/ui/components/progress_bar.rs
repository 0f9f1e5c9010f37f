use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Widget};

use crate::ui::theme::Theme;

/// One-row filled bar. With a label it draws a bordered box around the bar.
pub struct ProgressBar<'a> {
    pub label: Option<String>,
    pub ratio: f64,
    pub caption: Option<String>,
    pub theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn new(ratio: f64, theme: &'a Theme) -> Self {
        Self {
            label: None,
            ratio: ratio.clamp(0.0, 1.0),
            caption: None,
            theme,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Text centred on the bar; defaults to the percentage.
    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let inner = match &self.label {
            Some(label) => {
                let block = Block::bordered()
                    .title(format!(" {label} "))
                    .border_style(Style::default().fg(colors.border()));
                let inner = block.inner(area);
                block.render(area, buf);
                inner
            }
            None => area,
        };

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let filled_width = (self.ratio * inner.width as f64).round() as u16;
        let caption = self
            .caption
            .unwrap_or_else(|| format!("{:.0}%", self.ratio * 100.0));

        for x in inner.x..inner.x + inner.width {
            let style = if x < inner.x + filled_width {
                Style::default().fg(colors.bg()).bg(colors.bar_filled())
            } else {
                Style::default().fg(colors.fg()).bg(colors.bar_empty())
            };
            buf[(x, inner.y)].set_style(style);
        }

        let caption_len = caption.chars().count() as u16;
        if caption_len <= inner.width {
            let caption_x = inner.x + (inner.width - caption_len) / 2;
            for (i, ch) in caption.chars().enumerate() {
                let x = caption_x + i as u16;
                buf[(x, inner.y)].set_char(ch);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_and_caption() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 10, 1);
        let mut buf = Buffer::empty(area);
        ProgressBar::new(0.5, &theme).caption("5/10").render(area, &mut buf);

        let filled = theme.colors.bar_filled();
        assert_eq!(buf[(0, 0)].bg, filled);
        assert_eq!(buf[(4, 0)].bg, filled);
        assert_ne!(buf[(5, 0)].bg, filled);
        let row: String = (0..10).map(|x| buf[(x, 0)].symbol().to_string()).collect();
        assert!(row.contains("5/10"));
    }

    #[test]
    fn test_ratio_is_clamped() {
        let theme = Theme::default();
        assert_eq!(ProgressBar::new(3.0, &theme).ratio, 1.0);
        assert_eq!(ProgressBar::new(-1.0, &theme).ratio, 0.0);
    }
}
