use chrono::Local;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::theme::Theme;
use crate::word::record::WordRecord;

const ITEM_HEIGHT: u16 = 5;

/// Scrolling list of history entries, each a compact card.
pub struct HistoryList<'a> {
    records: &'a [&'a WordRecord],
    selected: usize,
    theme: &'a Theme,
}

impl<'a> HistoryList<'a> {
    pub fn new(records: &'a [&'a WordRecord], selected: usize, theme: &'a Theme) -> Self {
        Self {
            records,
            selected,
            theme,
        }
    }

    /// First item to draw so that `selected` is on screen.
    fn first_visible(&self, height: u16) -> usize {
        let per_page = (height / ITEM_HEIGHT).max(1) as usize;
        let selected = self.selected.min(self.records.len().saturating_sub(1));
        (selected + 1).saturating_sub(per_page)
    }

    fn item_lines(&self, record: &'a WordRecord, is_selected: bool, width: usize) -> Vec<Line<'a>> {
        let colors = &self.theme.colors;
        let marker = if is_selected { "▌" } else { " " };
        let marker_style = Style::default().fg(colors.accent());
        let clip = |text: &str| -> String {
            if text.chars().count() <= width {
                text.to_string()
            } else {
                let mut clipped: String = text.chars().take(width.saturating_sub(1)).collect();
                clipped.push('…');
                clipped
            }
        };

        let word_style = Style::default()
            .fg(if is_selected { colors.accent() } else { colors.fg() })
            .add_modifier(Modifier::BOLD);
        let definition = if record.definition.is_empty() {
            "No definition available"
        } else {
            record.definition.as_str()
        };
        let example = record.example.as_deref().unwrap_or("");
        let viewed = record.date.with_timezone(&Local).format("%b %-d, %Y");

        vec![
            Line::from(vec![
                Span::styled(marker, marker_style),
                Span::styled(clip(&record.word), word_style),
            ]),
            Line::from(vec![
                Span::styled(marker, marker_style),
                Span::styled(clip(definition), Style::default().fg(colors.fg())),
            ]),
            Line::from(vec![
                Span::styled(marker, marker_style),
                Span::styled(
                    clip(example),
                    Style::default()
                        .fg(colors.muted())
                        .add_modifier(Modifier::ITALIC),
                ),
            ]),
            Line::from(vec![
                Span::styled(marker, marker_style),
                Span::styled(
                    format!("Viewed on: {viewed}"),
                    Style::default().fg(colors.muted()),
                ),
            ]),
            Line::from(""),
        ]
    }
}

impl Widget for HistoryList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .border_style(Style::default().fg(colors.card_border()))
            .style(Style::default().bg(colors.card_bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let width = inner.width.saturating_sub(1) as usize;
        let first = self.first_visible(inner.height);
        let lines: Vec<Line> = self
            .records
            .iter()
            .enumerate()
            .skip(first)
            .take((inner.height / ITEM_HEIGHT + 1) as usize)
            .flat_map(|(i, record)| self.item_lines(*record, i == self.selected, width))
            .collect();
        Paragraph::new(lines).render(inner, buf);
    }
}
