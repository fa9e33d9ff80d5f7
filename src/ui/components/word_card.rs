use chrono::Local;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::swipe::SwipeController;
use crate::ui::theme::{Theme, blend};
use crate::word::record::WordRecord;

// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f64 = 2.0;

/// The word card, drawn at `slot` shifted and sheared by the swipe state.
pub struct WordCard<'a> {
    record: &'a WordRecord,
    theme: &'a Theme,
    slot: Rect,
    offset: f64,
    rotation_degrees: f64,
    forward_opacity: f64,
    backward_opacity: f64,
}

impl<'a> WordCard<'a> {
    pub fn new(record: &'a WordRecord, theme: &'a Theme, slot: Rect) -> Self {
        Self {
            record,
            theme,
            slot,
            offset: 0.0,
            rotation_degrees: 0.0,
            forward_opacity: 0.0,
            backward_opacity: 0.0,
        }
    }

    pub fn swipe(mut self, swipe: &SwipeController) -> Self {
        self.offset = swipe.displacement();
        self.rotation_degrees = swipe.rotation_degrees();
        self.forward_opacity = swipe.forward_overlay_opacity();
        self.backward_opacity = swipe.backward_overlay_opacity();
        self
    }

    /// Horizontal shift of card row `row`, combining slide and tilt.
    fn row_shift(&self, row: u16) -> i32 {
        let center = (self.slot.height.saturating_sub(1)) as f64 / 2.0;
        let tilt = self.rotation_degrees.to_radians().tan() * CELL_ASPECT;
        (self.offset + (center - row as f64) * tilt).round() as i32
    }

    fn draw_face(&self, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let area = *buf.area();

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.card_border()))
            .style(Style::default().bg(colors.card_bg()).fg(colors.fg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(2),
                Constraint::Length(1),
            ])
            .split(inner);

        let word = Paragraph::new(Line::from(vec![
            Span::styled("✦ ", Style::default().fg(colors.accent())),
            Span::styled(
                self.record.word.as_str(),
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            ),
        ]));
        word.render(rows[0], buf);

        let rule = "─".repeat(rows[1].width as usize);
        buf.set_string(rows[1].x, rows[1].y, rule, Style::default().fg(colors.card_border()));

        let label = Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD);
        let mut body = vec![
            Line::from(Span::styled("DEFINITION", label)),
            Line::from(self.record.definition.as_str()),
            Line::from(""),
            Line::from(Span::styled("EXAMPLE", label)),
        ];
        let example = self
            .record
            .example
            .as_deref()
            .unwrap_or("Example usage will appear here");
        body.push(Line::from(Span::styled(
            example,
            Style::default().fg(colors.muted()).add_modifier(Modifier::ITALIC),
        )));
        Paragraph::new(body)
            .wrap(Wrap { trim: true })
            .render(rows[2], buf);

        let shown_on = self.record.date.with_timezone(&Local).format("%b %-d, %Y");
        Paragraph::new(Line::from(Span::styled(
            format!("shown {shown_on}"),
            Style::default().fg(colors.muted()),
        )))
        .alignment(Alignment::Right)
        .render(rows[3], buf);

        self.draw_overlays(inner, buf);
    }

    /// Hints sit on the trailing edge, which stays on screen while the card
    /// slides out.
    fn draw_overlays(&self, inner: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        if inner.width < 24 || inner.height < 2 {
            return;
        }
        // Drawn over the rule under the word.
        let y = inner.y + 1;
        if self.forward_opacity > 0.0 {
            let fg = blend(colors.card_bg(), colors.accent(), self.forward_opacity);
            buf.set_string(
                inner.x,
                y,
                "NEW WORD →",
                Style::default().fg(fg).add_modifier(Modifier::BOLD),
            );
        }
        if self.backward_opacity > 0.0 {
            let text = "← PREVIOUS";
            let fg = blend(colors.card_bg(), colors.accent(), self.backward_opacity);
            let x = inner.right().saturating_sub(text.chars().count() as u16);
            buf.set_string(x, y, text, Style::default().fg(fg).add_modifier(Modifier::BOLD));
        }
    }
}

impl Widget for WordCard<'_> {
    /// `area` clips the card while it slides out of its slot.
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.slot.width < 3 || self.slot.height < 3 {
            return;
        }
        let mut face = Buffer::empty(Rect::new(0, 0, self.slot.width, self.slot.height));
        self.draw_face(&mut face);

        for row in 0..self.slot.height {
            let y = self.slot.y + row;
            if y < area.top() || y >= area.bottom() {
                continue;
            }
            let shift = self.row_shift(row);
            for col in 0..self.slot.width {
                let x = self.slot.x as i32 + col as i32 + shift;
                if x < area.left() as i32 || x >= area.right() as i32 {
                    continue;
                }
                if let (Some(src), Some(dst)) = (face.cell((col, row)), buf.cell_mut((x as u16, y)))
                {
                    *dst = src.clone();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::word::record::WordEntry;

    fn record() -> WordRecord {
        WordEntry {
            id: "14".to_string(),
            word: "Buffer".to_string(),
            definition: "Temporary data storage for smooth processing.".to_string(),
            example: Some("The video paused to load more data into the buffer.".to_string()),
        }
        .stamp(Utc::now())
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .filter_map(|x| buf.cell((x, y)).map(|c| c.symbol().to_string()))
            .collect()
    }

    #[test]
    fn renders_word_and_definition_at_rest() {
        let theme = Theme::default();
        let record = record();
        let area = Rect::new(0, 0, 60, 14);
        let mut buf = Buffer::empty(area);
        WordCard::new(&record, &theme, area).render(area, &mut buf);

        let text: String = (0..area.height).map(|y| row_text(&buf, y)).collect();
        assert!(text.contains("Buffer"));
        assert!(text.contains("DEFINITION"));
        assert!(text.contains("Temporary data storage"));
        assert!(!text.contains("NEW WORD"));
    }

    #[test]
    fn dragged_card_slides_and_shows_overlay() {
        let theme = Theme::default();
        let record = record();
        let area = Rect::new(0, 0, 80, 14);
        let slot = Rect::new(10, 0, 60, 14);

        let mut swipe = SwipeController::new(80.0);
        swipe.on_drag_update(30.0);

        let mut buf = Buffer::empty(area);
        WordCard::new(&record, &theme, slot)
            .swipe(&swipe)
            .render(area, &mut buf);

        let text: String = (0..area.height).map(|y| row_text(&buf, y)).collect();
        assert!(text.contains("NEW WORD"));
        // Slid right past the slot, with the right edge clipped away.
        assert_eq!(buf.cell((10, 7)).map(|c| c.symbol().to_string()).as_deref(), Some(" "));
    }

    #[test]
    fn tilt_shears_top_and_bottom_in_opposite_directions() {
        let theme = Theme::default();
        let record = record();
        let slot = Rect::new(0, 0, 40, 11);
        let mut swipe = SwipeController::new(40.0);
        swipe.on_drag_update(60.0);

        let card = WordCard::new(&record, &theme, slot).swipe(&swipe);
        let top = card.row_shift(0) - card.row_shift(5);
        let bottom = card.row_shift(10) - card.row_shift(5);
        assert!(top > 0);
        assert!(bottom < 0);
    }
}
