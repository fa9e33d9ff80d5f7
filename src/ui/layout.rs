use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Header / body / footer split shared by both screens.
pub struct ScreenLayout {
    pub header: Rect,
    pub body: Rect,
    pub footer: Rect,
}

impl ScreenLayout {
    pub fn new(area: Rect, footer_lines: u16) -> Self {
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(footer_lines.max(1)),
            ])
            .split(area);

        Self {
            header: vertical[0],
            body: vertical[1],
            footer: vertical[2],
        }
    }
}

/// Card slot inside the home body: up to 64 columns wide, 16 rows tall,
/// centered, with room left for the swipe hint above it.
pub fn card_rect(body: Rect) -> Rect {
    const MAX_W: u16 = 64;
    const MAX_H: u16 = 16;
    let width = body.width.saturating_sub(4).min(MAX_W);
    let height = body.height.saturating_sub(2).min(MAX_H);
    let left = body.x + (body.width.saturating_sub(width)) / 2;
    let top = body.y + 1 + (body.height.saturating_sub(height + 1)) / 2;
    Rect::new(left, top, width, height)
}

pub fn pack_hint_lines(hints: &[&str], width: usize) -> Vec<String> {
    if width == 0 || hints.is_empty() {
        return Vec::new();
    }

    let prefix = " ";
    let separator = "  ";
    let mut out: Vec<String> = Vec::new();
    let mut current = prefix.to_string();
    let mut has_hint = false;

    for hint in hints.iter().filter(|h| !h.is_empty()) {
        let candidate = if has_hint {
            format!("{current}{separator}{hint}")
        } else {
            format!("{current}{hint}")
        };
        if candidate.chars().count() <= width || !has_hint {
            current = candidate;
        } else {
            out.push(current);
            current = format!("{prefix}{hint}");
        }
        has_hint = true;
    }

    if has_hint {
        out.push(current);
    }
    out
}

pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let left = area.x + (area.width - width) / 2;
    let top = area.y + (area.height - height) / 2;
    Rect::new(left, top, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hints_wrap_at_width() {
        let lines = pack_hint_lines(&["[n] New word", "[h] Previous", "[q] Quit"], 28);
        assert_eq!(lines, vec![" [n] New word  [h] Previous", " [q] Quit"]);
    }

    #[test]
    fn hints_empty_inputs() {
        assert!(pack_hint_lines(&[], 40).is_empty());
        assert!(pack_hint_lines(&["[q] Quit"], 0).is_empty());
        assert!(pack_hint_lines(&["", ""], 40).is_empty());
    }

    #[test]
    fn centered_rect_fits_small_areas() {
        let area = Rect::new(0, 0, 20, 6);
        assert_eq!(centered_rect(50, 10, area), area);
        assert_eq!(centered_rect(10, 2, area), Rect::new(5, 2, 10, 2));
    }

    #[test]
    fn card_stays_inside_body() {
        let body = Rect::new(0, 1, 120, 30);
        let card = card_rect(body);
        assert_eq!(card.width, 64);
        assert_eq!(card.height, 16);
        assert!(card.x >= body.x && card.right() <= body.right());
        assert!(card.y > body.y && card.bottom() <= body.bottom());

        let tiny = card_rect(Rect::new(0, 0, 3, 1));
        assert_eq!(tiny.width, 0);
        assert_eq!(tiny.height, 0);
    }
}
