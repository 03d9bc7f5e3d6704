use ratatui::layout::{Constraint, Flex, Layout, Rect};

const HINT_INDENT: &str = "  ";
const HINT_GAP: &str = "  ";

/// Header line, screen area and a footer sized for the key hints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AppLayout {
    pub header: Rect,
    pub main: Rect,
    pub footer: Rect,
}

impl AppLayout {
    pub fn new(area: Rect, footer_lines: u16) -> Self {
        let [header, main, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(footer_lines.max(1)),
        ])
        .areas(area);
        Self {
            header,
            main,
            footer,
        }
    }
}

/// Lay hints out left to right, starting a new line whenever the next hint
/// would overflow `width`. A hint wider than `width` gets a line of its own.
pub fn pack_hint_lines(hints: &[&str], width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    let mut lines: Vec<String> = Vec::new();
    let mut line = String::new();
    let mut used = 0;

    for hint in hints.iter().filter(|h| !h.is_empty()) {
        let len = hint.chars().count();
        if !line.is_empty() && used + HINT_GAP.len() + len > width {
            lines.push(std::mem::take(&mut line));
        }
        if line.is_empty() {
            line.push_str(HINT_INDENT);
            used = HINT_INDENT.len();
        } else {
            line.push_str(HINT_GAP);
            used += HINT_GAP.len();
        }
        line.push_str(hint);
        used += len;
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Popup area for modal overlays, never smaller than a usable form unless
/// the terminal itself is.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    const MIN_WIDTH: u16 = 40;
    const MIN_HEIGHT: u16 = 9;

    let width = (area.width.saturating_mul(percent_x.min(100)) / 100)
        .max(MIN_WIDTH)
        .min(area.width);
    let height = (area.height.saturating_mul(percent_y.min(100)) / 100)
        .max(MIN_HEIGHT)
        .min(area.height);

    let [column] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(column);
    popup
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hints_wrap_to_width() {
        let lines = pack_hint_lines(&["[n] New", "[d] Delete", "[Esc] Back"], 24);
        assert_eq!(lines, vec!["  [n] New  [d] Delete", "  [Esc] Back"]);
    }

    #[test]
    fn oversized_hint_gets_its_own_line() {
        let lines = pack_hint_lines(&["[a] A", "[b] a very long hint", "[c] C"], 12);
        assert_eq!(lines, vec!["  [a] A", "  [b] a very long hint", "  [c] C"]);
    }

    #[test]
    fn hints_skip_empty_and_zero_width() {
        assert!(pack_hint_lines(&["a"], 0).is_empty());
        assert!(pack_hint_lines(&[], 20).is_empty());
        assert_eq!(pack_hint_lines(&["", "a"], 10), vec!["  a"]);
    }

    #[test]
    fn popup_is_centered_and_clamped() {
        let area = Rect::new(0, 0, 100, 40);
        assert_eq!(centered_rect(50, 50, area), Rect::new(25, 10, 50, 20));

        let small = Rect::new(0, 0, 30, 6);
        assert_eq!(centered_rect(50, 50, small), small);
    }

    #[test]
    fn layout_reserves_footer_lines() {
        let layout = AppLayout::new(Rect::new(0, 0, 80, 24), 2);
        assert_eq!(layout.header.height, 1);
        assert_eq!(layout.footer.height, 2);
        assert_eq!(layout.main.height, 21);
        assert_eq!(layout.footer.y, 22);
    }
}
