use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::util::to_u16_saturating;

pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

pub(crate) fn render_prompt(app: &App, frame: &mut Frame<'_>) {
    let Some(prompt) = app.prompt.as_ref() else {
        return;
    };
    let area = centered_rect(60, 20, frame.area());
    frame.render_widget(Clear, area);
    let input = Paragraph::new(prompt.value.as_str()).block(
        Block::default()
            .title(prompt.title.as_str())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(input, area);
    let cursor_x = area.x + 1 + cursor_column(&prompt.value, prompt.cursor);
    let cursor_y = area.y + 1;
    if cursor_x < area.right() {
        frame.set_cursor_position((cursor_x, cursor_y));
    }
}

/// Terminal column of the cursor, in display cells. `cursor` is a byte
/// offset on a char boundary; wide chars count for two cells.
fn cursor_column(value: &str, cursor: usize) -> u16 {
    to_u16_saturating(value[..cursor].width())
}

#[cfg(test)]
mod tests {
    use super::{centered_rect, cursor_column};
    use ratatui::layout::Rect;

    #[test]
    fn cursor_column_counts_display_cells_not_bytes() {
        assert_eq!(cursor_column("abc", 3), 3);
        // 'é' is two bytes but one cell.
        assert_eq!(cursor_column("éa", "éa".len()), 2);
        // CJK chars occupy two cells each.
        assert_eq!(cursor_column("漢字.py", "漢字".len()), 4);
        assert_eq!(cursor_column("漢字.py", 0), 0);
    }

    #[test]
    fn centered_rect_stays_within_the_area() {
        let area = Rect::new(0, 0, 100, 40);
        let rect = centered_rect(60, 20, area);
        assert!(rect.x >= area.x && rect.right() <= area.right());
        assert!(rect.y >= area.y && rect.bottom() <= area.bottom());
        assert!(rect.width <= 60);
    }
}
