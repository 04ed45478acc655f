mod overlays;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::app::App;
use crate::store::SyncState;
use crate::types::{Focus, PendingAction};
use crate::util::{file_name, pending_hint, truncate_to_width};

pub(crate) fn draw(app: &mut App, frame: &mut Frame<'_>) {
    let size = frame.area();
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(size);
    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(app.files_pane_width.max(App::MIN_FILES_PANE_WIDTH)),
            Constraint::Min(28),
        ])
        .split(vertical[1]);
    app.tree_rect = main[0];
    app.editor_rect = main[1];

    let file_label = match app.open_path() {
        Some(path) => {
            let mut s = path.to_string();
            if app.is_dirty() {
                s.push_str(" *");
            }
            s
        }
        None => "no file".to_string(),
    };
    let top = Paragraph::new(format!(
        "remide   project: {}   file: {file_label}",
        app.project
    ))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(top, vertical[0]);

    let tree_border = if app.focus == Focus::Tree {
        Color::Cyan
    } else {
        Color::DarkGray
    };
    let editor_border = if app.focus == Focus::Editor {
        Color::Cyan
    } else {
        Color::DarkGray
    };

    // Keep the selection inside the visible window of the list.
    let visible = usize::from(main[0].height.saturating_sub(2));
    if visible > 0 {
        if app.selected < app.tree_scroll {
            app.tree_scroll = app.selected;
        } else if app.selected >= app.tree_scroll + visible {
            app.tree_scroll = app.selected + 1 - visible;
        }
    }

    let tree_items: Vec<ListItem> = app
        .rows
        .iter()
        .skip(app.tree_scroll)
        .take(visible.max(1))
        .map(|row| {
            let indent = "  ".repeat(row.depth);
            let icon = if row.is_dir {
                if app.expanded.contains(&row.path) { "▾ " } else { "▸ " }
            } else {
                "· "
            };
            let dirty = if !row.is_dir && app.workspace.is_dirty(&row.path) {
                " *"
            } else {
                ""
            };
            let style = if row.is_dir {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(
                format!("{indent}{icon}{}{dirty}", file_name(&row.path)),
                style,
            )))
        })
        .collect();
    let mut tree_state = ListState::default();
    tree_state.select(app.selected.checked_sub(app.tree_scroll));
    let tree = List::new(tree_items)
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .title("Explorer")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(tree_border)),
        );
    frame.render_stateful_widget(tree, main[0], &mut tree_state);

    let tab_title: Line = if app.tabs.is_empty() {
        Line::from("Editor")
    } else {
        let mut spans = Vec::new();
        for (idx, tab) in app.tabs.iter().enumerate() {
            if idx > 0 {
                spans.push(Span::raw(" | "));
            }
            let marker = match app.workspace.sync_state(&tab.path) {
                Some(SyncState::Dirty) => " *",
                Some(SyncState::Saving) => " ~",
                _ => "",
            };
            let label = format!("{}{marker}", truncate_to_width(file_name(&tab.path), 24));
            let style = if idx == app.active_tab {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            spans.push(Span::styled(label, style));
        }
        Line::from(spans)
    };
    let editor_block = Block::default()
        .title(tab_title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(editor_border));
    match app.active_tab() {
        Some(tab) => {
            let inner = editor_block.inner(main[1]);
            frame.render_widget(editor_block, main[1]);
            frame.render_widget(&tab.editor, inner);
        }
        None => {
            let placeholder = Paragraph::new("Enter on a file to open it")
                .style(Style::default().fg(Color::DarkGray))
                .block(editor_block);
            frame.render_widget(placeholder, main[1]);
        }
    }

    let status_text = if app.pending == PendingAction::None {
        app.status.clone()
    } else {
        pending_hint(&app.pending)
    };
    let status = Paragraph::new(status_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(status, vertical[2]);

    overlays::render_prompt(app, frame);
}
