use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

use crate::app::{list_phase, AppState, ListPhase};

/// Rows materialized beyond the visible viewport.
pub const OVERSCAN: usize = 3;

/// Scroll the window so the selected row stays inside it.
pub fn follow_selection(offset: usize, selected: usize, viewport: usize) -> usize {
    if viewport == 0 {
        return 0;
    }
    if selected < offset {
        selected
    } else if selected >= offset + viewport {
        selected + 1 - viewport
    } else {
        offset
    }
}

/// Half-open row range materialized for the current frame: the viewport
/// plus the overscan margin, clamped to the collection. Rendering cost is
/// bounded by the window, independent of the collection size.
pub fn visible_range(offset: usize, len: usize, viewport: usize, overscan: usize) -> (usize, usize) {
    let start = offset.min(len);
    let end = (offset + viewport + overscan).min(len);
    (start, end)
}

fn bordered(title: &str, app: &AppState) -> Block<'static> {
    Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border))
}

pub fn render_user_list(f: &mut Frame, area: Rect, app: &mut AppState) {
    match list_phase(app.store.state()) {
        ListPhase::Loading => {
            let p = Paragraph::new("Loading users…")
                .style(Style::default().fg(app.theme.text))
                .block(bordered("Users", app));
            f.render_widget(p, area);
        }
        ListPhase::Error => {
            let message = app
                .store
                .state()
                .error
                .clone()
                .unwrap_or_else(|| "fetch failed".to_string());
            let p = Paragraph::new(format!("Failed to load users.\n\n{message}"))
                .style(Style::default().fg(app.theme.error_fg))
                .wrap(Wrap { trim: false })
                .block(bordered("Users", app));
            f.render_widget(p, area);
        }
        ListPhase::Empty => {
            let p = Paragraph::new("No users found")
                .style(Style::default().fg(app.theme.text))
                .block(bordered("Users", app));
            f.render_widget(p, area);
        }
        ListPhase::Populated => render_users_table(f, area, app),
    }
}

fn render_users_table(f: &mut Frame, area: Rect, app: &mut AppState) {
    // Borders plus the header row.
    let body_height = area.height.saturating_sub(3) as usize;
    if body_height > 0 {
        app.rows_per_page = body_height;
    }

    let len = app.store.state().filtered_users.len();
    app.scroll_offset = follow_selection(app.scroll_offset, app.selected_index, app.rows_per_page);
    let (start, end) = visible_range(app.scroll_offset, len, app.rows_per_page, OVERSCAN);

    let state = app.store.state();
    let slice = &state.filtered_users[start..end];
    let rows = slice.iter().enumerate().map(|(i, u)| {
        let absolute_index = start + i;
        let style = if absolute_index == app.selected_index {
            Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        Row::new(vec![
            Cell::from(u.id.to_string()),
            Cell::from(u.name.clone()),
            Cell::from(u.email.clone()),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Length(6),
        Constraint::Percentage(40),
        Constraint::Percentage(60),
    ];
    let header = Row::new(vec!["ID", "NAME", "EMAIL"]).style(
        Style::default()
            .fg(app.theme.title)
            .add_modifier(Modifier::BOLD),
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(bordered("Users", app))
        .column_spacing(1);

    f.render_widget(table, area);
}
