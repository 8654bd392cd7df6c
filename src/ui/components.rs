//! Shared UI components (status bar, modal helpers).

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::{AppState, InputMode};

/// Render the bottom status bar with mode and counts.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
        InputMode::Modal => "MODAL",
    };
    let state = app.store.state();
    let pending = if app.search.is_pending() { "  (typing…)" } else { "" };
    let msg = format!(
        "mode: {mode}  users:{}/{}  rows/page:{}{pending}",
        state.filtered_users.len(),
        state.users.len(),
        app.rows_per_page,
    );
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the detail overlay for the selected identifier. The body mirrors
/// the store's detail sub-state: loading, error, or the user's fields.
pub fn render_detail_modal(f: &mut Frame, area: Rect, app: &AppState, user_id: u64) {
    let width = 60u16.min(area.width.saturating_sub(4)).max(40);
    let height = 12u16.min(area.height.saturating_sub(4)).max(8);
    let rect = centered_rect(width, height, area);

    let state = app.store.state();
    let (body, style) = if state.detail_loading {
        (
            format!("Loading user {user_id}…"),
            Style::default().fg(app.theme.text),
        )
    } else if let Some(message) = &state.detail_error {
        (
            format!("Failed to load user.\n\n{message}"),
            Style::default().fg(app.theme.error_fg),
        )
    } else if let Some(user) = &state.selected_user {
        (
            format!(
                "Name:    {}\nEmail:   {}\nPhone:   {}\nAddress: {}, {}, {} {}",
                user.name,
                user.email,
                user.phone,
                user.address.street,
                user.address.suite,
                user.address.city,
                user.address.zipcode
            ),
            Style::default().fg(app.theme.text),
        )
    } else {
        (String::new(), Style::default().fg(app.theme.text))
    };

    let p = Paragraph::new(format!("{body}\n\nEsc: close"))
        .style(style)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title("User details")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

/// Render the help modal with key usage.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState) {
    let width = 56u16.min(area.width.saturating_sub(4)).max(40);
    let height = 14u16.min(area.height.saturating_sub(4)).max(10);
    let rect = centered_rect(width, height, area);

    let italic = Style::default().add_modifier(Modifier::ITALIC);
    let lines: Vec<Line> = vec![
        Line::from(Span::styled(
            "Help",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
        Line::from(vec![
            Span::raw("Navigation: "),
            Span::styled("Arrow keys / j k, PgUp/PgDn, Home/End", italic),
        ]),
        Line::from(vec![
            Span::raw("Search: "),
            Span::styled("/", italic),
            Span::raw(" to start; type to filter; Enter applies, Esc cancels"),
        ]),
        Line::from(vec![
            Span::raw("Open details: "),
            Span::styled("Enter", italic),
        ]),
        Line::from(vec![Span::raw("Refresh: "), Span::styled("r", italic)]),
        Line::from(vec![Span::raw("Quit: "), Span::styled("q", italic)]),
        Line::raw(""),
        Line::from(vec![
            Span::raw("Close help: "),
            Span::styled("Esc / Enter", italic),
        ]),
    ];

    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("Help")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
