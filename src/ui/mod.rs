pub mod components;
pub mod users;

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::{AppState, InputMode, ModalState};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(f.area());

    let prompt = match app.input_mode {
        InputMode::Search => format!("  Search: {}█", app.search.buffer()),
        _ => {
            let q = &app.store.state().search_query;
            if q.is_empty() {
                String::new()
            } else {
                format!("  Search: {q}")
            }
        }
    };
    let state = app.store.state();
    let p = Paragraph::new(format!(
        "userdeck{prompt}  showing:{}/{}  — /: search; Enter: details; r: refresh; ?: help; q: quit",
        state.filtered_users.len(),
        state.users.len()
    ))
    .block(
        Block::default()
            .title("userdeck")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    )
    .style(
        Style::default()
            .fg(app.theme.header_fg)
            .bg(app.theme.header_bg),
    );
    f.render_widget(p, root[0]);

    users::render_user_list(f, root[1], app);
    components::render_status_bar(f, root[2], app);

    if app.modal.is_some() {
        render_modal(f, app);
    }
}

fn render_modal(f: &mut Frame, app: &mut AppState) {
    let area = f.area();
    match app.modal.clone() {
        Some(ModalState::Detail { user_id }) => {
            components::render_detail_modal(f, area, app, user_id);
        }
        Some(ModalState::Help) => {
            components::render_help_modal(f, area, app);
        }
        None => {}
    }
}
