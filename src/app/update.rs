use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::debug;

use crate::app::{AppState, InputMode, ModalState};
use crate::sync::{FetchMsg, Syncer};
use crate::ui;

/// Run the TUI event loop: draw, drain completed fetches, poll the search
/// debounce timer, then poll terminal input for one tick.
///
/// Fetch results and debounce commits are applied between frames on this
/// thread only, so the store never needs locking and every frame observes
/// a fully applied state.
pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    mut app: AppState,
    mut syncer: Syncer,
    mut rx: UnboundedReceiver<FetchMsg>,
    tick: Duration,
) -> Result<()> {
    syncer.request_collection(&mut app.store);

    loop {
        terminal.draw(|f| {
            ui::render(f, &mut app);
        })?;

        while let Ok(msg) = rx.try_recv() {
            syncer.handle(&mut app.store, msg);
            app.clamp_selection();
        }

        if let Some(query) = app.search.tick(Instant::now()) {
            debug!(%query, "committing debounced search query");
            app.store.set_search_query(&query);
            app.clamp_selection();
        }

        if event::poll(tick)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match app.input_mode {
                        InputMode::Normal => match key.code {
                            KeyCode::Char('q') => break,
                            KeyCode::Char('/') => {
                                app.search.reset_to(&app.store.state().search_query);
                                app.input_mode = InputMode::Search;
                            }
                            KeyCode::Char('r') => {
                                syncer.request_collection(&mut app.store);
                            }
                            KeyCode::Char('?') => {
                                app.modal = Some(ModalState::Help);
                                app.input_mode = InputMode::Modal;
                            }
                            KeyCode::Enter => {
                                if let Some(id) = app.selected_user_id() {
                                    app.modal = Some(ModalState::Detail { user_id: id });
                                    app.input_mode = InputMode::Modal;
                                    syncer.request_detail(&mut app.store, id);
                                }
                            }
                            KeyCode::Up | KeyCode::Char('k') => {
                                if app.selected_index > 0 {
                                    app.selected_index -= 1;
                                }
                            }
                            KeyCode::Down | KeyCode::Char('j') => {
                                if app.selected_index + 1
                                    < app.store.state().filtered_users.len()
                                {
                                    app.selected_index += 1;
                                }
                            }
                            KeyCode::PageUp | KeyCode::Char('h') => {
                                let step = app.rows_per_page.max(1);
                                app.selected_index = app.selected_index.saturating_sub(step);
                            }
                            KeyCode::PageDown | KeyCode::Char('l') => {
                                let step = app.rows_per_page.max(1);
                                let len = app.store.state().filtered_users.len();
                                let new_idx = app.selected_index.saturating_add(step);
                                app.selected_index = new_idx.min(len.saturating_sub(1));
                            }
                            KeyCode::Home => {
                                app.selected_index = 0;
                            }
                            KeyCode::End => {
                                let len = app.store.state().filtered_users.len();
                                app.selected_index = len.saturating_sub(1);
                            }
                            _ => {}
                        },
                        InputMode::Search => match key.code {
                            KeyCode::Enter => {
                                if let Some(query) = app.search.flush() {
                                    app.store.set_search_query(&query);
                                    app.clamp_selection();
                                }
                                app.input_mode = InputMode::Normal;
                            }
                            KeyCode::Esc => {
                                app.search.cancel();
                                app.search.reset_to(&app.store.state().search_query);
                                app.input_mode = InputMode::Normal;
                            }
                            KeyCode::Backspace => {
                                app.search.backspace(Instant::now());
                            }
                            KeyCode::Char(c) => {
                                app.search.push(c, Instant::now());
                            }
                            _ => {}
                        },
                        InputMode::Modal => handle_modal_key(&mut app, &mut syncer, key.code),
                    }
                }
            }
        }
    }

    Ok(())
}

fn handle_modal_key(app: &mut AppState, syncer: &mut Syncer, code: KeyCode) {
    match &app.modal {
        Some(ModalState::Detail { .. }) => match code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => {
                // Clearing the identifier soft-cancels an in-flight fetch
                // and makes any later reopen a fresh one.
                syncer.clear_detail(&mut app.store);
                close_modal(app);
            }
            _ => {}
        },
        Some(ModalState::Help) => match code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?') => close_modal(app),
            _ => {}
        },
        None => {}
    }
}

fn close_modal(app: &mut AppState) {
    app.modal = None;
    app.input_mode = InputMode::Normal;
}
