//! Shared view-state store for the user directory UI.
//!
//! The store owns the canonical view state and is the only mutable shared
//! resource in the application. All mutation goes through the exposed
//! setters, and every mutation notifies subscribed observers synchronously
//! after the new state is fully applied, so an observer never sees a
//! half-updated state.

use crate::api::User;

/// Collection and detail view state.
///
/// `filtered_users` is always a subsequence of `users` in the same relative
/// order, selected by [`matches_query`]; when `search_query` is empty it
/// equals `users`. It is recomputed inside the store whenever `users` or
/// `search_query` changes and must never be mutated by consumers.
#[derive(Clone, Debug, Default)]
pub struct ViewState {
    pub users: Vec<User>,
    pub filtered_users: Vec<User>,
    pub search_query: String,
    pub loading: bool,
    pub error: Option<String>,
    pub selected_user: Option<User>,
    pub detail_loading: bool,
    pub detail_error: Option<String>,
}

/// Case-insensitive filter predicate: name or email contains the query.
/// The empty query matches everything. Phone and address do not match.
pub fn matches_query(user: &User, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let q = query.to_lowercase();
    user.name.to_lowercase().contains(&q) || user.email.to_lowercase().contains(&q)
}

fn filter_users(users: &[User], query: &str) -> Vec<User> {
    if query.is_empty() {
        return users.to_vec();
    }
    users
        .iter()
        .filter(|u| matches_query(u, query))
        .cloned()
        .collect()
}

/// Handle returned by [`UserStore::subscribe`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&ViewState)>;

/// Observer-notifying key-value store over [`ViewState`].
///
/// The store lives on the event-loop thread; fetch tasks never touch it
/// directly. Setters are total functions over in-memory state.
#[derive(Default)]
pub struct UserStore {
    state: ViewState,
    observers: Vec<(SubscriptionId, Observer)>,
    next_id: u64,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the current state.
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Register an observer called synchronously after every mutation.
    pub fn subscribe(&mut self, observer: impl FnMut(&ViewState) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer; unknown ids are ignored.
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.observers.retain(|(sid, _)| *sid != id);
    }

    /// Apply one batch of mutations and notify observers exactly once.
    ///
    /// The setters below all route through this, and the sync layer uses it
    /// directly so a fetch completion (flags plus data) lands in a single
    /// notification.
    pub fn apply(&mut self, mutate: impl FnOnce(&mut ViewState)) {
        mutate(&mut self.state);
        for (_, observer) in &mut self.observers {
            observer(&self.state);
        }
    }

    /// Replace the collection wholesale and re-derive the filtered view
    /// with the current query.
    pub fn set_users(&mut self, users: Vec<User>) {
        self.apply(|s| {
            s.filtered_users = filter_users(&users, &s.search_query);
            s.users = users;
        });
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.apply(|s| s.loading = loading);
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.apply(|s| s.error = error);
    }

    pub fn set_selected_user(&mut self, user: Option<User>) {
        self.apply(|s| s.selected_user = user);
    }

    /// Set the committed query and synchronously recompute the filtered
    /// view before returning.
    pub fn set_search_query(&mut self, query: &str) {
        self.apply(|s| {
            s.search_query = query.to_string();
            s.filtered_users = filter_users(&s.users, &s.search_query);
        });
    }
}
