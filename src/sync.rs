//! Bridge between asynchronous fetch results and the view-state store.
//!
//! Fetch tasks run on a background tokio runtime and report back over an
//! unbounded channel; the event loop drains the channel and feeds each
//! message to [`Syncer::handle`], which applies it to the store in one
//! batch mutation. Every request carries a generation token, and a result
//! whose token no longer matches the current request is discarded, so a
//! stale in-flight fetch can never overwrite state for a newer one.

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::api::{ApiClient, User};
use crate::store::UserStore;

/// Completed fetch, reported by a task over the channel.
#[derive(Clone, Debug)]
pub enum FetchMsg {
    Collection {
        generation: u64,
        result: Result<Vec<User>, String>,
    },
    Detail {
        id: u64,
        generation: u64,
        result: Result<User, String>,
    },
}

/// Create the channel the fetch tasks report over.
pub fn fetch_channel() -> (UnboundedSender<FetchMsg>, UnboundedReceiver<FetchMsg>) {
    mpsc::unbounded_channel()
}

/// Owns the fetch tasks for the collection and the detail entity.
pub struct Syncer {
    handle: Handle,
    client: ApiClient,
    tx: UnboundedSender<FetchMsg>,
    collection_generation: u64,
    detail_generation: u64,
    current_detail: Option<u64>,
}

impl Syncer {
    pub fn new(handle: Handle, client: ApiClient, tx: UnboundedSender<FetchMsg>) -> Self {
        Self {
            handle,
            client,
            tx,
            collection_generation: 0,
            detail_generation: 0,
            current_detail: None,
        }
    }

    /// Identifier the detail overlay is currently keyed by, if any.
    pub fn current_detail(&self) -> Option<u64> {
        self.current_detail
    }

    /// Issue the collection fetch. Called once at startup and again only on
    /// an explicit refresh trigger.
    pub fn request_collection(&mut self, store: &mut UserStore) {
        self.collection_generation += 1;
        let generation = self.collection_generation;
        store.apply(|s| {
            s.loading = true;
            s.error = None;
        });

        let client = self.client.clone();
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            let result = fetch_users_once_retried(&client).await;
            let _ = tx.send(FetchMsg::Collection { generation, result });
        });
    }

    /// Issue a detail fetch for `id`. A request for the identifier already
    /// current is ignored: at most one fetch per distinct identifier.
    pub fn request_detail(&mut self, store: &mut UserStore, id: u64) {
        if self.current_detail == Some(id) {
            return;
        }
        self.current_detail = Some(id);
        self.detail_generation += 1;
        let generation = self.detail_generation;
        store.apply(|s| {
            s.selected_user = None;
            s.detail_loading = true;
            s.detail_error = None;
        });

        let client = self.client.clone();
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            let result = fetch_user_once_retried(&client, id).await;
            let _ = tx.send(FetchMsg::Detail {
                id,
                generation,
                result,
            });
        });
    }

    /// Forget the current detail identifier and soft-cancel any in-flight
    /// detail fetch: its result will fail the generation check on arrival.
    /// A later reopen, same identifier or not, issues a fresh fetch.
    pub fn clear_detail(&mut self, store: &mut UserStore) {
        self.current_detail = None;
        self.detail_generation += 1;
        store.apply(|s| {
            s.selected_user = None;
            s.detail_loading = false;
            s.detail_error = None;
        });
    }

    /// Apply a completed fetch to the store, if it is still current.
    ///
    /// Loading flag, error field, and data land in one batch mutation, so
    /// observers see the completed transition atomically.
    pub fn handle(&mut self, store: &mut UserStore, msg: FetchMsg) {
        match msg {
            FetchMsg::Collection { generation, result } => {
                if generation != self.collection_generation {
                    debug!(generation, "discarding stale collection result");
                    return;
                }
                match result {
                    Ok(users) => {
                        info!(count = users.len(), "user collection loaded");
                        store.apply(|s| {
                            s.loading = false;
                            s.error = None;
                            s.filtered_users = users
                                .iter()
                                .filter(|u| crate::store::matches_query(u, &s.search_query))
                                .cloned()
                                .collect();
                            s.users = users;
                        });
                    }
                    Err(message) => {
                        warn!(%message, "user collection fetch failed");
                        store.apply(|s| {
                            s.loading = false;
                            s.error = Some(message);
                        });
                    }
                }
            }
            FetchMsg::Detail {
                id,
                generation,
                result,
            } => {
                if generation != self.detail_generation || self.current_detail != Some(id) {
                    debug!(id, generation, "discarding stale detail result");
                    return;
                }
                match result {
                    Ok(user) => {
                        info!(id, "user detail loaded");
                        store.apply(|s| {
                            s.detail_loading = false;
                            s.detail_error = None;
                            s.selected_user = Some(user);
                        });
                    }
                    Err(message) => {
                        warn!(id, %message, "user detail fetch failed");
                        store.apply(|s| {
                            s.detail_loading = false;
                            s.detail_error = Some(message);
                        });
                    }
                }
            }
        }
    }
}

/// One transport-level retry, no backoff. Failures collapse to a single
/// message string; the rendering layer never sees the error chain.
async fn fetch_users_once_retried(client: &ApiClient) -> Result<Vec<User>, String> {
    match client.fetch_users().await {
        Ok(users) => Ok(users),
        Err(first) => {
            warn!(error = %first, "collection fetch failed, retrying once");
            client.fetch_users().await.map_err(|err| format!("{err:#}"))
        }
    }
}

async fn fetch_user_once_retried(client: &ApiClient, id: u64) -> Result<User, String> {
    match client.fetch_user(id).await {
        Ok(user) => Ok(user),
        Err(first) => {
            warn!(id, error = %first, "detail fetch failed, retrying once");
            client.fetch_user(id).await.map_err(|err| format!("{err:#}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Address, ApiClient};

    fn mk_user(id: u64, name: &str) -> User {
        User {
            id,
            name: name.to_string(),
            email: format!("{name}@example.com").to_lowercase(),
            phone: String::new(),
            address: Address {
                street: String::new(),
                suite: String::new(),
                city: String::new(),
                zipcode: String::new(),
            },
        }
    }

    fn mk_syncer(handle: Handle) -> (Syncer, UnboundedReceiver<FetchMsg>) {
        let (tx, rx) = fetch_channel();
        // Unroutable port: spawned tasks fail quickly and are never drained.
        let client = ApiClient::new("http://127.0.0.1:1").unwrap();
        (Syncer::new(handle, client, tx), rx)
    }

    #[test]
    fn stale_detail_result_is_discarded() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .unwrap();
        let (mut syncer, _rx) = mk_syncer(runtime.handle().clone());
        let mut store = UserStore::new();

        syncer.request_detail(&mut store, 1);
        let gen_a = 1;
        syncer.clear_detail(&mut store);
        syncer.request_detail(&mut store, 2);
        let gen_b = 3;

        // A's fetch resolves after B was requested: must not land.
        syncer.handle(
            &mut store,
            FetchMsg::Detail {
                id: 1,
                generation: gen_a,
                result: Ok(mk_user(1, "Stale")),
            },
        );
        assert!(store.state().selected_user.is_none());
        assert!(store.state().detail_loading);

        syncer.handle(
            &mut store,
            FetchMsg::Detail {
                id: 2,
                generation: gen_b,
                result: Ok(mk_user(2, "Fresh")),
            },
        );
        let selected = store.state().selected_user.as_ref().unwrap();
        assert_eq!(selected.id, 2);
        assert!(!store.state().detail_loading);
    }

    #[test]
    fn detail_result_after_close_is_discarded() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .unwrap();
        let (mut syncer, _rx) = mk_syncer(runtime.handle().clone());
        let mut store = UserStore::new();

        syncer.request_detail(&mut store, 1);
        syncer.clear_detail(&mut store);

        syncer.handle(
            &mut store,
            FetchMsg::Detail {
                id: 1,
                generation: 1,
                result: Ok(mk_user(1, "Closed")),
            },
        );
        assert!(store.state().selected_user.is_none());
        assert!(!store.state().detail_loading);
    }

    #[test]
    fn repeated_request_for_current_identifier_is_ignored() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .unwrap();
        let (mut syncer, _rx) = mk_syncer(runtime.handle().clone());
        let mut store = UserStore::new();

        syncer.request_detail(&mut store, 7);
        syncer.request_detail(&mut store, 7);
        assert_eq!(syncer.current_detail(), Some(7));

        // First (and only) request's result still lands.
        syncer.handle(
            &mut store,
            FetchMsg::Detail {
                id: 7,
                generation: 1,
                result: Ok(mk_user(7, "Only")),
            },
        );
        assert_eq!(store.state().selected_user.as_ref().unwrap().id, 7);
    }

    #[test]
    fn collection_failure_sets_error_and_clears_loading() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .unwrap();
        let (mut syncer, _rx) = mk_syncer(runtime.handle().clone());
        let mut store = UserStore::new();

        syncer.request_collection(&mut store);
        assert!(store.state().loading);

        syncer.handle(
            &mut store,
            FetchMsg::Collection {
                generation: 1,
                result: Err("GET /users failed".to_string()),
            },
        );
        let s = store.state();
        assert!(!s.loading);
        assert_eq!(s.error.as_deref(), Some("GET /users failed"));
        assert!(s.users.is_empty());
    }

    #[test]
    fn detail_failure_does_not_touch_collection_state() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .unwrap();
        let (mut syncer, _rx) = mk_syncer(runtime.handle().clone());
        let mut store = UserStore::new();
        store.set_users(vec![mk_user(1, "John")]);

        syncer.request_detail(&mut store, 1);
        syncer.handle(
            &mut store,
            FetchMsg::Detail {
                id: 1,
                generation: 1,
                result: Err("GET /users/1 failed".to_string()),
            },
        );

        let s = store.state();
        assert_eq!(s.detail_error.as_deref(), Some("GET /users/1 failed"));
        assert!(s.error.is_none());
        assert_eq!(s.users.len(), 1);
    }

    #[test]
    fn collection_success_applies_current_filter() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .unwrap();
        let (mut syncer, _rx) = mk_syncer(runtime.handle().clone());
        let mut store = UserStore::new();
        store.set_search_query("ann");

        syncer.request_collection(&mut store);
        syncer.handle(
            &mut store,
            FetchMsg::Collection {
                generation: 1,
                result: Ok(vec![mk_user(1, "Ann"), mk_user(2, "Bob")]),
            },
        );

        let s = store.state();
        assert_eq!(s.users.len(), 2);
        assert_eq!(s.filtered_users.len(), 1);
        assert_eq!(s.filtered_users[0].name, "Ann");
    }
}
