//! Remote data access for the user directory.
//!
//! Two read-only operations against a fixed collection resource:
//! list all users and fetch one user by id. Both decode JSON into
//! [`User`] records; unknown upstream fields are ignored.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Postal address of a user, as returned by the directory API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub suite: String,
    pub city: String,
    pub zipcode: String,
}

/// A directory user. Immutable once fetched; the collection is replaced
/// wholesale on refresh.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: Address,
}

/// Shared HTTP client bound to the directory base URL.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client for `base_url`. A trailing slash is tolerated.
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn users_url(&self) -> String {
        format!("{}/users", self.base_url)
    }

    /// Fetch the full user collection. No pagination parameters are sent;
    /// the endpoint always returns the whole collection.
    pub async fn fetch_users(&self) -> Result<Vec<User>> {
        let url = self.users_url();
        let users = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET {url} failed"))?
            .error_for_status()
            .with_context(|| format!("GET {url} returned an error status"))?
            .json::<Vec<User>>()
            .await
            .with_context(|| format!("GET {url} returned malformed JSON"))?;
        Ok(users)
    }

    /// Fetch a single user by id. A missing user surfaces as an error
    /// status, collapsed into the same "fetch failed" condition as any
    /// other failure.
    pub async fn fetch_user(&self, id: u64) -> Result<User> {
        let url = format!("{}/{id}", self.users_url());
        let user = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET {url} failed"))?
            .error_for_status()
            .with_context(|| format!("GET {url} returned an error status"))?
            .json::<User>()
            .await
            .with_context(|| format!("GET {url} returned malformed JSON"))?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_user_ignores_unknown_fields() {
        let raw = r#"{
            "id": 1,
            "name": "John Doe",
            "username": "jdoe",
            "email": "john.doe@example.com",
            "phone": "1-770-736-8031",
            "website": "example.com",
            "address": {
                "street": "Kulas Light",
                "suite": "Apt. 556",
                "city": "Gwenborough",
                "zipcode": "92998-3874",
                "geo": { "lat": "-37.3159", "lng": "81.1496" }
            }
        }"#;

        let user: User = serde_json::from_str(raw).unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.name, "John Doe");
        assert_eq!(user.email, "john.doe@example.com");
        assert_eq!(user.address.city, "Gwenborough");
        assert_eq!(user.address.zipcode, "92998-3874");
    }

    #[test]
    fn decode_user_collection_preserves_order() {
        let raw = r#"[
            {"id": 3, "name": "c", "email": "c@x", "phone": "3",
             "address": {"street": "s", "suite": "u", "city": "t", "zipcode": "z"}},
            {"id": 1, "name": "a", "email": "a@x", "phone": "1",
             "address": {"street": "s", "suite": "u", "city": "t", "zipcode": "z"}}
        ]"#;

        let users: Vec<User> = serde_json::from_str(raw).unwrap();
        let ids: Vec<u64> = users.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn client_normalizes_trailing_slash() {
        let client = ApiClient::new("http://localhost:1/").unwrap();
        assert_eq!(client.users_url(), "http://localhost:1/users");
    }
}
