//! Timeline adapter for the X (Twitter) API v2.
//!
//! Two requests per cold start, one per poll afterwards:
//!
//! ```text
//! GET /2/users/by/username/{handle}      → user id (cached)
//! GET /2/users/{id}/tweets?max_results=5 → newest first
//! ```
//!
//! The API will not page fewer than five posts, so five are requested and
//! only the first is used.  Authentication is an app-only bearer token; it
//! is sent as a header and never appears in URLs, logs or errors.
//!
//! The JSON decoding is plain functions so it can be tested and fuzzed
//! without a network stack.  [`HttpTimeline`] needs the `runtime` feature.

use serde::Deserialize;

use crate::app::ports::{FetchError, Post};

/// Smallest page the tweets endpoint accepts.
pub const PAGE_SIZE: u8 = 5;

#[derive(Debug, Deserialize)]
struct UserLookup {
    data: Option<UserData>,
}

#[derive(Debug, Deserialize)]
struct UserData {
    id: String,
}

#[derive(Debug, Deserialize)]
struct TweetPage {
    #[serde(default)]
    data: Vec<TweetData>,
}

#[derive(Debug, Deserialize)]
struct TweetData {
    id: String,
    text: String,
}

/// Extract the numeric user id from a user-lookup response.
///
/// The API answers an unknown handle with `200 OK` and an `errors` array
/// instead of `data`, so a missing `data` maps to
/// [`FetchError::UnknownAccount`].
pub fn decode_user_id(body: &str, handle: &str) -> Result<String, FetchError> {
    let lookup: UserLookup =
        serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))?;
    match lookup.data {
        Some(user) if !user.id.is_empty() => Ok(user.id),
        _ => Err(FetchError::UnknownAccount(handle.to_string())),
    }
}

/// Extract the newest post from a user-tweets response.
///
/// An account without posts has no `data` field at all.
pub fn decode_latest_post(body: &str) -> Result<Option<Post>, FetchError> {
    let page: TweetPage =
        serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))?;
    Ok(page
        .data
        .into_iter()
        .next()
        .map(|t| Post::new(t.id, t.text)))
}

/// Map a non-success HTTP status to a [`FetchError`].
pub fn status_error(code: u16) -> FetchError {
    match code {
        401 | 403 => FetchError::Unauthorized,
        429 => FetchError::RateLimited,
        other => FetchError::Status(other),
    }
}

#[cfg(feature = "runtime")]
pub use http::HttpTimeline;

#[cfg(feature = "runtime")]
mod http {
    use std::time::Duration;

    use log::{debug, info};

    use super::{PAGE_SIZE, decode_latest_post, decode_user_id, status_error};
    use crate::app::ports::{FetchError, Post, TimelinePort};
    use crate::config::SwitchConfig;

    fn transport(e: &reqwest::Error) -> FetchError {
        FetchError::Transport(e.to_string())
    }

    /// Blocking HTTP client implementing [`TimelinePort`].
    pub struct HttpTimeline {
        client: reqwest::blocking::Client,
        api_root: String,
        handle: String,
        bearer_token: String,
        user_id: Option<String>,
    }

    impl HttpTimeline {
        /// Build a client for `config.account_handle`.
        ///
        /// Fails with [`FetchError::MissingCredentials`] on an empty token.
        pub fn new(config: &SwitchConfig, bearer_token: String) -> Result<Self, FetchError> {
            if bearer_token.trim().is_empty() {
                return Err(FetchError::MissingCredentials);
            }
            let client = reqwest::blocking::Client::builder()
                .timeout(Duration::from_millis(config.request_timeout_ms))
                .user_agent(concat!("hashswitch/", env!("CARGO_PKG_VERSION")))
                .build()
                .map_err(|e| transport(&e))?;
            Ok(Self {
                client,
                api_root: config.api_root().to_string(),
                handle: config.handle().to_string(),
                bearer_token,
                user_id: None,
            })
        }

        fn get(&self, url: &str) -> Result<String, FetchError> {
            debug!("GET {}", url);
            let resp = self
                .client
                .get(url)
                .bearer_auth(&self.bearer_token)
                .send()
                .map_err(|e| transport(&e))?;
            let status = resp.status();
            if !status.is_success() {
                return Err(status_error(status.as_u16()));
            }
            resp.text().map_err(|e| transport(&e))
        }

        fn user_id(&mut self) -> Result<String, FetchError> {
            if let Some(id) = &self.user_id {
                return Ok(id.clone());
            }
            let url = format!("{}/2/users/by/username/{}", self.api_root, self.handle);
            let id = decode_user_id(&self.get(&url)?, &self.handle)?;
            info!("Resolved @{} to user id {}", self.handle, id);
            self.user_id = Some(id.clone());
            Ok(id)
        }
    }

    impl TimelinePort for HttpTimeline {
        fn latest_post(&mut self) -> Result<Option<Post>, FetchError> {
            let id = self.user_id()?;
            let url = format!(
                "{}/2/users/{}/tweets?max_results={}",
                self.api_root, id, PAGE_SIZE
            );
            match self.get(&url) {
                Ok(body) => decode_latest_post(&body),
                Err(FetchError::Status(404)) => {
                    // Account deleted or renamed: resolve the handle again next time.
                    self.user_id = None;
                    Err(FetchError::Status(404))
                }
                Err(e) => Err(e),
            }
        }
    }
}
