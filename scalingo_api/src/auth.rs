use std::{fmt, sync::Mutex};

use reqwest::{Method, Response};
use serde::Deserialize;

use crate::{ScalingoResult, client::ScalingoClient};

/// Short-lived credential obtained from the token exchange endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl From<String> for BearerToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for BearerToken {
    fn from(token: &str) -> Self {
        Self(token.to_owned())
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

#[derive(Deserialize)]
struct BearerTokenResponse {
    token: String,
}

/// Holds the current bearer token. The lock is never held across an await.
#[derive(Debug, Default)]
pub(crate) struct BearerTokenCache {
    current: Mutex<Option<BearerToken>>,
}

impl BearerTokenCache {
    pub(crate) fn get(&self) -> Option<BearerToken> {
        match self.current.lock() {
            Ok(current) => current.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub(crate) fn replace(&self, token: Option<BearerToken>) {
        match self.current.lock() {
            Ok(mut guard) => *guard = token,
            Err(poisoned) => {
                let mut guard = poisoned.into_inner();
                *guard = token;
            }
        }
    }
}

impl ScalingoClient {
    /// Exchanges the long-lived API token for a bearer token.
    ///
    /// An error status from the exchange endpoint is logged and yields
    /// `Ok(None)`; only transport and decoding failures are errors.
    pub async fn fetch_bearer_token(&self) -> ScalingoResult<Option<BearerToken>> {
        let request = self.prepare_request_for_url(
            Method::POST,
            &self.config().auth_url,
            Some(self.config().api_token.as_str()),
            None,
        )?;
        let method = request.method().to_string();
        let url = request.url().to_string();

        self.fetch_response(request, move |response| {
            read_bearer_token(response, method, url)
        })
        .await
    }

    /// Fetches a fresh bearer token and stores it, replacing any cached one.
    pub async fn refresh_bearer_token(&self) -> ScalingoResult<Option<BearerToken>> {
        log::info!("fetching a new bearer token");
        let token = self.fetch_bearer_token().await?;
        self.bearer_cache().replace(token.clone());
        Ok(token)
    }

    pub fn cached_bearer_token(&self) -> Option<BearerToken> {
        self.bearer_cache().get()
    }

    pub fn clear_bearer_token(&self) {
        log::info!("invalidating cached bearer token");
        self.bearer_cache().replace(None);
    }
}

async fn read_bearer_token(
    response: Response,
    method: String,
    url: String,
) -> ScalingoResult<Option<BearerToken>> {
    let status = response.status().as_u16();
    if status >= 400 {
        log::warn!("requesting {method} {url} has failed with status={status}");
        return Ok(None);
    }

    let body = response.bytes().await?;
    log::debug!("performed {method} request to {url} successfully");
    let parsed: BearerTokenResponse = serde_json::from_slice(&body)?;
    if parsed.token.is_empty() {
        log::warn!("token exchange at {url} returned an empty token");
        return Ok(None);
    }
    Ok(Some(BearerToken::new(parsed.token)))
}

#[cfg(test)]
mod tests {
    use super::{BearerToken, BearerTokenCache};

    #[test]
    fn cache_starts_empty_and_replaces() {
        let cache = BearerTokenCache::default();
        assert_eq!(cache.get(), None);

        cache.replace(Some(BearerToken::new("first")));
        assert_eq!(cache.get(), Some(BearerToken::new("first")));

        cache.replace(Some(BearerToken::new("second")));
        assert_eq!(cache.get().as_ref().map(BearerToken::secret), Some("second"));

        cache.replace(None);
        assert_eq!(cache.get(), None);
    }

    #[test]
    fn bearer_token_debug_is_redacted() {
        let rendered = format!("{:?}", BearerToken::from("abc.def.ghi"));
        assert_eq!(rendered, "BearerToken(<redacted>)");
    }
}
