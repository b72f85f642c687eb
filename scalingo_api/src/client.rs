use std::future::Future;

use reqwest::{
    Method, Request, Response, StatusCode,
    header::{ACCEPT, CONTENT_TYPE},
};
use url::Url;

use crate::{
    ScalingoError, ScalingoResult,
    auth::{BearerToken, BearerTokenCache},
    config::ScalingoConfig,
};

const JSON_CONTENT_TYPE: &str = "application/json";

/// Client for the Scalingo HTTP API.
///
/// Bearer tokens are fetched lazily on the first request and replaced once
/// whenever the API answers 401.
#[derive(Debug)]
pub struct ScalingoClient {
    http: reqwest::Client,
    config: ScalingoConfig,
    bearer: BearerTokenCache,
}

impl ScalingoClient {
    pub fn new(config: ScalingoConfig) -> ScalingoResult<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            http,
            config,
            bearer: BearerTokenCache::default(),
        })
    }

    /// Builds a client from an explicit token, or `SCALINGO_API_TOKEN` when
    /// none (or an empty one) is given.
    pub fn from_token(api_token: Option<&str>) -> ScalingoResult<Self> {
        Self::new(ScalingoConfig::from_token(api_token)?)
    }

    /// Seeds the bearer token cache, skipping the initial exchange.
    pub fn with_bearer_token(self, token: impl Into<BearerToken>) -> Self {
        self.bearer.replace(Some(token.into()));
        self
    }

    pub fn config(&self) -> &ScalingoConfig {
        &self.config
    }

    pub(crate) fn bearer_cache(&self) -> &BearerTokenCache {
        &self.bearer
    }

    /// Builds a request against `api_url` (or the configured API URL) and `path`.
    pub fn prepare_request(
        &self,
        method: Method,
        api_url: Option<&str>,
        path: &str,
        token: Option<&str>,
        body: Option<&[u8]>,
    ) -> ScalingoResult<Request> {
        let url = join_api_url(
            api_url
                .filter(|api_url| !api_url.is_empty())
                .unwrap_or(self.config.api_url.as_str()),
            path,
        );
        self.prepare_request_for_url(method, &url, token, body)
    }

    /// Builds a request for a fully qualified URL.
    ///
    /// A token is sent as HTTP Basic auth with an empty username. A body is
    /// sent verbatim and marks the request as JSON.
    pub fn prepare_request_for_url(
        &self,
        method: Method,
        url: &str,
        token: Option<&str>,
        body: Option<&[u8]>,
    ) -> ScalingoResult<Request> {
        let url = Url::parse(url)?;
        let mut builder = self.http.request(method.clone(), url.clone());

        match token {
            Some(token) => {
                builder = builder.basic_auth("", Some(token));
                log::debug!("preparing {method} request of {url} with token");
            }
            None => log::debug!("preparing {method} request of {url}"),
        }

        if let Some(body) = body {
            builder = builder
                .header(ACCEPT, JSON_CONTENT_TYPE)
                .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
                .body(body.to_vec());
        }

        Ok(builder.build()?)
    }

    /// Sends `request` and hands the response to `handler`.
    ///
    /// The response is moved into the handler, so its body is released as
    /// soon as the handler's future completes.
    pub async fn fetch_response<T, F, Fut>(&self, request: Request, handler: F) -> ScalingoResult<T>
    where
        F: FnOnce(Response) -> Fut,
        Fut: Future<Output = ScalingoResult<T>>,
    {
        let response = self.http.execute(request).await?;
        handler(response).await
    }

    /// Performs an authenticated request and returns the raw response body.
    ///
    /// On a 401 the cached bearer token is dropped, a new one is fetched and
    /// the request is retried once. Other error statuses are returned as
    /// [`ScalingoError::Status`] without retrying.
    pub async fn perform_request(
        &self,
        method: Method,
        api_url: Option<&str>,
        path: &str,
        body: Option<&[u8]>,
    ) -> ScalingoResult<Vec<u8>> {
        let token = match self.bearer.get() {
            Some(token) => Some(token),
            None => self.refresh_bearer_token().await?,
        };

        let first_attempt = self
            .perform_request_with_token(
                method.clone(),
                api_url,
                path,
                token.as_ref().map(BearerToken::secret),
                body,
            )
            .await;

        match first_attempt {
            Err(ScalingoError::Unauthorized { url, .. }) => {
                log::info!("bearer token was rejected by {url}, retrying with a new one");
                self.clear_bearer_token();
                let token = self.refresh_bearer_token().await?;
                self.perform_request_with_token(
                    method,
                    api_url,
                    path,
                    token.as_ref().map(BearerToken::secret),
                    body,
                )
                .await
            }
            other => other,
        }
    }

    /// Performs a single request with `token`, without any retry.
    pub async fn perform_request_with_token(
        &self,
        method: Method,
        api_url: Option<&str>,
        path: &str,
        token: Option<&str>,
        body: Option<&[u8]>,
    ) -> ScalingoResult<Vec<u8>> {
        let request = self.prepare_request(method, api_url, path, token, body)?;
        let method = request.method().to_string();
        let url = request.url().to_string();

        self.fetch_response(request, move |response| {
            read_api_response(response, method, url)
        })
        .await
    }
}

async fn read_api_response(
    response: Response,
    method: String,
    url: String,
) -> ScalingoResult<Vec<u8>> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(ScalingoError::Unauthorized { method, url });
    }

    if status.as_u16() >= 400 {
        let body = response.text().await?;
        return Err(ScalingoError::Status {
            method,
            url,
            status: status.as_u16(),
            body,
        });
    }

    let body = response.bytes().await?;
    log::debug!("performed {method} request to {url} successfully");
    Ok(body.to_vec())
}

fn join_api_url(api_url: &str, path: &str) -> String {
    let api_url = api_url.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{api_url}{path}")
    } else {
        format!("{api_url}/{path}")
    }
}
