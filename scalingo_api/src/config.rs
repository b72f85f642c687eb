use std::env;

use crate::{ScalingoError, ScalingoResult};

pub const API_TOKEN_VARIABLE: &str = "SCALINGO_API_TOKEN";
pub const DEFAULT_API_URL: &str = "https://api.scalingo.com";
pub const DEFAULT_AUTH_URL: &str = "https://auth.scalingo.com/v1/tokens/exchange";
pub const DEFAULT_USER_AGENT: &str = concat!("scalingo_api/", env!("CARGO_PKG_VERSION"));

#[derive(Clone, PartialEq, Eq)]
pub struct ScalingoConfig {
    pub api_url: String,
    pub auth_url: String,
    pub api_token: String,
    pub user_agent: String,
}

impl Default for ScalingoConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            auth_url: DEFAULT_AUTH_URL.to_owned(),
            api_token: String::new(),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl ScalingoConfig {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            ..Self::default()
        }
    }

    /// Reads the long-lived token from `SCALINGO_API_TOKEN`.
    pub fn from_env() -> ScalingoResult<Self> {
        Self::from_token(None)
    }

    /// Uses `api_token` when it is non-empty, falling back to the environment.
    pub fn from_token(api_token: Option<&str>) -> ScalingoResult<Self> {
        let api_token = resolve_api_token(api_token, env::var(API_TOKEN_VARIABLE).ok())?;
        Ok(Self::new(api_token))
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_auth_url(mut self, auth_url: impl Into<String>) -> Self {
        self.auth_url = auth_url.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn validate(&self) -> ScalingoResult<()> {
        if self.api_token.trim().is_empty() {
            return Err(ScalingoError::InvalidConfig("SCALINGO_API_TOKEN must be set"));
        }
        if self.api_url.trim().is_empty() {
            return Err(ScalingoError::InvalidConfig("api url must be set"));
        }
        if self.auth_url.trim().is_empty() {
            return Err(ScalingoError::InvalidConfig("auth url must be set"));
        }
        if self.user_agent.trim().is_empty() {
            return Err(ScalingoError::InvalidConfig("user_agent must be set"));
        }
        Ok(())
    }
}

// The token is a secret; keep it out of `{:?}` output.
impl std::fmt::Debug for ScalingoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScalingoConfig")
            .field("api_url", &self.api_url)
            .field("auth_url", &self.auth_url)
            .field("api_token", &"<redacted>")
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

fn resolve_api_token(explicit: Option<&str>, from_env: Option<String>) -> ScalingoResult<String> {
    explicit
        .filter(|token| !token.is_empty())
        .map(ToOwned::to_owned)
        .or_else(|| from_env.filter(|token| !token.is_empty()))
        .ok_or(ScalingoError::InvalidConfig("SCALINGO_API_TOKEN must be set"))
}
