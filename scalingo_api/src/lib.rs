pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod errors;

pub use api::{App, ScalingoApi, Variable};
pub use auth::BearerToken;
pub use client::ScalingoClient;
pub use config::{
    API_TOKEN_VARIABLE, DEFAULT_API_URL, DEFAULT_AUTH_URL, DEFAULT_USER_AGENT, ScalingoConfig,
};
pub use errors::{ScalingoError, ScalingoResult};
pub use reqwest::Method;
