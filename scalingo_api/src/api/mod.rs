mod types;

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use url::Url;

pub use types::{App, Variable};

use self::types::{AppsResponse, VariablesResponse};
use crate::{ScalingoError, ScalingoResult, client::ScalingoClient};

const APPS_PATH: &str = "/v1/apps";

#[async_trait]
pub trait ScalingoApi {
    /// Names of every application visible to the token, in API order.
    async fn app_names(&self) -> ScalingoResult<Vec<String>>;

    /// Environment variables of `app`. A name listed twice keeps its last value.
    async fn app_variables(&self, app: &str) -> ScalingoResult<HashMap<String, String>>;
}

impl ScalingoClient {
    /// Authenticated GET against the configured API URL, decoding a JSON body.
    pub async fn get_json<T>(&self, path: &str) -> ScalingoResult<T>
    where
        T: DeserializeOwned,
    {
        let body = self.perform_request(Method::GET, None, path, None).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl ScalingoApi for ScalingoClient {
    async fn app_names(&self) -> ScalingoResult<Vec<String>> {
        let response: AppsResponse = self.get_json(APPS_PATH).await?;
        Ok(app_names_from(response))
    }

    async fn app_variables(&self, app: &str) -> ScalingoResult<HashMap<String, String>> {
        let path = app_path(app, "variables")?;
        let response: VariablesResponse = self.get_json(&path).await?;
        Ok(variables_into_map(response))
    }
}

/// `/v1/apps/{app}/{resource}` with `app` percent-encoded as one segment.
fn app_path(app: &str, resource: &str) -> ScalingoResult<String> {
    if matches!(app, "" | "." | "..") {
        return Err(ScalingoError::InvalidAppName(app.to_owned()));
    }

    let mut url = Url::parse("http://localhost")?;
    url.path_segments_mut()
        .map_err(|()| ScalingoError::InvalidAppName(app.to_owned()))?
        .clear()
        .extend(["v1", "apps", app, resource]);
    Ok(url.path().to_owned())
}

fn app_names_from(response: AppsResponse) -> Vec<String> {
    response.apps.into_iter().map(|app| app.name).collect()
}

fn variables_into_map(response: VariablesResponse) -> HashMap<String, String> {
    response
        .variables
        .into_iter()
        .map(|variable| (variable.name, variable.value))
        .collect()
}
