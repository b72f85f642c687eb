use std::{env, fmt};

use anyhow::Context;
use clap::Args;
use scalingo_api::{ScalingoClient, ScalingoConfig};

const API_URL_VARIABLE: &str = "SCALINGO_API_URL";
const AUTH_URL_VARIABLE: &str = "SCALINGO_AUTH_URL";

#[derive(Args)]
pub(crate) struct ClientOpts {
    /// Long-lived API token; defaults to SCALINGO_API_TOKEN.
    #[arg(long, global = true)]
    api_token: Option<String>,

    /// API base URL; defaults to SCALINGO_API_URL, then the public endpoint.
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Token exchange URL; defaults to SCALINGO_AUTH_URL, then the public endpoint.
    #[arg(long, global = true)]
    auth_url: Option<String>,
}

impl fmt::Debug for ClientOpts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOpts")
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("api_url", &self.api_url)
            .field("auth_url", &self.auth_url)
            .finish()
    }
}

fn load_scalingo_config(opts: &ClientOpts) -> anyhow::Result<ScalingoConfig> {
    let mut config = ScalingoConfig::from_token(opts.api_token.as_deref())
        .context("no API token; provide --api-token or set SCALINGO_API_TOKEN")?;

    if let Some(api_url) = flag_or_env(opts.api_url.as_deref(), API_URL_VARIABLE) {
        config = config.with_api_url(api_url);
    }
    if let Some(auth_url) = flag_or_env(opts.auth_url.as_deref(), AUTH_URL_VARIABLE) {
        config = config.with_auth_url(auth_url);
    }

    Ok(config.with_user_agent(format!(
        "{}/{}",
        clap::crate_name!(),
        clap::crate_version!()
    )))
}

pub(crate) fn build_client(opts: &ClientOpts) -> anyhow::Result<ScalingoClient> {
    let config = load_scalingo_config(opts)?;
    log::debug!("using {config:?}");
    ScalingoClient::new(config).context("failed to create Scalingo API client")
}

fn flag_or_env(flag: Option<&str>, name: &str) -> Option<String> {
    flag.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
        .or_else(|| optional_env(name))
}

fn optional_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|raw| raw.trim().to_owned())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{ClientOpts, flag_or_env, load_scalingo_config};

    #[test]
    fn url_flags_override_configured_endpoints() {
        let opts = ClientOpts {
            api_token: Some("tk-us-123".to_string()),
            api_url: Some("https://api.osc-secnum-fr1.scalingo.com".to_string()),
            auth_url: Some("https://auth.example.test/v1/tokens/exchange".to_string()),
        };

        let config = load_scalingo_config(&opts).expect("config should load");

        assert_eq!(config.api_url, "https://api.osc-secnum-fr1.scalingo.com");
        assert_eq!(config.auth_url, "https://auth.example.test/v1/tokens/exchange");
        assert_eq!(config.api_token, "tk-us-123");
    }

    #[test]
    fn blank_flag_is_ignored() {
        assert_eq!(flag_or_env(Some("  "), "SCALINGO_CLI_TEST_UNSET_VARIABLE"), None);
        assert_eq!(
            flag_or_env(Some(" https://foo.bar "), "SCALINGO_CLI_TEST_UNSET_VARIABLE"),
            Some("https://foo.bar".to_string())
        );
    }

    #[test]
    fn debug_output_redacts_token() {
        let opts = ClientOpts {
            api_token: Some("tk-us-secret".to_string()),
            api_url: None,
            auth_url: None,
        };
        let rendered = format!("{opts:?}");
        assert!(!rendered.contains("tk-us-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
