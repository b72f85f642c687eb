use anyhow::Context;
use clap::Args;
use scalingo_api::Method;

use crate::cli::common::{ClientOpts, build_client};

#[derive(Debug, Args)]
pub(crate) struct RequestCommand {
    /// HTTP method, e.g. GET or POST.
    method: String,

    /// API path, with or without a leading slash.
    path: String,

    /// JSON request body.
    #[arg(long)]
    data: Option<String>,
}

impl RequestCommand {
    pub(crate) async fn run(&self, opts: &ClientOpts) -> anyhow::Result<()> {
        let method = parse_method(&self.method)?;
        if let Some(data) = &self.data {
            serde_json::from_str::<serde_json::Value>(data).context("--data must be valid JSON")?;
        }

        let client = build_client(opts)?;
        let body = client
            .perform_request(
                method.clone(),
                None,
                &self.path,
                self.data.as_deref().map(str::as_bytes),
            )
            .await
            .with_context(|| format!("{method} {} failed", self.path))?;

        println!("{}", render_body(&body));
        Ok(())
    }
}

fn parse_method(raw: &str) -> anyhow::Result<Method> {
    Method::from_bytes(raw.trim().to_ascii_uppercase().as_bytes())
        .with_context(|| format!("invalid HTTP method `{raw}`"))
}

fn render_body(body: &[u8]) -> String {
    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(json) => serde_json::to_string_pretty(&json)
            .unwrap_or_else(|_| String::from_utf8_lossy(body).into_owned()),
        Err(_) => String::from_utf8_lossy(body).into_owned(),
    }
}
