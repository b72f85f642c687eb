use anyhow::Context;
use clap::Args;
use scalingo_api::{ScalingoApi, ScalingoResult};

use crate::cli::common::{ClientOpts, build_client};

#[derive(Debug, Args)]
pub(crate) struct AppsCommand {}

impl AppsCommand {
    pub(crate) async fn run(&self, opts: &ClientOpts) -> anyhow::Result<()> {
        let client = build_client(opts)?;
        let output = render_app_names(&client)
            .await
            .context("failed to list applications")?;
        print!("{output}");
        Ok(())
    }
}

async fn render_app_names(api: &impl ScalingoApi) -> ScalingoResult<String> {
    let names = api.app_names().await?;
    log::info!("found {} applications", names.len());
    Ok(names.iter().map(|name| format!("{name}\n")).collect())
}
