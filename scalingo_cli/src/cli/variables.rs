use std::collections::{BTreeMap, HashMap};

use anyhow::Context;
use clap::{Args, ValueEnum};

use scalingo_api::ScalingoApi;

use crate::cli::common::{ClientOpts, build_client};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// `NAME=value` lines.
    #[default]
    Plain,
    /// `export NAME='value'` lines, safe to `eval` in a POSIX shell.
    Export,
    /// A single JSON object.
    Json,
}

#[derive(Debug, Args)]
pub(crate) struct VariablesCommand {
    /// Application name.
    app: String,

    #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
    format: OutputFormat,
}

impl VariablesCommand {
    pub(crate) async fn run(&self, opts: &ClientOpts) -> anyhow::Result<()> {
        let client = build_client(opts)?;
        let variables = client
            .app_variables(&self.app)
            .await
            .with_context(|| format!("failed to fetch variables of `{}`", self.app))?;
        log::info!("{} has {} variables", self.app, variables.len());

        print!("{}", render_variables(&variables, self.format)?);
        Ok(())
    }
}

fn render_variables(
    variables: &HashMap<String, String>,
    format: OutputFormat,
) -> anyhow::Result<String> {
    let sorted: BTreeMap<&str, &str> = variables
        .iter()
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();

    Ok(match format {
        OutputFormat::Plain => sorted
            .iter()
            .map(|(name, value)| format!("{name}={value}\n"))
            .collect(),
        OutputFormat::Export => sorted
            .iter()
            .map(|(name, value)| format!("export {name}={}\n", shell_quote(value)))
            .collect(),
        OutputFormat::Json => {
            let mut rendered = serde_json::to_string_pretty(&sorted)?;
            rendered.push('\n');
            rendered
        }
    })
}

fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}
