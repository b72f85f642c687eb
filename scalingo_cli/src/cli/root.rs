use clap::{ArgAction, Parser, Subcommand};

use crate::cli::{
    apps::AppsCommand, common::ClientOpts, request::RequestCommand, variables::VariablesCommand,
};

pub(crate) fn get_args() -> CliOpts {
    CliOpts::parse()
}

#[derive(Debug, Parser)]
#[command(version = clap::crate_version!(), about = "Read-only Scalingo API client")]
pub(crate) struct CliOpts {
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(flatten)]
    client: ClientOpts,

    #[command(subcommand)]
    subcmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the names of all applications.
    Apps(AppsCommand),

    /// Print the environment variables of an application.
    Variables(VariablesCommand),

    /// Perform an arbitrary authenticated API request.
    Request(RequestCommand),
}

impl CliOpts {
    pub(crate) fn verbose(&self) -> u8 {
        self.verbose
    }

    pub(crate) async fn run(&self) -> anyhow::Result<()> {
        match &self.subcmd {
            Command::Apps(cmd) => cmd.run(&self.client).await,
            Command::Variables(cmd) => cmd.run(&self.client).await,
            Command::Request(cmd) => cmd.run(&self.client).await,
        }
    }
}
