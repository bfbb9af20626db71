use anyhow::Result;

use super::commands::Commands;
use super::config::cmd_config;
use super::context::CliContext;
use super::env::CliArgs;
use super::extract::cmd_extract;
use super::plan::cmd_plan;
use super::probe::cmd_probe;
use super::session::cmd_session;

pub async fn dispatch(cli: &CliArgs, ctx: &CliContext) -> Result<()> {
    match cli.command.clone() {
        Commands::Session(args) => cmd_session(args, ctx).await,
        Commands::Plan(args) => cmd_plan(args, ctx.config()).await,
        Commands::Extract(args) => cmd_extract(args, ctx.config()).await,
        Commands::Probe(args) => cmd_probe(args, ctx.config()).await,
        Commands::Config(args) => cmd_config(args, ctx).await,
    }
}
