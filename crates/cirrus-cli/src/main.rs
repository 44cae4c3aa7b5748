mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;
use cli::{BusCommand, Cli, Command, GroupCommand, UsageCommand};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let format = cli.output;

    match cli.command {
        Command::Group { command } => match command {
            GroupCommand::List => commands::group_list(format).await,
            GroupCommand::Create { name, location } => {
                commands::group_create(format, name, location).await
            }
            GroupCommand::Delete { name } => commands::group_delete(format, name).await,
        },
        Command::Vm { resource_group } => commands::vm_list(format, resource_group).await,
        Command::Vnet => commands::vnet_list(format).await,
        Command::Storage => commands::storage_list(format).await,
        Command::Usage { command } => match command {
            UsageCommand::Compute { location } => {
                commands::usage(format, commands::UsageKind::Compute, location).await
            }
            UsageCommand::Storage { location } => {
                commands::usage(format, commands::UsageKind::Storage, location).await
            }
        },
        Command::Bus { resource_group, namespace, command } => match command {
            BusCommand::Topics => commands::bus_topics(format, resource_group, namespace).await,
            BusCommand::Rules { topic, subscription, skip, top } => {
                commands::bus_rules(format, resource_group, namespace, topic, subscription, skip, top)
                    .await
            }
        },
    }
}
