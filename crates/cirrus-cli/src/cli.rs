use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "cirrus",
    about = "Typed client for the cloud resource-management plane",
    version
)]
pub struct Cli {
    /// Output rendering.
    #[arg(long, value_enum, default_value = "text", global = true)]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resource group operations.
    Group {
        #[command(subcommand)]
        command: GroupCommand,
    },

    /// List virtual machines.
    Vm {
        /// Limit to one resource group; omit for the whole subscription.
        #[arg(long)]
        resource_group: Option<String>,
    },

    /// List virtual networks across the subscription.
    Vnet,

    /// List storage accounts across the subscription.
    Storage,

    /// Quota usage reporting.
    Usage {
        #[command(subcommand)]
        command: UsageCommand,
    },

    /// Service-bus entities within a namespace.
    Bus {
        /// Resource group holding the namespace.
        #[arg(long)]
        resource_group: String,

        /// Namespace name.
        #[arg(long)]
        namespace: String,

        #[command(subcommand)]
        command: BusCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum GroupCommand {
    /// List resource groups (all pages).
    List,

    /// Create a resource group.
    Create {
        name: String,

        /// Region; falls back to the configured default.
        #[arg(long)]
        location: Option<String>,
    },

    /// Delete a resource group and everything in it.
    Delete { name: String },
}

#[derive(Debug, Subcommand)]
pub enum UsageCommand {
    /// Compute quota usage for a location.
    Compute {
        #[arg(long)]
        location: Option<String>,
    },

    /// Storage quota usage for a location.
    Storage {
        #[arg(long)]
        location: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum BusCommand {
    /// List topics in the namespace.
    Topics,

    /// List rules on a topic subscription.
    Rules {
        #[arg(long)]
        topic: String,

        #[arg(long)]
        subscription: String,

        /// Skip the first N rules.
        #[arg(long)]
        skip: Option<u32>,

        /// Return at most N rules.
        #[arg(long)]
        top: Option<u32>,
    },
}
