use anyhow::{bail, Context, Result};
use cirrus_client::ArmConnection;
use cirrus_config::Settings;
use cirrus_domain::{ResourceGroup, SubscriptionId};
use cirrus_mgmt::{
    ComputeUsageClient, ListOptions, ResourceGroupsClient, ServiceBusClient, StorageAccountsClient,
    StorageUsageClient, VirtualMachinesClient, VirtualNetworksClient,
};

use crate::cli::OutputFormat;
use crate::output;

pub enum UsageKind {
    Compute,
    Storage,
}

fn connect() -> Result<(Settings, ArmConnection, SubscriptionId)> {
    let settings = Settings::from_env().context("loading settings from the environment")?;
    let conn = ArmConnection::new(&settings.credentials);
    let sub = settings.credentials.subscription_id.clone();
    Ok((settings, conn, sub))
}

fn require_long_tasks(settings: &Settings, what: &str) -> Result<()> {
    if settings.run_long_tasks {
        return Ok(());
    }
    bail!(
        "{} is a long-running operation; set CIRRUS_RUN_LONG_TASKS=1 to allow it",
        what
    )
}

pub async fn group_list(format: OutputFormat) -> Result<()> {
    let (_, conn, sub) = connect()?;
    let groups = ResourceGroupsClient::new(&conn, sub).list_all().await?;
    output::emit(format, &groups, output::render_groups)?;
    Ok(())
}

pub async fn group_create(
    format: OutputFormat,
    name: String,
    location: Option<String>,
) -> Result<()> {
    let (settings, conn, sub) = connect()?;
    require_long_tasks(&settings, "group create")?;

    let params = ResourceGroup {
        location: location.unwrap_or_else(|| settings.default_location.clone()),
        ..Default::default()
    };
    let created = ResourceGroupsClient::new(&conn, sub)
        .create_or_update(&name, &params)
        .await?;
    output::emit(format, &[created.body], output::render_groups)?;
    Ok(())
}

pub async fn group_delete(format: OutputFormat, name: String) -> Result<()> {
    let (settings, conn, sub) = connect()?;
    require_long_tasks(&settings, "group delete")?;

    let deleted = ResourceGroupsClient::new(&conn, sub).delete(&name).await?;
    match format {
        OutputFormat::Text => println!("deleted {} (status {})", name, deleted.status),
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({ "deleted": name, "status": deleted.status })
        ),
    }
    Ok(())
}

pub async fn vm_list(format: OutputFormat, resource_group: Option<String>) -> Result<()> {
    let (_, conn, sub) = connect()?;
    let vms = VirtualMachinesClient::new(&conn, sub);
    let machines = match resource_group {
        Some(rg) => vms.list_all_pages(&rg).await?,
        None => {
            // subscription-wide: walk pages by hand
            let mut page = vms.list_all().await?.body;
            let mut machines = std::mem::take(&mut page.value);
            while let Some(link) = page.next_link.take().filter(|l| !l.is_empty()) {
                page = vms.list_next(&link).await?.body;
                machines.append(&mut page.value);
            }
            machines
        }
    };
    output::emit(format, &machines, output::render_vms)?;
    Ok(())
}

pub async fn vnet_list(format: OutputFormat) -> Result<()> {
    let (_, conn, sub) = connect()?;
    let networks = VirtualNetworksClient::new(&conn, sub).list_all_pages().await?;
    output::emit(format, &networks, output::render_vnets)?;
    Ok(())
}

pub async fn storage_list(format: OutputFormat) -> Result<()> {
    let (_, conn, sub) = connect()?;
    let accounts = StorageAccountsClient::new(&conn, sub).list_all_pages().await?;
    output::emit(format, &accounts, output::render_accounts)?;
    Ok(())
}

pub async fn usage(format: OutputFormat, kind: UsageKind, location: Option<String>) -> Result<()> {
    let (settings, conn, sub) = connect()?;
    let location = location.unwrap_or_else(|| settings.default_location.clone());
    let entries = match kind {
        UsageKind::Compute => ComputeUsageClient::new(&conn, sub).list(&location).await?,
        UsageKind::Storage => StorageUsageClient::new(&conn, sub).list(&location).await?,
    };
    output::emit(format, &entries.body.value, output::render_usage)?;
    Ok(())
}

pub async fn bus_topics(
    format: OutputFormat,
    resource_group: String,
    namespace: String,
) -> Result<()> {
    let (_, conn, sub) = connect()?;
    let bus = ServiceBusClient::new(&conn, sub, resource_group, namespace);
    let topics = bus.list_topics(&ListOptions::default()).await?;
    output::emit(format, &topics.body.value, output::render_topics)?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn bus_rules(
    format: OutputFormat,
    resource_group: String,
    namespace: String,
    topic: String,
    subscription: String,
    skip: Option<u32>,
    top: Option<u32>,
) -> Result<()> {
    let (_, conn, sub) = connect()?;
    let bus = ServiceBusClient::new(&conn, sub, resource_group, namespace);
    let options = ListOptions { skip, top };
    let rules = bus.list_rules(&topic, &subscription, &options).await?;
    output::emit(format, &rules.body.value, output::render_rules)?;
    Ok(())
}
