use anyhow::Result;
use cirrus_domain::{
    ResourceGroup, SbRule, SbTopic, StorageAccount, UsageEntry, VirtualMachine, VirtualNetwork,
};
use serde::Serialize;

use crate::cli::OutputFormat;

/// Print a slice either as rendered text or as pretty JSON.
pub fn emit<T, F>(format: OutputFormat, items: &[T], render: F) -> Result<()>
where
    T: Serialize,
    F: Fn(&[T]) -> String,
{
    match format {
        OutputFormat::Text => print!("{}", render(items)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(items)?),
    }
    Ok(())
}

pub fn render_groups(groups: &[ResourceGroup]) -> String {
    if groups.is_empty() {
        return "No resource groups.\n".to_string();
    }
    let mut out = String::new();
    for g in groups {
        let state = g
            .properties
            .as_ref()
            .and_then(|p| p.provisioning_state.as_deref())
            .unwrap_or("-");
        out.push_str(&format!(
            "{}  {}  {}\n",
            g.name.as_deref().unwrap_or("-"),
            g.location,
            state,
        ));
    }
    out
}

pub fn render_vms(machines: &[VirtualMachine]) -> String {
    if machines.is_empty() {
        return "No virtual machines.\n".to_string();
    }
    let mut out = String::new();
    for vm in machines {
        let size = vm
            .properties
            .as_ref()
            .and_then(|p| p.hardware_profile.as_ref())
            .map(|h| h.vm_size.as_str())
            .unwrap_or("-");
        out.push_str(&format!(
            "{}  {}  {}\n",
            vm.name.as_deref().unwrap_or("-"),
            vm.location,
            size,
        ));
    }
    out
}

pub fn render_vnets(networks: &[VirtualNetwork]) -> String {
    if networks.is_empty() {
        return "No virtual networks.\n".to_string();
    }
    let mut out = String::new();
    for net in networks {
        let prefixes = net
            .properties
            .as_ref()
            .and_then(|p| p.address_space.as_ref())
            .map(|a| a.address_prefixes.join(","))
            .unwrap_or_else(|| "-".into());
        out.push_str(&format!(
            "{}  {}  {}\n",
            net.name.as_deref().unwrap_or("-"),
            net.location,
            prefixes,
        ));
    }
    out
}

pub fn render_accounts(accounts: &[StorageAccount]) -> String {
    if accounts.is_empty() {
        return "No storage accounts.\n".to_string();
    }
    let mut out = String::new();
    for acct in accounts {
        let kind = acct
            .properties
            .as_ref()
            .and_then(|p| p.account_type.as_deref())
            .unwrap_or("-");
        out.push_str(&format!(
            "{}  {}  {}\n",
            acct.name.as_deref().unwrap_or("-"),
            acct.location,
            kind,
        ));
    }
    out
}

pub fn render_usage(entries: &[UsageEntry]) -> String {
    if entries.is_empty() {
        return "No usage reported.\n".to_string();
    }
    let mut out = String::new();
    for e in entries {
        out.push_str(&format!(
            "{}  {}/{} {}\n",
            e.name.value, e.current_value, e.limit, e.unit,
        ));
    }
    out
}

pub fn render_topics(topics: &[SbTopic]) -> String {
    if topics.is_empty() {
        return "No topics.\n".to_string();
    }
    let mut out = String::new();
    for t in topics {
        let status = t
            .properties
            .as_ref()
            .and_then(|p| p.status.as_deref())
            .unwrap_or("-");
        out.push_str(&format!("{}  {}\n", t.name.as_deref().unwrap_or("-"), status));
    }
    out
}

pub fn render_rules(rules: &[SbRule]) -> String {
    if rules.is_empty() {
        return "No rules.\n".to_string();
    }
    let mut out = String::new();
    for r in rules {
        let filter = match r.properties.as_ref() {
            Some(p) if p.is_match_all() => "match-all".to_string(),
            Some(p) => match (&p.sql_filter, &p.correlation_filter) {
                (Some(sql), _) => format!("sql: {}", sql.sql_expression),
                (None, Some(corr)) => {
                    format!("correlation: {}", corr.correlation_id.as_deref().unwrap_or("-"))
                }
                (None, None) => "-".to_string(),
            },
            None => "-".to_string(),
        };
        out.push_str(&format!("{}  {}\n", r.name.as_deref().unwrap_or("-"), filter));
    }
    out
}
