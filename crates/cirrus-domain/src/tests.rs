use crate::bus::*;
use crate::types::*;

#[test]
fn resource_group_name_rules() {
    assert!(validate_resource_group_name("my-group_1.test(x)").is_ok());
    assert!(validate_resource_group_name("").is_err());
    assert!(validate_resource_group_name("ends-with-period.").is_err());
    assert!(validate_resource_group_name("has spaces").is_err());
    assert!(validate_resource_group_name(&"a".repeat(91)).is_err());
}

#[test]
fn storage_account_name_rules() {
    assert!(validate_storage_account_name("storage0account").is_ok());
    assert!(validate_storage_account_name("ab").is_err());
    assert!(validate_storage_account_name("Uppercase").is_err());
    assert!(validate_storage_account_name(&"a".repeat(25)).is_err());
}

#[test]
fn random_name_respects_prefix_and_cap() {
    let name = random_name("storage", 24);
    assert!(name.starts_with("storage"));
    assert!(name.len() <= 24);
    assert!(name.chars().all(|c| c.is_ascii_alphanumeric()));
}

#[test]
fn random_names_are_unique() {
    assert_ne!(random_name("vm", 64), random_name("vm", 64));
}

#[test]
fn virtual_machine_serializes_to_wire_names() {
    let vm = VirtualMachine {
        location: "westus".into(),
        properties: Some(VirtualMachineProperties {
            hardware_profile: Some(HardwareProfile { vm_size: "Standard_A0".into() }),
            os_profile: Some(OsProfile {
                computer_name: "testvm1".into(),
                admin_username: "testvm1".into(),
                admin_password: Some("P@ssword1".into()),
                windows_configuration: Some(WindowsConfiguration {
                    provision_vm_agent: true,
                    enable_automatic_updates: true,
                }),
                secrets: vec![],
            }),
            ..Default::default()
        }),
        ..Default::default()
    };

    let json = serde_json::to_value(&vm).unwrap();
    assert_eq!(json["properties"]["hardwareProfile"]["vmSize"], "Standard_A0");
    assert_eq!(
        json["properties"]["osProfile"]["windowsConfiguration"]["provisionVMAgent"],
        true
    );
    // unset optionals must not appear on the wire
    assert!(json["properties"].get("storageProfile").is_none());
}

#[test]
fn public_ip_wire_casing() {
    let ip = PublicIpAddress {
        location: "westus".into(),
        properties: Some(PublicIpAddressProperties {
            public_ip_allocation_method: "Dynamic".into(),
            ..Default::default()
        }),
        ..Default::default()
    };
    let json = serde_json::to_value(&ip).unwrap();
    assert_eq!(json["properties"]["publicIPAllocationMethod"], "Dynamic");
}

#[test]
fn usage_entry_deserializes() {
    let entry: UsageEntry = serde_json::from_value(serde_json::json!({
        "unit": "Count",
        "currentValue": 2,
        "limit": 20,
        "name": { "value": "cores", "localizedValue": "Cores" }
    }))
    .unwrap();
    assert_eq!(entry.name.value, "cores");
    assert_eq!(entry.limit, 20);
}

#[test]
fn default_rule_matches_all() {
    let props = RuleProperties::match_all();
    assert!(props.is_match_all());
    let filter = props.sql_filter.unwrap();
    assert_eq!(filter.sql_expression, "1=1");
    assert_eq!(filter.compatibility_level, Some(SQL_COMPATIBILITY_LEVEL));
}

#[test]
fn sql_rule_with_action() {
    let props = RuleProperties::with_sql_filter("MyProperty='XYZ'")
        .and_action("set MyProperty2 = 'ABC'");
    assert!(!props.is_match_all());
    assert_eq!(props.filter_type, Some(FilterType::SqlFilter));
    let action = props.action.unwrap();
    assert_eq!(action.sql_expression, "set MyProperty2 = 'ABC'");
    assert_eq!(action.compatibility_level, Some(20));
}

#[test]
fn correlation_rule_wire_shape() {
    let props = RuleProperties::with_correlation_filter("identifier");
    let json = serde_json::to_value(&props).unwrap();
    assert_eq!(json["filterType"], "CorrelationFilter");
    assert_eq!(json["correlationFilter"]["correlationId"], "identifier");
    assert!(json.get("sqlFilter").is_none());
}
