//! Smoke tests against the real management plane. Ignored by default; run
//! with `cargo test -- --ignored` once `AZURE_*` credentials are exported.
//! Every create is paired with a delete so nothing billable leaks.

use cirrus_client::ArmConnection;
use cirrus_config::Settings;
use cirrus_domain::{random_name, ResourceGroup, SubscriptionId};
use cirrus_mgmt::{ComputeUsageClient, ResourceGroupsClient, VirtualMachineSizesClient};

fn settings() -> Option<Settings> {
    match Settings::from_env() {
        Ok(s) => Some(s),
        Err(e) => {
            eprintln!("skipping live test: {e}");
            None
        }
    }
}

fn subscription(settings: &Settings) -> SubscriptionId {
    settings.credentials.subscription_id.clone()
}

#[tokio::test]
#[ignore = "requires live credentials"]
async fn resource_group_lifecycle() {
    let Some(settings) = settings() else { return };
    let conn = ArmConnection::new(&settings.credentials);
    let groups = ResourceGroupsClient::new(&conn, subscription(&settings));

    let name = random_name("cirrus-test-", 40);
    let params = ResourceGroup {
        location: settings.default_location.clone(),
        ..Default::default()
    };

    let created = groups.create_or_update(&name, &params).await.expect("create");
    assert_eq!(created.body.name.as_deref(), Some(name.as_str()));
    assert_eq!(created.body.location, settings.default_location);

    let fetched = groups.get(&name).await.expect("get");
    assert_eq!(fetched.status, 200);

    groups.delete(&name).await.expect("delete");
    let err = groups.get(&name).await.expect_err("get after delete");
    assert!(err.is_not_found(), "got: {err}");
}

#[tokio::test]
#[ignore = "requires live credentials"]
async fn listings_terminate() {
    let Some(settings) = settings() else { return };
    let conn = ArmConnection::new(&settings.credentials);
    let groups = ResourceGroupsClient::new(&conn, subscription(&settings));

    // the continuation loop must drain without tripping the page bound
    let all = groups.list_all().await.expect("list groups");
    let mut ids: Vec<&str> = all.iter().filter_map(|g| g.id.as_deref()).collect();
    let total = ids.len();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), total, "pages repeated a resource id");
}

#[tokio::test]
#[ignore = "requires live credentials"]
async fn sizes_and_usage_are_reported() {
    let Some(settings) = settings() else { return };
    let conn = ArmConnection::new(&settings.credentials);

    let sizes = VirtualMachineSizesClient::new(&conn, subscription(&settings))
        .list(&settings.default_location)
        .await
        .expect("list sizes");
    assert_eq!(sizes.status, 200);
    assert!(!sizes.body.value.is_empty());

    let usage = ComputeUsageClient::new(&conn, subscription(&settings))
        .list(&settings.default_location)
        .await
        .expect("list usage");
    assert_eq!(usage.status, 200);
}

#[tokio::test]
#[ignore = "requires live credentials and CIRRUS_RUN_LONG_TASKS"]
async fn storage_account_lifecycle() {
    let Some(settings) = settings() else { return };
    if !settings.run_long_tasks {
        eprintln!("skipping: long-running tasks are disabled");
        return;
    }

    use cirrus_domain::{StorageAccountCreateParameters, StorageAccountCreateProperties};
    use cirrus_mgmt::StorageAccountsClient;

    let conn = ArmConnection::new(&settings.credentials);
    let groups = ResourceGroupsClient::new(&conn, subscription(&settings));
    let accounts = StorageAccountsClient::new(&conn, subscription(&settings));

    let rg = random_name("cirrus-test-", 40);
    let account = random_name("cirrus", 24);
    let rg_params = ResourceGroup {
        location: settings.default_location.clone(),
        ..Default::default()
    };
    groups.create_or_update(&rg, &rg_params).await.expect("create group");

    let params = StorageAccountCreateParameters {
        location: settings.default_location.clone(),
        tags: None,
        properties: StorageAccountCreateProperties {
            account_type: "Standard_GRS".into(),
        },
    };
    let created = accounts.create(&rg, &account, &params).await;

    // teardown regardless of the assertion outcome
    let _ = accounts.delete(&rg, &account).await;
    groups.delete(&rg).await.expect("delete group");

    let created = created.expect("create account");
    assert_eq!(created.body.name.as_deref(), Some(account.as_str()));
}
