//! Compute operations: virtual machines and their extensions, available VM
//! sizes, and subscription usage.

use cirrus_client::{poll_until, ArmConnection, ClientError, Page, PollOptions, Response};
use cirrus_domain::{
    SubscriptionId, UsageEntry, VirtualMachine, VirtualMachineCaptureParameters,
    VirtualMachineExtension, VirtualMachineSize,
};
use serde_json::{json, Value};
use tracing::info;

const API_VERSION: &str = "2023-07-01";
const PROVIDER: &str = "Microsoft.Compute";

// ── Virtual machines ─────────────────────────────────────────────────────────

pub struct VirtualMachinesClient<'a> {
    conn: &'a ArmConnection,
    subscription_id: SubscriptionId,
}

impl<'a> VirtualMachinesClient<'a> {
    pub fn new(conn: &'a ArmConnection, subscription_id: SubscriptionId) -> Self {
        Self { conn, subscription_id }
    }

    fn vm_url(&self, resource_group: &str, name: &str, suffix: &str) -> String {
        self.conn.url(&format!(
            "/subscriptions/{}/resourceGroups/{}/providers/{}/virtualMachines/{}{}?api-version={}",
            self.subscription_id, resource_group, PROVIDER, name, suffix, API_VERSION,
        ))
    }

    pub async fn create_or_update(
        &self,
        resource_group: &str,
        name: &str,
        params: &VirtualMachine,
    ) -> Result<Response<VirtualMachine>, ClientError> {
        info!(resource_group, name, "creating virtual machine");
        self.conn.put(&self.vm_url(resource_group, name, ""), params).await
    }

    pub async fn get(
        &self,
        resource_group: &str,
        name: &str,
    ) -> Result<Response<VirtualMachine>, ClientError> {
        self.conn.get(&self.vm_url(resource_group, name, "")).await
    }

    pub async fn delete(
        &self,
        resource_group: &str,
        name: &str,
    ) -> Result<Response<()>, ClientError> {
        info!(resource_group, name, "deleting virtual machine");
        self.conn.delete(&self.vm_url(resource_group, name, "")).await
    }

    /// First page of machines in a resource group.
    pub async fn list(
        &self,
        resource_group: &str,
    ) -> Result<Response<Page<VirtualMachine>>, ClientError> {
        let url = self.conn.url(&format!(
            "/subscriptions/{}/resourceGroups/{}/providers/{}/virtualMachines?api-version={}",
            self.subscription_id, resource_group, PROVIDER, API_VERSION,
        ));
        self.conn.get_page(&url).await
    }

    /// First page of machines across the subscription.
    pub async fn list_all(&self) -> Result<Response<Page<VirtualMachine>>, ClientError> {
        let url = self.conn.url(&format!(
            "/subscriptions/{}/providers/{}/virtualMachines?api-version={}",
            self.subscription_id, PROVIDER, API_VERSION,
        ));
        self.conn.get_page(&url).await
    }

    pub async fn list_next(
        &self,
        token: &str,
    ) -> Result<Response<Page<VirtualMachine>>, ClientError> {
        self.conn.get_page(token).await
    }

    /// Every machine in a resource group, continuation followed to exhaustion.
    pub async fn list_all_pages(
        &self,
        resource_group: &str,
    ) -> Result<Vec<VirtualMachine>, ClientError> {
        let url = self.conn.url(&format!(
            "/subscriptions/{}/resourceGroups/{}/providers/{}/virtualMachines?api-version={}",
            self.subscription_id, resource_group, PROVIDER, API_VERSION,
        ));
        self.conn.list_all_pages(&url).await
    }

    // ── Power verbs ───────────────────────────────────────────────────────────

    pub async fn start(&self, rg: &str, name: &str) -> Result<Response<Value>, ClientError> {
        self.action(rg, name, "start").await
    }

    pub async fn restart(&self, rg: &str, name: &str) -> Result<Response<Value>, ClientError> {
        self.action(rg, name, "restart").await
    }

    pub async fn power_off(&self, rg: &str, name: &str) -> Result<Response<Value>, ClientError> {
        self.action(rg, name, "powerOff").await
    }

    pub async fn deallocate(&self, rg: &str, name: &str) -> Result<Response<Value>, ClientError> {
        self.action(rg, name, "deallocate").await
    }

    /// Mark the machine generalized. The machine must be stopped first;
    /// callers waiting for the stop should use `wait_for_provisioning_state`
    /// rather than a fixed sleep.
    pub async fn generalize(&self, rg: &str, name: &str) -> Result<Response<Value>, ClientError> {
        self.action(rg, name, "generalize").await
    }

    async fn action(&self, rg: &str, name: &str, verb: &str) -> Result<Response<Value>, ClientError> {
        info!(resource_group = rg, name, verb, "virtual machine action");
        let url = self.vm_url(rg, name, &format!("/{}", verb));
        self.conn.post(&url, &json!({})).await
    }

    pub async fn capture(
        &self,
        rg: &str,
        name: &str,
        params: &VirtualMachineCaptureParameters,
    ) -> Result<Response<Value>, ClientError> {
        info!(resource_group = rg, name, "capturing virtual machine image");
        let url = self.vm_url(rg, name, "/capture");
        self.conn.post(&url, params).await
    }

    /// Bounded poll until the machine's provisioning state equals `target`.
    pub async fn wait_for_provisioning_state(
        &self,
        rg: &str,
        name: &str,
        target: &str,
        opts: &PollOptions,
    ) -> Result<VirtualMachine, ClientError> {
        let what = format!("vm {}/{} to reach {}", rg, name, target);
        poll_until(opts, &what, || async move {
            let vm = self.get(rg, name).await?.body;
            let state = vm
                .properties
                .as_ref()
                .and_then(|p| p.provisioning_state.as_deref())
                .unwrap_or("");
            Ok(if state == target { Some(vm) } else { None })
        })
        .await
    }
}

// ── Extensions ───────────────────────────────────────────────────────────────

pub struct VirtualMachineExtensionsClient<'a> {
    conn: &'a ArmConnection,
    subscription_id: SubscriptionId,
}

impl<'a> VirtualMachineExtensionsClient<'a> {
    pub fn new(conn: &'a ArmConnection, subscription_id: SubscriptionId) -> Self {
        Self { conn, subscription_id }
    }

    fn ext_url(&self, rg: &str, vm: &str, name: &str) -> String {
        self.conn.url(&format!(
            "/subscriptions/{}/resourceGroups/{}/providers/{}/virtualMachines/{}/extensions/{}?api-version={}",
            self.subscription_id, rg, PROVIDER, vm, name, API_VERSION,
        ))
    }

    pub async fn create_or_update(
        &self,
        rg: &str,
        vm: &str,
        name: &str,
        params: &VirtualMachineExtension,
    ) -> Result<Response<VirtualMachineExtension>, ClientError> {
        info!(resource_group = rg, vm, name, "creating vm extension");
        self.conn.put(&self.ext_url(rg, vm, name), params).await
    }

    pub async fn get(
        &self,
        rg: &str,
        vm: &str,
        name: &str,
    ) -> Result<Response<VirtualMachineExtension>, ClientError> {
        self.conn.get(&self.ext_url(rg, vm, name)).await
    }

    pub async fn delete(&self, rg: &str, vm: &str, name: &str) -> Result<Response<()>, ClientError> {
        self.conn.delete(&self.ext_url(rg, vm, name)).await
    }
}

// ── Sizes ────────────────────────────────────────────────────────────────────

pub struct VirtualMachineSizesClient<'a> {
    conn: &'a ArmConnection,
    subscription_id: SubscriptionId,
}

impl<'a> VirtualMachineSizesClient<'a> {
    pub fn new(conn: &'a ArmConnection, subscription_id: SubscriptionId) -> Self {
        Self { conn, subscription_id }
    }

    /// Sizes available in a location. Single page; the service does not
    /// paginate this listing.
    pub async fn list(
        &self,
        location: &str,
    ) -> Result<Response<Page<VirtualMachineSize>>, ClientError> {
        let url = self.conn.url(&format!(
            "/subscriptions/{}/providers/{}/locations/{}/vmSizes?api-version={}",
            self.subscription_id, PROVIDER, location, API_VERSION,
        ));
        self.conn.get_page(&url).await
    }
}

// ── Usage ────────────────────────────────────────────────────────────────────

pub struct ComputeUsageClient<'a> {
    conn: &'a ArmConnection,
    subscription_id: SubscriptionId,
}

impl<'a> ComputeUsageClient<'a> {
    pub fn new(conn: &'a ArmConnection, subscription_id: SubscriptionId) -> Self {
        Self { conn, subscription_id }
    }

    pub async fn list(&self, location: &str) -> Result<Response<Page<UsageEntry>>, ClientError> {
        let url = self.conn.url(&format!(
            "/subscriptions/{}/providers/{}/locations/{}/usages?api-version={}",
            self.subscription_id, PROVIDER, location, API_VERSION,
        ));
        self.conn.get_page(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cirrus_client::Endpoints;
    use cirrus_domain::{HardwareProfile, VirtualMachineProperties};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn conn(server: &MockServer) -> ArmConnection {
        ArmConnection::with_static_token("fake-token", Endpoints::with_base(server.uri()))
            .poll_options(PollOptions::immediate(10))
    }

    fn sub() -> SubscriptionId {
        SubscriptionId::new("test-sub")
    }

    fn vm_params() -> VirtualMachine {
        VirtualMachine {
            resource_type: Some("Microsoft.Compute/virtualMachines".into()),
            location: "westus".into(),
            properties: Some(VirtualMachineProperties {
                hardware_profile: Some(HardwareProfile { vm_size: "Standard_A0".into() }),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_virtual_machine_returns_matching_name_and_location() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/subscriptions/test-sub/resourceGroups/rg/providers/Microsoft.Compute/virtualMachines/vm-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "vm-1",
                "location": "westus",
                "properties": { "provisioningState": "Succeeded" }
            })))
            .mount(&server)
            .await;

        let c = conn(&server);
        let vms = VirtualMachinesClient::new(&c, sub());
        let result = vms.create_or_update("rg", "vm-1", &vm_params()).await.unwrap();
        assert_eq!(result.status, 200);
        assert_eq!(result.body.name.as_deref(), Some("vm-1"));
        assert_eq!(result.body.location, "westus");
    }

    #[tokio::test]
    async fn power_verbs_settle_through_polling() {
        let server = MockServer::start().await;
        let op_url = format!("{}/operations/restart-op", server.uri());
        Mock::given(method("POST"))
            .and(path("/subscriptions/test-sub/resourceGroups/rg/providers/Microsoft.Compute/virtualMachines/vm-1/restart"))
            .respond_with(
                ResponseTemplate::new(202)
                    .append_header("Azure-AsyncOperation", op_url.as_str()),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/operations/restart-op"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "Succeeded"
            })))
            .mount(&server)
            .await;

        let c = conn(&server);
        let vms = VirtualMachinesClient::new(&c, sub());
        let result = vms.restart("rg", "vm-1").await.unwrap();
        assert_eq!(result.status, 200);
    }

    #[tokio::test]
    async fn list_in_group_single_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/subscriptions/test-sub/resourceGroups/rg/providers/Microsoft.Compute/virtualMachines"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [ { "name": "vm-1", "location": "westus" } ]
            })))
            .mount(&server)
            .await;

        let c = conn(&server);
        let vms = VirtualMachinesClient::new(&c, sub());
        let page = vms.list("rg").await.unwrap();
        assert_eq!(page.status, 200);
        assert_eq!(page.body.value.len(), 1);
        assert!(page.body.is_last());
    }

    #[tokio::test]
    async fn wait_for_provisioning_state_polls_until_target() {
        let server = MockServer::start().await;
        // first probe sees Updating, later probes see Succeeded
        Mock::given(method("GET"))
            .and(path("/subscriptions/test-sub/resourceGroups/rg/providers/Microsoft.Compute/virtualMachines/vm-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "vm-1", "location": "westus",
                "properties": { "provisioningState": "Updating" }
            })))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/subscriptions/test-sub/resourceGroups/rg/providers/Microsoft.Compute/virtualMachines/vm-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "vm-1", "location": "westus",
                "properties": { "provisioningState": "Succeeded" }
            })))
            .mount(&server)
            .await;

        let c = conn(&server);
        let vms = VirtualMachinesClient::new(&c, sub());
        let vm = vms
            .wait_for_provisioning_state("rg", "vm-1", "Succeeded", &PollOptions::immediate(10))
            .await
            .unwrap();
        assert_eq!(
            vm.properties.unwrap().provisioning_state.as_deref(),
            Some("Succeeded")
        );
    }

    #[tokio::test]
    async fn extension_round_trip() {
        let server = MockServer::start().await;
        let ext_path = "/subscriptions/test-sub/resourceGroups/rg/providers/Microsoft.Compute/virtualMachines/vm-1/extensions/access-agent";
        Mock::given(method("PUT"))
            .and(path(ext_path))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "access-agent", "location": "westus"
            })))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path(ext_path))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let c = conn(&server);
        let exts = VirtualMachineExtensionsClient::new(&c, sub());
        let ext = cirrus_domain::VirtualMachineExtension {
            location: "westus".into(),
            ..Default::default()
        };
        let created = exts.create_or_update("rg", "vm-1", "access-agent", &ext).await.unwrap();
        assert_eq!(created.body.name.as_deref(), Some("access-agent"));
        let deleted = exts.delete("rg", "vm-1", "access-agent").await.unwrap();
        assert_eq!(deleted.status, 200);
    }

    #[tokio::test]
    async fn sizes_and_usage_list_per_location() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/subscriptions/test-sub/providers/Microsoft.Compute/locations/westus/vmSizes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [ { "name": "Standard_A0", "numberOfCores": 1 } ]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/subscriptions/test-sub/providers/Microsoft.Compute/locations/westus/usages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [
                    { "unit": "Count", "currentValue": 2, "limit": 20,
                      "name": { "value": "cores", "localizedValue": "Cores" } }
                ]
            })))
            .mount(&server)
            .await;

        let c = conn(&server);
        let sizes = VirtualMachineSizesClient::new(&c, sub()).list("westus").await.unwrap();
        assert_eq!(sizes.status, 200);
        assert_eq!(sizes.body.value[0].name, "Standard_A0");

        let usage = ComputeUsageClient::new(&c, sub()).list("westus").await.unwrap();
        assert_eq!(usage.status, 200);
        assert_eq!(usage.body.value[0].name.value, "cores");
    }
}
