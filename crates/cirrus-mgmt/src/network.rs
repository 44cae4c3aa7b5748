//! Network operations: virtual networks, subnets, network interfaces, and
//! public IP addresses.

use cirrus_client::{ArmConnection, ClientError, Page, Response};
use cirrus_domain::{
    NetworkInterface, PublicIpAddress, Subnet, SubscriptionId, VirtualNetwork,
};
use tracing::info;

const API_VERSION: &str = "2023-11-01";
const PROVIDER: &str = "Microsoft.Network";

// ── Virtual networks ─────────────────────────────────────────────────────────

pub struct VirtualNetworksClient<'a> {
    conn: &'a ArmConnection,
    subscription_id: SubscriptionId,
}

impl<'a> VirtualNetworksClient<'a> {
    pub fn new(conn: &'a ArmConnection, subscription_id: SubscriptionId) -> Self {
        Self { conn, subscription_id }
    }

    fn vnet_url(&self, rg: &str, name: &str) -> String {
        self.conn.url(&format!(
            "/subscriptions/{}/resourceGroups/{}/providers/{}/virtualNetworks/{}?api-version={}",
            self.subscription_id, rg, PROVIDER, name, API_VERSION,
        ))
    }

    pub async fn create_or_update(
        &self,
        rg: &str,
        name: &str,
        params: &VirtualNetwork,
    ) -> Result<Response<VirtualNetwork>, ClientError> {
        info!(resource_group = rg, name, "creating virtual network");
        self.conn.put(&self.vnet_url(rg, name), params).await
    }

    pub async fn get(&self, rg: &str, name: &str) -> Result<Response<VirtualNetwork>, ClientError> {
        self.conn.get(&self.vnet_url(rg, name)).await
    }

    pub async fn delete(&self, rg: &str, name: &str) -> Result<Response<()>, ClientError> {
        info!(resource_group = rg, name, "deleting virtual network");
        self.conn.delete(&self.vnet_url(rg, name)).await
    }

    /// First page of networks in a resource group.
    pub async fn list(&self, rg: &str) -> Result<Response<Page<VirtualNetwork>>, ClientError> {
        let url = self.conn.url(&format!(
            "/subscriptions/{}/resourceGroups/{}/providers/{}/virtualNetworks?api-version={}",
            self.subscription_id, rg, PROVIDER, API_VERSION,
        ));
        self.conn.get_page(&url).await
    }

    /// First page of networks across the subscription.
    pub async fn list_all(&self) -> Result<Response<Page<VirtualNetwork>>, ClientError> {
        let url = self.conn.url(&format!(
            "/subscriptions/{}/providers/{}/virtualNetworks?api-version={}",
            self.subscription_id, PROVIDER, API_VERSION,
        ));
        self.conn.get_page(&url).await
    }

    pub async fn list_next(
        &self,
        token: &str,
    ) -> Result<Response<Page<VirtualNetwork>>, ClientError> {
        self.conn.get_page(token).await
    }

    /// Every network in the subscription, continuation followed to exhaustion.
    pub async fn list_all_pages(&self) -> Result<Vec<VirtualNetwork>, ClientError> {
        let url = self.conn.url(&format!(
            "/subscriptions/{}/providers/{}/virtualNetworks?api-version={}",
            self.subscription_id, PROVIDER, API_VERSION,
        ));
        self.conn.list_all_pages(&url).await
    }
}

// ── Subnets ──────────────────────────────────────────────────────────────────

pub struct SubnetsClient<'a> {
    conn: &'a ArmConnection,
    subscription_id: SubscriptionId,
}

impl<'a> SubnetsClient<'a> {
    pub fn new(conn: &'a ArmConnection, subscription_id: SubscriptionId) -> Self {
        Self { conn, subscription_id }
    }

    fn subnet_url(&self, rg: &str, vnet: &str, name: &str) -> String {
        self.conn.url(&format!(
            "/subscriptions/{}/resourceGroups/{}/providers/{}/virtualNetworks/{}/subnets/{}?api-version={}",
            self.subscription_id, rg, PROVIDER, vnet, name, API_VERSION,
        ))
    }

    pub async fn create_or_update(
        &self,
        rg: &str,
        vnet: &str,
        name: &str,
        params: &Subnet,
    ) -> Result<Response<Subnet>, ClientError> {
        info!(resource_group = rg, vnet, name, "creating subnet");
        self.conn.put(&self.subnet_url(rg, vnet, name), params).await
    }

    pub async fn get(&self, rg: &str, vnet: &str, name: &str) -> Result<Response<Subnet>, ClientError> {
        self.conn.get(&self.subnet_url(rg, vnet, name)).await
    }

    pub async fn delete(&self, rg: &str, vnet: &str, name: &str) -> Result<Response<()>, ClientError> {
        self.conn.delete(&self.subnet_url(rg, vnet, name)).await
    }

    pub async fn list(&self, rg: &str, vnet: &str) -> Result<Response<Page<Subnet>>, ClientError> {
        let url = self.conn.url(&format!(
            "/subscriptions/{}/resourceGroups/{}/providers/{}/virtualNetworks/{}/subnets?api-version={}",
            self.subscription_id, rg, PROVIDER, vnet, API_VERSION,
        ));
        self.conn.get_page(&url).await
    }

    pub async fn list_next(&self, token: &str) -> Result<Response<Page<Subnet>>, ClientError> {
        self.conn.get_page(token).await
    }
}

// ── Network interfaces ───────────────────────────────────────────────────────

pub struct NetworkInterfacesClient<'a> {
    conn: &'a ArmConnection,
    subscription_id: SubscriptionId,
}

impl<'a> NetworkInterfacesClient<'a> {
    pub fn new(conn: &'a ArmConnection, subscription_id: SubscriptionId) -> Self {
        Self { conn, subscription_id }
    }

    fn nic_url(&self, rg: &str, name: &str) -> String {
        self.conn.url(&format!(
            "/subscriptions/{}/resourceGroups/{}/providers/{}/networkInterfaces/{}?api-version={}",
            self.subscription_id, rg, PROVIDER, name, API_VERSION,
        ))
    }

    pub async fn create_or_update(
        &self,
        rg: &str,
        name: &str,
        params: &NetworkInterface,
    ) -> Result<Response<NetworkInterface>, ClientError> {
        info!(resource_group = rg, name, "creating network interface");
        self.conn.put(&self.nic_url(rg, name), params).await
    }

    pub async fn get(&self, rg: &str, name: &str) -> Result<Response<NetworkInterface>, ClientError> {
        self.conn.get(&self.nic_url(rg, name)).await
    }

    pub async fn delete(&self, rg: &str, name: &str) -> Result<Response<()>, ClientError> {
        self.conn.delete(&self.nic_url(rg, name)).await
    }

    pub async fn list(&self, rg: &str) -> Result<Response<Page<NetworkInterface>>, ClientError> {
        let url = self.conn.url(&format!(
            "/subscriptions/{}/resourceGroups/{}/providers/{}/networkInterfaces?api-version={}",
            self.subscription_id, rg, PROVIDER, API_VERSION,
        ));
        self.conn.get_page(&url).await
    }

    pub async fn list_all(&self) -> Result<Response<Page<NetworkInterface>>, ClientError> {
        let url = self.conn.url(&format!(
            "/subscriptions/{}/providers/{}/networkInterfaces?api-version={}",
            self.subscription_id, PROVIDER, API_VERSION,
        ));
        self.conn.get_page(&url).await
    }

    pub async fn list_next(
        &self,
        token: &str,
    ) -> Result<Response<Page<NetworkInterface>>, ClientError> {
        self.conn.get_page(token).await
    }
}

// ── Public IP addresses ──────────────────────────────────────────────────────

pub struct PublicIpAddressesClient<'a> {
    conn: &'a ArmConnection,
    subscription_id: SubscriptionId,
}

impl<'a> PublicIpAddressesClient<'a> {
    pub fn new(conn: &'a ArmConnection, subscription_id: SubscriptionId) -> Self {
        Self { conn, subscription_id }
    }

    fn ip_url(&self, rg: &str, name: &str) -> String {
        self.conn.url(&format!(
            "/subscriptions/{}/resourceGroups/{}/providers/{}/publicIPAddresses/{}?api-version={}",
            self.subscription_id, rg, PROVIDER, name, API_VERSION,
        ))
    }

    pub async fn create_or_update(
        &self,
        rg: &str,
        name: &str,
        params: &PublicIpAddress,
    ) -> Result<Response<PublicIpAddress>, ClientError> {
        info!(resource_group = rg, name, "creating public ip address");
        self.conn.put(&self.ip_url(rg, name), params).await
    }

    pub async fn get(&self, rg: &str, name: &str) -> Result<Response<PublicIpAddress>, ClientError> {
        self.conn.get(&self.ip_url(rg, name)).await
    }

    pub async fn delete(&self, rg: &str, name: &str) -> Result<Response<()>, ClientError> {
        self.conn.delete(&self.ip_url(rg, name)).await
    }

    pub async fn list(&self, rg: &str) -> Result<Response<Page<PublicIpAddress>>, ClientError> {
        let url = self.conn.url(&format!(
            "/subscriptions/{}/resourceGroups/{}/providers/{}/publicIPAddresses?api-version={}",
            self.subscription_id, rg, PROVIDER, API_VERSION,
        ));
        self.conn.get_page(&url).await
    }

    pub async fn list_next(
        &self,
        token: &str,
    ) -> Result<Response<Page<PublicIpAddress>>, ClientError> {
        self.conn.get_page(token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cirrus_client::Endpoints;
    use cirrus_domain::{AddressSpace, SubnetProperties, VirtualNetworkProperties};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn conn(server: &MockServer) -> ArmConnection {
        ArmConnection::with_static_token("fake-token", Endpoints::with_base(server.uri()))
    }

    fn sub() -> SubscriptionId {
        SubscriptionId::new("test-sub")
    }

    fn vnet_params() -> VirtualNetwork {
        VirtualNetwork {
            location: "westus".into(),
            properties: Some(VirtualNetworkProperties {
                address_space: Some(AddressSpace {
                    address_prefixes: vec!["10.0.0.0/16".into()],
                }),
                subnets: vec![Subnet {
                    name: Some("subnet-a".into()),
                    properties: Some(SubnetProperties {
                        address_prefix: "10.0.2.0/24".into(),
                        ..Default::default()
                    }),
                    ..Default::default()
                }],
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_virtual_network_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/subscriptions/test-sub/resourceGroups/rg/providers/Microsoft.Network/virtualNetworks/vnet-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "vnet-1",
                "location": "westus",
                "properties": {
                    "addressSpace": { "addressPrefixes": ["10.0.0.0/16"] },
                    "provisioningState": "Succeeded"
                }
            })))
            .mount(&server)
            .await;

        let c = conn(&server);
        let vnets = VirtualNetworksClient::new(&c, sub());
        let result = vnets.create_or_update("rg", "vnet-1", &vnet_params()).await.unwrap();
        assert_eq!(result.status, 200);
        assert_eq!(result.body.name.as_deref(), Some("vnet-1"));
        assert_eq!(result.body.location, "westus");
    }

    #[tokio::test]
    async fn list_all_walks_every_continuation_page() {
        let server = MockServer::start().await;
        let p2 = format!(
            "{}/subscriptions/test-sub/providers/Microsoft.Network/virtualNetworks/p2",
            server.uri()
        );
        Mock::given(method("GET"))
            .and(path("/subscriptions/test-sub/providers/Microsoft.Network/virtualNetworks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": [ { "name": "vnet-a", "location": "westus" } ],
                "nextLink": p2,
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/subscriptions/test-sub/providers/Microsoft.Network/virtualNetworks/p2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": [ { "name": "vnet-b", "location": "eastus2" } ],
            })))
            .mount(&server)
            .await;

        let c = conn(&server);
        let vnets = VirtualNetworksClient::new(&c, sub());

        // manual continuation, as a caller driving list_all/list_next
        let mut page = vnets.list_all().await.unwrap().body;
        let mut names = vec![];
        names.extend(page.value.iter().filter_map(|v| v.name.clone()));
        while !page.is_last() {
            page = vnets
                .list_next(page.next_link.as_deref().unwrap())
                .await
                .unwrap()
                .body;
            names.extend(page.value.iter().filter_map(|v| v.name.clone()));
        }
        assert_eq!(names, ["vnet-a", "vnet-b"]);

        // collected form agrees
        let all = vnets.list_all_pages().await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn subnet_crud() {
        let server = MockServer::start().await;
        let subnet_path = "/subscriptions/test-sub/resourceGroups/rg/providers/Microsoft.Network/virtualNetworks/vnet-1/subnets/subnet-b";
        Mock::given(method("PUT"))
            .and(path(subnet_path))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "subnet-b",
                "properties": { "addressPrefix": "10.0.1.0/24" }
            })))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path(subnet_path))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let c = conn(&server);
        let subnets = SubnetsClient::new(&c, sub());
        let params = Subnet {
            properties: Some(SubnetProperties {
                address_prefix: "10.0.1.0/24".into(),
                ..Default::default()
            }),
            ..Default::default()
        };
        let created = subnets.create_or_update("rg", "vnet-1", "subnet-b", &params).await.unwrap();
        assert_eq!(
            created.body.properties.unwrap().address_prefix,
            "10.0.1.0/24"
        );
        subnets.delete("rg", "vnet-1", "subnet-b").await.unwrap();
    }

    #[tokio::test]
    async fn deleted_public_ip_is_gone() {
        let server = MockServer::start().await;
        let ip_path = "/subscriptions/test-sub/resourceGroups/rg/providers/Microsoft.Network/publicIPAddresses/ip-1";
        Mock::given(method("DELETE"))
            .and(path(ip_path))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(ip_path))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": { "code": "NotFound", "message": "was not found" }
            })))
            .mount(&server)
            .await;

        let c = conn(&server);
        let ips = PublicIpAddressesClient::new(&c, sub());
        ips.delete("rg", "ip-1").await.unwrap();
        assert!(ips.get("rg", "ip-1").await.unwrap_err().is_not_found());
    }
}
