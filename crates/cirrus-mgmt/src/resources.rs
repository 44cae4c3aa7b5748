//! Resource group operations.

use cirrus_client::{ArmConnection, ClientError, Page, Response};
use cirrus_domain::{validate_resource_group_name, ResourceGroup, SubscriptionId};
use tracing::info;

const API_VERSION: &str = "2021-04-01";

pub struct ResourceGroupsClient<'a> {
    conn: &'a ArmConnection,
    subscription_id: SubscriptionId,
}

impl<'a> ResourceGroupsClient<'a> {
    pub fn new(conn: &'a ArmConnection, subscription_id: SubscriptionId) -> Self {
        Self { conn, subscription_id }
    }

    fn group_url(&self, name: &str) -> String {
        self.conn.url(&format!(
            "/subscriptions/{}/resourcegroups/{}?api-version={}",
            self.subscription_id, name, API_VERSION,
        ))
    }

    pub async fn create_or_update(
        &self,
        name: &str,
        params: &ResourceGroup,
    ) -> Result<Response<ResourceGroup>, ClientError> {
        validate_resource_group_name(name).map_err(|e| ClientError::Api {
            status: 400,
            code: "InvalidResourceGroupName".into(),
            message: e.to_string(),
        })?;
        info!(name, location = %params.location, "creating resource group");
        self.conn.put(&self.group_url(name), params).await
    }

    pub async fn get(&self, name: &str) -> Result<Response<ResourceGroup>, ClientError> {
        self.conn.get(&self.group_url(name)).await
    }

    pub async fn delete(&self, name: &str) -> Result<Response<()>, ClientError> {
        info!(name, "deleting resource group");
        self.conn.delete(&self.group_url(name)).await
    }

    /// HEAD existence probe.
    pub async fn check_existence(&self, name: &str) -> Result<bool, ClientError> {
        self.conn.head(&self.group_url(name)).await
    }

    /// First page of resource groups in the subscription.
    pub async fn list(&self) -> Result<Response<Page<ResourceGroup>>, ClientError> {
        let url = self.conn.url(&format!(
            "/subscriptions/{}/resourcegroups?api-version={}",
            self.subscription_id, API_VERSION,
        ));
        self.conn.get_page(&url).await
    }

    /// Continuation page from a prior response's token.
    pub async fn list_next(&self, token: &str) -> Result<Response<Page<ResourceGroup>>, ClientError> {
        self.conn.get_page(token).await
    }

    /// All resource groups, following continuation tokens to exhaustion.
    pub async fn list_all(&self) -> Result<Vec<ResourceGroup>, ClientError> {
        let url = self.conn.url(&format!(
            "/subscriptions/{}/resourcegroups?api-version={}",
            self.subscription_id, API_VERSION,
        ));
        self.conn.list_all_pages(&url).await
    }
}
