//! Storage operations: accounts and subscription usage.

use cirrus_client::{ArmConnection, ClientError, Page, Response};
use cirrus_domain::{
    validate_storage_account_name, StorageAccount, StorageAccountCreateParameters, SubscriptionId,
    UsageEntry,
};
use tracing::info;

const API_VERSION: &str = "2023-01-01";
const PROVIDER: &str = "Microsoft.Storage";

pub struct StorageAccountsClient<'a> {
    conn: &'a ArmConnection,
    subscription_id: SubscriptionId,
}

impl<'a> StorageAccountsClient<'a> {
    pub fn new(conn: &'a ArmConnection, subscription_id: SubscriptionId) -> Self {
        Self { conn, subscription_id }
    }

    fn account_url(&self, rg: &str, name: &str) -> String {
        self.conn.url(&format!(
            "/subscriptions/{}/resourceGroups/{}/providers/{}/storageAccounts/{}?api-version={}",
            self.subscription_id, rg, PROVIDER, name, API_VERSION,
        ))
    }

    /// Create an account. Account creation is long-running on the remote
    /// side; the accepted response is polled to completion before the final
    /// representation is returned.
    pub async fn create(
        &self,
        rg: &str,
        name: &str,
        params: &StorageAccountCreateParameters,
    ) -> Result<Response<StorageAccount>, ClientError> {
        validate_storage_account_name(name).map_err(|e| ClientError::Api {
            status: 400,
            code: "AccountNameInvalid".into(),
            message: e.to_string(),
        })?;
        info!(resource_group = rg, name, "creating storage account");
        self.conn.put(&self.account_url(rg, name), params).await
    }

    pub async fn get_properties(
        &self,
        rg: &str,
        name: &str,
    ) -> Result<Response<StorageAccount>, ClientError> {
        self.conn.get(&self.account_url(rg, name)).await
    }

    pub async fn delete(&self, rg: &str, name: &str) -> Result<Response<()>, ClientError> {
        info!(resource_group = rg, name, "deleting storage account");
        self.conn.delete(&self.account_url(rg, name)).await
    }

    /// First page of accounts across the subscription.
    pub async fn list(&self) -> Result<Response<Page<StorageAccount>>, ClientError> {
        let url = self.conn.url(&format!(
            "/subscriptions/{}/providers/{}/storageAccounts?api-version={}",
            self.subscription_id, PROVIDER, API_VERSION,
        ));
        self.conn.get_page(&url).await
    }

    pub async fn list_by_resource_group(
        &self,
        rg: &str,
    ) -> Result<Response<Page<StorageAccount>>, ClientError> {
        let url = self.conn.url(&format!(
            "/subscriptions/{}/resourceGroups/{}/providers/{}/storageAccounts?api-version={}",
            self.subscription_id, rg, PROVIDER, API_VERSION,
        ));
        self.conn.get_page(&url).await
    }

    pub async fn list_next(&self, token: &str) -> Result<Response<Page<StorageAccount>>, ClientError> {
        self.conn.get_page(token).await
    }

    /// Every account in the subscription, continuation followed to exhaustion.
    pub async fn list_all_pages(&self) -> Result<Vec<StorageAccount>, ClientError> {
        let url = self.conn.url(&format!(
            "/subscriptions/{}/providers/{}/storageAccounts?api-version={}",
            self.subscription_id, PROVIDER, API_VERSION,
        ));
        self.conn.list_all_pages(&url).await
    }
}

pub struct StorageUsageClient<'a> {
    conn: &'a ArmConnection,
    subscription_id: SubscriptionId,
}

impl<'a> StorageUsageClient<'a> {
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
