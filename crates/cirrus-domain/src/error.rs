use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("invalid resource group name '{0}': 1-90 chars, alphanumerics, '_', '-', '.', '(', ')', must not end with '.'")]
    InvalidResourceGroupName(String),

    #[error("invalid storage account name '{0}': 3-24 lowercase letters and digits")]
    InvalidStorageAccountName(String),

    #[error("invalid subscription id: {0}")]
    InvalidSubscriptionId(String),
}
