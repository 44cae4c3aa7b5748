pub mod compute;
pub mod network;
pub mod resources;
pub mod servicebus;
pub mod storage;

pub use compute::{
    ComputeUsageClient, VirtualMachineExtensionsClient, VirtualMachineSizesClient,
    VirtualMachinesClient,
};
pub use network::{
    NetworkInterfacesClient, PublicIpAddressesClient, SubnetsClient, VirtualNetworksClient,
};
pub use resources::ResourceGroupsClient;
pub use servicebus::{ListOptions, ServiceBusClient};
pub use storage::{StorageAccountsClient, StorageUsageClient};
