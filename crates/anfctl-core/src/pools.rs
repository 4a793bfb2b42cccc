//! Capacity pool operations

use crate::client::ArmClient;
use crate::error::Result;
use crate::models::CapacityPool;

/// Handler for `Microsoft.NetApp/netAppAccounts/capacityPools`
pub struct PoolHandler {
    client: ArmClient,
}

impl PoolHandler {
    pub fn new(client: ArmClient) -> Self {
        Self { client }
    }

    fn path(&self, resource_group: &str, account: &str, pool: &str) -> String {
        format!(
            "subscriptions/{}/resourceGroups/{}/providers/Microsoft.NetApp/netAppAccounts/{}/capacityPools/{}",
            self.client.subscription_id(),
            resource_group,
            account,
            pool
        )
    }

    pub async fn get(
        &self,
        resource_group: &str,
        account: &str,
        pool: &str,
    ) -> Result<CapacityPool> {
        self.client
            .get_json(&self.path(resource_group, account, pool))
            .await
    }

    /// PUT the pool body; returns the provider's initial representation
    pub async fn begin_create_or_update(
        &self,
        resource_group: &str,
        account: &str,
        pool: &str,
        body: &CapacityPool,
    ) -> Result<CapacityPool> {
        self.client
            .put_json(&self.path(resource_group, account, pool), body)
            .await
    }

    pub async fn delete(&self, resource_group: &str, account: &str, pool: &str) -> Result<()> {
        self.client
            .delete(&self.path(resource_group, account, pool))
            .await
    }
}
