//! Volume operations

use crate::client::ArmClient;
use crate::error::Result;
use crate::models::Volume;

/// Handler for `Microsoft.NetApp/netAppAccounts/capacityPools/volumes`
pub struct VolumeHandler {
    client: ArmClient,
}

impl VolumeHandler {
    pub fn new(client: ArmClient) -> Self {
        Self { client }
    }

    fn path(&self, resource_group: &str, account: &str, pool: &str, volume: &str) -> String {
        format!(
            "subscriptions/{}/resourceGroups/{}/providers/Microsoft.NetApp/netAppAccounts/{}/capacityPools/{}/volumes/{}",
            self.client.subscription_id(),
            resource_group,
            account,
            pool,
            volume
        )
    }

    pub async fn get(
        &self,
        resource_group: &str,
        account: &str,
        pool: &str,
        volume: &str,
    ) -> Result<Volume> {
        self.client
            .get_json(&self.path(resource_group, account, pool, volume))
            .await
    }

    /// PUT the volume body; returns the provider's initial representation
    pub async fn begin_create_or_update(
        &self,
        resource_group: &str,
        account: &str,
        pool: &str,
        volume: &str,
        body: &Volume,
    ) -> Result<Volume> {
        self.client
            .put_json(&self.path(resource_group, account, pool, volume), body)
            .await
    }

    pub async fn delete(
        &self,
        resource_group: &str,
        account: &str,
        pool: &str,
        volume: &str,
    ) -> Result<()> {
        self.client
            .delete(&self.path(resource_group, account, pool, volume))
            .await
    }
}
