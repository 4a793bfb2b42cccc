//! NetApp account operations

use crate::client::ArmClient;
use crate::error::Result;
use crate::models::NetAppAccount;

/// Handler for `Microsoft.NetApp/netAppAccounts`
pub struct AccountHandler {
    client: ArmClient,
}

impl AccountHandler {
    pub fn new(client: ArmClient) -> Self {
        Self { client }
    }

    fn path(&self, resource_group: &str, account: &str) -> String {
        format!(
            "subscriptions/{}/resourceGroups/{}/providers/Microsoft.NetApp/netAppAccounts/{}",
            self.client.subscription_id(),
            resource_group,
            account
        )
    }

    pub async fn get(&self, resource_group: &str, account: &str) -> Result<NetAppAccount> {
        self.client.get_json(&self.path(resource_group, account)).await
    }

    /// PUT the account body; returns the provider's initial representation
    pub async fn begin_create_or_update(
        &self,
        resource_group: &str,
        account: &str,
        body: &NetAppAccount,
    ) -> Result<NetAppAccount> {
        self.client
            .put_json(&self.path(resource_group, account), body)
            .await
    }

    pub async fn delete(&self, resource_group: &str, account: &str) -> Result<()> {
        self.client.delete(&self.path(resource_group, account)).await
    }
}
