//! Multi-step provisioning workflows
//!
//! These compose the resource handlers with the pollers in [`crate::progress`].
//!
//! The create path is **create-or-reuse**: the resource is fetched first,
//! and a PUT goes out only when the provider reports not-found. An existing
//! resource is returned as-is with no create call. Creates are single-shot;
//! there is no retry policy.
//!
//! The delete path is DELETE followed by the deletion-confirmation loop,
//! polling until the provider reports not-found.

use std::time::Duration;

use tracing::info;

use crate::accounts::AccountHandler;
use crate::error::Result;
use crate::models::{CapacityPool, NetAppAccount, Volume};
use crate::pools::PoolHandler;
use crate::progress::{ProgressCallback, poll_provisioning, poll_until_absent};
use crate::volumes::VolumeHandler;

/// Create the account if absent and wait until provisioned; reuse it otherwise
pub async fn ensure_account_and_wait(
    handler: &AccountHandler,
    resource_group: &str,
    account: &str,
    body: &NetAppAccount,
    timeout: Duration,
    interval: Duration,
    on_progress: Option<ProgressCallback>,
) -> Result<NetAppAccount> {
    match handler.get(resource_group, account).await {
        Ok(existing) => {
            info!("Account {} already exists, reusing", account);
            Ok(existing)
        }
        Err(e) if e.is_not_found() => {
            handler
                .begin_create_or_update(resource_group, account, body)
                .await?;
            poll_provisioning(
                account,
                || handler.get(resource_group, account),
                |a: &NetAppAccount| a.properties.provisioning_state.as_deref(),
                timeout,
                interval,
                on_progress,
            )
            .await
        }
        Err(e) => Err(e),
    }
}

/// Create the capacity pool if absent and wait until provisioned; reuse it otherwise
pub async fn ensure_pool_and_wait(
    handler: &PoolHandler,
    resource_group: &str,
    account: &str,
    pool: &str,
    body: &CapacityPool,
    timeout: Duration,
    interval: Duration,
    on_progress: Option<ProgressCallback>,
) -> Result<CapacityPool> {
    match handler.get(resource_group, account, pool).await {
        Ok(existing) => {
            info!("Capacity pool {} already exists, reusing", pool);
            Ok(existing)
        }
        Err(e) if e.is_not_found() => {
            handler
                .begin_create_or_update(resource_group, account, pool, body)
                .await?;
            poll_provisioning(
                pool,
                || handler.get(resource_group, account, pool),
                |p: &CapacityPool| p.properties.provisioning_state.as_deref(),
                timeout,
                interval,
                on_progress,
            )
            .await
        }
        Err(e) => Err(e),
    }
}

/// Create the volume if absent and wait until provisioned; reuse it otherwise
pub async fn ensure_volume_and_wait(
    handler: &VolumeHandler,
    resource_group: &str,
    account: &str,
    pool: &str,
    volume: &str,
    body: &Volume,
    timeout: Duration,
    interval: Duration,
    on_progress: Option<ProgressCallback>,
) -> Result<Volume> {
    match handler.get(resource_group, account, pool, volume).await {
        Ok(existing) => {
            info!("Volume {} already exists, reusing", volume);
            Ok(existing)
        }
        Err(e) if e.is_not_found() => {
            handler
                .begin_create_or_update(resource_group, account, pool, volume, body)
                .await?;
            poll_provisioning(
                volume,
                || handler.get(resource_group, account, pool, volume),
                |v: &Volume| v.properties.provisioning_state.as_deref(),
                timeout,
                interval,
                on_progress,
            )
            .await
        }
        Err(e) => Err(e),
    }
}

/// Delete the volume and wait until the provider stops returning it
pub async fn delete_volume_and_wait(
    handler: &VolumeHandler,
    resource_group: &str,
    account: &str,
    pool: &str,
    volume: &str,
    timeout: Duration,
    interval: Duration,
    on_progress: Option<ProgressCallback>,
) -> Result<()> {
    handler.delete(resource_group, account, pool, volume).await?;
    poll_until_absent(
        volume,
        || handler.get(resource_group, account, pool, volume),
        timeout,
        interval,
        on_progress,
    )
    .await
}

/// Delete the capacity pool and wait until the provider stops returning it
pub async fn delete_pool_and_wait(
    handler: &PoolHandler,
    resource_group: &str,
    account: &str,
    pool: &str,
    timeout: Duration,
    interval: Duration,
    on_progress: Option<ProgressCallback>,
) -> Result<()> {
    handler.delete(resource_group, account, pool).await?;
    poll_until_absent(
        pool,
        || handler.get(resource_group, account, pool),
        timeout,
        interval,
        on_progress,
    )
    .await
}

/// Delete the account and wait until the provider stops returning it
pub async fn delete_account_and_wait(
    handler: &AccountHandler,
    resource_group: &str,
    account: &str,
    timeout: Duration,
    interval: Duration,
    on_progress: Option<ProgressCallback>,
) -> Result<()> {
    handler.delete(resource_group, account).await?;
    poll_until_absent(
        account,
        || handler.get(resource_group, account),
        timeout,
        interval,
        on_progress,
    )
    .await
}
