//! Tear down the provisioned resources
//!
//! Walks the hierarchy from the innermost resource up: volume, then
//! capacity pool, then account. Each delete is followed by the
//! deletion-confirmation poll; ARM acknowledges deletes before the child
//! resource is actually gone, and deleting the parent too early fails.

use std::time::Duration;

use dialoguer::Confirm;

use anfctl_core::{AccountHandler, PoolHandler, ProvisionConfig, VolumeHandler, workflows};

use crate::cli::TeardownArgs;
use crate::error::{AnfCtlError, Result};
use crate::output;
use crate::{commands::polling_spinner, connection};

pub async fn run(config: &ProvisionConfig, args: &TeardownArgs) -> Result<()> {
    if !args.yes {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete volume '{}', pool '{}', and account '{}' in resource group '{}'?",
                config.volume_name, config.pool_name, config.account_name, config.resource_group
            ))
            .default(false)
            .interact()
            .map_err(|e| AnfCtlError::Config(format!("failed to read confirmation: {}", e)))?;
        if !confirmed {
            return Err(AnfCtlError::Aborted);
        }
    }

    let client = connection::build_client(config)?;
    let timeout = Duration::from_secs(args.wait.wait_timeout);
    let interval = Duration::from_secs(args.wait.wait_interval);

    output::message("Cleaning up created resources...");

    let volumes = VolumeHandler::new(client.clone());
    match volumes
        .get(
            &config.resource_group,
            &config.account_name,
            &config.pool_name,
            &config.volume_name,
        )
        .await
    {
        Ok(volume) => {
            let (pb, callback) = polling_spinner("Deleting", &config.volume_name);
            workflows::delete_volume_and_wait(
                &volumes,
                &config.resource_group,
                &config.account_name,
                &config.pool_name,
                &config.volume_name,
                timeout,
                interval,
                Some(callback),
            )
            .await?;
            pb.finish_and_clear();
            output::success(&format!(
                "Volume successfully deleted: {}",
                volume.id.as_deref().unwrap_or(&config.volume_name)
            ));
        }
        Err(e) if e.is_not_found() => {
            output::message(&format!("Volume {} already absent", config.volume_name));
        }
        Err(e) => return Err(e.into()),
    }

    let pools = PoolHandler::new(client.clone());
    match pools
        .get(
            &config.resource_group,
            &config.account_name,
            &config.pool_name,
        )
        .await
    {
        Ok(pool) => {
            let (pb, callback) = polling_spinner("Deleting", &config.pool_name);
            workflows::delete_pool_and_wait(
                &pools,
                &config.resource_group,
                &config.account_name,
                &config.pool_name,
                timeout,
                interval,
                Some(callback),
            )
            .await?;
            pb.finish_and_clear();
            output::success(&format!(
                "Capacity pool successfully deleted: {}",
                pool.id.as_deref().unwrap_or(&config.pool_name)
            ));
        }
        Err(e) if e.is_not_found() => {
            output::message(&format!(
                "Capacity pool {} already absent",
                config.pool_name
            ));
        }
        Err(e) => return Err(e.into()),
    }

    let accounts = AccountHandler::new(client);
    match accounts.get(&config.resource_group, &config.account_name).await {
        Ok(account) => {
            let (pb, callback) = polling_spinner("Deleting", &config.account_name);
            workflows::delete_account_and_wait(
                &accounts,
                &config.resource_group,
                &config.account_name,
                timeout,
                interval,
                Some(callback),
            )
            .await?;
            pb.finish_and_clear();
            output::success(&format!(
                "Account successfully deleted: {}",
                account.id.as_deref().unwrap_or(&config.account_name)
            ));
        }
        Err(e) if e.is_not_found() => {
            output::message(&format!("Account {} already absent", config.account_name));
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
