//! Report which resources exist and their provisioning states

use serde::Serialize;

use anfctl_core::{AccountHandler, PoolHandler, ProvisionConfig, VolumeHandler};

use crate::connection;
use crate::error::Result;
use crate::output::{self, OutputFormat};

#[derive(Debug, Serialize)]
struct ResourceStatus {
    name: String,
    exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    provisioning_state: Option<String>,
}

impl ResourceStatus {
    fn present(name: &str, state: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            exists: true,
            provisioning_state: state,
        }
    }

    fn absent(name: &str) -> Self {
        Self {
            name: name.to_string(),
            exists: false,
            provisioning_state: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct StatusReport {
    account: ResourceStatus,
    pool: ResourceStatus,
    volume: ResourceStatus,
}

pub async fn run(config: &ProvisionConfig, format: OutputFormat) -> Result<()> {
    let client = connection::build_client(config)?;

    let accounts = AccountHandler::new(client.clone());
    let account = match accounts.get(&config.resource_group, &config.account_name).await {
        Ok(a) => ResourceStatus::present(&config.account_name, a.properties.provisioning_state),
        Err(e) if e.is_not_found() => ResourceStatus::absent(&config.account_name),
        Err(e) => return Err(e.into()),
    };

    let pools = PoolHandler::new(client.clone());
    let pool = match pools
        .get(
            &config.resource_group,
            &config.account_name,
            &config.pool_name,
        )
        .await
    {
        Ok(p) => ResourceStatus::present(&config.pool_name, p.properties.provisioning_state),
        // A missing parent also means the pool does not exist
        Err(e) if e.is_not_found() => ResourceStatus::absent(&config.pool_name),
        Err(e) => return Err(e.into()),
    };

    let volumes = VolumeHandler::new(client);
    let volume = match volumes
        .get(
            &config.resource_group,
            &config.account_name,
            &config.pool_name,
            &config.volume_name,
        )
        .await
    {
        Ok(v) => ResourceStatus::present(&config.volume_name, v.properties.provisioning_state),
        Err(e) if e.is_not_found() => ResourceStatus::absent(&config.volume_name),
        Err(e) => return Err(e.into()),
    };

    let report = StatusReport {
        account,
        pool,
        volume,
    };

    if format.is_structured() {
        return output::print_output(&report, format);
    }

    for (label, status) in [
        ("Account", &report.account),
        ("Capacity pool", &report.pool),
        ("Volume", &report.volume),
    ] {
        if status.exists {
            output::message(&format!(
                "{} {}: {}",
                label,
                status.name,
                status.provisioning_state.as_deref().unwrap_or("unknown")
            ));
        } else {
            output::message(&format!("{} {}: not found", label, status.name));
        }
    }
    Ok(())
}
