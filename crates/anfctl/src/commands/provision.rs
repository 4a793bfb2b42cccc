//! Provision the account, capacity pool, and dual-protocol volume
//!
//! Forward path of the resource hierarchy: account (carrying the Active
//! Directory connection for the SMB side), then pool, then volume. Each
//! step is create-or-reuse, so re-running after a partial failure picks up
//! where the last run stopped.

use std::fs;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use tracing::debug;

use anfctl_core::models::{
    AccountProperties, ActiveDirectory, CapacityPool, NetAppAccount, PoolProperties,
    SecurityStyle, Volume, VolumeProperties,
};
use anfctl_core::{AccountHandler, PoolHandler, ProvisionConfig, VolumeHandler, workflows};

use crate::cli::ProvisionArgs;
use crate::error::{AnfCtlError, Result};
use crate::output::{self, OutputFormat};
use crate::{commands::polling_spinner, connection};

pub async fn run(config: &ProvisionConfig, args: &ProvisionArgs, format: OutputFormat) -> Result<()> {
    let client = connection::build_client(config)?;
    let timeout = Duration::from_secs(args.wait.wait_timeout);
    let interval = Duration::from_secs(args.wait.wait_interval);

    let password = domain_join_password()?;
    let cert = encoded_root_ca_cert(config)?;

    // -----------------------------------------------------------------
    // NetApp account with the Active Directory connection
    // -----------------------------------------------------------------
    output::message("Creating NetApp account...");
    let account_body = NetAppAccount {
        id: None,
        name: None,
        location: config.location.clone(),
        properties: AccountProperties {
            provisioning_state: None,
            active_directories: vec![ActiveDirectory {
                username: config.active_directory.username.clone(),
                password: Some(password),
                dns: config.active_directory.dns.clone(),
                domain: config.active_directory.domain.clone(),
                smb_server_name: config.active_directory.smb_server_name.clone(),
                server_root_ca_certificate: Some(cert),
            }],
        },
    };

    let accounts = AccountHandler::new(client.clone());
    let (pb, callback) = polling_spinner("Creating", &config.account_name);
    let account = workflows::ensure_account_and_wait(
        &accounts,
        &config.resource_group,
        &config.account_name,
        &account_body,
        timeout,
        interval,
        Some(callback),
    )
    .await?;
    pb.finish_and_clear();
    output::success(&format!(
        "Account ready, resource ID: {}",
        account.id.as_deref().unwrap_or(&config.account_name)
    ));

    // -----------------------------------------------------------------
    // Capacity pool
    // -----------------------------------------------------------------
    output::message("Creating capacity pool...");
    let pool_body = CapacityPool {
        id: None,
        name: None,
        location: config.location.clone(),
        properties: PoolProperties {
            service_level: config.service_level,
            size: config.pool_size,
            provisioning_state: None,
        },
    };

    let pools = PoolHandler::new(client.clone());
    let (pb, callback) = polling_spinner("Creating", &config.pool_name);
    let pool = workflows::ensure_pool_and_wait(
        &pools,
        &config.resource_group,
        &config.account_name,
        &config.pool_name,
        &pool_body,
        timeout,
        interval,
        Some(callback),
    )
    .await?;
    pb.finish_and_clear();
    output::success(&format!(
        "Capacity pool ready, resource ID: {}",
        pool.id.as_deref().unwrap_or(&config.pool_name)
    ));

    // -----------------------------------------------------------------
    // Dual-protocol volume
    // -----------------------------------------------------------------
    output::message("Creating volume with dual protocol...");
    let volume_body = Volume {
        id: None,
        name: None,
        location: config.location.clone(),
        properties: VolumeProperties {
            creation_token: config.volume_name.clone(),
            service_level: config.service_level,
            subnet_id: config.subnet_id(),
            usage_threshold: config.volume_size,
            protocol_types: vec!["CIFS".to_string(), "NFSv3".to_string()],
            security_style: Some(SecurityStyle::Ntfs),
            mount_targets: Vec::new(),
            provisioning_state: None,
        },
    };

    let volumes = VolumeHandler::new(client);
    let (pb, callback) = polling_spinner("Creating", &config.volume_name);
    let volume = workflows::ensure_volume_and_wait(
        &volumes,
        &config.resource_group,
        &config.account_name,
        &config.pool_name,
        &config.volume_name,
        &volume_body,
        timeout,
        interval,
        Some(callback),
    )
    .await?;
    pb.finish_and_clear();
    output::success(&format!(
        "Volume ready, resource ID: {}",
        volume.id.as_deref().unwrap_or(&config.volume_name)
    ));

    report_volume(&volume, format)
}

/// Summarize the provisioned volume's endpoints
fn report_volume(volume: &anfctl_core::Volume, format: OutputFormat) -> Result<()> {
    if format.is_structured() {
        return output::print_output(volume, format);
    }

    output::message(&format!(
        "Volume protocol types: {}",
        volume.properties.protocol_types.join(", ")
    ));
    match volume.properties.mount_targets.first() {
        Some(target) => {
            output::message(&format!(
                "SMB server FQDN: {}",
                target.smb_server_fqdn.as_deref().unwrap_or("<pending>")
            ));
            output::message(&format!(
                "NFS IP address: {}",
                target.ip_address.as_deref().unwrap_or("<pending>")
            ));
        }
        None => output::message("No mount targets reported yet"),
    }
    Ok(())
}

/// AD join password: environment first, interactive prompt otherwise
fn domain_join_password() -> Result<String> {
    if let Ok(password) = std::env::var("ANFCTL_AD_PASSWORD") {
        debug!("Using AD password from ANFCTL_AD_PASSWORD");
        return Ok(password);
    }
    rpassword::prompt_password(
        "Active Directory user password (used to domain-join the SMB server): ",
    )
    .map_err(|e| AnfCtlError::Config(format!("failed to read password: {}", e)))
}

/// Read the root CA certificate and base64-encode it for the account body
fn encoded_root_ca_cert(config: &ProvisionConfig) -> Result<String> {
    let path = &config.active_directory.root_ca_cert_path;
    let content = fs::read(path).map_err(|e| AnfCtlError::Certificate {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(BASE64.encode(content))
}
