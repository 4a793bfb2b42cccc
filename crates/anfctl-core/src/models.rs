//! Typed models for Azure NetApp Files resources
//!
//! These mirror the ARM wire format: every resource is an envelope of
//! `id`/`name`/`location` plus a `properties` bag, with camelCase field
//! names on the wire.

use serde::{Deserialize, Serialize};

/// Minimum capacity pool size: 4 TiB
pub const MIN_POOL_SIZE_BYTES: i64 = 4_398_046_511_104;

/// Minimum volume size: 100 GiB
pub const MIN_VOLUME_SIZE_BYTES: i64 = 107_374_182_400;

/// Capacity pool / volume performance tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ServiceLevel {
    #[default]
    Standard,
    Premium,
    Ultra,
}

impl std::fmt::Display for ServiceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceLevel::Standard => write!(f, "Standard"),
            ServiceLevel::Premium => write!(f, "Premium"),
            ServiceLevel::Ultra => write!(f, "Ultra"),
        }
    }
}

/// Volume security style, decides which protocol's permission model wins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecurityStyle {
    Ntfs,
    Unix,
}

/// Active Directory connection attached to a NetApp account.
///
/// `dns` is a comma-separated string of server addresses, not a list; that
/// is the ARM wire format. `smb_server_name` is a prefix of at most 10
/// characters; the join process appends a random suffix.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveDirectory {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub dns: String,
    pub domain: String,
    pub smb_server_name: String,
    // rename_all would produce serverRootCaCertificate; ARM wants the acronym
    #[serde(
        rename = "serverRootCACertificate",
        skip_serializing_if = "Option::is_none"
    )]
    pub server_root_ca_certificate: Option<String>,
}

/// NetApp account: top-level container for pools and volumes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetAppAccount {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub location: String,
    #[serde(default)]
    pub properties: AccountProperties,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub active_directories: Vec<ActiveDirectory>,
}

/// Capacity pool: provisioned storage allocation owned by an account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityPool {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub location: String,
    pub properties: PoolProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolProperties {
    pub service_level: ServiceLevel,
    /// Pool size in bytes, 4 TiB minimum
    pub size: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
}

/// Mountable volume carved from a capacity pool
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub location: String,
    pub properties: VolumeProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeProperties {
    /// Export path component; conventionally the volume name
    pub creation_token: String,
    pub service_level: ServiceLevel,
    /// Full ARM resource ID of a delegated subnet
    pub subnet_id: String,
    /// Volume quota in bytes, 100 GiB minimum
    pub usage_threshold: i64,
    /// e.g. `["CIFS", "NFSv3"]` for a dual-protocol volume
    pub protocol_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_style: Option<SecurityStyle>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mount_targets: Vec<MountTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
}

/// Mount endpoint reported by the provider once a volume is provisioned
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MountTarget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smb_server_fqdn: Option<String>,
}

/// Build the ARM resource ID of a virtual network subnet
pub fn subnet_resource_id(
    subscription_id: &str,
    resource_group: &str,
    vnet_name: &str,
    subnet_name: &str,
) -> String {
    format!(
        "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Network/virtualNetworks/{}/subnets/{}",
        subscription_id, resource_group, vnet_name, subnet_name
    )
}
