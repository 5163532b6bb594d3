//! Validated, immutable per-build parameter sets.
//!
//! A settings value is assembled once per build invocation from the loaded
//! [`StemforgeConfig`] plus an [`Environment`] snapshot (secrets never live
//! in stemforge.toml), validated, and then treated as read-only by the rest
//! of the pipeline.

use std::fmt;
use std::path::PathBuf;

use secrecy::SecretString;

use crate::config::StemforgeConfig;
use crate::environment::Environment;
use crate::error::{Error, Result};

/// Identity of the stemcell being produced, shared across platforms.
#[derive(Debug, Clone)]
pub struct StemcellSettings {
    pub version: String,
    pub os: String,
    pub agent_commit: String,
    pub output_directory: PathBuf,
}

impl StemcellSettings {
    pub fn from_config(config: &StemforgeConfig) -> Result<Self> {
        let section = &config.stemcell;
        Ok(Self {
            version: require(section.version.clone(), "stemcell", "version")?,
            os: require(section.os.clone(), "stemcell", "os")?,
            agent_commit: require(section.agent_commit.clone(), "stemcell", "agent_commit")?,
            output_directory: section.output_directory.clone(),
        })
    }
}

/// Parameters for the vSphere VMX builds (full stemcell and update-only).
#[derive(Clone)]
pub struct VsphereSettings {
    pub source_path: PathBuf,
    pub mem_size: u32,
    pub num_vcpus: u32,
    /// Password of the existing Administrator account in the source image,
    /// used by the build tool to reach the guest over WinRM.
    pub administrator_password: SecretString,
    /// Password assigned during generalization.
    pub new_password: SecretString,
    /// Windows product key; empty means "do not pass one".
    pub product_key: String,
    pub owner: String,
    pub organization: String,
    pub enable_rdp: bool,
    pub enable_kms: bool,
    pub kms_host: Option<String>,
    pub randomize_password: bool,
}

impl fmt::Debug for VsphereSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VsphereSettings")
            .field("source_path", &self.source_path)
            .field("mem_size", &self.mem_size)
            .field("num_vcpus", &self.num_vcpus)
            .field("administrator_password", &"[REDACTED]")
            .field("new_password", &"[REDACTED]")
            .field("product_key", &"[REDACTED]")
            .field("owner", &self.owner)
            .field("organization", &self.organization)
            .field("enable_rdp", &self.enable_rdp)
            .field("enable_kms", &self.enable_kms)
            .field("kms_host", &self.kms_host)
            .field("randomize_password", &self.randomize_password)
            .finish()
    }
}

impl VsphereSettings {
    /// Assemble from the `[vsphere]` section plus environment secrets
    /// (`ADMINISTRATOR_PASSWORD`, `NEW_PASSWORD`, optional `PRODUCT_KEY`).
    pub fn assemble(config: &StemforgeConfig, env: &Environment) -> Result<Self> {
        let section = config
            .vsphere
            .as_ref()
            .ok_or(Error::MissingSection { section: "vsphere" })?;

        let settings = Self {
            source_path: require(section.source_path.clone(), "vsphere", "source_path")?,
            mem_size: section.mem_size,
            num_vcpus: section.num_vcpus,
            administrator_password: env.secret("ADMINISTRATOR_PASSWORD")?,
            new_password: env.secret("NEW_PASSWORD")?,
            product_key: env.get("PRODUCT_KEY").unwrap_or_default().to_owned(),
            owner: require(section.owner.clone(), "vsphere", "owner")?,
            organization: require(section.organization.clone(), "vsphere", "organization")?,
            enable_rdp: section.enable_rdp,
            enable_kms: section.enable_kms,
            kms_host: section.kms_host.clone(),
            randomize_password: section.randomize_password,
        };
        settings.validate()?;

        tracing::debug!(
            source_path = %settings.source_path.display(),
            mem_size = settings.mem_size,
            num_vcpus = settings.num_vcpus,
            enable_rdp = settings.enable_rdp,
            enable_kms = settings.enable_kms,
            "vsphere settings assembled",
        );
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.mem_size == 0 {
            return Err(Error::InvalidSetting {
                field: "vsphere.mem_size",
                reason: "must be greater than zero",
            });
        }
        if self.num_vcpus == 0 {
            return Err(Error::InvalidSetting {
                field: "vsphere.num_vcpus",
                reason: "must be greater than zero",
            });
        }
        if self.owner.trim().is_empty() {
            return Err(Error::InvalidSetting {
                field: "vsphere.owner",
                reason: "must not be empty",
            });
        }
        if self.organization.trim().is_empty() {
            return Err(Error::InvalidSetting {
                field: "vsphere.organization",
                reason: "must not be empty",
            });
        }
        if self.enable_kms && self.kms_host.as_deref().is_none_or(str::is_empty) {
            return Err(Error::InvalidSetting {
                field: "vsphere.kms_host",
                reason: "required when enable_kms is set",
            });
        }
        Ok(())
    }
}

/// Parameters for the azure-arm build.
#[derive(Clone)]
pub struct AzureSettings {
    pub client_id: String,
    pub client_secret: SecretString,
    pub tenant_id: String,
    pub subscription_id: String,
    pub object_id: String,
    pub resource_group_name: String,
    pub storage_account: String,
    pub location: String,
    pub vm_size: String,
    pub publisher: String,
    pub offer: String,
    pub sku: String,
    /// Admin password for the build VM, used over WinRM.
    pub admin_password: SecretString,
}

impl fmt::Debug for AzureSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureSettings")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("tenant_id", &self.tenant_id)
            .field("subscription_id", &self.subscription_id)
            .field("object_id", &self.object_id)
            .field("resource_group_name", &self.resource_group_name)
            .field("storage_account", &self.storage_account)
            .field("location", &self.location)
            .field("vm_size", &self.vm_size)
            .field("publisher", &self.publisher)
            .field("offer", &self.offer)
            .field("sku", &self.sku)
            .field("admin_password", &"[REDACTED]")
            .finish()
    }
}

impl AzureSettings {
    /// Assemble from the `[azure]` section plus environment secrets
    /// (`AZURE_CLIENT_SECRET`, `AZURE_ADMIN_PASSWORD`).
    pub fn assemble(config: &StemforgeConfig, env: &Environment) -> Result<Self> {
        let section = config
            .azure
            .as_ref()
            .ok_or(Error::MissingSection { section: "azure" })?;

        let settings = Self {
            client_id: require(section.client_id.clone(), "azure", "client_id")?,
            client_secret: env.secret("AZURE_CLIENT_SECRET")?,
            tenant_id: require(section.tenant_id.clone(), "azure", "tenant_id")?,
            subscription_id: require(section.subscription_id.clone(), "azure", "subscription_id")?,
            object_id: require(section.object_id.clone(), "azure", "object_id")?,
            resource_group_name: require(
                section.resource_group_name.clone(),
                "azure",
                "resource_group_name",
            )?,
            storage_account: require(section.storage_account.clone(), "azure", "storage_account")?,
            location: section.location.clone(),
            vm_size: section.vm_size.clone(),
            publisher: section.publisher.clone(),
            offer: section.offer.clone(),
            sku: section.sku.clone(),
            admin_password: env.secret("AZURE_ADMIN_PASSWORD")?,
        };
        settings.validate()?;

        tracing::debug!(
            resource_group = %settings.resource_group_name,
            storage_account = %settings.storage_account,
            location = %settings.location,
            image = %format!("{}/{}/{}", settings.publisher, settings.offer, settings.sku),
            "azure settings assembled",
        );
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("azure.client_id", &self.client_id),
            ("azure.tenant_id", &self.tenant_id),
            ("azure.subscription_id", &self.subscription_id),
            ("azure.object_id", &self.object_id),
            ("azure.resource_group_name", &self.resource_group_name),
            ("azure.storage_account", &self.storage_account),
            ("azure.location", &self.location),
            ("azure.vm_size", &self.vm_size),
            ("azure.publisher", &self.publisher),
            ("azure.offer", &self.offer),
            ("azure.sku", &self.sku),
        ] {
            if value.trim().is_empty() {
                return Err(Error::InvalidSetting {
                    field,
                    reason: "must not be empty",
                });
            }
        }
        Ok(())
    }
}

fn require<T>(value: Option<T>, section: &'static str, field: &'static str) -> Result<T> {
    value.ok_or(Error::MissingSetting { section, field })
}
