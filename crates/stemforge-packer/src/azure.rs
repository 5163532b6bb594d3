use secrecy::ExposeSecret;
use stemforge_core::AzureSettings;

use crate::builders::{AzureArmBuilder, BuilderDefinition};
use crate::context::BuildContext;
use crate::document::{DocumentError, PackerDocument};
use crate::provision;
use crate::steps::ProvisionerStep;

/// Azure stemcell build: provision a marketplace image, generalize it via an
/// in-guest sysprep step, and let the tool capture the OS disk into the
/// storage account. The capture prefix embeds the frozen per-build clock
/// reading so successive builds never collide.
pub struct AzureConfig<'a> {
    settings: &'a AzureSettings,
    context: &'a BuildContext,
}

impl<'a> AzureConfig<'a> {
    pub fn new(settings: &'a AzureSettings, context: &'a BuildContext) -> Self {
        Self { settings, context }
    }

    pub fn builders(&self) -> Vec<BuilderDefinition> {
        vec![
            AzureArmBuilder {
                r#type: "azure-arm".to_owned(),
                client_id: self.settings.client_id.clone(),
                client_secret: self.settings.client_secret.expose_secret().to_owned(),
                tenant_id: self.settings.tenant_id.clone(),
                subscription_id: self.settings.subscription_id.clone(),
                object_id: self.settings.object_id.clone(),
                resource_group_name: self.settings.resource_group_name.clone(),
                storage_account: self.settings.storage_account.clone(),
                capture_container_name: "packer-stemcells".to_owned(),
                capture_name_prefix: format!("bosh-stemcell-{}", self.context.timestamp()),
                image_publisher: self.settings.publisher.clone(),
                image_offer: self.settings.offer.clone(),
                image_sku: self.settings.sku.clone(),
                location: self.settings.location.clone(),
                vm_size: self.settings.vm_size.clone(),
                os_type: "Windows".to_owned(),
                communicator: "winrm".to_owned(),
                winrm_use_ssl: true,
                winrm_insecure: true,
                winrm_timeout: "1h".to_owned(),
                winrm_username: "packer".to_owned(),
                winrm_password: self.settings.admin_password.expose_secret().to_owned(),
            }
            .into(),
        ]
    }

    /// azure-arm has no shutdown hook, so generalization runs as the final
    /// provisioner instead of a shutdown command.
    pub fn provisioners(&self) -> Vec<ProvisionerStep> {
        vec![
            provision::copy_psmodules(),
            provision::install_psmodules(),
            ProvisionerStep::inline("New-Provisioner"),
            provision::add_account(self.context),
            provision::register_updates_task(),
            provision::wait_updates(self.context),
            provision::unregister_updates_task(),
            provision::remove_account(),
            ProvisionerStep::inline("Test-InstalledUpdates"),
            provision::copy_agent(),
            provision::install_agent("azure"),
            ProvisionerStep::inline("Optimize-Disk"),
            ProvisionerStep::inline("Compress-Disk"),
            ProvisionerStep::inline("Clear-Provisioner"),
            ProvisionerStep::inline("Invoke-Sysprep -IaaS azure"),
        ]
    }

    pub fn document(&self) -> Result<String, DocumentError> {
        PackerDocument::new(self.builders(), self.provisioners()).dump()
    }
}
