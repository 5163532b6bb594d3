use std::path::Path;

use secrecy::ExposeSecret;
use stemforge_core::VsphereSettings;

use crate::builders::{BuilderDefinition, VmxBuilder, VmxData};
use crate::context::{BuildContext, DepsDir};
use crate::document::{DocumentError, PackerDocument};
use crate::provision;
use crate::steps::{ProvisionerStep, STOP_ON_ERROR};
use crate::sysprep::SysprepCommand;

/// Optional payloads looked up under the dependency directory.
const SSHD_PAYLOAD: &str = "sshd/OpenSSH-Win64.zip";
const LGPO_PAYLOAD: &str = "lgpo/LGPO.exe";

const SLEEP_THEN_RESTART: &str =
    "powershell.exe -Command Start-Sleep -Seconds 900; Restart-Computer -Force";

/// Full vSphere stemcell build: provision, generalize via the sysprep
/// shutdown command, and export the VMX into the output directory.
pub struct VsphereConfig<'a> {
    settings: &'a VsphereSettings,
    output_directory: &'a Path,
    context: &'a BuildContext,
    deps: &'a DepsDir,
}

impl<'a> VsphereConfig<'a> {
    pub fn new(
        settings: &'a VsphereSettings,
        output_directory: &'a Path,
        context: &'a BuildContext,
        deps: &'a DepsDir,
    ) -> Self {
        Self {
            settings,
            output_directory,
            context,
            deps,
        }
    }

    pub fn builders(&self) -> Vec<BuilderDefinition> {
        vec![
            VmxBuilder {
                r#type: "vmware-vmx".to_owned(),
                source_path: self.settings.source_path.display().to_string(),
                headless: false,
                boot_wait: "2m".to_owned(),
                communicator: "winrm".to_owned(),
                ssh_username: Some("Administrator".to_owned()),
                winrm_username: "Administrator".to_owned(),
                winrm_password: self
                    .settings
                    .administrator_password
                    .expose_secret()
                    .to_owned(),
                winrm_timeout: "1h".to_owned(),
                winrm_insecure: true,
                vm_name: "packer-vmx".to_owned(),
                shutdown_command: self.sysprep_command(),
                shutdown_timeout: "1h".to_owned(),
                vmx_data: vmx_data(self.settings, self.context),
                output_directory: self.output_directory.display().to_string(),
                skip_clean_files: Some(true),
            }
            .into(),
        ]
    }

    pub fn provisioners(&self) -> Vec<ProvisionerStep> {
        let mut steps = vec![
            provision::copy_psmodules(),
            provision::install_psmodules(),
            ProvisionerStep::inline("New-Provisioner"),
            ProvisionerStep::inline("Install-CFFeatures"),
            provision::add_account(self.context),
        ];
        if self.settings.enable_kms {
            steps.push(self.kms_step());
        }
        steps.push(provision::register_updates_task());
        steps.push(provision::wait_updates(self.context));
        steps.push(provision::unregister_updates_task());
        steps.push(provision::remove_account());
        steps.push(ProvisionerStep::inline("Test-InstalledUpdates"));
        steps.push(ProvisionerStep::inline("Protect-CFCell"));
        if let Some(lgpo) = self.deps.find(LGPO_PAYLOAD) {
            steps.push(ProvisionerStep::file_upload(
                lgpo.display().to_string(),
                "C:\\windows\\LGPO.exe",
            ));
        }
        if let Some(sshd) = self.deps.find(SSHD_PAYLOAD) {
            steps.push(ProvisionerStep::file_upload(
                sshd.display().to_string(),
                "C:\\provision\\OpenSSH-Win64.zip",
            ));
            steps.push(ProvisionerStep::inline(
                "Install-SSHD -SSHZipFile 'C:\\provision\\OpenSSH-Win64.zip'",
            ));
        }
        steps.push(provision::copy_agent());
        steps.push(provision::install_agent("vsphere"));
        steps.push(ProvisionerStep::inline(
            "List-InstalledUpdates | Out-File -FilePath \"C:\\updates.txt\" -Encoding ASCII",
        ));
        steps.push(ProvisionerStep::file_download(
            "C:\\updates.txt",
            format!("{}/updates.txt", self.output_directory.display()),
        ));
        steps.push(ProvisionerStep::inline("Optimize-Disk"));
        steps.push(ProvisionerStep::inline("Compress-Disk"));
        steps.push(ProvisionerStep::inline("Clear-Provisioner"));
        steps
    }

    pub fn document(&self) -> Result<String, DocumentError> {
        PackerDocument::new(self.builders(), self.provisioners()).dump()
    }

    fn sysprep_command(&self) -> String {
        SysprepCommand {
            iaas: "vsphere",
            new_password: &self.settings.new_password,
            product_key: &self.settings.product_key,
            owner: &self.settings.owner,
            organization: &self.settings.organization,
            enable_rdp: self.settings.enable_rdp,
            randomize_password: self.settings.randomize_password,
        }
        .render()
    }

    // The KMS step deliberately carries no exit trap: only the stop-on-error
    // line precedes the firewall and slmgr commands.
    fn kms_step(&self) -> ProvisionerStep {
        let host = self.settings.kms_host.as_deref().unwrap_or_default();
        ProvisionerStep::inline_lines(vec![
            STOP_ON_ERROR.to_owned(),
            "netsh advfirewall firewall add rule name=\"Open inbound 1688 for KMS Server\" \
             dir=in action=allow protocol=TCP localport=1688"
                .to_owned(),
            "netsh advfirewall firewall add rule name=\"Open outbound 1688 for KMS Server\" \
             dir=out action=allow protocol=TCP localport=1688"
                .to_owned(),
            format!("cscript //B 'C:\\Windows\\System32\\slmgr.vbs' /skms {host}:1688"),
        ])
    }
}

/// Update-only vSphere build: boot the source VMX, apply Windows updates,
/// and shut down cleanly. The refreshed VMX in the output directory becomes
/// the source image for subsequent full builds.
pub struct VsphereUpdateConfig<'a> {
    settings: &'a VsphereSettings,
    output_directory: &'a Path,
    context: &'a BuildContext,
}

impl<'a> VsphereUpdateConfig<'a> {
    pub fn new(
        settings: &'a VsphereSettings,
        output_directory: &'a Path,
        context: &'a BuildContext,
    ) -> Self {
        Self {
            settings,
            output_directory,
            context,
        }
    }

    pub fn builders(&self) -> Vec<BuilderDefinition> {
        vec![
            VmxBuilder {
                r#type: "vmware-vmx".to_owned(),
                source_path: self.settings.source_path.display().to_string(),
                headless: false,
                boot_wait: "2m".to_owned(),
                communicator: "winrm".to_owned(),
                ssh_username: None,
                winrm_username: "Administrator".to_owned(),
                winrm_password: self
                    .settings
                    .administrator_password
                    .expose_secret()
                    .to_owned(),
                winrm_timeout: "6h".to_owned(),
                winrm_insecure: true,
                vm_name: "packer-vmx".to_owned(),
                shutdown_command: "C:\\Windows\\System32\\shutdown.exe /s".to_owned(),
                shutdown_timeout: "1h".to_owned(),
                vmx_data: vmx_data(self.settings, self.context),
                output_directory: self.output_directory.display().to_string(),
                skip_clean_files: None,
            }
            .into(),
        ]
    }

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
            ProvisionerStep::inline("Get-Log"),
            ProvisionerStep::inline("Clear-Provisioner"),
            ProvisionerStep::restart(SLEEP_THEN_RESTART, "1h"),
            ProvisionerStep::restart(SLEEP_THEN_RESTART, "1h"),
        ]
    }

    pub fn document(&self) -> Result<String, DocumentError> {
        PackerDocument::new(self.builders(), self.provisioners()).dump()
    }
}

/// Sizing is stringified per the tool contract; the display name embeds the
/// frozen per-build clock reading.
fn vmx_data(settings: &VsphereSettings, context: &BuildContext) -> VmxData {
    VmxData {
        memsize: settings.mem_size.to_string(),
        numvcpus: settings.num_vcpus.to_string(),
        displayname: format!("packer-vmx-{}", context.timestamp()),
    }
}
