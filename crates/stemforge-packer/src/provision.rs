//! Step constructors shared across platform configs.
//!
//! The provisioning account created here is temporary: `Add-Account` opens
//! it with the per-build password, the update wait loop re-enters under it,
//! and `Remove-Account` drops it before the image is generalized.

use secrecy::ExposeSecret;

use crate::context::BuildContext;
use crate::steps::ProvisionerStep;

pub(crate) const PROVISION_USER: &str = "Provisioner";

pub(crate) fn copy_psmodules() -> ProvisionerStep {
    ProvisionerStep::file_upload(
        "build/bosh-psmodules.zip",
        "C:\\provision\\bosh-psmodules.zip",
    )
}

pub(crate) fn install_psmodules() -> ProvisionerStep {
    ProvisionerStep::scripts(vec!["scripts/install-bosh-psmodules.ps1".to_owned()])
}

pub(crate) fn add_account(context: &BuildContext) -> ProvisionerStep {
    ProvisionerStep::inline(format!(
        "Add-Account -User {PROVISION_USER} -Password {}",
        context.password().expose_secret(),
    ))
}

pub(crate) fn register_updates_task() -> ProvisionerStep {
    ProvisionerStep::inline("Register-WindowsUpdatesTask")
}

/// Restart step that re-enters the update wait loop until the task reports
/// done; updates may force several reboots, hence the 12 hour ceiling.
pub(crate) fn wait_updates(context: &BuildContext) -> ProvisionerStep {
    ProvisionerStep::restart(
        format!(
            "powershell.exe -Command Wait-WindowsUpdates -Password {} -User {PROVISION_USER}",
            context.password().expose_secret(),
        ),
        "12h",
    )
}

pub(crate) fn unregister_updates_task() -> ProvisionerStep {
    ProvisionerStep::inline("Unregister-WindowsUpdatesTask")
}

pub(crate) fn remove_account() -> ProvisionerStep {
    ProvisionerStep::inline(format!("Remove-Account -User {PROVISION_USER}"))
}

pub(crate) fn copy_agent() -> ProvisionerStep {
    ProvisionerStep::file_upload("build/agent.zip", "C:\\provision\\agent.zip")
}

pub(crate) fn install_agent(iaas: &str) -> ProvisionerStep {
    ProvisionerStep::inline(format!(
        "Install-Agent -IaaS {iaas} -agentZipPath 'C:\\provision\\agent.zip'"
    ))
}
