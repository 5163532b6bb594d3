use serde::Serialize;

/// The single machine-image target of one build.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BuilderDefinition {
    Vmx(VmxBuilder),
    AzureArm(AzureArmBuilder),
}

impl From<VmxBuilder> for BuilderDefinition {
    fn from(builder: VmxBuilder) -> Self {
        Self::Vmx(builder)
    }
}

impl From<AzureArmBuilder> for BuilderDefinition {
    fn from(builder: AzureArmBuilder) -> Self {
        Self::AzureArm(builder)
    }
}

/// vmware-vmx builder: boots an existing VMX image, provisions it over
/// WinRM, and exports the result into `output_directory`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VmxBuilder {
    pub r#type: String,
    pub source_path: String,
    pub headless: bool,
    pub boot_wait: String,
    pub communicator: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_username: Option<String>,
    pub winrm_username: String,
    pub winrm_password: String,
    pub winrm_timeout: String,
    pub winrm_insecure: bool,
    pub vm_name: String,
    pub shutdown_command: String,
    pub shutdown_timeout: String,
    pub vmx_data: VmxData,
    pub output_directory: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_clean_files: Option<bool>,
}

/// Guest VMX overrides. Sizing values are stringified per the tool contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VmxData {
    pub memsize: String,
    pub numvcpus: String,
    pub displayname: String,
}

/// azure-arm builder: provisions a marketplace image in a temporary resource
/// group and captures the generalized OS disk into the storage account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AzureArmBuilder {
    pub r#type: String,
    pub client_id: String,
    pub client_secret: String,
    pub tenant_id: String,
    pub subscription_id: String,
    pub object_id: String,
    pub resource_group_name: String,
    pub storage_account: String,
    pub capture_container_name: String,
    pub capture_name_prefix: String,
    pub image_publisher: String,
    pub image_offer: String,
    pub image_sku: String,
    pub location: String,
    pub vm_size: String,
    pub os_type: String,
    pub communicator: String,
    pub winrm_use_ssl: bool,
    pub winrm_insecure: bool,
    pub winrm_timeout: String,
    pub winrm_username: String,
    pub winrm_password: String,
}
