use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// stemforge.toml configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StemforgeConfig {
    #[serde(default)]
    pub stemcell: StemcellSection,
    pub vsphere: Option<VsphereSection>,
    pub azure: Option<AzureSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StemcellSection {
    /// Stemcell version string, e.g. "1200.17"
    pub version: Option<String>,
    /// OS identifier, e.g. "windows2012R2"
    pub os: Option<String>,
    /// Agent version identifier recorded in the apply spec
    pub agent_commit: Option<String>,
    /// Where packer output and the final artifact land
    #[serde(default = "default_output_directory")]
    pub output_directory: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VsphereSection {
    /// Path to the source VMX image
    pub source_path: Option<PathBuf>,
    /// Guest memory in MB
    #[serde(default = "default_mem_size")]
    pub mem_size: u32,
    /// Guest vCPU count
    #[serde(default = "default_num_vcpus")]
    pub num_vcpus: u32,
    /// Registered owner recorded during generalization
    pub owner: Option<String>,
    /// Registered organization recorded during generalization
    pub organization: Option<String>,
    #[serde(default)]
    pub enable_rdp: bool,
    #[serde(default)]
    pub enable_kms: bool,
    /// KMS server host; required when enable_kms is set
    pub kms_host: Option<String>,
    #[serde(default)]
    pub randomize_password: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzureSection {
    pub client_id: Option<String>,
    pub tenant_id: Option<String>,
    pub subscription_id: Option<String>,
    pub object_id: Option<String>,
    pub resource_group_name: Option<String>,
    pub storage_account: Option<String>,
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default = "default_vm_size")]
    pub vm_size: String,
    /// Marketplace image the build starts from
    #[serde(default = "default_publisher")]
    pub publisher: String,
    #[serde(default = "default_offer")]
    pub offer: String,
    #[serde(default = "default_sku")]
    pub sku: String,
}

impl Default for StemcellSection {
    fn default() -> Self {
        Self {
            version: None,
            os: None,
            agent_commit: None,
            output_directory: default_output_directory(),
        }
    }
}

impl StemforgeConfig {
    /// Load from the given stemforge.toml path.
    pub fn load(config_path: &Path) -> crate::Result<Self> {
        let content =
            std::fs::read_to_string(config_path).map_err(|e| crate::Error::ConfigLoad {
                path: config_path.to_owned(),
                source: e,
            })?;
        toml::from_str(&content).map_err(|e| crate::Error::ConfigParse {
            path: config_path.to_owned(),
            source: e,
        })
    }
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("output")
}

fn default_mem_size() -> u32 {
    4096
}

fn default_num_vcpus() -> u32 {
    4
}

fn default_location() -> String {
    "westus".to_owned()
}

fn default_vm_size() -> String {
    "Standard_D2_v2".to_owned()
}

fn default_publisher() -> String {
    "MicrosoftWindowsServer".to_owned()
}

fn default_offer() -> String {
    "WindowsServer".to_owned()
}

fn default_sku() -> String {
    "2012-R2-Datacenter".to_owned()
}
