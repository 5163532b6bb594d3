use stemforge_core::{Error, StemforgeConfig};
use tempfile::TempDir;

#[test]
fn load_parses_full_config() {
    let tmp = TempDir::new().unwrap();
    let toml = r#"
[stemcell]
version = "1200.17"
os = "windows2012R2"
agent_commit = "3c7d6a5b"
output_directory = "bosh-windows-stemcell"

[vsphere]
source_path = "images/base-windows2012R2.vmx"
mem_size = 1000
num_vcpus = 1
owner = "Pivotal"
organization = "Pivotal"
enable_rdp = true
enable_kms = true
kms_host = "kms.internal.example.com"
randomize_password = true

[azure]
client_id = "9c94354b"
tenant_id = "b10cb70f"
subscription_id = "0d4a"
object_id = "2f8e"
resource_group_name = "stemcell-builds"
storage_account = "stemcellimages"
location = "eastus"
vm_size = "Standard_D4_v2"
publisher = "MicrosoftWindowsServer"
offer = "WindowsServer"
sku = "2012-R2-Datacenter"
"#;
    let path = tmp.path().join("stemforge.toml");
    std::fs::write(&path, toml).unwrap();

    let config = StemforgeConfig::load(&path).unwrap();

    assert_eq!(config.stemcell.version.as_deref(), Some("1200.17"));
    assert_eq!(config.stemcell.os.as_deref(), Some("windows2012R2"));
    assert_eq!(config.stemcell.agent_commit.as_deref(), Some("3c7d6a5b"));
    assert_eq!(
        config.stemcell.output_directory.to_str(),
        Some("bosh-windows-stemcell")
    );

    let vsphere = config.vsphere.unwrap();
    assert_eq!(
        vsphere.source_path.as_deref().and_then(|p| p.to_str()),
        Some("images/base-windows2012R2.vmx")
    );
    assert_eq!(vsphere.mem_size, 1000);
    assert_eq!(vsphere.num_vcpus, 1);
    assert_eq!(vsphere.owner.as_deref(), Some("Pivotal"));
    assert!(vsphere.enable_rdp);
    assert!(vsphere.enable_kms);
    assert_eq!(
        vsphere.kms_host.as_deref(),
        Some("kms.internal.example.com")
    );
    assert!(vsphere.randomize_password);

    let azure = config.azure.unwrap();
    assert_eq!(azure.client_id.as_deref(), Some("9c94354b"));
    assert_eq!(azure.location, "eastus");
    assert_eq!(azure.vm_size, "Standard_D4_v2");
}

#[test]
fn load_partial_config_fills_defaults() {
    let tmp = TempDir::new().unwrap();
    let toml = r#"
[stemcell]
version = "1200.17"
os = "windows2012R2"
agent_commit = "3c7d6a5b"

[vsphere]
source_path = "base.vmx"
owner = "me"
organization = "me"

[azure]
client_id = "id"
tenant_id = "tid"
subscription_id = "sid"
object_id = "oid"
resource_group_name = "rg"
storage_account = "sa"
"#;
    let path = tmp.path().join("stemforge.toml");
    std::fs::write(&path, toml).unwrap();

    let config = StemforgeConfig::load(&path).unwrap();

    assert_eq!(config.stemcell.output_directory.to_str(), Some("output"));

    let vsphere = config.vsphere.unwrap();
    assert_eq!(vsphere.mem_size, 4096);
    assert_eq!(vsphere.num_vcpus, 4);
    assert!(!vsphere.enable_rdp);
    assert!(!vsphere.enable_kms);
    assert!(vsphere.kms_host.is_none());
    assert!(!vsphere.randomize_password);

    let azure = config.azure.unwrap();
    assert_eq!(azure.location, "westus");
    assert_eq!(azure.vm_size, "Standard_D2_v2");
    assert_eq!(azure.publisher, "MicrosoftWindowsServer");
    assert_eq!(azure.offer, "WindowsServer");
    assert_eq!(azure.sku, "2012-R2-Datacenter");
}

#[test]
fn load_missing_file_is_an_error() {
    let tmp = TempDir::new().unwrap();

    let result = StemforgeConfig::load(&tmp.path().join("stemforge.toml"));
    assert!(matches!(result, Err(Error::ConfigLoad { .. })));
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("stemforge.toml");
    std::fs::write(&path, "not valid {{{{ toml").unwrap();

    let result = StemforgeConfig::load(&path);
    assert!(result.is_err());

    let err = result.unwrap_err().to_string();
    assert!(err.contains("parse"));
}

#[test]
fn load_empty_config_has_default_stemcell_section() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("stemforge.toml");
    std::fs::write(&path, "").unwrap();

    let config = StemforgeConfig::load(&path).unwrap();

    assert!(config.stemcell.version.is_none());
    assert_eq!(config.stemcell.output_directory.to_str(), Some("output"));
    assert!(config.vsphere.is_none());
    assert!(config.azure.is_none());
}
