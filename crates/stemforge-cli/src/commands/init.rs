use std::path::Path;

const STEMFORGE_TOML: &str = r#"[stemcell]
# version = "1200.1"
# os = "windows2012R2"
# agent_commit = "221fd05"
# output_directory = "output"

[vsphere]
# source_path = "path/to/source.vmx"
# mem_size = 4096
# num_vcpus = 4
# owner = "your-org"
# organization = "your-org"
# enable_rdp = false
# enable_kms = false
# kms_host = "kms.example.com"
# randomize_password = false

[azure]
# client_id = "service-principal-client-id"
# tenant_id = "tenant-id"
# subscription_id = "subscription-id"
# object_id = "service-principal-object-id"
# resource_group_name = "resource-group"
# storage_account = "storage-account"
# location = "westus"
# vm_size = "Standard_D2_v2"
# publisher = "MicrosoftWindowsServer"
# offer = "WindowsServer"
# sku = "2012-R2-Datacenter"
"#;

const ENV_EXAMPLE: &str = r#"ADMINISTRATOR_PASSWORD=source-image-administrator-password
NEW_PASSWORD=password-set-during-generalization
PRODUCT_KEY=
AZURE_CLIENT_SECRET=service-principal-secret
AZURE_ADMIN_PASSWORD=packer-winrm-password
STEMCELL_DEPS_DIR=
"#;

/// Write starter configuration files into the current directory.
pub async fn init() -> anyhow::Result<()> {
    let mut created = Vec::new();

    // stemforge.toml
    let config_path = Path::new("stemforge.toml");
    if config_path.exists() {
        eprintln!("stemforge.toml already exists, skipping");
    } else {
        std::fs::write(config_path, STEMFORGE_TOML)?;
        created.push("stemforge.toml");
    }

    // .env.example
    let env_example_path = Path::new(".env.example");
    if env_example_path.exists() {
        eprintln!(".env.example already exists, skipping");
    } else {
        std::fs::write(env_example_path, ENV_EXAMPLE)?;
        created.push(".env.example");
    }

    if created.is_empty() {
        println!("Nothing to create — already initialized.");
    } else {
        for f in &created {
            println!("Created {f}");
        }
    }

    println!();
    println!("Next steps:");
    println!();
    println!("  1. Fill in stemforge.toml for your target IaaS");
    println!();
    println!("  2. Configure secrets:");
    println!("     cp .env.example .env");
    println!();
    println!("  3. Verify the setup:");
    println!("     stemforge doctor");
    println!();
    println!("  4. Build:");
    println!("     stemforge build vsphere");

    Ok(())
}
