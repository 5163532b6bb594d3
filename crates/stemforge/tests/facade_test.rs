use std::collections::BTreeMap;
use std::path::PathBuf;

use secrecy::SecretString;
use stemforge::builder::{AzureBuilder, PackageError, PackageRequest, Packager};
use stemforge::packer::{BuildContext, DepsDir, VsphereConfig};
use stemforge::runner::{LineSink, PackerError, PackerExecutor, PackerRunner};
use stemforge::{Environment, StemcellSettings, StemforgeConfig, VsphereSettings};

/// Replays canned output lines and exits cleanly.
struct ScriptedExecutor {
    lines: Vec<&'static str>,
}

impl PackerExecutor for ScriptedExecutor {
    async fn execute(
        &self,
        _args: &[String],
        sink: &mut dyn LineSink,
    ) -> Result<i32, PackerError> {
        for line in &self.lines {
            sink.line(line);
        }
        Ok(0)
    }
}

struct NullPackager;

impl Packager for NullPackager {
    fn package(&self, request: PackageRequest) -> Result<PathBuf, PackageError> {
        Ok(request.output_directory.join("artifact.tgz"))
    }
}

fn write_config(dir: &std::path::Path) -> PathBuf {
    let path = dir.join("stemforge.toml");
    std::fs::write(
        &path,
        r#"
[stemcell]
version = "1234.0"
os = "windows2012R2"
agent_commit = "some-agent-commit"

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
"#,
    )
    .unwrap();
    path
}

// ── Re-export surface ──

#[test]
fn core_types_are_flattened_into_the_root() {
    let tmp = tempfile::tempdir().unwrap();
    let config = StemforgeConfig::load(&write_config(tmp.path())).unwrap();

    let env = Environment::from_iter([
        ("ADMINISTRATOR_PASSWORD", "admin-pass"),
        ("NEW_PASSWORD", "new-pass"),
    ]);

    let stemcell = StemcellSettings::from_config(&config).unwrap();
    assert_eq!(stemcell.version, "1234.0");

    let settings = VsphereSettings::assemble(&config, &env).unwrap();
    assert_eq!(settings.owner, "me");
}

#[test]
fn packer_module_builds_documents() {
    let tmp = tempfile::tempdir().unwrap();
    let config = StemforgeConfig::load(&write_config(tmp.path())).unwrap();
    let env = Environment::from_iter([
        ("ADMINISTRATOR_PASSWORD", "admin-pass"),
        ("NEW_PASSWORD", "new-pass"),
    ]);
    let settings = VsphereSettings::assemble(&config, &env).unwrap();

    let context = BuildContext::new(1, SecretString::from("some-password!".to_owned()));
    let deps = DepsDir::new(None);
    let document = VsphereConfig::new(
        &settings,
        &config.stemcell.output_directory,
        &context,
        &deps,
    )
    .document()
    .unwrap();

    let json: serde_json::Value = serde_json::from_str(&document).unwrap();
    assert_eq!(json["builders"][0]["type"], "vmware-vmx");
}

#[tokio::test]
async fn builder_module_drives_a_build_end_to_end() {
    let tmp = tempfile::tempdir().unwrap();
    let config = StemforgeConfig::load(&write_config(tmp.path())).unwrap();
    let env = Environment::from_iter([
        ("AZURE_CLIENT_SECRET", "client-secret"),
        ("AZURE_ADMIN_PASSWORD", "admin-pass"),
    ]);

    let mut stemcell = StemcellSettings::from_config(&config).unwrap();
    stemcell.output_directory = tmp.path().to_owned();
    let settings = stemforge::AzureSettings::assemble(&config, &env).unwrap();

    let builder = AzureBuilder::with_parts(
        stemcell,
        settings,
        PackerRunner::with_executor(ScriptedExecutor {
            lines: vec!["OSDiskUriReadOnlySas: https://x/disk.vhd"],
        }),
        NullPackager,
    );

    let artifact = builder.build(&BTreeMap::new()).await.unwrap();
    assert_eq!(artifact, tmp.path().join("artifact.tgz"));
}
