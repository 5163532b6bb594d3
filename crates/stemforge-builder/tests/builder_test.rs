use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use mockall::mock;
use secrecy::SecretString;
use stemforge_builder::{
    AzureBuilder, BuildError, PackageError, PackageRequest, Packager, VsphereBuilder,
    VsphereUpdateBuilder,
};
use stemforge_core::{AzureSettings, StemcellSettings, VsphereSettings};
use stemforge_packer::DepsDir;
use stemforge_runner::{LineSink, PackerError, PackerExecutor, PackerRunner};

mock! {
    TestPackager {}

    impl Packager for TestPackager {
        fn package(&self, request: PackageRequest) -> Result<PathBuf, PackageError>;
    }
}

/// Replays canned output lines and exits with a fixed status.
struct ScriptedExecutor {
    lines: Vec<&'static str>,
    exit: i32,
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
        Ok(self.exit)
    }
}

struct UnreachableExecutor;

impl PackerExecutor for UnreachableExecutor {
    async fn execute(
        &self,
        _args: &[String],
        _sink: &mut dyn LineSink,
    ) -> Result<i32, PackerError> {
        panic!("packer must not run");
    }
}

#[derive(Default)]
struct Recorded {
    args: Vec<String>,
    config: String,
}

struct RecordingExecutor {
    recorded: Arc<Mutex<Recorded>>,
}

impl PackerExecutor for RecordingExecutor {
    async fn execute(
        &self,
        args: &[String],
        _sink: &mut dyn LineSink,
    ) -> Result<i32, PackerError> {
        let mut recorded = self.recorded.lock().unwrap();
        recorded.args = args.to_vec();
        if let Some(path) = args.last() {
            recorded.config = std::fs::read_to_string(path).unwrap();
        }
        Ok(0)
    }
}

fn stemcell(output_directory: &Path) -> StemcellSettings {
    StemcellSettings {
        version: "1234.0".to_owned(),
        os: "windows2012R2".to_owned(),
        agent_commit: "some-agent-commit".to_owned(),
        output_directory: output_directory.to_owned(),
    }
}

fn azure_settings() -> AzureSettings {
    AzureSettings {
        client_id: "some-client-id".to_owned(),
        client_secret: SecretString::from("some-client-secret".to_owned()),
        tenant_id: "some-tenant-id".to_owned(),
        subscription_id: "some-subscription-id".to_owned(),
        object_id: "some-object-id".to_owned(),
        resource_group_name: "some-resource-group-name".to_owned(),
        storage_account: "some-storage-account".to_owned(),
        location: "some-location".to_owned(),
        vm_size: "some-vm-size".to_owned(),
        publisher: "some-publisher".to_owned(),
        offer: "some-offer".to_owned(),
        sku: "some-sku".to_owned(),
        admin_password: SecretString::from("some-admin-password".to_owned()),
    }
}

fn vsphere_settings() -> VsphereSettings {
    VsphereSettings {
        source_path: "source_path".into(),
        mem_size: 1000,
        num_vcpus: 1,
        administrator_password: SecretString::from("password".to_owned()),
        new_password: SecretString::from("new-password".to_owned()),
        product_key: "key".to_owned(),
        owner: "me".to_owned(),
        organization: "me".to_owned(),
        enable_rdp: false,
        enable_kms: false,
        kms_host: None,
        randomize_password: false,
    }
}

// ── Azure Tests ──

#[tokio::test]
async fn azure_build_produces_a_stemcell_tarball() {
    let output_directory = tempfile::tempdir().unwrap();
    let output_path = output_directory.path().to_owned();

    let mut packager = MockTestPackager::new();
    let expected_output = output_path.clone();
    packager
        .expect_package()
        .withf(move |request| {
            request.iaas == "azure"
                && request.os == "windows2012R2"
                && request.is_light
                && request.version == "1234.0"
                && request.image_path.is_none()
                && request.update_list.is_none()
                && request.output_directory == expected_output
                && request
                    .manifest
                    .contains("os_disk_sas_uri: some-disk-image-url")
                && request.apply_spec.contains("some-agent-commit")
        })
        .return_once(|_| Ok(PathBuf::from("path-to-stemcell")));

    let builder = AzureBuilder::with_parts(
        stemcell(&output_path),
        azure_settings(),
        PackerRunner::with_executor(ScriptedExecutor {
            lines: vec![
                "azure-arm,artifact,0",
                "OSDiskUriReadOnlySas: some-disk-image-url",
            ],
            exit: 0,
        }),
        packager,
    );

    let vars = BTreeMap::from([("some_var".to_owned(), "some-value".to_owned())]);
    let artifact = builder.build(&vars).await.unwrap();

    assert_eq!(artifact, PathBuf::from("path-to-stemcell"));
}

#[tokio::test]
async fn azure_build_fails_when_the_result_marker_is_absent() {
    let output_directory = tempfile::tempdir().unwrap();

    let builder = AzureBuilder::with_parts(
        stemcell(output_directory.path()),
        azure_settings(),
        PackerRunner::with_executor(ScriptedExecutor {
            lines: vec!["1495000000,ui,say,Build 'azure-arm' finished."],
            exit: 0,
        }),
        MockTestPackager::new(),
    );

    let err = builder.build(&BTreeMap::new()).await.unwrap_err();
    assert!(matches!(err, BuildError::ResultExtraction { .. }));
}

#[tokio::test]
async fn azure_build_fails_on_a_non_zero_exit() {
    let output_directory = tempfile::tempdir().unwrap();

    let builder = AzureBuilder::with_parts(
        stemcell(output_directory.path()),
        azure_settings(),
        PackerRunner::with_executor(ScriptedExecutor {
            lines: vec!["OSDiskUriReadOnlySas: some-disk-image-url"],
            exit: 1,
        }),
        MockTestPackager::new(),
    );

    let err = builder.build(&BTreeMap::new()).await.unwrap_err();
    assert!(matches!(
        err,
        BuildError::Packer {
            source: PackerError::BuildFailed { code: 1 }
        }
    ));
}

#[tokio::test]
async fn invalid_settings_abort_before_the_tool_runs() {
    let output_directory = tempfile::tempdir().unwrap();
    let mut settings = azure_settings();
    settings.storage_account = String::new();

    let builder = AzureBuilder::with_parts(
        stemcell(output_directory.path()),
        settings,
        PackerRunner::with_executor(UnreachableExecutor),
        MockTestPackager::new(),
    );

    let err = builder.build(&BTreeMap::new()).await.unwrap_err();
    assert!(matches!(err, BuildError::Settings { .. }));
}

#[tokio::test]
async fn packaging_failure_propagates() {
    let output_directory = tempfile::tempdir().unwrap();

    let mut packager = MockTestPackager::new();
    packager.expect_package().return_once(|_| {
        Err(PackageError::TarFailed {
            detail: "boom".to_owned(),
        })
    });

    let builder = AzureBuilder::with_parts(
        stemcell(output_directory.path()),
        azure_settings(),
        PackerRunner::with_executor(ScriptedExecutor {
            lines: vec!["OSDiskUriReadOnlySas: some-disk-image-url"],
            exit: 0,
        }),
        packager,
    );

    let err = builder.build(&BTreeMap::new()).await.unwrap_err();
    assert!(matches!(err, BuildError::Package { .. }));
}

#[tokio::test]
async fn config_document_and_vars_reach_the_tool() {
    let output_directory = tempfile::tempdir().unwrap();
    let recorded = Arc::new(Mutex::new(Recorded::default()));

    let builder = AzureBuilder::with_parts(
        stemcell(output_directory.path()),
        azure_settings(),
        PackerRunner::with_executor(RecordingExecutor {
            recorded: Arc::clone(&recorded),
        }),
        MockTestPackager::new(),
    );

    // No marker in the recorded run, so the build itself errors out after
    // the tool invocation; the recording is what matters here.
    let vars = BTreeMap::from([("some_var".to_owned(), "some-value".to_owned())]);
    let _ = builder.build(&vars).await;

    let recorded = recorded.lock().unwrap();
    assert!(recorded.args.contains(&"-var".to_owned()));
    assert!(recorded.args.contains(&"some_var=some-value".to_owned()));

    let document: serde_json::Value = serde_json::from_str(&recorded.config).unwrap();
    assert_eq!(document["builders"][0]["type"], "azure-arm");
    assert_eq!(document["provisioners"].as_array().unwrap().len(), 15);
}

// ── VSphere Tests ──

#[tokio::test]
async fn vsphere_build_packages_the_output_directory() {
    let output_directory = tempfile::tempdir().unwrap();
    let output_path = output_directory.path().to_owned();

    let mut packager = MockTestPackager::new();
    let expected_output = output_path.clone();
    packager
        .expect_package()
        .withf(move |request| {
            request.iaas == "vsphere"
                && !request.is_light
                && request.image_path == Some(expected_output.clone())
                && request.update_list == Some(expected_output.join("updates.txt"))
                && request.manifest.contains("infrastructure: vsphere")
        })
        .return_once(|_| Ok(PathBuf::from("path-to-stemcell")));

    let builder = VsphereBuilder::with_parts(
        stemcell(&output_path),
        vsphere_settings(),
        DepsDir::new(None),
        PackerRunner::with_executor(ScriptedExecutor {
            lines: vec![],
            exit: 0,
        }),
        packager,
    );

    let artifact = builder.build(&BTreeMap::new()).await.unwrap();
    assert_eq!(artifact, PathBuf::from("path-to-stemcell"));
}

#[tokio::test]
async fn vsphere_build_fails_on_a_non_zero_exit() {
    let output_directory = tempfile::tempdir().unwrap();

    let builder = VsphereBuilder::with_parts(
        stemcell(output_directory.path()),
        vsphere_settings(),
        DepsDir::new(None),
        PackerRunner::with_executor(ScriptedExecutor {
            lines: vec![],
            exit: 2,
        }),
        MockTestPackager::new(),
    );

    let err = builder.build(&BTreeMap::new()).await.unwrap_err();
    assert!(matches!(
        err,
        BuildError::Packer {
            source: PackerError::BuildFailed { code: 2 }
        }
    ));
}

// ── Update-only Tests ──

#[tokio::test]
async fn update_build_returns_the_output_directory_without_packaging() {
    let output_directory = tempfile::tempdir().unwrap();
    let output_path = output_directory.path().to_owned();

    let builder = VsphereUpdateBuilder::with_runner(
        vsphere_settings(),
        output_path.clone(),
        PackerRunner::with_executor(ScriptedExecutor {
            lines: vec![],
            exit: 0,
        }),
    );

    let path = builder.build(&BTreeMap::new()).await.unwrap();
    assert_eq!(path, output_path);
}
