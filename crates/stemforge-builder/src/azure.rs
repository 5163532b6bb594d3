use std::collections::BTreeMap;
use std::path::PathBuf;

use stemforge_core::{AzureSettings, StemcellSettings};
use stemforge_packer::{AzureConfig, BuildContext};
use stemforge_runner::{Capture, MarkerExtractor, PackerCli, PackerExecutor, PackerRunner};

use crate::error::{BuildError, Result};
use crate::manifest::{ApplySpec, Manifest};
use crate::packager::{PackageRequest, Packager, TarPackager};

/// Output marker carrying the read-only SAS URL of the captured OS disk.
const DISK_URI_MARKER: &str = "OSDiskUriReadOnlySas:";

/// Azure light stemcell build.
///
/// The image stays in the storage account; the tool reports its disk URL
/// only as an output line, which is captured and recorded in the manifest.
pub struct AzureBuilder<E: PackerExecutor = PackerCli, P: Packager = TarPackager> {
    stemcell: StemcellSettings,
    settings: AzureSettings,
    runner: PackerRunner<E>,
    packager: P,
}

impl AzureBuilder {
    pub fn new(stemcell: StemcellSettings, settings: AzureSettings) -> Self {
        Self::with_parts(stemcell, settings, PackerRunner::new(), TarPackager)
    }
}

impl<E: PackerExecutor, P: Packager> AzureBuilder<E, P> {
    pub fn with_parts(
        stemcell: StemcellSettings,
        settings: AzureSettings,
        runner: PackerRunner<E>,
        packager: P,
    ) -> Self {
        Self {
            stemcell,
            settings,
            runner,
            packager,
        }
    }

    /// Build the stemcell and return the artifact path.
    pub async fn build(&self, packer_vars: &BTreeMap<String, String>) -> Result<PathBuf> {
        self.settings.validate()?;

        let context = BuildContext::generate();
        let config = AzureConfig::new(&self.settings, &context);
        let document = config.document()?;

        tracing::info!(
            os = %self.stemcell.os,
            version = %self.stemcell.version,
            "building azure stemcell"
        );
        let mut capture = Capture::new(MarkerExtractor::new(DISK_URI_MARKER));
        self.runner
            .run("build", &document, packer_vars, &mut capture)
            .await?;
        let disk_uri = capture
            .into_value()
            .map_err(|e| BuildError::ResultExtraction { source: e })?;
        tracing::debug!("captured os disk url");

        let manifest = Manifest::azure(
            &self.stemcell.version,
            &self.stemcell.os,
            &self.settings.publisher,
            &self.settings.offer,
            &self.settings.sku,
            &disk_uri,
        );
        let apply_spec = ApplySpec::new(self.stemcell.agent_commit.as_str());
        let artifact = self.packager.package(PackageRequest {
            iaas: "azure".to_owned(),
            os: self.stemcell.os.clone(),
            is_light: true,
            version: self.stemcell.version.clone(),
            image_path: None,
            manifest: manifest.dump(),
            apply_spec: apply_spec.dump(),
            output_directory: self.stemcell.output_directory.clone(),
            update_list: None,
        })?;
        Ok(artifact)
    }
}
