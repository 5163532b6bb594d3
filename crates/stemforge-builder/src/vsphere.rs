use std::collections::BTreeMap;
use std::path::PathBuf;

use stemforge_core::{StemcellSettings, VsphereSettings};
use stemforge_packer::{BuildContext, DepsDir, VsphereConfig, VsphereUpdateConfig};
use stemforge_runner::{Echo, PackerCli, PackerExecutor, PackerRunner};

use crate::error::Result;
use crate::manifest::{ApplySpec, Manifest};
use crate::packager::{PackageRequest, Packager, TarPackager};

/// Full vSphere stemcell build.
///
/// The image is whatever the tool exported into the output directory (VMX
/// plus disks); no result value is read from the output stream.
pub struct VsphereBuilder<E: PackerExecutor = PackerCli, P: Packager = TarPackager> {
    stemcell: StemcellSettings,
    settings: VsphereSettings,
    deps: DepsDir,
    runner: PackerRunner<E>,
    packager: P,
}

impl VsphereBuilder {
    pub fn new(stemcell: StemcellSettings, settings: VsphereSettings, deps: DepsDir) -> Self {
        Self::with_parts(stemcell, settings, deps, PackerRunner::new(), TarPackager)
    }
}

impl<E: PackerExecutor, P: Packager> VsphereBuilder<E, P> {
    pub fn with_parts(
        stemcell: StemcellSettings,
        settings: VsphereSettings,
        deps: DepsDir,
        runner: PackerRunner<E>,
        packager: P,
    ) -> Self {
        Self {
            stemcell,
            settings,
            deps,
            runner,
            packager,
        }
    }

    /// Build the stemcell and return the artifact path.
    pub async fn build(&self, packer_vars: &BTreeMap<String, String>) -> Result<PathBuf> {
        self.settings.validate()?;

        let context = BuildContext::generate();
        let config = VsphereConfig::new(
            &self.settings,
            &self.stemcell.output_directory,
            &context,
            &self.deps,
        );
        let document = config.document()?;

        tracing::info!(
            os = %self.stemcell.os,
            version = %self.stemcell.version,
            "building vsphere stemcell"
        );
        let mut sink = Echo;
        self.runner
            .run("build", &document, packer_vars, &mut sink)
            .await?;

        let manifest = Manifest::vsphere(&self.stemcell.version, &self.stemcell.os);
        let apply_spec = ApplySpec::new(self.stemcell.agent_commit.as_str());
        let artifact = self.packager.package(PackageRequest {
            iaas: "vsphere".to_owned(),
            os: self.stemcell.os.clone(),
            is_light: false,
            version: self.stemcell.version.clone(),
            image_path: Some(self.stemcell.output_directory.clone()),
            manifest: manifest.dump(),
            apply_spec: apply_spec.dump(),
            output_directory: self.stemcell.output_directory.clone(),
            update_list: Some(self.stemcell.output_directory.join("updates.txt")),
        })?;
        Ok(artifact)
    }
}

/// Update-only vSphere build: refresh a source image with Windows updates.
///
/// No packaging; the refreshed VMX in the output directory is the result.
pub struct VsphereUpdateBuilder<E: PackerExecutor = PackerCli> {
    settings: VsphereSettings,
    output_directory: PathBuf,
    runner: PackerRunner<E>,
}

impl VsphereUpdateBuilder {
    pub fn new(settings: VsphereSettings, output_directory: PathBuf) -> Self {
        Self::with_runner(settings, output_directory, PackerRunner::new())
    }
}

impl<E: PackerExecutor> VsphereUpdateBuilder<E> {
    pub fn with_runner(
        settings: VsphereSettings,
        output_directory: PathBuf,
        runner: PackerRunner<E>,
    ) -> Self {
        Self {
            settings,
            output_directory,
            runner,
        }
    }

    /// Run the update build and return the output directory.
    pub async fn build(&self, packer_vars: &BTreeMap<String, String>) -> Result<PathBuf> {
        self.settings.validate()?;

        let context = BuildContext::generate();
        let config = VsphereUpdateConfig::new(&self.settings, &self.output_directory, &context);
        let document = config.document()?;

        tracing::info!("applying windows updates to the source image");
        let mut sink = Echo;
        self.runner
            .run("build", &document, packer_vars, &mut sink)
            .await?;

        Ok(self.output_directory.clone())
    }
}
