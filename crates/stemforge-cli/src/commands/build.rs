use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use stemforge_builder::{AzureBuilder, VsphereBuilder, VsphereUpdateBuilder};
use stemforge_core::{
    AzureSettings, Environment, StemcellSettings, StemforgeConfig, VsphereSettings,
};
use stemforge_packer::DepsDir;

/// Build a full vSphere stemcell and print the artifact path.
pub async fn build_vsphere(
    config_path: &Path,
    output_directory: Option<&Path>,
    vars: &[String],
) -> anyhow::Result<()> {
    let packer_vars = parse_vars(vars)?;
    let (config, env) = load_inputs(config_path)?;

    let mut stemcell = StemcellSettings::from_config(&config)?;
    if let Some(dir) = output_directory {
        stemcell.output_directory = dir.to_owned();
    }
    let settings = VsphereSettings::assemble(&config, &env)?;
    let deps = DepsDir::discover(env.get("STEMCELL_DEPS_DIR"));

    let artifact = VsphereBuilder::new(stemcell, settings, deps)
        .build(&packer_vars)
        .await
        .context("vsphere build failed")?;

    println!("{}", artifact.display());
    Ok(())
}

/// Apply Windows updates to a source image and print the refreshed
/// image directory.
pub async fn build_vsphere_add_updates(
    config_path: &Path,
    output_directory: Option<&Path>,
    vars: &[String],
) -> anyhow::Result<()> {
    let packer_vars = parse_vars(vars)?;
    let (config, env) = load_inputs(config_path)?;

    let settings = VsphereSettings::assemble(&config, &env)?;
    let output_directory = match output_directory {
        Some(dir) => dir.to_owned(),
        None => config.stemcell.output_directory.clone(),
    };

    let refreshed = VsphereUpdateBuilder::new(settings, output_directory)
        .build(&packer_vars)
        .await
        .context("update build failed")?;

    println!("{}", refreshed.display());
    Ok(())
}

/// Build a light Azure stemcell and print the artifact path.
pub async fn build_azure(
    config_path: &Path,
    output_directory: Option<&Path>,
    vars: &[String],
) -> anyhow::Result<()> {
    let packer_vars = parse_vars(vars)?;
    let (config, env) = load_inputs(config_path)?;

    let mut stemcell = StemcellSettings::from_config(&config)?;
    if let Some(dir) = output_directory {
        stemcell.output_directory = dir.to_owned();
    }
    let settings = AzureSettings::assemble(&config, &env)?;

    let artifact = AzureBuilder::new(stemcell, settings)
        .build(&packer_vars)
        .await
        .context("azure build failed")?;

    println!("{}", artifact.display());
    Ok(())
}

fn load_inputs(config_path: &Path) -> anyhow::Result<(StemforgeConfig, Environment)> {
    let dotenv_loaded = dotenvy::dotenv().is_ok();
    tracing::debug!(dotenv = dotenv_loaded, "loading build inputs");

    let config = StemforgeConfig::load(config_path)?;
    let env = Environment::capture();
    Ok((config, env))
}

fn parse_vars(vars: &[String]) -> anyhow::Result<BTreeMap<String, String>> {
    let mut parsed = BTreeMap::new();
    for var in vars {
        let (key, value) = var
            .split_once('=')
            .with_context(|| format!("invalid --var {var:?}, expected KEY=VALUE"))?;
        parsed.insert(key.to_owned(), value.to_owned());
    }
    Ok(parsed)
}
