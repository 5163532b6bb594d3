use std::path::{Path, PathBuf};
use std::process::Command;

/// One packaging request: everything needed to emit a distributable
/// stemcell tarball.
#[derive(Debug, Clone)]
pub struct PackageRequest {
    pub iaas: String,
    pub os: String,
    pub is_light: bool,
    pub version: String,
    /// Directory holding the image payload; `None` for light stemcells.
    pub image_path: Option<PathBuf>,
    pub manifest: String,
    pub apply_spec: String,
    pub output_directory: PathBuf,
    pub update_list: Option<PathBuf>,
}

/// Packaging collaborator: turns a finished build into an artifact path.
pub trait Packager: Send + Sync {
    fn package(&self, request: PackageRequest) -> Result<PathBuf, PackageError>;
}

/// Stages the manifest, apply-spec, image payload and update list into a
/// temp directory and shells out to `tar` for the final artifact.
pub struct TarPackager;

impl TarPackager {
    fn artifact_name(request: &PackageRequest) -> String {
        format!(
            "bosh-stemcell-{}-{}-{}-go_agent.tgz",
            request.version, request.iaas, request.os
        )
    }
}

impl Packager for TarPackager {
    fn package(&self, request: PackageRequest) -> Result<PathBuf, PackageError> {
        let staging = tempfile::tempdir().map_err(|e| PackageError::Staging { source: e })?;

        std::fs::write(staging.path().join("stemcell.MF"), &request.manifest).map_err(|e| {
            PackageError::StageFile {
                name: "stemcell.MF",
                source: e,
            }
        })?;
        std::fs::write(staging.path().join("apply_spec.yml"), &request.apply_spec).map_err(
            |e| PackageError::StageFile {
                name: "apply_spec.yml",
                source: e,
            },
        )?;

        // Light stemcells carry an empty image file; heavy stemcells carry
        // the compressed image directory.
        let image = staging.path().join("image");
        match &request.image_path {
            Some(source) => tar_directory(source, &image)?,
            None => std::fs::write(&image, []).map_err(|e| PackageError::StageFile {
                name: "image",
                source: e,
            })?,
        }

        let mut members = vec!["stemcell.MF", "image", "apply_spec.yml"];
        if let Some(update_list) = &request.update_list {
            std::fs::copy(update_list, staging.path().join("updates.txt")).map_err(|e| {
                PackageError::CopyUpdateList {
                    path: update_list.clone(),
                    source: e,
                }
            })?;
            members.push("updates.txt");
        }

        std::fs::create_dir_all(&request.output_directory).map_err(|e| {
            PackageError::OutputDir {
                path: request.output_directory.clone(),
                source: e,
            }
        })?;
        // tar resolves the archive path before -C applies; keep it absolute
        let output_directory = std::fs::canonicalize(&request.output_directory).map_err(|e| {
            PackageError::OutputDir {
                path: request.output_directory.clone(),
                source: e,
            }
        })?;
        let artifact = output_directory.join(Self::artifact_name(&request));

        let output = Command::new("tar")
            .arg("czf")
            .arg(&artifact)
            .arg("-C")
            .arg(staging.path())
            .args(&members)
            .output()
            .map_err(|e| PackageError::TarCommand { source: e })?;
        if !output.status.success() {
            return Err(PackageError::TarFailed {
                detail: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        tracing::info!(artifact = %artifact.display(), "packaged stemcell");
        Ok(artifact)
    }
}

/// Compresses the contents of `source` into the tarball at `destination`.
fn tar_directory(source: &Path, destination: &Path) -> Result<(), PackageError> {
    let output = Command::new("tar")
        .arg("czf")
        .arg(destination)
        .arg("-C")
        .arg(source)
        .arg(".")
        .output()
        .map_err(|e| PackageError::TarCommand { source: e })?;
    if !output.status.success() {
        return Err(PackageError::TarFailed {
            detail: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
        });
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum PackageError {
    #[error("failed to create the packaging staging directory")]
    Staging { source: std::io::Error },

    #[error("failed to stage {name}")]
    StageFile {
        name: &'static str,
        source: std::io::Error,
    },

    #[error("failed to copy update list {path}")]
    CopyUpdateList {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to prepare output directory {path}")]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to execute tar")]
    TarCommand { source: std::io::Error },

    #[error("tar failed: {detail}")]
    TarFailed { detail: String },
}
