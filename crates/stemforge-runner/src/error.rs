use std::io;

pub type Result<T> = std::result::Result<T, PackerError>;

/// Failures from staging, launching, and supervising the external tool.
///
/// Variants never carry the argument vector: build variables may hold
/// credentials, and the tool already logs everything it was given.
#[derive(Debug, thiserror::Error)]
pub enum PackerError {
    #[error("packer not found — install: https://developer.hashicorp.com/packer/install")]
    NotFound { source: io::Error },

    #[error("failed to stage the build configuration")]
    StageConfig { source: io::Error },

    #[error("failed to read packer output")]
    OutputRead { source: io::Error },

    #[error("failed to await packer exit")]
    Wait { source: io::Error },

    #[error("packer exited with status {code}")]
    BuildFailed { code: i32 },

    #[error("packer output did not contain {marker:?}")]
    ResultNotFound { marker: String },
}
