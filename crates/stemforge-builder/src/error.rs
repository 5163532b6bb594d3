use stemforge_packer::DocumentError;
use stemforge_runner::PackerError;

use crate::packager::PackageError;

pub type Result<T> = std::result::Result<T, BuildError>;

/// A build aborts at the first failing stage; the variant names the stage.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("invalid build settings")]
    Settings {
        #[from]
        source: stemforge_core::Error,
    },

    #[error("failed to serialize the build configuration")]
    Document {
        #[from]
        source: DocumentError,
    },

    #[error("the image build failed")]
    Packer {
        #[from]
        source: PackerError,
    },

    /// The tool exited cleanly but never reported the expected result.
    #[error("could not extract the build result from packer output")]
    ResultExtraction { source: PackerError },

    #[error("failed to package the stemcell")]
    Package {
        #[from]
        source: PackageError,
    },
}
