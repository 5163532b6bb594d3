use serde::Serialize;

use crate::builders::BuilderDefinition;
use crate::steps::ProvisionerStep;

/// The complete configuration document handed to the external build tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackerDocument {
    pub builders: Vec<BuilderDefinition>,
    pub provisioners: Vec<ProvisionerStep>,
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("failed to serialize packer config document")]
    Serialize { source: serde_json::Error },
}

impl PackerDocument {
    pub fn new(builders: Vec<BuilderDefinition>, provisioners: Vec<ProvisionerStep>) -> Self {
        Self {
            builders,
            provisioners,
        }
    }

    /// Serialize to the JSON text consumed by the build tool.
    pub fn dump(&self) -> Result<String, DocumentError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| DocumentError::Serialize { source: e })?;
        tracing::debug!(
            builders = self.builders.len(),
            provisioners = self.provisioners.len(),
            "packer config document serialized",
        );
        Ok(json)
    }
}
