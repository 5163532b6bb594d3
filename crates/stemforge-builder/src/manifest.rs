//! Stemcell manifest and agent apply-spec generators.
//!
//! Both render opaque text that travels inside the artifact unmodified;
//! the packaging layer never parses it.

/// Stemcell manifest, rendered per IaaS.
pub struct Manifest {
    content: String,
}

impl Manifest {
    /// Heavy vSphere stemcell manifest; the image payload ships inside the
    /// artifact.
    pub fn vsphere(version: &str, os: &str) -> Self {
        Self {
            content: format!(
                r#"---
name: bosh-vsphere-esxi-{os}-go_agent
version: '{version}'
operating_system: {os}
cloud_properties:
  infrastructure: vsphere
  hypervisor: esxi
  os_type: windows
"#
            ),
        }
    }

    /// Light Azure stemcell manifest; the image stays in the storage
    /// account and the manifest records the marketplace reference plus the
    /// captured OS disk URL.
    pub fn azure(
        version: &str,
        os: &str,
        publisher: &str,
        offer: &str,
        sku: &str,
        disk_uri: &str,
    ) -> Self {
        Self {
            content: format!(
                r#"---
name: bosh-azure-hyperv-{os}-go_agent
version: '{version}'
operating_system: {os}
cloud_properties:
  infrastructure: azure
  os_type: windows
  image:
    publisher: {publisher}
    offer: {offer}
    sku: {sku}
    version: latest
  os_disk_sas_uri: {disk_uri}
"#
            ),
        }
    }

    pub fn dump(&self) -> String {
        self.content.clone()
    }
}

/// Agent apply-spec; records which agent build went into the image.
pub struct ApplySpec {
    agent_commit: String,
}

impl ApplySpec {
    pub fn new(agent_commit: impl Into<String>) -> Self {
        Self {
            agent_commit: agent_commit.into(),
        }
    }

    pub fn dump(&self) -> String {
        serde_json::json!({ "agent_commit": self.agent_commit }).to_string()
    }
}
