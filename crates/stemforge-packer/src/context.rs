use std::fmt;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::{Rng, distr::Alphanumeric};
use secrecy::SecretString;

/// Per-build values that must stay constant across every use within one
/// build: the clock reading embedded in the VM display name and the
/// generated provisioning-account password.
///
/// Generated once per build invocation and shared by reference; the password
/// never gets regenerated mid-sequence.
#[derive(Clone)]
pub struct BuildContext {
    timestamp: u64,
    password: SecretString,
}

impl fmt::Debug for BuildContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildContext")
            .field("timestamp", &self.timestamp)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl BuildContext {
    /// Freeze the current clock and generate the per-build password:
    /// 32 alphanumerics plus a trailing symbol for guest password policy.
    pub fn generate() -> Self {
        let token: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();
        Self::new(unix_now(), SecretString::from(format!("{token}!")))
    }

    pub fn new(timestamp: u64, password: SecretString) -> Self {
        Self {
            timestamp,
            password,
        }
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn password(&self) -> &SecretString {
        &self.password
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

/// Read-only view of the optional dependency directory.
///
/// Payload lookups answer present/absent and never fail; an unset or empty
/// directory simply disables the steps that would consume its payloads.
#[derive(Debug, Clone, Default)]
pub struct DepsDir {
    root: Option<PathBuf>,
}

impl DepsDir {
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }

    /// Build from the `STEMCELL_DEPS_DIR` environment value.
    pub fn discover(value: Option<&str>) -> Self {
        match value {
            Some(dir) => {
                tracing::debug!(deps_dir = %dir, "dependency directory configured");
                Self {
                    root: Some(PathBuf::from(dir)),
                }
            }
            None => {
                tracing::debug!("STEMCELL_DEPS_DIR not set; optional payloads disabled");
                Self { root: None }
            }
        }
    }

    /// Look up a payload by its relative path, e.g. `sshd/OpenSSH-Win64.zip`.
    pub fn find(&self, payload: &str) -> Option<PathBuf> {
        let candidate = self.root.as_ref()?.join(payload);
        if !candidate.is_file() {
            tracing::warn!(
                payload,
                "payload missing from the dependency directory; skipping its steps"
            );
            return None;
        }
        Some(candidate)
    }
}
