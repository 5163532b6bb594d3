use serde::Serialize;

/// First prologue line: stop the inline script at the first error.
pub const STOP_ON_ERROR: &str = "$ErrorActionPreference = \"Stop\";";

/// Second prologue line: convert an unhandled failure into guest exit code 1,
/// which the build tool treats as a failed step.
pub const EXIT_TRAP: &str = "trap { $host.SetShouldExit(1) }";

/// One entry in the ordered provisioner sequence.
///
/// Serialized with a `type` tag matching the build tool's provisioner
/// vocabulary. Optional fields are omitted entirely, never emitted as null;
/// the generated key set is a contract with the tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProvisionerStep {
    File {
        source: String,
        destination: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        direction: Option<String>,
    },
    Powershell {
        #[serde(skip_serializing_if = "Option::is_none")]
        scripts: Option<Vec<String>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        inline: Option<Vec<String>>,
    },
    #[serde(rename = "windows-restart")]
    WindowsRestart {
        restart_command: String,
        restart_timeout: String,
    },
}

impl ProvisionerStep {
    /// Upload a file from the host into the guest.
    pub fn file_upload(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self::File {
            source: source.into(),
            destination: destination.into(),
            direction: None,
        }
    }

    /// Download a file from the guest back to the host.
    pub fn file_download(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self::File {
            source: source.into(),
            destination: destination.into(),
            direction: Some("download".to_owned()),
        }
    }

    /// Run PowerShell script files shipped alongside the build.
    pub fn scripts(paths: Vec<String>) -> Self {
        Self::Powershell {
            scripts: Some(paths),
            inline: None,
        }
    }

    /// Run one guest command under the standard error-propagation prologue.
    ///
    /// The prologue is byte-identical across every step produced here; a
    /// single failing line anywhere in unattended provisioning fails the
    /// whole build.
    pub fn inline(command: impl Into<String>) -> Self {
        Self::Powershell {
            scripts: None,
            inline: Some(vec![
                STOP_ON_ERROR.to_owned(),
                EXIT_TRAP.to_owned(),
                command.into(),
            ]),
        }
    }

    /// Run inline lines exactly as given. The caller owns the prologue.
    pub fn inline_lines(lines: Vec<String>) -> Self {
        Self::Powershell {
            scripts: None,
            inline: Some(lines),
        }
    }

    /// Reboot the guest via `restart_command`, waiting up to
    /// `restart_timeout` for it to come back.
    pub fn restart(
        restart_command: impl Into<String>,
        restart_timeout: impl Into<String>,
    ) -> Self {
        Self::WindowsRestart {
            restart_command: restart_command.into(),
            restart_timeout: restart_timeout.into(),
        }
    }
}
