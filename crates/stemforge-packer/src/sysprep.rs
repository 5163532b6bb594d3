use secrecy::{ExposeSecret, SecretString};

const POWERSHELL: &str = "C:\\Windows\\System32\\WindowsPowerShell\\v1.0\\powershell.exe";

/// Composes the guest generalize command used as the vmx shutdown hook.
///
/// The rendered string is parsed by the guest-side `Invoke-Sysprep` cmdlet,
/// so argument order is fixed: `-NewPassword` always, `-ProductKey` only for
/// a non-empty key, then `-Owner`, `-Organization`, and the two optional
/// flags. `-RandomizePassword` and `-NewPassword` are not mutually
/// exclusive; both appear when both are set.
pub struct SysprepCommand<'a> {
    pub iaas: &'a str,
    pub new_password: &'a SecretString,
    pub product_key: &'a str,
    pub owner: &'a str,
    pub organization: &'a str,
    pub enable_rdp: bool,
    pub randomize_password: bool,
}

impl SysprepCommand<'_> {
    pub fn render(&self) -> String {
        let mut command = format!(
            "{POWERSHELL} -Command Invoke-Sysprep -IaaS {} -NewPassword {}",
            self.iaas,
            self.new_password.expose_secret(),
        );
        if !self.product_key.is_empty() {
            command.push_str(&format!(" -ProductKey {}", self.product_key));
        }
        command.push_str(&format!(" -Owner {}", self.owner));
        command.push_str(&format!(" -Organization {}", self.organization));
        if self.enable_rdp {
            command.push_str(" -EnableRdp");
        }
        if self.randomize_password {
            command.push_str(" -RandomizePassword");
        }
        command
    }
}
