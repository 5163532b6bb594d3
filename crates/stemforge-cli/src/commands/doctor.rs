use std::fmt;
use std::path::Path;

use stemforge_core::{Environment, StemforgeConfig};

struct Check {
    name: &'static str,
    passed: bool,
    detail: String,
}

impl Check {
    fn ok(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            passed: true,
            detail: detail.into(),
        }
    }

    fn fail(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            passed: false,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.passed { " ok " } else { "FAIL" };
        write!(f, "[{mark}] {:<24} {}", self.name, self.detail)
    }
}

/// Run all readiness checks without early return and report each one.
pub async fn doctor() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let env = Environment::capture();
    let mut checks = Vec::new();

    // Packer binary check
    match tokio::process::Command::new("packer")
        .arg("--version")
        .output()
        .await
    {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout).trim().to_owned();
            checks.push(Check::ok("packer", version));
        }
        Ok(_) => checks.push(Check::fail("packer", "`packer --version` failed")),
        Err(_) => checks.push(Check::fail("packer", "not found on PATH")),
    }

    // Config file check
    let config = match StemforgeConfig::load(Path::new("stemforge.toml")) {
        Ok(config) => {
            checks.push(Check::ok("stemforge.toml", "found"));
            Some(config)
        }
        Err(e) => {
            checks.push(Check::fail("stemforge.toml", e.to_string()));
            None
        }
    };

    // Dependency directory check
    match env.get("STEMCELL_DEPS_DIR") {
        Some(dir) if Path::new(dir).is_dir() => {
            checks.push(Check::ok("STEMCELL_DEPS_DIR", dir));
        }
        Some(dir) => checks.push(Check::fail(
            "STEMCELL_DEPS_DIR",
            format!("{dir} is not a directory"),
        )),
        None => checks.push(Check::ok(
            "STEMCELL_DEPS_DIR",
            "not set; optional payloads disabled",
        )),
    }

    // Secret checks, only for the platforms the config declares
    if let Some(config) = &config {
        if config.vsphere.is_some() {
            for key in ["ADMINISTRATOR_PASSWORD", "NEW_PASSWORD"] {
                checks.push(secret_check(&env, key));
            }
        }
        if config.azure.is_some() {
            for key in ["AZURE_CLIENT_SECRET", "AZURE_ADMIN_PASSWORD"] {
                checks.push(secret_check(&env, key));
            }
        }
    }

    println!();
    for check in &checks {
        println!("{check}");
    }

    if checks.iter().any(|c| !c.passed) {
        anyhow::bail!("some checks failed — see above for details");
    }

    Ok(())
}

fn secret_check(env: &Environment, key: &'static str) -> Check {
    match env.get(key) {
        Some(_) => Check::ok(key, "set"),
        None => Check::fail(key, "not set"),
    }
}
