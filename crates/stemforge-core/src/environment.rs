use std::collections::BTreeMap;

use secrecy::SecretString;

use crate::error::{Error, Result};

/// Immutable snapshot of process environment variables.
///
/// Settings assembly reads from a snapshot instead of the live process
/// environment, so it stays a function of explicit inputs. Production code
/// calls [`Environment::capture`] once at startup; tests build one from an
/// iterator of pairs.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    /// Snapshot the current process environment.
    pub fn capture() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Look up a variable. Whitespace-only values count as unset.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key)
            .ok_or_else(|| Error::MissingEnvVar(key.to_owned()))
    }

    pub fn secret(&self, key: &str) -> Result<SecretString> {
        self.require(key)
            .map(|v| SecretString::from(v.to_owned()))
    }
}

impl<K, V> FromIterator<(K, V)> for Environment
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
