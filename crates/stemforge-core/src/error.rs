use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load config from {path}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("missing [{section}] section in stemforge.toml")]
    MissingSection { section: &'static str },

    #[error("missing required setting {section}.{field} in stemforge.toml")]
    MissingSetting {
        section: &'static str,
        field: &'static str,
    },

    #[error("missing required environment variable {0}")]
    MissingEnvVar(String),

    #[error("invalid setting {field}: {reason}")]
    InvalidSetting {
        field: &'static str,
        reason: &'static str,
    },
}
