use crate::config::AnalysisConfig;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads the analysis configuration by merging TOML and environment variables.
    ///
    /// Missing files and missing keys fall back to the documented defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load() -> Result<AnalysisConfig> {
        Self::load_from("config/Sentry.toml")
    }

    /// Loads the analysis configuration from a specific TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load_from(path: &str) -> Result<AnalysisConfig> {
        let config: AnalysisConfig = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("SENTRY_"))
            .extract()?;

        Ok(config)
    }
}
