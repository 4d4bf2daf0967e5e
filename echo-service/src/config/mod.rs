use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct EchoConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
}

impl EchoConfig {
    pub fn load() -> Result<Self, AppError> {
        Ok(EchoConfig {
            common: core_config::Config::load()?,
        })
    }
}
