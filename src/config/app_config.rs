use std::env;
use std::io::ErrorKind;

use super::probe_config::ProbeConfig;

/// Load the probe configuration from a YAML file.
/// The file location comes from the `CONFIG_FILE` environment variable,
/// falling back to `config.yml` in the working directory. A missing
/// file yields the built-in default run; a present but invalid file is
/// an error.
pub fn load_config() -> Result<ProbeConfig, Box<dyn std::error::Error>> {
    let config_file = env::var("CONFIG_FILE").unwrap_or_else(|_| "config.yml".to_string());

    match std::fs::read_to_string(&config_file) {
        Ok(config_str) => {
            let config: ProbeConfig = serde_yaml::from_str(&config_str)?;
            log::info!("Loaded probe config from {}", config_file);
            Ok(config)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::info!("{} not found, using built-in defaults", config_file);
            Ok(ProbeConfig::default())
        }
        Err(e) => Err(e.into()),
    }
}
